#![cfg_attr(not(feature = "serve"), allow(dead_code))]
use inventory_core::ListPolicy;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "inventory.yaml";
pub const DEFAULT_DB_PATH: &str = "assets.db";
pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Option<Vec<String>>,
    pub allow_credentials: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct ServerConfig {
    pub bind: Option<String>,
    pub default_limit: Option<u32>,
    pub max_limit: Option<u32>,
    pub cors: Option<CorsConfig>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct AssemblerConfig {
    pub empty_lists: Option<ListPolicy>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct Config {
    pub database: Option<DatabaseConfig>,
    pub server: Option<ServerConfig>,
    pub assembler: Option<AssemblerConfig>,
}

impl Config {
    /// CLI value, then config, then built-in default.
    pub fn db_path(&self, cli: Option<PathBuf>) -> PathBuf {
        cli.or_else(|| self.database.as_ref().and_then(|d| d.path.clone()))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH))
    }

    pub fn bind(&self, cli: Option<String>) -> String {
        cli.or_else(|| self.server.as_ref().and_then(|s| s.bind.clone()))
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    pub fn list_policy(&self) -> ListPolicy {
        self.assembler.as_ref().and_then(|a| a.empty_lists).unwrap_or_default()
    }
}

/// Load `path`, or `./inventory.yaml` when present. A missing default file
/// is not an error; an unreadable or malformed file is.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => {
            let p = Path::new(DEFAULT_CONFIG_FILE);
            if p.exists() { p.to_path_buf() } else { return Ok(Config::default()); }
        }
    };
    let s = fs::read_to_string(&path)
        .map_err(|e| anyhow::anyhow!("reading config {}: {e}", path.display()))?;
    let cfg = serde_yaml::from_str(&s)
        .map_err(|e| anyhow::anyhow!("parsing config {}: {e}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}
