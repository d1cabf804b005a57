use assets_sqlite::Db;
use inventory_core::{build_page, AssetFilter, AssetPage, ListPolicy, PageRequest, DEFAULT_LIMIT, DEFAULT_MAX_LIMIT};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::ApiError;

/// Handle to the backing SQLite file. Each call opens its own read-only
/// connection on the blocking pool, so concurrent requests share nothing
/// but the path.
#[derive(Debug, Clone)]
pub struct AssetStore {
    path: Arc<PathBuf>,
}

impl AssetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AssetStore { path: Arc::new(path.into()) }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load, assemble and sign one page.
    pub async fn page(&self, filter: AssetFilter, page: PageRequest, policy: ListPolicy) -> Result<AssetPage, ApiError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            let db = Db::open_read_only(path.as_path())?;
            let (rows, total) = db.load_page(&filter, page.window())?;
            Ok::<_, anyhow::Error>(build_page(rows, total, policy))
        })
        .await
        .map_err(|e| ApiError::Internal(format!("query task failed: {e}")))?
        .map_err(ApiError::from)
    }

    pub async fn is_healthy(&self) -> bool {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || {
            Db::open_read_only(path.as_path()).and_then(|db| db.table_exists("assets"))
        })
        .await
        .ok()
        .and_then(Result::ok)
        .unwrap_or(false)
    }
}

/// Listing knobs that shape every `/assets` request.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ListSettings {
    pub default_limit: u32,
    pub max_limit: u32,
    pub empty_lists: ListPolicy,
}

impl Default for ListSettings {
    fn default() -> Self {
        ListSettings { default_limit: DEFAULT_LIMIT, max_limit: DEFAULT_MAX_LIMIT, empty_lists: ListPolicy::Legacy }
    }
}

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: AssetStore,
    pub settings: ListSettings,
}

impl AppState {
    pub fn new(store: AssetStore, settings: ListSettings) -> Self {
        AppState { store, settings }
    }
}
