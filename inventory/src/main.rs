use anyhow::{Context, Result};
use assets_sqlite::Db;
use clap::{Parser, Subcommand, ValueEnum};
use inventory_core::{
    build_page, total_pages, Asset, AssetFilter, AssetPage, PageRequest, Signable, SignedAsset,
    DEFAULT_LIMIT, DEFAULT_MAX_LIMIT,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

mod config;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat { Text, Json, Jsonl }

#[derive(Debug, Parser)]
#[command(name = "inventory", version, about = "Read-only asset inventory with content signatures")]
struct Cli {
    /// Optional config file (YAML). If omitted, loads ./inventory.yaml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print version information
    Version,
    /// Serve the HTTP API (GET /assets, GET /health)
    #[cfg(feature = "serve")]
    Serve {
        /// Listen address (default: 0.0.0.0:8080)
        #[arg(long)]
        bind: Option<String>,
        /// SQLite database file (default: assets.db)
        #[arg(long, value_name = "FILE")]
        db: Option<PathBuf>,
    },
    /// Print one page of signed assets from the local database
    List {
        /// SQLite database file (default: assets.db)
        #[arg(long, value_name = "FILE")]
        db: Option<PathBuf>,
        /// Page number, 1-based
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Page size (default from config, else 10)
        #[arg(long)]
        limit: Option<u32>,
        /// Exact asset id
        #[arg(long)]
        id: Option<i64>,
        /// Substring match on host
        #[arg(long)]
        host: Option<String>,
        /// Output format: text, json, or jsonl
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Compute the signature of a host/comment/owner triple
    Sign {
        #[arg(long)]
        host: String,
        #[arg(long, default_value = "")]
        comment: String,
        #[arg(long, default_value = "")]
        owner: String,
    },
    /// Seed the database from CSV (header: host,comment,owner,ips,ports; lists `;`-separated)
    Import {
        file: PathBuf,
        /// SQLite database file, created if missing (default: assets.db)
        #[arg(long, value_name = "FILE")]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let cfg = config::load_config(cli.config.as_deref())?;
    let server_cfg = cfg.server.clone().unwrap_or_default();
    let default_limit = server_cfg.default_limit.unwrap_or(DEFAULT_LIMIT);
    let max_limit = server_cfg.max_limit.unwrap_or(DEFAULT_MAX_LIMIT);

    match cli.command {
        Commands::Version => {
            println!("inventory {} (core {})", env!("CARGO_PKG_VERSION"), inventory_core::version());
        }
        #[cfg(feature = "serve")]
        Commands::Serve { bind, db } => {
            use assets_api::{ApiServer, ApiServerConfig, AppState, AssetStore, CorsSettings, ListSettings};

            let bind = cfg.bind(bind);
            let bind_address = bind.parse().with_context(|| format!("invalid bind address: {bind}"))?;
            let mut cors = CorsSettings::default();
            if let Some(c) = server_cfg.cors.clone() {
                if let Some(origins) = c.allowed_origins { cors.allowed_origins = origins; }
                if let Some(creds) = c.allow_credentials { cors.allow_credentials = creds; }
            }
            // default_limit must itself be a valid page size
            PageRequest::new(1, default_limit, max_limit).context("invalid server.default_limit/max_limit")?;
            let settings = ListSettings { default_limit, max_limit, empty_lists: cfg.list_policy() };
            let state = AppState::new(AssetStore::new(cfg.db_path(db)), settings);
            let server = ApiServer::new(ApiServerConfig { bind_address, cors }, state);
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(server.run())?;
        }
        Commands::List { db, page, limit, id, host, format } => {
            let path = cfg.db_path(db);
            let req = PageRequest::new(page, limit.unwrap_or(default_limit), max_limit)?;
            let filter = AssetFilter::new(id, host);
            let start = Instant::now();
            let db = Db::open_read_only(&path)?;
            let (rows, total) = db.load_page(&filter, req.window())?;
            let result = build_page(rows, total, cfg.list_policy());
            let duration_ms = start.elapsed().as_millis() as u64;
            tracing::debug!(total, returned = result.assets.len(), duration_ms, "listed assets");
            print_page(&result, req, format)?;
        }
        Commands::Sign { host, comment, owner } => {
            let asset = Asset { host, comment, owner, ..Default::default() };
            println!("{}", asset.signature());
        }
        Commands::Import { file, db } => {
            let path = cfg.db_path(db);
            let f = std::fs::File::open(&file).with_context(|| format!("opening {}", file.display()))?;
            let mut db = Db::open_or_create(&path)?;
            let n = db.import_csv(std::io::BufReader::new(f))?;
            println!("imported {} assets into {}", n, path.display());
        }
    }
    Ok(())
}

fn print_page(page: &AssetPage, req: PageRequest, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for a in &page.assets {
                println!("{}", text_line(a));
            }
            println!(
                "(page {} of {}, {} total)",
                req.page,
                total_pages(page.total, req.limit),
                page.total
            );
        }
        OutputFormat::Json => {
            let obj = serde_json::json!({
                "page": req.page,
                "limit": req.limit,
                "total": page.total,
                "assets": page.assets,
            });
            println!("{}", serde_json::to_string_pretty(&obj)?);
        }
        OutputFormat::Jsonl => {
            for a in &page.assets {
                println!("{}", serde_json::to_string(a)?);
            }
        }
    }
    Ok(())
}

fn text_line(a: &SignedAsset) -> String {
    let ips = a.ips.iter().map(|i| i.address.as_str()).collect::<Vec<_>>().join(",");
    let ports = a.ports.iter().map(|p| p.port.to_string()).collect::<Vec<_>>().join(",");
    format!("{}\t{}\t{}\t{}\t[{}]\t[{}]\t{}", a.id, a.host, a.owner, a.comment, ips, ports, a.signature)
}
