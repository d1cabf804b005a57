//! API server: router plus middleware, bound to a listener.

use axum::Router;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::cors::{cors_layer, CorsError, CorsSettings};
use crate::routes;
use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub bind_address: SocketAddr,
    pub cors: CorsSettings,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self { bind_address: SocketAddr::from(([0, 0, 0, 0], 8080)), cors: CorsSettings::default() }
    }
}

pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    /// Builds the router with tracing and CORS applied.
    pub fn router(&self) -> Result<Router, CorsError> {
        Ok(routes::router(self.state.clone())
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&self.config.cors)?))
    }

    /// Runs until `shutdown` resolves.
    pub async fn run_until<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router()?;
        let addr = self.config.bind_address;
        let listener = TcpListener::bind(addr).await?;
        info!(%addr, db = %self.state.store.path().display(), "starting asset API");

        axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;

        info!("asset API shut down");
        Ok(())
    }

    pub async fn run(self) -> anyhow::Result<()> {
        self.run_until(shutdown_signal()).await
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AssetStore, ListSettings};
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    #[test]
    fn router_builds_with_default_config() {
        let state = AppState::new(AssetStore::new("assets.db"), ListSettings::default());
        let server = ApiServer::new(ApiServerConfig::default(), state);
        assert!(server.router().is_ok());
    }

    #[tokio::test]
    async fn serves_until_shutdown() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.db");
        drop(assets_sqlite::Db::open_or_create(&path).unwrap());
        let config = ApiServerConfig { bind_address: SocketAddr::from(([127, 0, 0, 1], 0)), ..Default::default() };
        let server = ApiServer::new(config, AppState::new(AssetStore::new(path), ListSettings::default()));
        server.run_until(async {}).await.unwrap();
    }

    async fn get_with_origin(origin: &str) -> axum::http::HeaderMap {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("assets.db");
        drop(assets_sqlite::Db::open_or_create(&path).unwrap());
        let server = ApiServer::new(ApiServerConfig::default(), AppState::new(AssetStore::new(path), ListSettings::default()));
        let response = server
            .router()
            .unwrap()
            .oneshot(
                Request::builder()
                    .uri("/assets")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        response.headers().clone()
    }

    #[tokio::test]
    async fn cors_exposes_total_count_to_allowed_origin() {
        let headers = get_with_origin("http://localhost:3000").await;
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "http://localhost:3000");
        assert_eq!(headers[header::ACCESS_CONTROL_EXPOSE_HEADERS], "x-total-count");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[crate::routes::TOTAL_COUNT_HEADER], "0");
    }

    #[tokio::test]
    async fn cors_ignores_other_origins() {
        let headers = get_with_origin("http://evil.example").await;
        assert!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }
}
