//! `/assets` listing and `/health`.

use axum::{
    extract::{Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::get,
    Json, Router,
};
use inventory_core::{AssetFilter, PageRequest, SignedAsset};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ApiError;
use crate::state::{AppState, ListSettings};

/// Total matches before pagination.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/assets", get(list_assets))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Query parameters for listing assets. Numbers are taken as text so that
/// an empty value means "absent" and a bad one is a JSON `BAD_REQUEST`.
#[derive(Debug, Default, Deserialize)]
pub struct ListAssetsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub id: Option<String>,
    pub host: Option<String>,
}

impl ListAssetsQuery {
    fn page(&self, settings: &ListSettings) -> Result<PageRequest, ApiError> {
        let page = parse_param::<u32>("page", self.page.as_deref())?.unwrap_or(1);
        let limit = parse_param::<u32>("limit", self.limit.as_deref())?.unwrap_or(settings.default_limit);
        Ok(PageRequest::new(page, limit, settings.max_limit)?)
    }

    fn filter(&self) -> Result<AssetFilter, ApiError> {
        let id = parse_param::<i64>("id", self.id.as_deref())?;
        Ok(AssetFilter::new(id, self.host.clone()))
    }
}

fn parse_param<T: FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("invalid {name}: {raw}"))),
    }
}

async fn list_assets(
    State(state): State<AppState>,
    Query(query): Query<ListAssetsQuery>,
) -> Result<(HeaderMap, Json<Vec<SignedAsset>>), ApiError> {
    let settings = state.settings;
    let page = query.page(&settings)?;
    let filter = query.filter()?;
    let window = page.window();
    tracing::debug!(?filter, offset = window.offset, limit = window.limit, "listing assets");

    let result = state.store.page(filter, page, settings.empty_lists).await?;

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(result.total));
    Ok((headers, Json(result.assets)))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let healthy = state.store.is_healthy().await;
    let (code, status) = if healthy {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };
    (
        code,
        Json(HealthResponse { status: status.to_string(), version: env!("CARGO_PKG_VERSION").to_string() }),
    )
}
