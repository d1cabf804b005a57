//! CORS layer built from configuration.

use axum::http::{header, HeaderName, HeaderValue, Method};
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::routes::TOTAL_COUNT_HEADER;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorsError {
    #[error("invalid CORS origin: {0}")]
    InvalidOrigin(String),
    #[error("wildcard origin cannot be combined with allow_credentials")]
    WildcardWithCredentials,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Exact origins, or `"*"` for any.
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
}

impl Default for CorsSettings {
    fn default() -> Self {
        CorsSettings {
            allowed_origins: vec!["http://localhost:3000".to_string()],
            allow_credentials: true,
        }
    }
}

/// Read-only API: GET and preflight only. `X-Total-Count` is exposed so
/// browser clients can page.
pub fn cors_layer(settings: &CorsSettings) -> Result<CorsLayer, CorsError> {
    let wildcard = settings.allowed_origins.iter().any(|o| o == "*");
    if wildcard && settings.allow_credentials {
        return Err(CorsError::WildcardWithCredentials);
    }

    let allow_origin = if wildcard {
        AllowOrigin::any()
    } else {
        let origins = settings
            .allowed_origins
            .iter()
            .map(|o| HeaderValue::from_str(o).map_err(|_| CorsError::InvalidOrigin(o.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([HeaderName::from_static(TOTAL_COUNT_HEADER)]);
    if settings.allow_credentials {
        cors = cors.allow_credentials(true);
    }
    tracing::debug!(origins = ?settings.allowed_origins, credentials = settings.allow_credentials, "CORS configured");
    Ok(cors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_build() {
        assert!(cors_layer(&CorsSettings::default()).is_ok());
    }

    #[test]
    fn wildcard_without_credentials_builds() {
        let s = CorsSettings { allowed_origins: vec!["*".into()], allow_credentials: false };
        assert!(cors_layer(&s).is_ok());
    }

    #[test]
    fn wildcard_with_credentials_rejected() {
        let s = CorsSettings { allowed_origins: vec!["*".into()], allow_credentials: true };
        assert_eq!(cors_layer(&s).unwrap_err(), CorsError::WildcardWithCredentials);
    }

    #[test]
    fn bad_origin_rejected() {
        let s = CorsSettings { allowed_origins: vec!["http://bad\norigin".into()], allow_credentials: false };
        assert!(matches!(cors_layer(&s), Err(CorsError::InvalidOrigin(_))));
    }
}
