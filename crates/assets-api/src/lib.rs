//! Read-only HTTP API over the asset inventory.

mod cors;
mod error;
mod routes;
mod server;
mod state;

pub use cors::{cors_layer, CorsError, CorsSettings};
pub use error::{ApiError, ErrorResponse};
pub use routes::{router, TOTAL_COUNT_HEADER};
pub use server::{shutdown_signal, ApiServer, ApiServerConfig};
pub use state::{AppState, AssetStore, ListSettings};
