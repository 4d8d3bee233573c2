//! HTTP API module: health, info, echo and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::{create_router, serve};
