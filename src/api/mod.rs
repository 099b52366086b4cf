mod handlers;
mod models;

use axum::{
    http::{HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::AppState;

pub use handlers::{not_found, query};
pub use models::{ErrorResponse, QueryParams};

pub const ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];

fn cors() -> CorsLayer {
    let origins = ALLOWED_ORIGINS.map(HeaderValue::from_static);
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET])
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/query", get(query))
        .fallback(not_found)
        .layer(cors())
        .with_state(state)
}
