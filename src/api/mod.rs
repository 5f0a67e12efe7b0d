// HTTP surface: routes, middleware, and the handlers they dispatch to
pub mod handlers {
    pub use crate::handlers::*;
}

use crate::handlers::{health, process_timeline, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Builds the application router.
///
/// `/health` stays outside the body limit; the timeline route accepts up to
/// `config.max_body_bytes`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    let api_routes = Router::new()
        .route("/api/v1/timeline", post(process_timeline))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body_bytes));

    Router::new()
        .route("/health", get(health))
        .merge(api_routes)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
