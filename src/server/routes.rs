//! Application routing
//!
//! This module defines all HTTP routes for the application.

use axum::{
    http::HeaderName,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::api::{ai, headlines, health, image, stats, tables, translate};
use crate::middleware::{log_request, REQUEST_ID_HEADER, TRACE_ID_HEADER};
use crate::server::state::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness))
        .route("/liveness", get(health::liveness));

    let api_routes = Router::new()
        .route("/ai", post(ai::complete))
        .route("/translate", post(translate::translate))
        .route("/tables", post(tables::generate))
        .route("/image", post(image::generate))
        .route("/headlines", get(headlines::list))
        .route("/stats", get(stats::show).post(stats::record));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        // last added = outermost: logging wraps CORS
        .layer(create_cors_layer())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

/// Permissive CORS, exposing the trace id headers
fn create_cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([
            HeaderName::from_static(TRACE_ID_HEADER),
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}
