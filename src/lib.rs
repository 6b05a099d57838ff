use axum::{middleware as axum_middleware, Router};
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod augment;
pub mod cache;
pub mod cache_key;
pub mod cache_ttl;
pub mod config;
pub mod error;
pub mod iban;
pub mod metrics;
pub mod models;
pub mod monitoring;
pub mod observability;
pub mod security;
pub mod services;
pub mod state;

use api::create_api_router;
use monitoring::endpoints::monitoring_router;
use observability::metrics_middleware;
use security::{get_cors_layer, security_headers_middleware};
use state::AppState;

pub fn create_app_router(app_state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Health, usage register, Prometheus
        .merge(monitoring_router())
        // /validate, /countries, /calculate
        .merge(create_api_router());

    // Static pages for unmatched routes
    if let Some(static_dir) = &app_state.static_dir {
        router = router.fallback_service(ServeDir::new(static_dir));
    }

    router
        .with_state(app_state)
        .layer(axum_middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(get_cors_layer())
        .layer(axum_middleware::from_fn(security_headers_middleware))
}
