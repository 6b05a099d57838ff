use axum::{
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use prometheus::{Encoder, TextEncoder};
use std::sync::Arc;
use tracing::error;

use crate::error::AppError;
use crate::monitoring::uptime_seconds;
use crate::state::AppState;

/// Health, usage register and Prometheus endpoints
pub fn monitoring_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(usage_metrics))
        .route("/metrics/prometheus", get(prometheus_metrics))
}

async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let service = &state.validation_service;
    let health = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "service": "iban_rust_ws",
        "version": env!("CARGO_PKG_VERSION"),
        "environment": service.environment(),
        "uptime_seconds": uptime_seconds(),
        "metrics_strategy": service.metrics().strategy(),
        "cache_entries": service.cache().len(),
    });

    (StatusCode::OK, Json(health))
}

/// In-process usage register. Only exists when no remote collector is configured.
async fn usage_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.validation_service.metrics().local_register() {
        Some(register) => Json(register.snapshot()).into_response(),
        None => AppError::NotFound { resource: "Metrics register".to_string() }.into_response(),
    }
}

/// Service counters (requests, cache, bank table, validation outcomes) in text exposition format.
async fn prometheus_metrics() -> Response {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!("Failed to encode Prometheus metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, "Failed to encode metrics").into_response();
    }

    let mut response = buffer.into_response();
    if let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) {
        response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }
    response
}

#[cfg(test)]
mod tests {
    use crate::augment::InMemoryBankDataStore;
    use crate::cache::ResultCache;
    use crate::create_app_router;
    use crate::metrics::{KeenMetrics, MetricsSink};
    use crate::services::ValidationService;
    use crate::state::AppState;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::ServiceExt;

    fn app_with(metrics: MetricsSink) -> Router {
        let service = ValidationService::new(
            ResultCache::new(Duration::from_secs(300), Duration::from_secs(30)),
            Arc::new(InMemoryBankDataStore::default()),
            metrics,
            "Test",
        );
        create_app_router(Arc::new(AppState::from_service(service, None)))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let (status, _, body) = get_with_content_type(app, uri).await;
        (status, body)
    }

    async fn get_with_content_type(app: Router, uri: &str) -> (StatusCode, String, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_strategy() {
        let (status, body) = get(app_with(MetricsSink::local()), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let health: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(health["metrics_strategy"], "local");
    }

    #[tokio::test]
    async fn test_usage_metrics_served_for_local_strategy() {
        let (status, body) = get(app_with(MetricsSink::local()), "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        let snapshot: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(snapshot["total"], 0);
    }

    #[tokio::test]
    async fn test_usage_metrics_absent_for_remote_strategy() {
        let remote = MetricsSink::Remote(Arc::new(KeenMetrics::new(
            "project".to_string(),
            "key".to_string(),
            "http://127.0.0.1:9".to_string(),
            reqwest::Client::new(),
        )));
        let (status, _) = get(app_with(remote), "/metrics").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_prometheus_endpoint() {
        crate::observability::record_validation("valid");
        let (status, content_type, body) =
            get_with_content_type(app_with(MetricsSink::local()), "/metrics/prometheus").await;
        assert_eq!(status, StatusCode::OK);
        assert!(content_type.starts_with("text/plain; version=0.0.4"));
        assert!(body.contains("iban_validations_total"));
    }
}
