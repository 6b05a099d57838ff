// ============================================================================
// AUTOMATIC REQUEST METRICS
// ============================================================================

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::record_http_request;

/// Records count, duration and size of every HTTP request
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let normalized_path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16();
    let response_size = estimate_response_size(&response);

    record_http_request(&method, &normalized_path, status, duration, response_size);

    response
}

/// Collapse path parameters so IBANs and account numbers never become label values
fn normalize_path(path: &str) -> String {
    let segments: Vec<&str> = path.split('/').collect();
    match segments.as_slice() {
        ["", "validate", _] => "/validate/:iban".to_string(),
        ["", "calculate", _, _, _] => "/calculate/:country/:bank/:account".to_string(),
        ["", "v2", "calculate", _, _, _] => "/v2/calculate/:country/:bank/:account".to_string(),
        ["", "validate"] | ["", "countries"] | ["", "metrics"] | ["", "metrics", "prometheus"] | ["", "health"] => {
            path.to_string()
        }
        _ => "other".to_string(),
    }
}

fn estimate_response_size(response: &Response) -> usize {
    response
        .headers()
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0)
}
