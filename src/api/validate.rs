use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::models::{ValidateQuery, ValidationOptions};
use crate::services::ValidationResponse;
use crate::state::AppState;

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

pub fn create_validate_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/validate/:iban", get(validate_iban))
        // `/validate/` with nothing after the slash still gets a JSON answer
        .route("/validate/", get(validate_empty))
        .route("/validate", get(validate_empty))
}

pub async fn validate_iban(
    State(state): State<Arc<AppState>>,
    Path(iban): Path<String>,
    query: Option<Query<Vec<(String, String)>>>,
) -> ValidationResponse {
    state
        .validation_service
        .handle(&iban, options_from(query))
        .await
}

pub async fn validate_empty(
    State(state): State<Arc<AppState>>,
    query: Option<Query<Vec<(String, String)>>>,
) -> ValidationResponse {
    state
        .validation_service
        .handle("", options_from(query))
        .await
}

// An undecodable query string means no options, never a rejection
fn options_from(query: Option<Query<Vec<(String, String)>>>) -> ValidationOptions {
    let query: ValidateQuery = query
        .map(|Query(pairs)| pairs.into_iter().collect())
        .unwrap_or_default();
    ValidationOptions::from(&query)
}

impl IntoResponse for ValidationResponse {
    fn into_response(self) -> Response {
        let content_length = self.body.len();
        let mut response = (self.status, self.body).into_response();

        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(content_length));
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
        response
    }
}
