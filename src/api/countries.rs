use axum::{response::Json, routing::get, Router};
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::iban::countries;
use crate::state::AppState;

pub fn create_countries_router() -> Router<Arc<AppState>> {
    Router::new().route("/countries", get(list_countries))
}

/// Country code to country name, for every supported country.
pub async fn list_countries() -> Json<BTreeMap<&'static str, &'static str>> {
    Json(
        countries::all()
            .iter()
            .map(|rule| (rule.code, rule.name))
            .collect(),
    )
}
