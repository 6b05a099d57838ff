pub mod validate;
pub mod countries;
pub mod calculate;

use axum::Router;
use std::sync::Arc;

use crate::state::AppState;

/// Validation, country list and IBAN calculation routes
pub fn create_api_router() -> Router<Arc<AppState>> {
    Router::new()
        .merge(validate::create_validate_router())
        .merge(countries::create_countries_router())
        .merge(calculate::create_calculate_router())
}
