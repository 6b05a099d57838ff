use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::AppError;
use crate::iban;
use crate::models::{CalculationResult, ValidationOptions};
use crate::services::ValidationResponse;
use crate::state::AppState;

pub fn create_calculate_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/calculate/:country_code/:bank_code/:account_number", get(calculate_iban))
        .route(
            "/v2/calculate/:country_code/:bank_code/:account_number",
            get(calculate_and_validate_iban),
        )
}

pub async fn calculate_iban(
    Path((country_code, bank_code, account_number)): Path<(String, String, String)>,
) -> Result<Json<CalculationResult>, AppError> {
    let calculated = iban::calculate(&country_code, &bank_code, &account_number)?;
    debug!(iban = %calculated.electronic_format(), "IBAN calculated");
    Ok(Json(CalculationResult::from_iban(&calculated, &account_number)))
}

/// Calculate, then run the result through the full validation pipeline with
/// bank code check and BIC lookup.
pub async fn calculate_and_validate_iban(
    State(state): State<Arc<AppState>>,
    Path((country_code, bank_code, account_number)): Path<(String, String, String)>,
) -> Result<ValidationResponse, AppError> {
    let calculated = iban::calculate(&country_code, &bank_code, &account_number)?;
    let options = ValidationOptions { want_bank_code_check: true, want_bic: true };

    Ok(state
        .validation_service
        .handle(&calculated.electronic_format(), options)
        .await)
}
