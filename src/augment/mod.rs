//! Bank code validation and BIC lookup
//!
//! Both steps take the in-progress result by value and hand back the updated
//! one. Store failures are logged and leave the affected fields absent (or
//! `bankCodeValid: false`); they never fail the request.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

use crate::iban::Iban;
use crate::models::{ValidationOptions, ValidationResult};

pub use memory::InMemoryBankDataStore;
pub use postgres::PgBankDataStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bank data store unavailable: {message}")]
    Unavailable { message: String },
}

/// One row of the bank reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankRecord {
    pub country_code: String,
    pub bank_code: String,
    pub name: String,
    pub zip: Option<String>,
    pub city: Option<String>,
    pub bic: Option<String>,
}

/// Read-only access to the bank reference data.
#[async_trait]
pub trait BankDataStore: Send + Sync {
    async fn bank_code_exists(&self, country_code: &str, bank_code: &str) -> Result<bool, StoreError>;

    async fn find_bank(&self, country_code: &str, bank_code: &str) -> Result<Option<BankRecord>, StoreError>;
}

/// Apply the requested augmentations: bank code check first, then BIC.
pub async fn augment(
    iban: &Iban,
    mut result: ValidationResult,
    options: ValidationOptions,
    store: &dyn BankDataStore,
) -> ValidationResult {
    if options.want_bank_code_check {
        result = validate_bank_code(iban, result, store).await;
    }
    if options.want_bic {
        result = attach_bic(iban, result, store).await;
    }
    result
}

pub async fn validate_bank_code(
    iban: &Iban,
    mut result: ValidationResult,
    store: &dyn BankDataStore,
) -> ValidationResult {
    let Some(bank_code) = iban.bank_code() else {
        result.bank_code_valid = Some(false);
        return result;
    };
    result.bank_code = Some(bank_code.to_string());

    let exists = match store.bank_code_exists(iban.country_code(), bank_code).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!(
                country = %iban.country_code(),
                bank_code = %bank_code,
                "⚠️ Bank code check failed, reporting as invalid: {}", e
            );
            false
        }
    };
    result.bank_code_valid = Some(exists);
    result
}

pub async fn attach_bic(
    iban: &Iban,
    mut result: ValidationResult,
    store: &dyn BankDataStore,
) -> ValidationResult {
    let Some(bank_code) = iban.bank_code() else {
        return result;
    };
    result.bank_code = Some(bank_code.to_string());

    match store.find_bank(iban.country_code(), bank_code).await {
        Ok(Some(record)) => {
            if let Some(bic) = record.bic.filter(|bic| !bic.is_empty()) {
                result.bic = Some(bic);
                result.bank_name = Some(record.name);
            }
        }
        Ok(None) => {}
        Err(e) => {
            warn!(
                country = %iban.country_code(),
                bank_code = %bank_code,
                "⚠️ BIC lookup failed, omitting BIC: {}", e
            );
        }
    }
    result
}
