use serde::{Deserialize, Serialize};

use crate::iban::Iban;

/// Response of `/calculate/{countryCode}/{bankCode}/{accountNumber}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    pub country_code: String,
    pub bank_code: String,
    pub account_number: String,
    pub iban: String,
    pub iban_print_format: String,
}

impl CalculationResult {
    pub fn from_iban(iban: &Iban, account_number: &str) -> Self {
        Self {
            country_code: iban.country_code().to_string(),
            bank_code: iban.bank_code().unwrap_or_default().to_string(),
            account_number: account_number.to_string(),
            iban: iban.electronic_format(),
            iban_print_format: iban.print_format(),
        }
    }
}
