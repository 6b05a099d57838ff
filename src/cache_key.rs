//! Cache key generation utilities
//!
//! A key is the raw request text followed by the option flags, so the
//! same IBAN asked with different options gets its own entry.

use crate::models::ValidationOptions;

/// Cache key for a `/validate` response: IBAN, then the BIC flag, then the bank code flag.
pub fn validation(raw_iban: &str, options: ValidationOptions) -> String {
    format!("{}{}{}", raw_iban, options.want_bic, options.want_bank_code_check)
}
