use serde::{Deserialize, Serialize};

// ============================================================================
// VALIDATION REQUEST
// ============================================================================

pub const VALIDATE_BANK_CODE_PARAM: &str = "validateBankCode";
pub const GET_BIC_PARAM: &str = "getBIC";

/// Query parameters accepted by `/validate/{iban}`.
///
/// Built from the raw key/value pairs so that repeated or unknown keys never
/// reject the request. The first occurrence of a key wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidateQuery {
    pub validate_bank_code: Option<String>,
    pub get_bic: Option<String>,
}

impl FromIterator<(String, String)> for ValidateQuery {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(pairs: I) -> Self {
        let mut query = ValidateQuery::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                VALIDATE_BANK_CODE_PARAM => &mut query.validate_bank_code,
                GET_BIC_PARAM => &mut query.get_bic,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        query
    }
}

/// Augmentations requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    pub want_bank_code_check: bool,
    pub want_bic: bool,
}

impl ValidationOptions {
    pub fn any(&self) -> bool {
        self.want_bank_code_check || self.want_bic
    }
}

impl From<&ValidateQuery> for ValidationOptions {
    fn from(query: &ValidateQuery) -> Self {
        Self {
            want_bank_code_check: to_boolean(query.validate_bank_code.as_deref()),
            want_bic: to_boolean(query.get_bic.as_deref()),
        }
    }
}

/// Only `"1"` and `"true"` switch an option on.
pub fn to_boolean(value: Option<&str>) -> bool {
    matches!(value, Some("1") | Some("true"))
}

// ============================================================================
// VALIDATION RESULT
// ============================================================================

/// Response payload of `/validate`. Field order is the wire order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub valid: bool,
    pub message: String,
    pub iban_print_format: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_code_valid: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank_name: Option<String>,
}

impl ValidationResult {
    pub fn new(valid: bool, message: impl Into<String>, iban_print_format: impl Into<String>) -> Self {
        Self {
            valid,
            message: message.into(),
            iban_print_format: iban_print_format.into(),
            bank_code: None,
            bank_code_valid: None,
            bic: None,
            bank_name: None,
        }
    }

    pub fn invalid(message: impl Into<String>, raw_iban: &str) -> Self {
        Self::new(false, message, raw_iban)
    }

    /// Country prefix of the echoed IBAN, if it looks like one.
    pub fn country_code(&self) -> Option<String> {
        let prefix: String = self.iban_print_format.chars().take(2).collect();
        if prefix.len() == 2 && prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            Some(prefix.to_ascii_uppercase())
        } else {
            None
        }
    }
}
