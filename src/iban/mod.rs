//! IBAN parsing, structural validation and construction
//!
//! The pipeline only talks to this module through `is_parseable`,
//! `Iban::parse` and `Iban::validate`, plus `calculate` for the
//! construction endpoints.

pub mod countries;

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::models::validation::ValidationResult;

pub use countries::{BbanLayout, CountryRule};

// Shortest (NO) and longest IBANs allowed by ISO 13616
pub const MIN_IBAN_LENGTH: usize = 15;
pub const MAX_IBAN_LENGTH: usize = 34;

lazy_static! {
    static ref IBAN_STRUCTURE: Regex = Regex::new(r"^[A-Z]{2}[0-9]{2}[A-Z0-9]+$")
        .expect("IBAN structure regex is valid");
}

/// Outcome of the cheap structural check done before parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserResult {
    pub valid: bool,
    pub message: String,
}

impl ParserResult {
    fn ok() -> Self {
        Self { valid: true, message: String::new() }
    }

    fn rejected(message: &str) -> Self {
        Self { valid: false, message: message.to_string() }
    }
}

/// Strip whitespace and uppercase.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Reports whether `raw` can be split into country code, check digits and BBAN.
pub fn is_parseable(raw: &str) -> ParserResult {
    let candidate = normalize(raw);

    if candidate.len() < MIN_IBAN_LENGTH {
        return ParserResult::rejected("Too short.");
    }
    if candidate.len() > MAX_IBAN_LENGTH {
        return ParserResult::rejected("Too long.");
    }
    if !IBAN_STRUCTURE.is_match(&candidate) {
        return ParserResult::rejected("Invalid characters or structure.");
    }

    ParserResult::ok()
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    Structure(String),
}

/// A structurally parsed IBAN. Not necessarily valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Iban {
    country_code: String,
    check_digits: String,
    bban: String,
}

impl Iban {
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let parser_result = is_parseable(raw);
        if !parser_result.valid {
            return Err(ParseError::Structure(parser_result.message));
        }

        let normalized = normalize(raw);
        // ASCII guaranteed by the structure regex
        Ok(Self {
            country_code: normalized[0..2].to_string(),
            check_digits: normalized[2..4].to_string(),
            bban: normalized[4..].to_string(),
        })
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn check_digits(&self) -> &str {
        &self.check_digits
    }

    pub fn bban(&self) -> &str {
        &self.bban
    }

    pub fn country(&self) -> Option<&'static CountryRule> {
        countries::find(&self.country_code)
    }

    /// Bank code slice of the BBAN, when the country defines one and the BBAN is long enough.
    pub fn bank_code(&self) -> Option<&str> {
        let (offset, length) = self.country()?.bank_code?;
        self.bban.get(offset..offset + length)
    }

    pub fn electronic_format(&self) -> String {
        format!("{}{}{}", self.country_code, self.check_digits, self.bban)
    }

    /// Groups of four characters separated by single spaces.
    pub fn print_format(&self) -> String {
        let electronic = self.electronic_format();
        electronic
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn has_valid_checksum(&self) -> bool {
        mod97(&format!("{}{}{}", self.bban, self.country_code, self.check_digits)) == Some(1)
    }

    pub fn is_valid(&self) -> bool {
        self.validation_failure().is_none()
    }

    /// Country, length and checksum checks, in that order.
    pub fn validate(&self) -> ValidationResult {
        let message = self
            .validation_failure()
            .unwrap_or_else(|| "Validation successful.".to_string());

        ValidationResult::new(self.is_valid(), message, self.print_format())
    }

    fn validation_failure(&self) -> Option<String> {
        let Some(country) = self.country() else {
            return Some(format!("Unsupported country code: {}.", self.country_code));
        };

        if self.electronic_format().len() != country.iban_length {
            return Some(format!(
                "Invalid length: expected {} characters for {}.",
                country.iban_length, country.code
            ));
        }

        if !self.has_valid_checksum() {
            return Some("Invalid checksum.".to_string());
        }

        None
    }
}

/// ISO 7064 MOD 97-10 over an alphanumeric string, letters mapped to 10..35.
///
/// Returns `None` for characters outside `[0-9A-Z]`.
pub fn mod97(input: &str) -> Option<u32> {
    let mut remainder: u32 = 0;
    for c in input.chars() {
        let value = c.to_digit(36)?;
        remainder = if value < 10 {
            (remainder * 10 + value) % 97
        } else {
            (remainder * 100 + value) % 97
        };
    }
    Some(remainder)
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculationError {
    #[error("IBAN calculation is not supported for country code {0}")]
    UnsupportedCountry(String),

    #[error("Bank code must be {expected} {kind} characters, got '{bank_code}'")]
    InvalidBankCode { bank_code: String, expected: usize, kind: &'static str },

    #[error("Account number must be at most {max} digits, got '{account_number}'")]
    InvalidAccountNumber { account_number: String, max: usize },
}

/// Build an IBAN from a national bank code and account number.
pub fn calculate(country_code: &str, bank_code: &str, account_number: &str) -> Result<Iban, CalculationError> {
    let country_code = country_code.to_uppercase();
    let layout = countries::find(&country_code)
        .and_then(|rule| rule.layout)
        .ok_or_else(|| CalculationError::UnsupportedCountry(country_code.clone()))?;

    let bank_code = bank_code.to_uppercase();
    let bank_code_ok = bank_code.len() == layout.bank_code_length
        && bank_code.chars().all(|c| {
            if layout.alphanumeric_bank_code {
                c.is_ascii_alphanumeric()
            } else {
                c.is_ascii_digit()
            }
        });
    if !bank_code_ok {
        return Err(CalculationError::InvalidBankCode {
            bank_code,
            expected: layout.bank_code_length,
            kind: if layout.alphanumeric_bank_code { "alphanumeric" } else { "numeric" },
        });
    }

    if account_number.is_empty()
        || account_number.len() > layout.account_length
        || !account_number.chars().all(|c| c.is_ascii_digit())
    {
        return Err(CalculationError::InvalidAccountNumber {
            account_number: account_number.to_string(),
            max: layout.account_length,
        });
    }

    let bban = format!("{}{:0>width$}", bank_code, account_number, width = layout.account_length);
    // All characters were checked above
    let remainder = mod97(&format!("{}{}00", bban, country_code)).unwrap_or(0);
    let check_digits = format!("{:02}", 98 - remainder);

    Ok(Iban { country_code, check_digits, bban })
}
