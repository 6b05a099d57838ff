use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::iban::Iban;
use crate::models::ValidationResult;

/// Where a usage event was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventSource {
    /// Replayed from a cached response body
    Cache,
    /// Computed from a freshly parsed IBAN
    Fresh,
    /// Input rejected before parsing
    Unparseable,
}

/// One validation request, as recorded by either metrics strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsEvent {
    pub timestamp: DateTime<Utc>,
    pub environment: String,
    pub country_code: Option<String>,
    pub bank_code: Option<String>,
    pub valid: bool,
    pub source: EventSource,
}

impl MetricsEvent {
    pub fn from_validation_result(environment: &str, result: &ValidationResult, source: EventSource) -> Self {
        Self {
            timestamp: Utc::now(),
            environment: environment.to_string(),
            country_code: result.country_code(),
            bank_code: result.bank_code.clone(),
            valid: result.valid,
            source,
        }
    }

    /// Rebuild the event from a cached JSON body.
    pub fn from_cached_body(environment: &str, body: &str) -> Result<Self, serde_json::Error> {
        let result: ValidationResult = serde_json::from_str(body)?;
        Ok(Self::from_validation_result(environment, &result, EventSource::Cache))
    }

    pub fn from_iban(environment: &str, iban: &Iban) -> Self {
        Self {
            timestamp: Utc::now(),
            environment: environment.to_string(),
            country_code: Some(iban.country_code().to_string()),
            bank_code: iban.bank_code().map(str::to_string),
            valid: iban.is_valid(),
            source: EventSource::Fresh,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_cached_body() {
        let body = serde_json::to_string_pretty(&ValidationResult::new(
            true,
            "Validation successful.",
            "DE89 3704 0044 0532 0130 00",
        ))
        .unwrap();

        let event = MetricsEvent::from_cached_body("Live", &body).unwrap();
        assert_eq!(event.environment, "Live");
        assert_eq!(event.country_code.as_deref(), Some("DE"));
        assert!(event.valid);
        assert_eq!(event.source, EventSource::Cache);
    }

    #[test]
    fn test_event_from_unparseable_verdict() {
        let result = ValidationResult::invalid("Cannot parse as IBAN: Too short.", "DE00");
        let event = MetricsEvent::from_validation_result("Test", &result, EventSource::Unparseable);
        assert_eq!(event.country_code.as_deref(), Some("DE"));
        assert!(!event.valid);
        assert_eq!(event.source, EventSource::Unparseable);
        assert_eq!(serde_json::to_value(&event).unwrap()["source"], "unparseable");
    }

    #[test]
    fn test_event_from_garbage_body_fails() {
        assert!(MetricsEvent::from_cached_body("Live", "not json").is_err());
    }

    #[test]
    fn test_event_from_iban() {
        let iban = Iban::parse("DE88370400440532013000").unwrap();
        let event = MetricsEvent::from_iban("Test", &iban);
        assert_eq!(event.country_code.as_deref(), Some("DE"));
        assert_eq!(event.bank_code.as_deref(), Some("37040044"));
        assert!(!event.valid);
        assert_eq!(event.source, EventSource::Fresh);
    }
}
