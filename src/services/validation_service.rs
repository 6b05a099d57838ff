use axum::http::StatusCode;
use std::sync::Arc;
use tracing::{debug, error};

use crate::augment::{self, BankDataStore};
use crate::cache::ResultCache;
use crate::cache_key;
use crate::cache_ttl::NO_EXPIRY;
use crate::iban::{Iban, ParseError};
use crate::metrics::MetricsSink;
use crate::models::{ValidationOptions, ValidationResult};
use crate::observability::{record_cache_access, record_validation, update_cache_size};

/// Served when a result cannot be rendered.
const FALLBACK_BODY: &str = "{}";

/// Rendered body plus HTTP status of one `/validate` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResponse {
    pub body: String,
    pub status: StatusCode,
}

impl ValidationResponse {
    fn ok(body: String) -> Self {
        Self { body, status: StatusCode::OK }
    }
}

/// The validation request pipeline.
///
/// Order matters: cache probe, empty guard, parseability, validation,
/// augmentation, then cache write and usage logging. Usage logging is always
/// dispatched to a detached task and never delays the response.
#[derive(Clone)]
pub struct ValidationService {
    cache: ResultCache,
    store: Arc<dyn BankDataStore>,
    metrics: MetricsSink,
    environment: String,
}

impl ValidationService {
    pub fn new(
        cache: ResultCache,
        store: Arc<dyn BankDataStore>,
        metrics: MetricsSink,
        environment: impl Into<String>,
    ) -> Self {
        Self {
            cache,
            store,
            metrics,
            environment: environment.into(),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn metrics(&self) -> &MetricsSink {
        &self.metrics
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub async fn handle(&self, raw_iban: &str, options: ValidationOptions) -> ValidationResponse {
        let key = cache_key::validation(raw_iban, options);

        if let Some(body) = self.cache.get(&key) {
            record_cache_access("memory", "validation", true);
            record_validation("cached");
            debug!(key = %key, "Validation cache hit");
            self.metrics.dispatch_cached_body(self.environment.clone(), body.clone());
            return ValidationResponse::ok(body);
        }
        record_cache_access("memory", "validation", false);

        if raw_iban.is_empty() {
            record_validation("empty");
            let body = render(&ValidationResult::invalid("Empty request.", raw_iban));
            return ValidationResponse { body, status: StatusCode::BAD_REQUEST };
        }

        let iban = match Iban::parse(raw_iban) {
            Ok(iban) => iban,
            Err(ParseError::Structure(diagnostic)) => {
                record_validation("unparseable");
                let result = ValidationResult::invalid(format!("Cannot parse as IBAN: {}", diagnostic), raw_iban);
                let body = render(&result);

                // The verdict depends on the input string only
                self.store_in_cache(key, body.clone(), true);
                self.metrics.dispatch_unparseable(self.environment.clone(), result);
                return ValidationResponse::ok(body);
            }
        };

        let mut result = iban.validate();
        if options.any() {
            result = augment::augment(&iban, result, options, self.store.as_ref()).await;
        }
        record_validation(if result.valid { "valid" } else { "invalid" });

        let body = render(&result);
        debug!(key = %key, valid = result.valid, "Validation computed");
        self.store_in_cache(key, body.clone(), false);
        self.metrics.dispatch_parsed_iban(self.environment.clone(), iban);

        ValidationResponse::ok(body)
    }

    fn store_in_cache(&self, key: String, body: String, permanent: bool) {
        if permanent {
            self.cache.set(key, body, NO_EXPIRY);
        } else {
            self.cache.set_default(key, body);
        }
        update_cache_size("memory", "validation", self.cache.len() as i64);
    }
}

/// Canonical JSON: struct field order, two-space indentation.
fn render(result: &ValidationResult) -> String {
    match serde_json::to_string_pretty(result) {
        Ok(body) => body,
        Err(e) => {
            error!("Failed to serialize validation result: {}", e);
            FALLBACK_BODY.to_string()
        }
    }
}
