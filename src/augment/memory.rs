use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BankDataStore, BankRecord, StoreError};

/// Fixed bank table held in memory. Used by tests and local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryBankDataStore {
    records: HashMap<(String, String), BankRecord>,
    failure: Option<String>,
    queries: AtomicUsize,
}

impl InMemoryBankDataStore {
    pub fn with_records(records: impl IntoIterator<Item = BankRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|record| ((record.country_code.clone(), record.bank_code.clone()), record))
                .collect(),
            ..Self::default()
        }
    }

    /// A store whose every query fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    /// Number of queries served so far, failed ones included.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn lookup(&self, country_code: &str, bank_code: &str) -> Result<Option<&BankRecord>, StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = &self.failure {
            return Err(StoreError::Unavailable { message: message.clone() });
        }
        Ok(self.records.get(&(country_code.to_string(), bank_code.to_string())))
    }
}

#[async_trait]
impl BankDataStore for InMemoryBankDataStore {
    async fn bank_code_exists(&self, country_code: &str, bank_code: &str) -> Result<bool, StoreError> {
        Ok(self.lookup(country_code, bank_code)?.is_some())
    }

    async fn find_bank(&self, country_code: &str, bank_code: &str) -> Result<Option<BankRecord>, StoreError> {
        Ok(self.lookup(country_code, bank_code)?.cloned())
    }
}
