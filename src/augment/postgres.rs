use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use std::time::{Duration, Instant};
use tracing::{error, info};

use super::{BankDataStore, BankRecord, StoreError};
use crate::observability::record_db_query;

/// Database connection pool settings
pub struct DatabaseConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(5), // Fail fast instead of blocking a request
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(1800),
        }
    }
}

/// Create the bank data pool. Failing to connect is fatal at startup.
pub async fn create_db_pool(database_url: &str, config: DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    info!("🔧 Creating database pool with {} max connections", config.max_connections);

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .max_lifetime(config.max_lifetime)
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    info!("✅ Database pool created successfully");
    Ok(pool)
}

/// Bank reference data in `public.bank_data`.
#[derive(Clone)]
pub struct PgBankDataStore {
    pool: PgPool,
}

impl PgBankDataStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BankDataStore for PgBankDataStore {
    async fn bank_code_exists(&self, country_code: &str, bank_code: &str) -> Result<bool, StoreError> {
        let start = Instant::now();
        let query = "SELECT EXISTS(SELECT 1 FROM public.bank_data WHERE country_code = $1 AND bank_code = $2) AS found";

        let result = sqlx::query(query)
            .bind(country_code)
            .bind(bank_code)
            .fetch_one(&self.pool)
            .await;
        record_db_query("select", "bank_data", start.elapsed().as_secs_f64(), result.is_ok());

        match result {
            Ok(row) => Ok(row.try_get::<bool, _>("found")?),
            Err(e) => {
                error!("Error checking bank code {}/{}: {}", country_code, bank_code, e);
                Err(e.into())
            }
        }
    }

    async fn find_bank(&self, country_code: &str, bank_code: &str) -> Result<Option<BankRecord>, StoreError> {
        let start = Instant::now();
        let query = r#"
            SELECT country_code, bank_code, name, zip, city, bic
            FROM public.bank_data
            WHERE country_code = $1 AND bank_code = $2
            ORDER BY bic NULLS LAST
            LIMIT 1
        "#;

        let result = sqlx::query(query)
            .bind(country_code)
            .bind(bank_code)
            .fetch_optional(&self.pool)
            .await;
        record_db_query("select", "bank_data", start.elapsed().as_secs_f64(), result.is_ok());

        match result {
            Ok(Some(row)) => Ok(Some(BankRecord {
                country_code: row.try_get("country_code")?,
                bank_code: row.try_get("bank_code")?,
                name: row.try_get("name")?,
                zip: row.try_get("zip")?,
                city: row.try_get("city")?,
                bic: row.try_get("bic")?,
            })),
            Ok(None) => Ok(None),
            Err(e) => {
                error!("Error looking up BIC for {}/{}: {}", country_code, bank_code, e);
                Err(e.into())
            }
        }
    }
}
