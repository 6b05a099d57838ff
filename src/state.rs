use reqwest::Client as ReqwestClient;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::augment::postgres::{create_db_pool, DatabaseConfig};
use crate::augment::PgBankDataStore;
use crate::cache::ResultCache;
use crate::config::ServiceConfig;
use crate::metrics::MetricsSink;
use crate::services::ValidationService;

/// Shared application state.
/// Holds the validation pipeline (cache, bank data store, metrics sink) and
/// the static directory, if static pages are hosted.
#[derive(Clone)]
pub struct AppState {
    pub validation_service: ValidationService,
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    pub async fn new(config: &ServiceConfig) -> anyhow::Result<Self> {
        info!("Setting env to {}", config.environment);

        let db_config = DatabaseConfig {
            max_connections: config.db_max_connections,
            ..DatabaseConfig::default()
        };
        let db_pool = create_db_pool(&config.database_url, db_config)
            .await
            .map_err(|e| anyhow::anyhow!("Error opening DB connection: {}", e))?;
        let store = Arc::new(PgBankDataStore::new(db_pool));

        let http_client = ReqwestClient::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {}", e))?;
        let metrics = MetricsSink::from_config(config, http_client);

        let cache = ResultCache::default();
        cache.start_background_cleanup();

        let service = ValidationService::new(cache, store, metrics, config.environment.clone());
        let static_dir = config.serves_static_files().then(|| config.static_dir.clone());

        Ok(Self::from_service(service, static_dir))
    }

    pub fn from_service(validation_service: ValidationService, static_dir: Option<PathBuf>) -> Self {
        Self {
            validation_service,
            static_dir,
        }
    }
}
