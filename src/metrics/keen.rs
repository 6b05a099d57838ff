use reqwest::Client as ReqwestClient;
use tracing::debug;

use super::{event::MetricsEvent, MetricsError};

pub const DEFAULT_KEEN_API_URL: &str = "https://api.keen.io";

/// Remote analytics collector. Events go to one collection per environment.
#[derive(Debug, Clone)]
pub struct KeenMetrics {
    project_id: String,
    write_key: String,
    api_url: String,
    http_client: ReqwestClient,
}

impl KeenMetrics {
    pub fn new(project_id: String, write_key: String, api_url: String, http_client: ReqwestClient) -> Self {
        Self {
            project_id,
            write_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            http_client,
        }
    }

    fn events_endpoint(&self, collection: &str) -> String {
        format!("{}/3.0/projects/{}/events/{}", self.api_url, self.project_id, collection)
    }

    pub async fn write_event(&self, collection: &str, event: &MetricsEvent) -> Result<(), MetricsError> {
        let response = self
            .http_client
            .post(self.events_endpoint(collection))
            .header("Authorization", &self.write_key)
            .header("Content-Type", "application/json")
            .json(event)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!("Metrics event written to collection {}", collection);
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            Err(MetricsError::Rejected { status: status.as_u16(), body })
        }
    }
}
