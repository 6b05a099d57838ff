//! Usage metrics for validation requests
//!
//! The strategy is picked once at startup: a remote collector when analytics
//! credentials were supplied, otherwise the in-process register behind
//! `/metrics`. Request handlers only ever call the `dispatch_*` methods, which
//! spawn a detached task and swallow every failure.

pub mod event;
pub mod keen;
pub mod register;

use reqwest::Client as ReqwestClient;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::iban::Iban;
use crate::models::ValidationResult;
use crate::observability::record_usage_event;

pub use event::{EventSource, MetricsEvent};
pub use keen::KeenMetrics;
pub use register::{InmemMetricsRegister, MetricsSnapshot};

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Cached body is not a validation result: {0}")]
    Unmarshal(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Collector rejected event ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[derive(Debug, Clone)]
pub enum MetricsSink {
    Remote(Arc<KeenMetrics>),
    Local(Arc<InmemMetricsRegister>),
}

impl MetricsSink {
    pub fn local() -> Self {
        MetricsSink::Local(Arc::new(InmemMetricsRegister::new()))
    }

    pub fn from_config(config: &ServiceConfig, http_client: ReqwestClient) -> Self {
        match &config.keen {
            Some(credentials) => {
                info!("📡 Usage metrics go to remote collector (project {})", credentials.project_id);
                MetricsSink::Remote(Arc::new(KeenMetrics::new(
                    credentials.project_id.clone(),
                    credentials.write_key.clone(),
                    credentials.api_url.clone(),
                    http_client,
                )))
            }
            None => {
                info!("📊 Usage metrics kept in process, served at /metrics");
                Self::local()
            }
        }
    }

    pub fn strategy(&self) -> &'static str {
        match self {
            MetricsSink::Remote(_) => "remote",
            MetricsSink::Local(_) => "local",
        }
    }

    /// The in-process register, when the local strategy is active.
    pub fn local_register(&self) -> Option<&Arc<InmemMetricsRegister>> {
        match self {
            MetricsSink::Local(register) => Some(register),
            MetricsSink::Remote(_) => None,
        }
    }

    pub async fn log_from_cached_body(&self, env: &str, body: &str) -> Result<(), MetricsError> {
        let event = MetricsEvent::from_cached_body(env, body)?;
        self.write(env, event).await
    }

    pub async fn log_from_parsed_iban(&self, env: &str, iban: &Iban) -> Result<(), MetricsError> {
        self.write(env, MetricsEvent::from_iban(env, iban)).await
    }

    pub async fn log_unparseable(&self, env: &str, result: &ValidationResult) -> Result<(), MetricsError> {
        let event = MetricsEvent::from_validation_result(env, result, EventSource::Unparseable);
        self.write(env, event).await
    }

    async fn write(&self, env: &str, event: MetricsEvent) -> Result<(), MetricsError> {
        match self {
            MetricsSink::Remote(keen) => keen.write_event(env, &event).await,
            MetricsSink::Local(register) => {
                register.register(event);
                Ok(())
            }
        }
    }

    /// Fire-and-forget `log_from_cached_body`.
    pub fn dispatch_cached_body(&self, env: String, body: String) -> JoinHandle<()> {
        let sink = self.clone();
        self.spawn_detached(async move { sink.log_from_cached_body(&env, &body).await })
    }

    /// Fire-and-forget `log_from_parsed_iban`.
    pub fn dispatch_parsed_iban(&self, env: String, iban: Iban) -> JoinHandle<()> {
        let sink = self.clone();
        self.spawn_detached(async move { sink.log_from_parsed_iban(&env, &iban).await })
    }

    /// Fire-and-forget `log_unparseable`.
    pub fn dispatch_unparseable(&self, env: String, result: ValidationResult) -> JoinHandle<()> {
        let sink = self.clone();
        self.spawn_detached(async move { sink.log_unparseable(&env, &result).await })
    }

    // Every dispatch failure ends here
    fn spawn_detached<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = Result<(), MetricsError>> + Send + 'static,
    {
        let strategy = self.strategy();
        tokio::spawn(async move {
            match task.await {
                Ok(()) => record_usage_event(strategy, true),
                Err(e) => {
                    record_usage_event(strategy, false);
                    warn!(strategy, "⚠️ Dropping usage metrics event: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    fn remote(server: &MockServer) -> MetricsSink {
        MetricsSink::Remote(Arc::new(KeenMetrics::new(
            "project-1".to_string(),
            "write-key".to_string(),
            server.uri(),
            ReqwestClient::new(),
        )))
    }

    #[tokio::test]
    async fn test_local_sink_registers_both_shapes() {
        let sink = MetricsSink::local();
        let body = serde_json::to_string_pretty(&ValidationResult::new(true, "ok", "DE89 3704")).unwrap();
        let iban = Iban::parse("DE89370400440532013000").unwrap();

        sink.log_from_cached_body("Test", &body).await.unwrap();
        sink.log_from_parsed_iban("Test", &iban).await.unwrap();

        let register = sink.local_register().unwrap();
        let events = register.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].source, EventSource::Cache);
        assert_eq!(events[1].source, EventSource::Fresh);
    }

    #[tokio::test]
    async fn test_unreadable_cached_body_is_dropped() {
        let sink = MetricsSink::local();
        let result = sink.log_from_cached_body("Test", "{ broken").await;
        assert!(matches!(result, Err(MetricsError::Unmarshal(_))));

        sink.dispatch_cached_body("Test".to_string(), "{ broken".to_string())
            .await
            .unwrap();
        assert!(sink.local_register().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_sink_posts_to_environment_collection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/3.0/projects/project-1/events/Live"))
            .and(header("Authorization", "write-key"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let sink = remote(&server);
        let iban = Iban::parse("DE89370400440532013000").unwrap();
        sink.log_from_parsed_iban("Live", &iban).await.unwrap();
        assert!(sink.local_register().is_none());
    }

    #[tokio::test]
    async fn test_remote_rejection_is_reported_but_dispatch_swallows_it() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
            .mount(&server)
            .await;

        let sink = remote(&server);
        let iban = Iban::parse("DE89370400440532013000").unwrap();
        let result = sink.log_from_parsed_iban("Live", &iban).await;
        assert!(matches!(result, Err(MetricsError::Rejected { status: 401, .. })));

        // The detached task completes without panicking
        let handle = sink.dispatch_parsed_iban("Live".to_string(), iban);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("dispatch finished")
            .expect("dispatch task did not panic");
    }
}
