use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use iban_rust_ws::{
    augment::{BankRecord, InMemoryBankDataStore},
    cache::ResultCache,
    create_app_router,
    metrics::{EventSource, KeenMetrics, MetricsSink},
    services::ValidationService,
    state::AppState,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tower::ServiceExt;
use wiremock::{
    matchers::{self, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn commerzbank() -> BankRecord {
    BankRecord {
        country_code: "DE".to_string(),
        bank_code: "37040044".to_string(),
        name: "Commerzbank".to_string(),
        zip: Some("50447".to_string()),
        city: Some("Köln".to_string()),
        bic: Some("COBADEFFXXX".to_string()),
    }
}

struct TestApp {
    router: Router,
    cache: ResultCache,
    metrics: MetricsSink,
    store: Arc<InMemoryBankDataStore>,
}

fn build_app(cache: ResultCache, metrics: MetricsSink, environment: &str) -> TestApp {
    let store = Arc::new(InMemoryBankDataStore::with_records(vec![commerzbank()]));
    let service = ValidationService::new(cache.clone(), store.clone(), metrics.clone(), environment);
    let router = create_app_router(Arc::new(AppState::from_service(service, None)));
    TestApp { router, cache, metrics, store }
}

fn local_app() -> TestApp {
    build_app(
        ResultCache::new(Duration::from_secs(300), Duration::from_secs(30)),
        MetricsSink::local(),
        "Test",
    )
}

async fn get(app: &TestApp, uri: &str) -> (StatusCode, String) {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

async fn get_content_type(app: &TestApp, uri: &str) -> (StatusCode, String) {
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    (response.status(), content_type)
}

async fn wait_for_events(metrics: &MetricsSink, expected: usize) -> usize {
    let register = metrics.local_register().expect("local sink");
    for _ in 0..100 {
        if register.len() >= expected {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    register.len()
}

#[tokio::test]
async fn test_repeated_request_is_served_from_cache() {
    let app = local_app();
    let uri = "/validate/DE89370400440532013000?getBIC=true&validateBankCode=true";

    let (first_status, first_body) = get(&app, uri).await;
    let (second_status, second_body) = get(&app, uri).await;

    assert_eq!(first_status, StatusCode::OK);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first_body, second_body);
    assert_eq!(app.store.query_count(), 2, "second request never reaches the bank table");
    assert_eq!(app.cache.get("DE89370400440532013000truetrue").as_deref(), Some(first_body.as_str()));

    assert_eq!(wait_for_events(&app.metrics, 2).await, 2);
    let events = app.metrics.local_register().unwrap().events();
    let sources: Vec<EventSource> = events.iter().map(|event| event.source).collect();
    assert!(sources.contains(&EventSource::Fresh));
    assert!(sources.contains(&EventSource::Cache));
}

#[tokio::test]
async fn test_option_flags_select_distinct_cache_entries() {
    let app = local_app();

    let (_, plain) = get(&app, "/validate/DE89370400440532013000").await;
    let (_, with_bic) = get(&app, "/validate/DE89370400440532013000?getBIC=1").await;

    assert_ne!(plain, with_bic);
    assert!(app.cache.contains_key("DE89370400440532013000falsefalse"));
    assert!(app.cache.contains_key("DE89370400440532013000truefalse"));

    let result: serde_json::Value = serde_json::from_str(&with_bic).unwrap();
    assert_eq!(result["bic"], "COBADEFFXXX");
    assert_eq!(result["bankName"], "Commerzbank");
}

#[tokio::test]
async fn test_repeated_option_keys_use_first_value() {
    let app = local_app();

    let cases = [
        ("/validate/DE89370400440532013000?getBIC=1&getBIC=1", "DE89370400440532013000truefalse"),
        ("/validate/DE89370400440532013000?getBIC=yes&getBIC=1", "DE89370400440532013000falsefalse"),
        (
            "/validate/DE89370400440532013000?validateBankCode=true&validateBankCode=0&getBIC=TRUE",
            "DE89370400440532013000falsetrue",
        ),
        ("/validate/DE89370400440532013000?validateBankCode=0&getBIC", "DE89370400440532013000falsefalse"),
        ("/validate/DE89370400440532013000?getBIC=%ZZ&foo=bar", "DE89370400440532013000falsefalse"),
    ];

    for (uri, key) in cases {
        let (status, content_type) = get_content_type(&app, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(content_type, "application/json; charset=utf-8", "{}", uri);
        assert!(app.cache.contains_key(key), "{} should be cached under {}", uri, key);
    }
    assert_eq!(app.cache.len(), 3);
}

#[tokio::test]
async fn test_empty_request_with_repeated_keys_is_json() {
    let app = local_app();

    let (status, content_type) = get_content_type(&app, "/validate/?getBIC=1&getBIC=1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type, "application/json; charset=utf-8");
}

#[tokio::test]
async fn test_body_is_pretty_printed() {
    let app = local_app();
    let (_, body) = get(&app, "/validate/DE89370400440532013000").await;

    assert!(body.starts_with("{\n  \""));
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["valid"], true);
    assert_eq!(result["message"], "Validation successful.");
    assert_eq!(result["ibanPrintFormat"], "DE89 3704 0044 0532 0130 00");
}

#[tokio::test]
async fn test_empty_request_is_neither_cached_nor_counted() {
    let app = local_app();

    let (status, body) = get(&app, "/validate/").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Empty request."));
    assert!(app.cache.is_empty());

    sleep(Duration::from_millis(50)).await;
    assert!(app.metrics.local_register().unwrap().is_empty());
}

#[tokio::test]
async fn test_unparseable_input_outlives_expired_entries() {
    let app = build_app(
        ResultCache::new(Duration::from_millis(20), Duration::from_secs(30)),
        MetricsSink::local(),
        "Test",
    );

    let (status, body) = get(&app, "/validate/NOT-AN-IBAN").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Cannot parse as IBAN: "));
    assert_eq!(wait_for_events(&app.metrics, 1).await, 1);
    assert_eq!(app.metrics.local_register().unwrap().events()[0].source, EventSource::Unparseable);
    get(&app, "/validate/DE89370400440532013000").await;
    assert_eq!(app.cache.len(), 2);

    sleep(Duration::from_millis(60)).await;
    app.cache.cleanup_expired();

    assert_eq!(app.cache.len(), 1);
    assert_eq!(app.cache.get("NOT-AN-IBANfalsefalse").as_deref(), Some(body.as_str()));
    assert!(app.cache.get("DE89370400440532013000falsefalse").is_none());
}

#[tokio::test]
async fn test_local_register_is_exposed_as_snapshot() {
    let app = local_app();

    get(&app, "/validate/DE89370400440532013000").await;
    get(&app, "/validate/DE89370400440532013001").await;
    assert_eq!(wait_for_events(&app.metrics, 2).await, 2);

    let (status, body) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::OK);

    let snapshot: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(snapshot["total"], 2);
    assert_eq!(snapshot["valid"], 1);
    assert_eq!(snapshot["invalid"], 1);
    assert_eq!(snapshot["byCountry"]["DE"], 2);
}

#[tokio::test]
async fn test_remote_sink_posts_events_and_hides_register() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/3.0/projects/project-1/events/Live"))
        .and(matchers::header("Authorization", "write-key"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let metrics = MetricsSink::Remote(Arc::new(KeenMetrics::new(
        "project-1".to_string(),
        "write-key".to_string(),
        server.uri(),
        reqwest::Client::new(),
    )));
    let app = build_app(
        ResultCache::new(Duration::from_secs(300), Duration::from_secs(30)),
        metrics,
        "Live",
    );

    let (status, _) = get(&app, "/validate/DE89370400440532013000").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get(&app, "/metrics").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for _ in 0..100 {
        if !server.received_requests().await.unwrap_or_default().is_empty() {
            break;
        }
        sleep(Duration::from_millis(10)).await;
    }
    // `expect(1)` is verified when the server drops
}

#[tokio::test]
async fn test_remote_failure_does_not_change_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let metrics = MetricsSink::Remote(Arc::new(KeenMetrics::new(
        "project-1".to_string(),
        "write-key".to_string(),
        server.uri(),
        reqwest::Client::new(),
    )));
    let app = build_app(
        ResultCache::new(Duration::from_secs(300), Duration::from_secs(30)),
        metrics,
        "Live",
    );

    let (status, body) = get(&app, "/validate/DE89370400440532013000").await;
    assert_eq!(status, StatusCode::OK);
    let result: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(result["valid"], true);
}
