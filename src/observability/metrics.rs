// ============================================================================
// PROMETHEUS METRICS
// ============================================================================
// Service-level metrics, scraped from /metrics/prometheus. Usage events per
// validated IBAN live in crate::metrics instead.
// ============================================================================

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge_vec, HistogramVec,
    IntCounterVec, IntGaugeVec,
};

lazy_static! {
    // ========================================================================
    // HTTP REQUEST METRICS
    // ========================================================================

    /// Total HTTP requests by method, endpoint and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "endpoint", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "endpoint"],
        vec![0.0005, 0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0, 2.5]
    )
    .unwrap();

    pub static ref HTTP_RESPONSE_SIZE_BYTES: HistogramVec = register_histogram_vec!(
        "http_response_size_bytes",
        "HTTP response size in bytes",
        &["method", "endpoint"],
        vec![64.0, 128.0, 256.0, 512.0, 1024.0, 4096.0, 16384.0]
    )
    .unwrap();

    // ========================================================================
    // DATABASE METRICS
    // ========================================================================

    pub static ref DB_QUERIES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "db_queries_total",
        "Total number of database queries",
        &["query_type", "table", "status"]
    )
    .unwrap();

    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type", "table"],
        vec![0.001, 0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.0]
    )
    .unwrap();

    // ========================================================================
    // CACHE METRICS
    // ========================================================================

    pub static ref CACHE_HITS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cache_hits_total",
        "Total number of cache hits",
        &["cache_type", "cache_name"]
    )
    .unwrap();

    pub static ref CACHE_MISSES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cache_misses_total",
        "Total number of cache misses",
        &["cache_type", "cache_name"]
    )
    .unwrap();

    /// Current number of cache entries, expired-but-unswept ones included
    pub static ref CACHE_SIZE: IntGaugeVec = register_int_gauge_vec!(
        "cache_size",
        "Current cache size (number of entries)",
        &["cache_type", "cache_name"]
    )
    .unwrap();

    // ========================================================================
    // VALIDATION METRICS
    // ========================================================================

    /// Pipeline outcomes: cached, empty, unparseable, valid, invalid
    pub static ref VALIDATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "iban_validations_total",
        "Total IBAN validation requests by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref USAGE_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "usage_events_total",
        "Usage metrics events by strategy and status",
        &["strategy", "status"]
    )
    .unwrap();
}

/// Record one HTTP request
pub fn record_http_request(method: &str, endpoint: &str, status: u16, duration_secs: f64, response_size: usize) {
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, endpoint, &status.to_string()])
        .inc();

    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, endpoint])
        .observe(duration_secs);

    HTTP_RESPONSE_SIZE_BYTES
        .with_label_values(&[method, endpoint])
        .observe(response_size as f64);
}

pub fn record_db_query(query_type: &str, table: &str, duration_secs: f64, success: bool) {
    let status = if success { "success" } else { "error" };

    DB_QUERIES_TOTAL
        .with_label_values(&[query_type, table, status])
        .inc();

    DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_type, table])
        .observe(duration_secs);
}

pub fn record_cache_access(cache_type: &str, cache_name: &str, hit: bool) {
    if hit {
        CACHE_HITS_TOTAL
            .with_label_values(&[cache_type, cache_name])
            .inc();
    } else {
        CACHE_MISSES_TOTAL
            .with_label_values(&[cache_type, cache_name])
            .inc();
    }
}

pub fn update_cache_size(cache_type: &str, cache_name: &str, size: i64) {
    CACHE_SIZE
        .with_label_values(&[cache_type, cache_name])
        .set(size);
}

pub fn record_validation(outcome: &str) {
    VALIDATIONS_TOTAL.with_label_values(&[outcome]).inc();
}

pub fn record_usage_event(strategy: &str, success: bool) {
    let status = if success { "sent" } else { "dropped" };
    USAGE_EVENTS_TOTAL.with_label_values(&[strategy, status]).inc();
}
