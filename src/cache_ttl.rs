//! Centralized TTL constants for caching
//!
//! This module provides consistent cache time-to-live values
//! across the application with environment variable overrides.

use std::env;
use std::time::Duration;

// Default TTL constants (in seconds)
pub const TTL_VALIDATION_RESULT: u64 = 300; // 5 minutes
pub const CACHE_CLEANUP_INTERVAL: u64 = 30;

/// Entries stored with this TTL survive every sweep.
pub const NO_EXPIRY: Duration = Duration::ZERO;

/// Get TTL with environment variable override
pub fn ttl_with_env(env_key: &str, default_ttl: u64) -> u64 {
    env::var(env_key)
        .map(|val| val.parse::<u64>().unwrap_or(default_ttl))
        .unwrap_or(default_ttl)
}

/// Like `ttl_with_env`, but zero falls back to the default
fn non_zero_with_env(env_key: &str, default_ttl: u64) -> u64 {
    match ttl_with_env(env_key, default_ttl) {
        0 => default_ttl,
        secs => secs,
    }
}

/// TTL for freshly computed validation responses
pub fn get_validation_result_ttl() -> Duration {
    Duration::from_secs(non_zero_with_env("VALIDATION_CACHE_TTL_SECONDS", TTL_VALIDATION_RESULT))
}

/// Interval between background sweeps of the result cache
pub fn get_cleanup_interval() -> Duration {
    Duration::from_secs(non_zero_with_env("CACHE_CLEANUP_INTERVAL_SECONDS", CACHE_CLEANUP_INTERVAL))
}
