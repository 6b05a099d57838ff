pub mod endpoints;

use std::sync::OnceLock;
use std::time::Instant;
use tracing::info;

static START_TIME: OnceLock<Instant> = OnceLock::new();

pub fn init_monitoring() {
    START_TIME.set(Instant::now()).ok();
    info!("🔍 Monitoring system initialized");
}

pub fn uptime_seconds() -> u64 {
    START_TIME.get().map(|start| start.elapsed().as_secs()).unwrap_or(0)
}
