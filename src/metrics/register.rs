use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;

use super::event::MetricsEvent;

/// Read view of the register served by `/metrics`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    pub by_country: BTreeMap<String, usize>,
    pub events: Vec<MetricsEvent>,
}

/// Append-only, in-process event register. Nothing is ever evicted.
#[derive(Debug, Default)]
pub struct InmemMetricsRegister {
    events: RwLock<Vec<MetricsEvent>>,
}

impl InmemMetricsRegister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, event: MetricsEvent) {
        self.events.write().push(event);
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }

    pub fn events(&self) -> Vec<MetricsEvent> {
        self.events.read().clone()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let events = self.events();
        let valid = events.iter().filter(|event| event.valid).count();

        let mut by_country = BTreeMap::new();
        for event in &events {
            let country = event.country_code.clone().unwrap_or_else(|| "unknown".to_string());
            *by_country.entry(country).or_insert(0) += 1;
        }

        MetricsSnapshot {
            total: events.len(),
            valid,
            invalid: events.len() - valid,
            by_country,
            events,
        }
    }
}
