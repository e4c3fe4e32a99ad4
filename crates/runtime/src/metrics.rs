use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::error::ErrorKind;

#[derive(Clone, Default)]
pub struct MetricsRegistry {
    inner: Arc<MetricsInner>,
}

#[derive(Default)]
struct MetricsInner {
    predictions: AtomicU64,
    validation_errors: AtomicU64,
    schema_mismatches: AtomicU64,
    inference_errors: AtomicU64,
    fallback_lookups: AtomicU64,
}

impl MetricsRegistry {
    pub fn inc_predictions(&self, delta: u64) {
        self.inner.predictions.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn inc_fallback_lookups(&self, delta: u64) {
        self.inner.fallback_lookups.fetch_add(delta, Ordering::Relaxed);
    }

    pub fn record_failure(&self, kind: ErrorKind) {
        let counter = match kind {
            ErrorKind::ValidationError => &self.inner.validation_errors,
            ErrorKind::SchemaMismatchError => &self.inner.schema_mismatches,
            ErrorKind::ModelInferenceError => &self.inner.inference_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            predictions: self.inner.predictions.load(Ordering::Relaxed),
            validation_errors: self.inner.validation_errors.load(Ordering::Relaxed),
            schema_mismatches: self.inner.schema_mismatches.load(Ordering::Relaxed),
            inference_errors: self.inner.inference_errors.load(Ordering::Relaxed),
            fallback_lookups: self.inner.fallback_lookups.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub predictions: u64,
    pub validation_errors: u64,
    pub schema_mismatches: u64,
    pub inference_errors: u64,
    pub fallback_lookups: u64,
}

impl MetricsSnapshot {
    pub fn failures(&self) -> u64 {
        self.validation_errors + self.schema_mismatches + self.inference_errors
    }

    pub fn to_json_line(&self, label: &str, elapsed: Option<Duration>) -> String {
        #[derive(Serialize)]
        struct Snapshot<'a> {
            label: &'a str,
            #[serde(flatten)]
            counters: &'a MetricsSnapshot,
            elapsed_ms: Option<u128>,
        }

        let payload = Snapshot {
            label,
            counters: self,
            elapsed_ms: elapsed.map(|d| d.as_millis()),
        };
        serde_json::to_string(&payload).unwrap_or_else(|_| String::from("{}"))
    }
}

pub struct BatchTimer {
    start: Instant,
}

impl BatchTimer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
