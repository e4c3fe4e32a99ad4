use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::context::{ModelContext, Prediction};
use crate::error::PredictionError;
use crate::metrics::MetricsRegistry;

/// Shares one [`ModelContext`] across callers and keeps per-outcome counters.
#[derive(Clone)]
pub struct PredictionService {
    context: Arc<ModelContext>,
    metrics: MetricsRegistry,
}

impl PredictionService {
    pub fn new(context: Arc<ModelContext>) -> Self {
        Self { context, metrics: MetricsRegistry::default() }
    }

    pub fn context(&self) -> &ModelContext {
        &self.context
    }

    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    pub fn predict_json(&self, input: &Value) -> Result<Prediction, PredictionError> {
        let outcome = self.context.predict_json(input);
        self.observe(&outcome);
        outcome
    }

    /// Parse one line of JSON input, then predict. Parse errors count as
    /// validation failures.
    pub fn predict_line(&self, line: &str) -> Result<Prediction, PredictionError> {
        let outcome = serde_json::from_str::<Value>(line)
            .map_err(PredictionError::from)
            .and_then(|input| self.context.predict_json(&input));
        self.observe(&outcome);
        outcome
    }

    fn observe(&self, outcome: &Result<Prediction, PredictionError>) {
        match outcome {
            Ok(prediction) => {
                self.metrics.inc_predictions(1);
                self.metrics
                    .inc_fallback_lookups(prediction.fallback_columns.len() as u64);
                debug!(price = prediction.price, "prediction served");
            }
            Err(err) => {
                let kind = err.kind();
                self.metrics.record_failure(kind);
                warn!(?kind, error = %err, "prediction failed");
            }
        }
    }
}
