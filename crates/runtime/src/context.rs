//! The process-wide, read-only prediction context.

use adr_core::artifact::ArtifactError;
use adr_core::{BookingRecord, FeatureRow, Price};
use adr_features::{EncodeError, Encoding, FeatureEncoder, ModelSchema, TargetEncoder};
use adr_predictors::{load_model, PriceAdapter};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use crate::config::ArtifactConfig;
use crate::error::PredictionError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Prediction {
    pub price: Price,
    pub log_price: f64,
    /// Target-encoded columns whose value was unseen and fell back to the prior.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fallback_columns: Vec<String>,
}

/// Schema, target encoder and model, loaded once and never mutated.
#[derive(Debug, Clone)]
pub struct ModelContext {
    encoder: FeatureEncoder,
    adapter: PriceAdapter,
}

impl ModelContext {
    /// Pairs the artifacts, refusing a model whose width differs from the schema.
    pub fn new(encoder: FeatureEncoder, adapter: PriceAdapter) -> Result<Self, EncodeError> {
        let (width, columns) = (adapter.n_features(), encoder.schema().len());
        if width != columns {
            return Err(EncodeError::schema_mismatch(
                "*",
                format!("model expects {width} features but the schema has {columns} columns"),
            ));
        }
        Ok(Self { encoder, adapter })
    }

    /// Load all three artifacts. Any failure here must stop the process.
    pub fn load(cfg: &ArtifactConfig) -> Result<Self, ArtifactError> {
        let schema_path = cfg.schema_path();
        let schema = ModelSchema::load(&schema_path)?;
        info!(path = %schema_path.display(), columns = schema.len(), "loaded model schema");

        let encoder_path = cfg.encoder_path();
        let target = TargetEncoder::load(&encoder_path)?;
        info!(
            path = %encoder_path.display(),
            columns = target.columns().count(),
            prior = target.prior(),
            "loaded target encoder"
        );

        let model_path = cfg.model_path();
        let adapter = PriceAdapter::new(load_model(&model_path)?);

        Self::new(FeatureEncoder::new(schema, target), adapter)
            .map_err(|e| ArtifactError::invalid(model_path, e.to_string()))
    }

    pub fn schema(&self) -> &ModelSchema {
        self.encoder.schema()
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// Validate, encode and predict one typed record.
    pub fn predict(&self, record: &BookingRecord) -> Result<Prediction, PredictionError> {
        record.validate()?;
        let encoding = self.encoder.encode(record)?;
        self.predict_encoding(&encoding)
    }

    /// Parse the flat field → value mapping submitted by a form.
    pub fn predict_json(&self, input: &Value) -> Result<Prediction, PredictionError> {
        let record = BookingRecord::from_json(input)?;
        self.predict(&record)
    }

    /// Predict from an untyped row, skipping record validation.
    pub fn predict_row(&self, row: FeatureRow) -> Result<Prediction, PredictionError> {
        let encoding = self.encoder.encode_row(row)?;
        self.predict_encoding(&encoding)
    }

    /// The encoded features for `record`, as they would be handed to the model.
    pub fn explain(&self, record: &BookingRecord) -> Result<Encoding, PredictionError> {
        record.validate()?;
        Ok(self.encoder.encode(record)?)
    }

    pub fn explain_json(&self, input: &Value) -> Result<Encoding, PredictionError> {
        let record = BookingRecord::from_json(input)?;
        self.explain(&record)
    }

    /// Run the model on an already encoded record, e.g. one returned by
    /// [`ModelContext::explain`].
    pub fn predict_encoding(&self, encoding: &Encoding) -> Result<Prediction, PredictionError> {
        let out = self.adapter.predict(encoding.features.values())?;
        let fallback_columns = encoding
            .unseen
            .iter()
            .filter_map(|miss| match miss {
                EncodeError::UnknownCategory { column, .. } => Some(column.clone()),
                _ => None,
            })
            .collect();
        Ok(Prediction { price: out.price, log_price: out.log_price, fallback_columns })
    }
}
