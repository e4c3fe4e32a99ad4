//! Feature encoding: turns one booking into the exact column layout the model was trained on.
//!
//! Stages run in a fixed order over a [`FeatureRow`]:
//! one-hot flag families, the weekday ordinal, target encoding of the
//! high-cardinality categoricals, and finally alignment to the [`ModelSchema`].

use adr_core::{BookingRecord, FeatureRow};
use tracing::debug;

pub mod one_hot;
pub mod ordinal;
pub mod schema;
pub mod target;

pub use one_hot::{OneHotFamily, ONE_HOT_FAMILIES};
pub use schema::{EncodedFeatureVector, ModelSchema};
pub use target::{TargetEncoder, TARGET_ENCODED_COLUMNS};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EncodeError {
    #[error("schema mismatch on column {column:?}: {reason}")]
    SchemaMismatch { column: String, reason: String },
    #[error("{column} value {value:?} was not seen during fitting, using {fallback}")]
    UnknownCategory {
        column: String,
        value: String,
        fallback: f64,
    },
    #[error("invalid weekday {0:?}, expected Monday..Sunday")]
    InvalidWeekday(String),
}

impl EncodeError {
    pub fn schema_mismatch(column: impl Into<String>, reason: impl Into<String>) -> Self {
        EncodeError::SchemaMismatch { column: column.into(), reason: reason.into() }
    }

    pub(crate) fn missing(column: &str) -> Self {
        Self::schema_mismatch(column, "column is absent from the input record")
    }
}

/// Result of encoding one row.
#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    pub features: EncodedFeatureVector,
    /// Target-encoded values that fell back to the learned prior.
    pub unseen: Vec<EncodeError>,
}

/// The immutable encoding artifacts, shared read-only by every request.
#[derive(Debug, Clone)]
pub struct FeatureEncoder {
    schema: ModelSchema,
    target: TargetEncoder,
}

impl FeatureEncoder {
    pub fn new(schema: ModelSchema, target: TargetEncoder) -> Self {
        Self { schema, target }
    }

    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn target_encoder(&self) -> &TargetEncoder {
        &self.target
    }

    pub fn encode(&self, record: &BookingRecord) -> Result<Encoding, EncodeError> {
        self.encode_row(FeatureRow::from(record))
    }

    pub fn encode_row(&self, mut row: FeatureRow) -> Result<Encoding, EncodeError> {
        for family in ONE_HOT_FAMILIES.iter() {
            family.expand(&mut row)?;
        }
        ordinal::encode_weekday(&mut row)?;
        let unseen = self.target.encode_row(&mut row)?;
        for miss in &unseen {
            debug!(%miss, "target encoding fallback");
        }
        let features = self.schema.align(&row)?;
        Ok(Encoding { features, unseen })
    }
}
