//! Fitted target encoder for the high-cardinality categoricals.
//!
//! The artifact holds, per column, either precomputed encodings or the fitted
//! per-category statistics. Statistics are turned into encodings once, at load,
//! with the usual sigmoid smoothing towards the prior:
//!
//! ```text
//! s     = 1 / (1 + exp(-(count - min_samples_leaf) / smoothing))
//! value = prior * (1 - s) + mean * s
//! ```
//!
//! Categories seen only once are encoded as the prior.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use adr_core::artifact::{read_json, ArtifactError};
use adr_core::{Cell, FeatureRow};
use serde::{Deserialize, Serialize};

use crate::EncodeError;

pub const TARGET_ENCODED_COLUMNS: [&str; 4] = [
    "country",
    "market_segment",
    "reserved_room_type",
    "assigned_room_type",
];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TargetEncoderArtifact {
    pub prior: f64,
    #[serde(default = "default_smoothing")]
    pub smoothing: f64,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: f64,
    pub columns: BTreeMap<String, ColumnArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnArtifact {
    /// Overrides the global prior for unseen values of this column.
    #[serde(default)]
    pub fallback: Option<f64>,
    pub categories: BTreeMap<String, CategoryEntry>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum CategoryEntry {
    Encoded(f64),
    Stats { count: u64, mean: f64 },
}

fn default_smoothing() -> f64 {
    10.0
}

fn default_min_samples_leaf() -> f64 {
    20.0
}

#[derive(Debug, Clone, PartialEq)]
struct ColumnTable {
    values: HashMap<String, f64>,
    fallback: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TargetEncoder {
    prior: f64,
    columns: BTreeMap<String, ColumnTable>,
}

impl TargetEncoder {
    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let artifact: TargetEncoderArtifact = read_json(path)?;
        Self::from_artifact(artifact).map_err(|reason| ArtifactError::invalid(path, reason))
    }

    pub fn from_artifact(artifact: TargetEncoderArtifact) -> Result<Self, String> {
        let TargetEncoderArtifact { prior, smoothing, min_samples_leaf, columns } = artifact;
        if !prior.is_finite() {
            return Err(format!("prior must be finite, got {prior}"));
        }
        if !(smoothing.is_finite() && smoothing > 0.0) {
            return Err(format!("smoothing must be positive, got {smoothing}"));
        }
        for required in TARGET_ENCODED_COLUMNS {
            if !columns.contains_key(required) {
                return Err(format!("no encoding fitted for column {required:?}"));
            }
        }

        let mut tables = BTreeMap::new();
        for (name, column) in columns {
            let fallback = column.fallback.unwrap_or(prior);
            let mut values = HashMap::with_capacity(column.categories.len());
            for (category, entry) in column.categories {
                let value = match entry {
                    CategoryEntry::Encoded(v) => v,
                    CategoryEntry::Stats { count, mean } => {
                        smoothed(prior, mean, count, min_samples_leaf, smoothing)
                    }
                };
                if !value.is_finite() {
                    return Err(format!("{name}: encoding for {category:?} is not finite"));
                }
                values.insert(category, value);
            }
            if !fallback.is_finite() {
                return Err(format!("{name}: fallback is not finite"));
            }
            tables.insert(name, ColumnTable { values, fallback });
        }
        Ok(Self { prior, columns: tables })
    }

    pub fn prior(&self) -> f64 {
        self.prior
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn fallback(&self, column: &str) -> Option<f64> {
        self.columns.get(column).map(|t| t.fallback)
    }

    /// Strict lookup: unseen values are reported as [`EncodeError::UnknownCategory`],
    /// which carries the fallback to use instead.
    pub fn lookup(&self, column: &str, value: &str) -> Result<f64, EncodeError> {
        let table = self.columns.get(column).ok_or_else(|| {
            EncodeError::schema_mismatch(column, "column has no fitted target encoding")
        })?;
        table.values.get(value).copied().ok_or_else(|| EncodeError::UnknownCategory {
            column: column.to_string(),
            value: value.to_string(),
            fallback: table.fallback,
        })
    }

    /// Lookup that recovers from unseen values with the fallback.
    pub fn transform(&self, column: &str, value: &str) -> Result<f64, EncodeError> {
        match self.lookup(column, value) {
            Err(EncodeError::UnknownCategory { fallback, .. }) => Ok(fallback),
            other => other,
        }
    }

    /// Replace the four target-encoded columns in place. Returns the recovered
    /// unseen-category errors.
    pub fn encode_row(&self, row: &mut FeatureRow) -> Result<Vec<EncodeError>, EncodeError> {
        let mut unseen = Vec::new();
        for column in TARGET_ENCODED_COLUMNS {
            let label = match row.remove(column) {
                Some(Cell::Text(label)) => label,
                Some(Cell::Number(n)) => {
                    return Err(EncodeError::schema_mismatch(
                        column,
                        format!("expected a category label, got {n}"),
                    ))
                }
                None => return Err(EncodeError::missing(column)),
            };
            let value = match self.lookup(column, &label) {
                Ok(value) => value,
                Err(miss @ EncodeError::UnknownCategory { fallback, .. }) => {
                    unseen.push(miss);
                    fallback
                }
                Err(other) => return Err(other),
            };
            row.insert(column, value);
        }
        Ok(unseen)
    }
}

fn smoothed(prior: f64, mean: f64, count: u64, min_samples_leaf: f64, smoothing: f64) -> f64 {
    if count == 1 {
        return prior;
    }
    let weight = 1.0 / (1.0 + (-((count as f64) - min_samples_leaf) / smoothing).exp());
    prior * (1.0 - weight) + mean * weight
}
