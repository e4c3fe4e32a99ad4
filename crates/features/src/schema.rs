//! The trained model's column layout and the vectors aligned to it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use adr_core::artifact::{read_json, ArtifactError};
use adr_core::{Cell, FeatureRow};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::EncodeError;

#[derive(Debug)]
struct SchemaInner {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

/// Ordered, duplicate-free column names fixed at training time. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ModelSchema {
    inner: Arc<SchemaInner>,
}

impl PartialEq for ModelSchema {
    fn eq(&self, other: &Self) -> bool {
        self.inner.columns == other.inner.columns
    }
}

impl ModelSchema {
    pub fn new(columns: Vec<String>) -> Result<Self, String> {
        if columns.is_empty() {
            return Err("schema has no columns".to_string());
        }
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(format!("duplicate column {name:?}"));
            }
        }
        Ok(Self { inner: Arc::new(SchemaInner { columns, index }) })
    }

    pub fn load(path: &Path) -> Result<Self, ArtifactError> {
        let columns: Vec<String> = read_json(path)?;
        Self::new(columns).map_err(|reason| ArtifactError::invalid(path, reason))
    }

    pub fn columns(&self) -> &[String] {
        &self.inner.columns
    }

    pub fn len(&self) -> usize {
        self.inner.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.columns.is_empty()
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.inner.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.inner.index.contains_key(column)
    }

    /// Lay `row` out in schema order. Missing columns become 0.0, columns
    /// outside the schema are dropped, and a schema column still holding a
    /// category label is a mismatch.
    pub fn align(&self, row: &FeatureRow) -> Result<EncodedFeatureVector, EncodeError> {
        let mut values = Vec::with_capacity(self.len());
        for column in self.columns() {
            let value = match row.get(column) {
                Some(Cell::Number(n)) => *n,
                Some(Cell::Text(label)) => {
                    return Err(EncodeError::schema_mismatch(
                        column.as_str(),
                        format!("still holds category {label:?} after encoding"),
                    ))
                }
                None => 0.0,
            };
            values.push(value);
        }
        for extra in row.column_names().filter(|c| !self.contains(c)) {
            trace!(column = extra, "dropping column outside the model schema");
        }
        Ok(EncodedFeatureVector { schema: self.clone(), values })
    }
}

/// Feature values keyed and ordered exactly like the [`ModelSchema`].
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedFeatureVector {
    schema: ModelSchema,
    values: Vec<f64>,
}

impl EncodedFeatureVector {
    pub fn schema(&self) -> &ModelSchema {
        &self.schema
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.schema.position(column).map(|i| self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.schema
            .columns()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

impl Serialize for EncodedFeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (column, value) in self.iter() {
            map.serialize_entry(column, &value)?;
        }
        map.end()
    }
}
