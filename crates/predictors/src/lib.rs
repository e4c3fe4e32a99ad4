//! Regressor trait, the concrete model families and the price adapter.

pub mod adapter;
pub mod artifact;
pub mod linear;
pub mod tree;

pub use adapter::{inverse_log1p, PriceAdapter, PricePrediction};
pub use artifact::{load_model, ModelArtifact};
pub use linear::LinearRegressor;
pub use tree::{TreeEnsemble, TreeNode};

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("model expects {expected} features, got {got}")]
    WidthMismatch { expected: usize, got: usize },
    #[error("feature {index} is not finite ({value})")]
    NonFiniteInput { index: usize, value: f64 },
    #[error("model produced a non-finite output ({0})")]
    NonFiniteOutput(f64),
    #[error("model evaluation failed: {0}")]
    Model(String),
}

/// A trained regression model: one fixed-width feature vector in, one raw
/// (log-space) value out. Implementations must be deterministic.
pub trait Regressor: Send + Sync {
    fn n_features(&self) -> usize;

    fn predict_raw(&self, features: &[f64]) -> Result<f64, InferenceError>;
}

/// Always returns the same raw value. Useful for wiring and tests.
#[derive(Debug, Clone, Copy)]
pub struct ConstantRegressor {
    pub n_features: usize,
    pub value: f64,
}

impl Regressor for ConstantRegressor {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_raw(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.n_features {
            return Err(InferenceError::WidthMismatch {
                expected: self.n_features,
                got: features.len(),
            });
        }
        Ok(self.value)
    }
}
