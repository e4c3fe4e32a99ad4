use serde::{Deserialize, Serialize};

use crate::{InferenceError, Regressor};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinearRegressor {
    pub bias: f64,
    pub weights: Vec<f64>,
}

impl LinearRegressor {
    pub fn validate(&self) -> Result<(), String> {
        if self.weights.is_empty() {
            return Err("linear model has no weights".to_string());
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err("linear model has non-finite coefficients".to_string());
        }
        Ok(())
    }
}

impl Regressor for LinearRegressor {
    fn n_features(&self) -> usize {
        self.weights.len()
    }

    fn predict_raw(&self, features: &[f64]) -> Result<f64, InferenceError> {
        if features.len() != self.weights.len() {
            return Err(InferenceError::WidthMismatch {
                expected: self.weights.len(),
                got: features.len(),
            });
        }
        let dot: f64 = self
            .weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum();
        Ok(self.bias + dot)
    }
}
