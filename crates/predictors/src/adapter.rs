//! Runs the regressor and undoes the `log1p` the target was trained under.

use std::fmt;
use std::sync::Arc;

use adr_core::Price;
use serde::Serialize;
use tracing::debug;

use crate::{InferenceError, Regressor};

/// Inverse of the training-time `ln(1 + y)` transform.
pub fn inverse_log1p(y_log: f64) -> f64 {
    y_log.exp_m1()
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct PricePrediction {
    pub price: Price,
    pub log_price: f64,
}

#[derive(Clone)]
pub struct PriceAdapter {
    model: Arc<dyn Regressor>,
}

impl fmt::Debug for PriceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriceAdapter")
            .field("n_features", &self.model.n_features())
            .finish()
    }
}

impl PriceAdapter {
    pub fn new(model: Arc<dyn Regressor>) -> Self {
        Self { model }
    }

    pub fn n_features(&self) -> usize {
        self.model.n_features()
    }

    pub fn predict(&self, features: &[f64]) -> Result<PricePrediction, InferenceError> {
        let expected = self.model.n_features();
        if features.len() != expected {
            return Err(InferenceError::WidthMismatch { expected, got: features.len() });
        }
        if let Some((index, &value)) = features.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InferenceError::NonFiniteInput { index, value });
        }

        let log_price = self.model.predict_raw(features)?;
        let price = inverse_log1p(log_price);
        if !price.is_finite() {
            return Err(InferenceError::NonFiniteOutput(log_price));
        }
        // log outputs below zero map to rates below zero
        let price = if price < 0.0 {
            debug!(log_price, "clamping negative price to zero");
            0.0
        } else {
            price
        };
        Ok(PricePrediction { price, log_price })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Tree;
    use crate::{ConstantRegressor, LinearRegressor, TreeEnsemble, TreeNode};

    fn constant(value: f64) -> PriceAdapter {
        PriceAdapter::new(Arc::new(ConstantRegressor { n_features: 2, value }))
    }

    #[test]
    fn inverts_log1p() {
        let y_log = (1.0f64 + 199.0).ln();
        let prediction = constant(y_log).predict(&[0.0, 0.0]).unwrap();
        assert!((prediction.price - 199.0).abs() < 1e-9);
        assert_eq!(prediction.log_price, y_log);
    }

    #[test]
    fn zero_log_is_zero_price() {
        assert_eq!(constant(0.0).predict(&[1.0, 1.0]).unwrap().price, 0.0);
    }

    #[test]
    fn negative_log_output_clamps_to_zero() {
        assert_eq!(constant(-0.5).predict(&[1.0, 1.0]).unwrap().price, 0.0);
    }

    #[test]
    fn rejects_wrong_width_and_non_finite_input() {
        let adapter = constant(1.0);
        assert_eq!(
            adapter.predict(&[1.0]),
            Err(InferenceError::WidthMismatch { expected: 2, got: 1 })
        );
        assert!(matches!(
            adapter.predict(&[1.0, f64::NAN]),
            Err(InferenceError::NonFiniteInput { index: 1, .. })
        ));
    }

    #[test]
    fn overflowing_output_is_an_error() {
        let adapter = PriceAdapter::new(Arc::new(LinearRegressor { bias: 0.0, weights: vec![1.0] }));
        assert!(matches!(adapter.predict(&[1000.0]), Err(InferenceError::NonFiniteOutput(_))));
    }

    #[test]
    fn unvalidated_broken_tree_is_an_error_not_a_panic() {
        let broken = TreeEnsemble {
            n_features: 1,
            base_score: 0.0,
            trees: vec![Tree {
                nodes: vec![TreeNode::Split { feature: 0, threshold: 1.0, yes: 7, no: 7, missing: None }],
            }],
        };
        let adapter = PriceAdapter::new(Arc::new(broken));
        assert!(matches!(adapter.predict(&[1.0]), Err(InferenceError::Model(_))));
    }

    #[test]
    fn prediction_is_deterministic() {
        let adapter = PriceAdapter::new(Arc::new(LinearRegressor {
            bias: 3.0,
            weights: vec![0.01, -0.2],
        }));
        let a = adapter.predict(&[40.0, 1.0]).unwrap();
        let b = adapter.predict(&[40.0, 1.0]).unwrap();
        assert_eq!(a, b);
    }
}
