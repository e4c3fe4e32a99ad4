//! Gradient-boosted regression trees in the XGBoost layout.
//!
//! Each tree is a flat node array rooted at index 0. A split sends
//! `x < threshold` to `yes`, everything else to `no`, and NaN to `missing`
//! (defaults to `yes`). The ensemble output is `base_score` plus the sum of
//! the reached leaves.

use serde::{Deserialize, Serialize};

use crate::{InferenceError, Regressor};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        yes: usize,
        no: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        missing: Option<usize>,
    },
    Leaf {
        leaf: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tree {
    pub nodes: Vec<TreeNode>,
}

impl Tree {
    fn validate(&self, n_features: usize) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".to_string());
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split { feature, threshold, yes, no, missing } => {
                    if feature >= n_features {
                        return Err(format!("node {idx} splits on feature {feature} of {n_features}"));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {idx} has a NaN threshold"));
                    }
                    // children must point forward so traversal always terminates
                    for child in [Some(yes), Some(no), missing].into_iter().flatten() {
                        if child <= idx || child >= self.nodes.len() {
                            return Err(format!("node {idx} links to invalid child {child}"));
                        }
                    }
                }
                TreeNode::Leaf { leaf } => {
                    if !leaf.is_finite() {
                        return Err(format!("node {idx} has a non-finite leaf"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Links are not trusted: a path longer
    /// than the node count, or a dangling index, is an inference error.
    fn leaf_value(&self, features: &[f64]) -> Result<f64, InferenceError> {
        let mut idx = 0;
        for _ in 0..self.nodes.len() {
            let node = self
                .nodes
                .get(idx)
                .ok_or_else(|| InferenceError::Model(format!("tree links to missing node {idx}")))?;
            match *node {
                TreeNode::Leaf { leaf } => return Ok(leaf),
                TreeNode::Split { feature, threshold, yes, no, missing } => {
                    let x = *features.get(feature).ok_or_else(|| {
                        InferenceError::Model(format!("node {idx} splits on unknown feature {feature}"))
                    })?;
                    idx = if x.is_nan() {
                        missing.unwrap_or(yes)
                    } else if x < threshold {
                        yes
                    } else {
                        no
                    };
                }
            }
        }
        Err(InferenceError::Model(format!(
            "no leaf reached within {} steps",
            self.nodes.len()
        )))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeEnsemble {
    pub n_features: usize,
    #[serde(default)]
    pub base_score: f64,
    pub trees: Vec<Tree>,
}

impl TreeEnsemble {
    pub fn validate(&self) -> Result<(), String> {
        if self.n_features == 0 {
            return Err("tree ensemble declares no features".to_string());
        }
        if self.trees.is_empty() {
            return Err("tree ensemble has no trees".to_string());
        }
        if !self.base_score.is_finite() {
            return Err("base score is not finite".to_string());
        }
        for (i, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    pub fn num_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for TreeEnsemble {
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
        let sum = self
            .trees
            .iter()
            .map(|t| t.leaf_value(features))
            .sum::<Result<f64, InferenceError>>()?;
        Ok(self.base_score + sum)
    }
}
