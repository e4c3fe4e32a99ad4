use std::path::Path;
use std::sync::Arc;

use adr_core::artifact::{read_json, ArtifactError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{LinearRegressor, Regressor, TreeEnsemble};

/// Serialized regression model, tagged by `"kind"`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearRegressor),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }

    pub fn into_regressor(self) -> Arc<dyn Regressor> {
        match self {
            ModelArtifact::Linear(m) => Arc::new(m),
            ModelArtifact::TreeEnsemble(m) => Arc::new(m),
        }
    }
}

pub fn load_model(path: &Path) -> Result<Arc<dyn Regressor>, ArtifactError> {
    let artifact: ModelArtifact = read_json(path)?;
    artifact
        .validate()
        .map_err(|reason| ArtifactError::invalid(path, reason))?;
    match &artifact {
        ModelArtifact::Linear(m) => {
            info!(path = %path.display(), features = m.weights.len(), "loaded linear model")
        }
        ModelArtifact::TreeEnsemble(m) => info!(
            path = %path.display(),
            features = m.n_features,
            trees = m.num_trees(),
            "loaded tree ensemble"
        ),
    }
    Ok(artifact.into_regressor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_tag_selects_the_model_family() {
        let linear: ModelArtifact =
            serde_json::from_value(json!({"kind": "linear", "bias": 1.0, "weights": [0.5]})).unwrap();
        assert!(matches!(linear, ModelArtifact::Linear(_)));

        let trees: ModelArtifact = serde_json::from_value(json!({
            "kind": "tree_ensemble",
            "n_features": 1,
            "base_score": 0.5,
            "trees": [{ "nodes": [{ "leaf": 1.0 }] }]
        }))
        .unwrap();
        assert!(trees.validate().is_ok());
        assert_eq!(trees.into_regressor().predict_raw(&[0.0]), Ok(1.5));
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let parsed = serde_json::from_value::<ModelArtifact>(json!({"kind": "svm", "weights": []}));
        assert!(parsed.is_err());
    }
}
