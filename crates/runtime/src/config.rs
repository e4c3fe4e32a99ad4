use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const ENV_ARTIFACT_DIR: &str = "ADR_ARTIFACT_DIR";
pub const ENV_MODEL_FILE: &str = "ADR_MODEL_FILE";
pub const ENV_SCHEMA_FILE: &str = "ADR_SCHEMA_FILE";
pub const ENV_ENCODER_FILE: &str = "ADR_ENCODER_FILE";

/// Where the three training artifacts live. File names are resolved against
/// `dir` unless they are absolute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArtifactConfig {
    pub dir: PathBuf,
    pub model: PathBuf,
    pub schema: PathBuf,
    pub encoder: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("artifacts"),
            model: PathBuf::from("model.json"),
            schema: PathBuf::from("model_columns.json"),
            encoder: PathBuf::from("target_encoder.json"),
        }
    }
}

impl ArtifactConfig {
    pub fn with_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), ..Self::default() }
    }

    /// Defaults overridden by `ADR_ARTIFACT_DIR`, `ADR_MODEL_FILE`,
    /// `ADR_SCHEMA_FILE` and `ADR_ENCODER_FILE`.
    pub fn from_env() -> Self {
        Self::default().overridden_by(|key| env::var(key).ok())
    }

    fn overridden_by(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);
        if let Some(dir) = get(ENV_ARTIFACT_DIR) {
            self.dir = dir;
        }
        if let Some(model) = get(ENV_MODEL_FILE) {
            self.model = model;
        }
        if let Some(schema) = get(ENV_SCHEMA_FILE) {
            self.schema = schema;
        }
        if let Some(encoder) = get(ENV_ENCODER_FILE) {
            self.encoder = encoder;
        }
        self
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.model)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.resolve(&self.schema)
    }

    pub fn encoder_path(&self) -> PathBuf {
        self.resolve(&self.encoder)
    }

    fn resolve(&self, file: &Path) -> PathBuf {
        self.dir.join(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_resolve_under_artifacts() {
        let cfg = ArtifactConfig::default();
        assert_eq!(cfg.model_path(), Path::new("artifacts/model.json"));
        assert_eq!(cfg.schema_path(), Path::new("artifacts/model_columns.json"));
        assert_eq!(cfg.encoder_path(), Path::new("artifacts/target_encoder.json"));
    }

    #[test]
    fn absolute_file_names_ignore_the_dir() {
        let cfg = ArtifactConfig { model: PathBuf::from("/srv/xgb.json"), ..ArtifactConfig::with_dir("a") };
        assert_eq!(cfg.model_path(), Path::new("/srv/xgb.json"));
        assert_eq!(cfg.schema_path(), Path::new("a/model_columns.json"));
    }

    #[test]
    fn environment_overrides_non_empty_values() {
        let vars: HashMap<&str, &str> =
            [(ENV_ARTIFACT_DIR, "/opt/adr"), (ENV_SCHEMA_FILE, "")].into_iter().collect();
        let cfg = ArtifactConfig::default().overridden_by(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(cfg.dir, PathBuf::from("/opt/adr"));
        assert_eq!(cfg.schema, PathBuf::from("model_columns.json"));
    }
}
