use adr_core::ValidationError;
use adr_features::EncodeError;
use adr_predictors::InferenceError;
use serde::{Deserialize, Serialize};

/// Failure classes reported to the caller.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed user input; nothing was computed.
    ValidationError,
    /// The artifacts disagree with the encoding pipeline.
    SchemaMismatchError,
    ModelInferenceError,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encode(#[from] EncodeError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl From<serde_json::Error> for PredictionError {
    fn from(err: serde_json::Error) -> Self {
        PredictionError::Validation(ValidationError::from(err))
    }
}

impl PredictionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PredictionError::Validation(_) => ErrorKind::ValidationError,
            // only reachable from untyped rows: bad input, not a bad artifact
            PredictionError::Encode(EncodeError::InvalidWeekday(_)) => ErrorKind::ValidationError,
            PredictionError::Encode(_) => ErrorKind::SchemaMismatchError,
            PredictionError::Inference(_) => ErrorKind::ModelInferenceError,
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport { kind: self.kind(), message: self.to_string() }
    }
}

/// Wire form of a failed prediction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
}
