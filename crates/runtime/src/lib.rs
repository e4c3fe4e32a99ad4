//! Runtime bootstrap: tracing, artifact loading and the prediction entry points.

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod service;

pub use config::ArtifactConfig;
pub use context::{ModelContext, Prediction};
pub use error::{ErrorKind, ErrorReport, PredictionError};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use service::PredictionService;

/// Install the global subscriber. `RUST_LOG` wins over the INFO default.
/// Logs go to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
