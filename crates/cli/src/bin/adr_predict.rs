use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use adr_core::BookingRecord;
use adr_features::EncodedFeatureVector;
use adr_runtime::{init_tracing, ArtifactConfig, ModelContext, Prediction, PredictionError};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

/// Predict the average daily rate of a single booking.
///
/// The booking is a flat JSON object using the dataset's column names.
#[derive(Parser, Debug)]
#[command(name = "adr-predict")]
struct Args {
    /// Directory holding model.json, model_columns.json and target_encoder.json
    /// (defaults to $ADR_ARTIFACT_DIR, then ./artifacts)
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Booking JSON file; read from stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,

    /// Also print the encoded feature vector handed to the model
    #[arg(long)]
    explain: bool,
}

#[derive(Serialize)]
struct Output {
    #[serde(flatten)]
    prediction: Prediction,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<EncodedFeatureVector>,
}

fn main() -> Result<ExitCode> {
    init_tracing();
    let args = Args::parse();
    info!("adr-predict starting");

    let mut cfg = ArtifactConfig::from_env();
    if let Some(dir) = args.artifacts {
        cfg.dir = dir;
    }
    let ctx = ModelContext::load(&cfg)
        .with_context(|| format!("loading artifacts from {}", cfg.dir.display()))?;

    let raw = match &args.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading booking from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf).context("reading booking from stdin")?;
            buf
        }
    };

    match run(&ctx, &raw, args.explain) {
        Ok(output) => {
            info!(price = output.prediction.price, "predicted");
            println!("{}", serde_json::to_string(&output)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            warn!(kind = ?err.kind(), error = %err, "prediction failed");
            println!("{}", serde_json::to_string(&err.report())?);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn run(ctx: &ModelContext, raw: &str, explain: bool) -> Result<Output, PredictionError> {
    let input: Value = serde_json::from_str(raw)?;
    let record = BookingRecord::from_json(&input)?;
    let encoding = ctx.explain(&record)?;
    let prediction = ctx.predict_encoding(&encoding)?;
    let features = explain.then_some(encoding.features);
    Ok(Output { prediction, features })
}
