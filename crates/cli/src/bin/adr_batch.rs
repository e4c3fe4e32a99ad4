use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;

use adr_runtime::metrics::BatchTimer;
use adr_runtime::{init_tracing, ArtifactConfig, ErrorReport, ModelContext, Prediction, PredictionService};
use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::info;

/// Predict the average daily rate for every booking in a JSON-lines stream.
///
/// One result line is written per input line; a bad line does not stop the batch.
#[derive(Parser, Debug)]
#[command(name = "adr-batch")]
struct Args {
    /// Directory holding model.json, model_columns.json and target_encoder.json
    /// (defaults to $ADR_ARTIFACT_DIR, then ./artifacts)
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// JSON-lines file; read from stdin when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Outcome {
    Ok(Prediction),
    Err(ErrorReport),
}

#[derive(Serialize)]
struct Line {
    line: usize,
    #[serde(flatten)]
    outcome: Outcome,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();
    info!("adr-batch starting");

    let mut cfg = ArtifactConfig::from_env();
    if let Some(dir) = args.artifacts {
        cfg.dir = dir;
    }
    let ctx = ModelContext::load(&cfg)
        .with_context(|| format!("loading artifacts from {}", cfg.dir.display()))?;
    let service = PredictionService::new(Arc::new(ctx));

    let reader: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let timer = BatchTimer::start();
    let mut out = io::stdout().lock();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.context("reading input")?;
        if line.trim().is_empty() {
            continue;
        }
        let outcome = match service.predict_line(&line) {
            Ok(prediction) => Outcome::Ok(prediction),
            Err(err) => Outcome::Err(err.report()),
        };
        serde_json::to_writer(&mut out, &Line { line: idx + 1, outcome })?;
        writeln!(out)?;
    }
    out.flush()?;

    let snapshot = service.metrics().snapshot();
    info!(
        predictions = snapshot.predictions,
        failures = snapshot.failures(),
        "batch complete"
    );
    eprintln!("{}", snapshot.to_json_line("adr-batch", Some(timer.elapsed())));
    Ok(())
}
