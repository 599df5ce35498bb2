//! # Glyphpad demo binary
//!
//! Headless driver for the sketch pad: replays a pointer trace (a built-in
//! sample or a JSON file) through a session and submits the resulting
//! drawing to the configured classifier endpoint.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use glyphpad_client::{
    HttpClassifier, SketchSession, SubmissionState, SubmitOutcome,
};
use glyphpad_core::{alphabet, PointerEvent, SnapshotFormat};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(name = "glyphpad", version, about = "Draw a glyph, ask the classifier")]
struct Args {
    /// Classifier endpoint receiving the multipart PNG upload.
    #[arg(
        long,
        env = "GLYPHPAD_ENDPOINT",
        default_value = "http://localhost:8000/predict"
    )]
    endpoint: String,

    /// JSON pointer-trace file to replay instead of the built-in sample.
    #[arg(long)]
    trace: Option<PathBuf>,

    /// Write the submitted PNG snapshot to this path.
    #[arg(long)]
    save: Option<PathBuf>,
}

/// Initialize structured tracing.
///
/// Set `RUST_LOG` to control log levels; set `RUST_LOG_FORMAT=json` for
/// JSON output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,glyphpad_client=debug,glyphpad_core=debug"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    if std::env::var("RUST_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

/// The built-in sample trace: a lambda drawn in two strokes.
fn sample_trace() -> Vec<PointerEvent> {
    vec![
        PointerEvent::down(130.0, 90.0),
        PointerEvent::moved(165.0, 150.0),
        PointerEvent::moved(200.0, 210.0),
        PointerEvent::moved(235.0, 270.0),
        PointerEvent::moved(270.0, 330.0),
        PointerEvent::up(270.0, 330.0),
        PointerEvent::down(205.0, 215.0),
        PointerEvent::moved(180.0, 255.0),
        PointerEvent::moved(155.0, 295.0),
        PointerEvent::moved(130.0, 330.0),
        PointerEvent::up(130.0, 330.0),
    ]
}

/// Load a pointer trace from a JSON file.
fn load_trace(path: &PathBuf) -> anyhow::Result<Vec<PointerEvent>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read trace file {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse trace file {}", path.display()))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let events = match &args.trace {
        Some(path) => load_trace(path)?,
        None => sample_trace(),
    };
    tracing::info!(count = events.len(), "replaying pointer trace");

    let classifier = HttpClassifier::new(&args.endpoint)
        .context("failed to configure classifier endpoint")?;
    let mut session = SketchSession::new(Arc::new(classifier));

    for event in events {
        session.pointer_event(event);
    }

    if let Some(path) = &args.save {
        let snapshot = session
            .surface()
            .snapshot(SnapshotFormat::Png)
            .context("failed to encode snapshot")?;
        std::fs::write(path, snapshot.bytes())
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved drawing");
    }

    tracing::info!(endpoint = %args.endpoint, "submitting drawing");
    let outcome = session.submit().await;

    if outcome == SubmitOutcome::Rejected {
        anyhow::bail!("trace left a stroke active; end it with an up event before submitting");
    }

    match session.state() {
        SubmissionState::Succeeded(result) => {
            match alphabet::find(&result.label) {
                Some(entry) => {
                    println!("Letter: {} ({})", result.display_label(), entry.symbol);
                }
                None => println!("Letter: {}", result.display_label()),
            }
            println!(
                "Confidence: {:.2}% ({})",
                result.confidence_percent(),
                result.band()
            );
            Ok(())
        }
        state => {
            tracing::debug!(?state, "submission did not succeed");
            anyhow::bail!("classification failed; check the logs for the cause")
        }
    }
}
