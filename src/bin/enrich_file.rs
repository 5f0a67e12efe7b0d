//! Runs the timeline pipeline over an export file and prints the result.
//!
//! Usage: `enrich_file <path-to-export.json>`

use anyhow::Context;
use rust_timeline_api::config::Config;
use rust_timeline_api::handlers::{parse_document, AppState};

/// Main entry point for the batch utility.
///
/// Reads the export, runs extraction and enrichment with the same settings as
/// the server, and writes the `{count, points}` JSON to stdout.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rust_timeline_api=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = std::env::args()
        .nth(1)
        .context("usage: enrich_file <path-to-export.json>")?;

    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("failed to read {}", path))?;
    let document = parse_document(&raw).map_err(|e| anyhow::anyhow!("{}: {}", path, e))?;

    let state = AppState::new(Config::from_env()?)?;
    let response = state.timeline.process(&document).await;

    eprintln!(
        "✓ {} point(s), {} with locality data",
        response.count,
        response
            .points
            .iter()
            .filter(|p| p.locality_data.is_some())
            .count()
    );
    println!("{}", serde_json::to_string_pretty(&response)?);

    Ok(())
}
