//! Unified forecast analysis, fetched live or read from a saved payload.

use crate::report;
use anyhow::Context;
use lsw_forecast::analysis::{analyze, LakeAnalysis};
use lsw_forecast::client::ForecastClient;
use lsw_forecast::confidence::Horizon;
use lsw_forecast::config::ClientConfig;
use lsw_forecast::payload::UnifiedResponse;
use lsw_forecast::selection::{Selection, SelectionTracker};
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::num::NonZeroU32;

/// How the analysis is emitted.
pub struct OutputOptions {
    pub json: bool,
    pub csv: Option<String>,
}

/// Fetch the unified payload for `lake_id` and print its analysis.
pub async fn run_forecast(
    config: ClientConfig,
    lake_id: &str,
    horizon: Horizon,
    years: NonZeroU32,
    output: &OutputOptions,
) -> anyhow::Result<()> {
    let client = ForecastClient::new(config)?;
    let mut tracker = SelectionTracker::new();
    let token = tracker.request(Selection::new(lake_id, horizon));
    info!(
        "Fetching unified forecast for {} from {}",
        token.selection(),
        client.config().base_url
    );
    let response = client
        .unified(token.selection())
        .await
        .with_context(|| format!("fetching unified forecast for {}", token.selection()))?;
    let Some(response) = tracker.apply(response, &token) else {
        info!("Selection changed while fetching; nothing to show");
        return Ok(());
    };
    let analysis = analyze(&response, years)
        .with_context(|| format!("analyzing {}", token.selection()))?;
    emit(&analysis, output)
}

/// Analyze a unified payload saved to `input`.
pub fn run_analyze_file(
    input: &str,
    horizon: Option<Horizon>,
    years: NonZeroU32,
    output: &OutputOptions,
) -> anyhow::Result<()> {
    let body = std::fs::read_to_string(input).with_context(|| format!("reading {input}"))?;
    let mut response =
        UnifiedResponse::from_json(&body).with_context(|| format!("decoding {input}"))?;
    if let Some(horizon) = horizon {
        response.horizon = Some(horizon.to_string());
    }
    let analysis = analyze(&response, years).with_context(|| format!("analyzing {input}"))?;
    emit(&analysis, output)
}

fn emit(analysis: &LakeAnalysis, output: &OutputOptions) -> anyhow::Result<()> {
    if let Some(path) = &output.csv {
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        analysis.series.write_csv(BufWriter::new(file))?;
        info!("Wrote {} samples to {}", analysis.series.len(), path);
    }
    if output.json {
        println!("{}", serde_json::to_string_pretty(analysis)?);
    } else {
        print!("{}", report::render_analysis(analysis));
    }
    Ok(())
}
