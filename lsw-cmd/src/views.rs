//! Single-view commands backed by the dedicated forecast endpoints, plus
//! offline scoring of scene cloud cover.
//!
//! Each command recomputes its view locally from the fetched inputs and
//! logs where the upstream figure disagrees.

use crate::report;
use anyhow::Context;
use lsw_forecast::analysis::disagrees;
use lsw_forecast::client::ForecastClient;
use lsw_forecast::config::ClientConfig;
use lsw_forecast::quality::{monthly_quality, QualityReport};
use lsw_forecast::risk::classify;
use lsw_forecast::series::reconcile;
use lsw_forecast::trend::project;
use log::{info, warn};
use lsw_utils::dates::parse_calendar_date;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufWriter, Read};
use std::num::NonZeroU32;

pub async fn run_history(
    config: ClientConfig,
    lake_id: &str,
    csv: Option<&str>,
) -> anyhow::Result<()> {
    let client = ForecastClient::new(config)?;
    let response = client
        .forecast(lake_id)
        .await
        .with_context(|| format!("fetching forecast for {lake_id}"))?;
    let series = reconcile(&response.batches()?);
    if let (Some(upstream), Some(recomputed)) = (response.change_percent, series.change_percent()) {
        if disagrees(upstream, recomputed) {
            warn!(
                "Upstream change {:.2}% differs from recomputed {:.2}%",
                upstream, recomputed
            );
        }
    }
    if let Some(path) = csv {
        let file = File::create(path).with_context(|| format!("creating {path}"))?;
        series.write_csv(BufWriter::new(file))?;
        info!("Wrote {} samples to {}", series.len(), path);
    }
    print!("{}", report::render_history(&series));
    Ok(())
}

pub async fn run_trend(config: ClientConfig, lake_id: &str, years: NonZeroU32) -> anyhow::Result<()> {
    let client = ForecastClient::new(config)?;
    let response = client
        .trend_analysis(lake_id)
        .await
        .with_context(|| format!("fetching trend analysis for {lake_id}"))?;
    let points = response.points()?;
    let projection = project(&points, years)?;
    if let Some(upstream) = response.yearly_change_percent {
        if disagrees(upstream, projection.yearly_change_percent) {
            warn!(
                "Upstream yearly change {:.3}% differs from recomputed {:.3}%",
                upstream, projection.yearly_change_percent
            );
        }
    }
    print!("{}", report::render_trend(&projection));
    Ok(())
}

pub async fn run_risk(config: ClientConfig, lake_id: &str) -> anyhow::Result<()> {
    let client = ForecastClient::new(config)?;
    let response = client
        .risk_levels(lake_id)
        .await
        .with_context(|| format!("fetching risk levels for {lake_id}"))?;
    let (current, thresholds) = response.inputs()?;
    let assessment = classify(current, &thresholds);
    if let Some(upstream) = response.percentile {
        if disagrees(upstream, assessment.percentile) {
            warn!(
                "Upstream percentile {:.1} differs from recomputed {:.1}",
                upstream, assessment.percentile
            );
        }
    }
    info!("{} risk colour {}", lake_id, assessment.color());
    print!("{}", report::render_risk(&assessment, &thresholds));
    Ok(())
}

pub async fn run_quality(config: ClientConfig, lake_id: &str) -> anyhow::Result<()> {
    let client = ForecastClient::new(config)?;
    let response = client
        .data_quality(lake_id)
        .await
        .with_context(|| format!("fetching data quality for {lake_id}"))?;
    match QualityReport::aggregate(response.periods()?) {
        Some(quality) => print!("{}", report::render_quality(&quality)),
        None => println!("Data quality: no data"),
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct SceneRow {
    date: String,
    cloud_percent: f64,
}

/// Score per-scene cloud cover read as CSV (`date,cloud_percent`), grouped
/// by calendar month. `None` when the file holds no scenes.
pub fn score_scenes<R: Read>(reader: R) -> anyhow::Result<Option<QualityReport>> {
    let mut scenes = Vec::new();
    for (line, row) in csv::Reader::from_reader(reader).deserialize::<SceneRow>().enumerate() {
        let row = row.with_context(|| format!("reading scene {}", line + 1))?;
        let date = parse_calendar_date(&row.date)
            .with_context(|| format!("scene {}: bad date {:?}", line + 1, row.date))?;
        scenes.push((date, row.cloud_percent));
    }
    info!("Scoring {} scenes", scenes.len());
    Ok(QualityReport::aggregate(monthly_quality(&scenes)?))
}

pub fn run_scenes(input: &str) -> anyhow::Result<()> {
    let file = File::open(input).with_context(|| format!("opening {input}"))?;
    match score_scenes(file)? {
        Some(quality) => print!("{}", report::render_quality(&quality)),
        None => println!("Data quality: no data"),
    }
    Ok(())
}
