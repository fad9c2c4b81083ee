//! All analytic views of one lake, derived from a unified payload.

use crate::confidence::{confidence_for, Confidence, ConfidenceLevel};
use crate::error::{ForecastError, Result};
use crate::payload::{ResponseStatus, UnifiedResponse};
use crate::quality::QualityReport;
use crate::risk::{classify, RiskAssessment, ThresholdSet};
use crate::sample::Sample;
use crate::series::{reconcile, Series};
use crate::statistics::{summarize, StatSummary};
use crate::trend::{project, TrendProjection};
use log::{info, warn};
use serde::Serialize;
use std::num::NonZeroU32;

/// Default number of years projected past the last measurement.
pub const DEFAULT_PROJECTION_YEARS: u32 = 3;

/// Relative difference above which an upstream figure is reported as
/// disagreeing with the recomputed one.
pub const DISAGREEMENT_TOLERANCE: f64 = 0.01;

/// Result of the trend projection. Short histories are reported rather
/// than silently projected as flat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    Projected(TrendProjection),
    InsufficientHistory { distinct_years: usize },
}

/// An upstream figure that disagrees with the locally derived one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub field: &'static str,
    pub upstream: String,
    pub recomputed: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LakeAnalysis {
    pub lake_id: Option<String>,
    pub series: Series,
    pub statistics: StatSummary,
    pub change_percent: Option<f64>,
    pub trend: TrendOutcome,
    pub thresholds: Option<ThresholdSet>,
    pub risk: Option<RiskAssessment>,
    pub quality: Option<QualityReport>,
    pub confidence: Confidence,
    /// Upstream summaries that the local views do not reproduce.
    pub discrepancies: Vec<Discrepancy>,
}

/// Reconcile the payload's batches and derive every view from the result.
///
/// Fails only when the payload as a whole carries no data or a section is
/// invalid; sections reporting no data are left empty. Risk thresholds come
/// from the risk-levels section when present, otherwise from the lake's own
/// historical actuals.
pub fn analyze(response: &UnifiedResponse, projection_years: NonZeroU32) -> Result<LakeAnalysis> {
    let series = reconcile(&response.batches()?);
    let actuals = series.actual_values();
    info!(
        "Analyzing {} samples ({} historical) for {}",
        series.len(),
        actuals.len(),
        response.lake_id.as_deref().unwrap_or("unknown lake")
    );

    let trend = match project(&series.yearly_actuals(), projection_years) {
        Ok(projection) => TrendOutcome::Projected(projection),
        Err(ForecastError::InsufficientHistory { distinct_years }) => {
            TrendOutcome::InsufficientHistory { distinct_years }
        }
        Err(e) => return Err(e),
    };

    let reported_thresholds = match &response.risk_levels {
        Some(section) => no_data_as_none(section.inputs())?.map(|(_, thresholds)| thresholds),
        None => None,
    };
    let thresholds = match reported_thresholds {
        Some(thresholds) => Some(thresholds),
        None => no_data_as_none(ThresholdSet::from_history(&actuals))?,
    };
    let risk = match (series.latest_actual().and_then(Sample::actual), &thresholds) {
        (Some(current), Some(thresholds)) => Some(classify(current, thresholds)),
        _ => None,
    };

    let quality = match &response.data_quality {
        Some(section) => no_data_as_none(section.periods())?.and_then(QualityReport::aggregate),
        None => None,
    };

    let confidence = confidence_for(response.horizon.as_deref().unwrap_or_default());
    let mut discrepancies = Vec::new();
    if let Some(upstream) = response.confidence.as_deref().map(ConfidenceLevel::parse) {
        if upstream != ConfidenceLevel::Unknown
            && confidence.level != ConfidenceLevel::Unknown
            && upstream != confidence.level
        {
            discrepancies.push(Discrepancy {
                field: "confidence",
                upstream: upstream.as_str().to_string(),
                recomputed: confidence.level.as_str().to_string(),
            });
        }
    }
    if let (Some(section), TrendOutcome::Projected(projection)) = (&response.trend_analysis, &trend) {
        if let (ResponseStatus::Success, Some(upstream)) = (section.status, section.yearly_change_percent) {
            if disagrees(upstream, projection.yearly_change_percent) {
                discrepancies.push(Discrepancy {
                    field: "yearly_change_percent",
                    upstream: format!("{upstream:.3}"),
                    recomputed: format!("{:.3}", projection.yearly_change_percent),
                });
            }
        }
    }
    if let (Some(section), Some(risk), true) =
        (&response.risk_levels, &risk, reported_thresholds.is_some())
    {
        if let Some(upstream) = section.percentile {
            if disagrees(upstream, risk.percentile) {
                discrepancies.push(Discrepancy {
                    field: "percentile",
                    upstream: format!("{upstream:.1}"),
                    recomputed: format!("{:.1}", risk.percentile),
                });
            }
        }
    }
    for d in &discrepancies {
        warn!(
            "Upstream {} {} differs from recomputed {}",
            d.field, d.upstream, d.recomputed
        );
    }

    Ok(LakeAnalysis {
        lake_id: response.lake_id.clone(),
        statistics: summarize(&actuals),
        change_percent: series.change_percent(),
        series,
        trend,
        thresholds,
        risk,
        quality,
        confidence,
        discrepancies,
    })
}

/// Whether `upstream` and `recomputed` differ by more than
/// [`DISAGREEMENT_TOLERANCE`], relative to the larger magnitude (at least 1).
pub fn disagrees(upstream: f64, recomputed: f64) -> bool {
    let scale = upstream.abs().max(recomputed.abs()).max(1.0);
    (upstream - recomputed).abs() / scale > DISAGREEMENT_TOLERANCE
}

fn no_data_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(ForecastError::NoData { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}
