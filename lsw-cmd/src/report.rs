//! Plain-text rendering of analytic results.

use lsw_forecast::analysis::{LakeAnalysis, TrendOutcome};
use lsw_forecast::quality::QualityReport;
use lsw_forecast::risk::{RiskAssessment, ThresholdSet};
use lsw_forecast::sample::SampleKind;
use lsw_forecast::series::Series;
use lsw_forecast::statistics::summarize;
use lsw_forecast::statistics::StatSummary;
use lsw_forecast::trend::TrendProjection;
use lsw_utils::numbers::{format_area_km2, format_signed_percent};
use std::fmt::Write;

pub fn render_analysis(analysis: &LakeAnalysis) -> String {
    let mut out = String::new();
    let lake = analysis.lake_id.as_deref().unwrap_or("unknown lake");
    let _ = writeln!(out, "Lake {lake} ({})", analysis.confidence.label);
    let _ = writeln!(
        out,
        "Series: {} samples ({} historical, {} predicted)",
        analysis.series.len(),
        analysis.series.of_kind(SampleKind::Historical).count(),
        analysis.series.of_kind(SampleKind::Future).count()
    );
    if let Some(change) = analysis.change_percent {
        let _ = writeln!(out, "Change since first measurement: {}", format_signed_percent(change));
    }
    out.push('\n');
    out.push_str(&render_statistics(&analysis.statistics));
    out.push('\n');
    match &analysis.trend {
        TrendOutcome::Projected(projection) => out.push_str(&render_trend(projection)),
        TrendOutcome::InsufficientHistory { distinct_years } => {
            let _ = writeln!(
                out,
                "Trend: not enough history to project ({distinct_years} distinct year(s))"
            );
        }
    }
    out.push('\n');
    match (&analysis.risk, &analysis.thresholds) {
        (Some(risk), Some(thresholds)) => out.push_str(&render_risk(risk, thresholds)),
        _ => out.push_str("Risk: no data\n"),
    }
    out.push('\n');
    match &analysis.quality {
        Some(quality) => out.push_str(&render_quality(quality)),
        None => out.push_str("Data quality: no data\n"),
    }
    for d in &analysis.discrepancies {
        let _ = writeln!(
            out,
            "Note: upstream {} {} differs from recomputed {}",
            d.field, d.upstream, d.recomputed
        );
    }
    out
}

/// Yearly actuals and predictions from the forecast endpoint.
pub fn render_history(series: &Series) -> String {
    let mut out = String::new();
    for sample in series {
        let _ = writeln!(
            out,
            "  {}  {:<10} {}",
            sample.date.format("%Y"),
            sample.kind().as_str(),
            format_area_km2(sample.value())
        );
    }
    if let Some(change) = series.change_percent() {
        let _ = writeln!(out, "Change since first measurement: {}", format_signed_percent(change));
    }
    out.push('\n');
    out.push_str(&render_statistics(&summarize(&series.actual_values())));
    out
}

pub fn render_statistics(stats: &StatSummary) -> String {
    if stats.count == 0 {
        return String::from("Statistics: no historical measurements\n");
    }
    let mut out = String::new();
    let _ = writeln!(out, "Statistics over {} measurements", stats.count);
    let _ = writeln!(out, "  mean  {}", format_area_km2(stats.mean));
    let _ = writeln!(out, "  min   {}", format_area_km2(stats.min));
    let _ = writeln!(out, "  max   {}", format_area_km2(stats.max));
    let _ = writeln!(out, "  std   {}", format_area_km2(stats.std));
    let _ = writeln!(out, "  trend {:?}", stats.trend);
    out
}

pub fn render_trend(projection: &TrendProjection) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Trend: {:?}, {} per year",
        projection.direction,
        format_signed_percent(projection.yearly_change_percent)
    );
    for p in &projection.projections {
        let _ = writeln!(out, "  {}  {}", p.year, format_area_km2(p.projected_value));
    }
    out
}

pub fn render_risk(risk: &RiskAssessment, thresholds: &ThresholdSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Risk: {} ({:.1}th percentile of [{}, {}])",
        risk.label(),
        risk.percentile,
        format_area_km2(thresholds.min),
        format_area_km2(thresholds.max)
    );
    out
}

pub fn render_quality(quality: &QualityReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Data quality: {} (score {:.1}, cloud {:.1}%, {} scenes)",
        quality.overall_level.as_str(),
        quality.overall_quality_score,
        quality.overall_cloud_percent,
        quality.total_samples
    );
    for period in &quality.periods {
        let _ = writeln!(
            out,
            "  {}  {:<9} cloud {:>5.1}%  n={}",
            period.period_label(),
            period.quality_level().as_str(),
            period.cloud_percent(),
            period.sample_count()
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use lsw_forecast::analysis::analyze;
    use lsw_forecast::payload::UnifiedResponse;
    use lsw_forecast::payload::ForecastResponse;
    use lsw_forecast::series::reconcile;
    use std::num::NonZeroU32;

    const UNIFIED_FIXTURE: &str = include_str!("../../fixtures/unified_forecast.json");

    #[test]
    fn test_render_analysis_sections() {
        let response = UnifiedResponse::from_json(UNIFIED_FIXTURE).unwrap();
        let analysis = analyze(&response, NonZeroU32::new(3).unwrap()).unwrap();
        let text = render_analysis(&analysis);
        assert!(text.starts_with("Lake lake-7 (Medium confidence (2 months ahead))"));
        assert!(text.contains("Series: 10 samples (7 historical, 3 predicted)"));
        assert!(text.contains("  min   798.42 km²"));
        assert!(text.contains("Trend: Decreasing"));
        assert!(text.contains("  2027  "));
        assert!(text.contains("Risk: Normal (60.4th percentile"));
        assert!(text.contains("Data quality: Fair (score 70.0, cloud 30.0%, 9 scenes)"));
    }

    #[test]
    fn test_render_history() {
        let response: ForecastResponse = serde_json::from_str(
            r#"{"status": "success", "years": [2023, 2024, 2025],
                "actual": [1000000000, 900000000, null],
                "predicted": [null, 950000000, 880000000]}"#,
        )
        .unwrap();
        let series = reconcile(&response.batches().unwrap());
        let text = render_history(&series);
        assert!(text.contains("  2024  historical 900.00 km²"));
        assert!(text.contains("  2025  future     880.00 km²"));
        assert!(text.contains("Change since first measurement: -10.00%"));
        assert!(text.contains("Statistics over 2 measurements"));
    }

    #[test]
    fn test_render_discrepancy_notes() {
        let mut response = UnifiedResponse::from_json(UNIFIED_FIXTURE).unwrap();
        response.confidence = Some("high".to_string());
        let analysis = analyze(&response, NonZeroU32::new(1).unwrap()).unwrap();
        let text = render_analysis(&analysis);
        assert!(text.contains("Note: upstream confidence high differs from recomputed medium"));
    }

    #[test]
    fn test_render_empty_statistics() {
        assert_eq!(
            render_statistics(&summarize(&[])),
            "Statistics: no historical measurements\n"
        );
    }
}
