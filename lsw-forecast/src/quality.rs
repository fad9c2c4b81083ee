//! Cloud-cover based data-quality scoring.

use crate::error::{ForecastError, Result};
use chrono::NaiveDate;
use lsw_utils::dates::month_label;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLevel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityLevel::Excellent => "Excellent",
            QualityLevel::Good => "Good",
            QualityLevel::Fair => "Fair",
            QualityLevel::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QualityScore {
    pub quality_score: f64,
    pub quality_level: QualityLevel,
}

/// Score a cloud-cover percentage: 100 minus the cloud cover, never below 0.
pub fn score(cloud_percent: f64) -> QualityScore {
    let quality_level = if cloud_percent <= 10.0 {
        QualityLevel::Excellent
    } else if cloud_percent <= 25.0 {
        QualityLevel::Good
    } else if cloud_percent <= 50.0 {
        QualityLevel::Fair
    } else {
        QualityLevel::Poor
    };
    QualityScore {
        quality_score: (100.0 - cloud_percent).max(0.0),
        quality_level,
    }
}

/// Quality of one period (usually a month) of satellite scenes.
///
/// Score and level are derived from `cloud_percent` on construction and
/// cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualitySample {
    period_label: String,
    cloud_percent: f64,
    sample_count: u32,
    quality_score: f64,
    quality_level: QualityLevel,
}

impl QualitySample {
    /// Rejects cloud cover outside `[0, 100]`.
    pub fn new(period_label: impl Into<String>, cloud_percent: f64, sample_count: u32) -> Result<Self> {
        if !(0.0..=100.0).contains(&cloud_percent) {
            return Err(ForecastError::InvalidInput(format!(
                "cloud percent {cloud_percent} outside [0, 100]"
            )));
        }
        let QualityScore {
            quality_score,
            quality_level,
        } = score(cloud_percent);
        Ok(QualitySample {
            period_label: period_label.into(),
            cloud_percent,
            sample_count,
            quality_score,
            quality_level,
        })
    }

    pub fn period_label(&self) -> &str {
        &self.period_label
    }

    pub fn cloud_percent(&self) -> f64 {
        self.cloud_percent
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn quality_score(&self) -> f64 {
        self.quality_score
    }

    pub fn quality_level(&self) -> QualityLevel {
        self.quality_level
    }
}

/// Overall data quality for a lake.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub overall_quality_score: f64,
    pub overall_cloud_percent: f64,
    pub overall_level: QualityLevel,
    pub total_samples: u64,
    pub periods: Vec<QualitySample>,
}

impl QualityReport {
    /// Average score and cloud cover across `periods`; `None` when empty.
    pub fn aggregate(periods: Vec<QualitySample>) -> Option<QualityReport> {
        if periods.is_empty() {
            return None;
        }
        let n = periods.len() as f64;
        let overall_quality_score = periods.iter().map(|p| p.quality_score).sum::<f64>() / n;
        let overall_cloud_percent = periods.iter().map(|p| p.cloud_percent).sum::<f64>() / n;
        let total_samples = periods.iter().map(|p| u64::from(p.sample_count)).sum();
        Some(QualityReport {
            overall_quality_score,
            overall_cloud_percent,
            overall_level: score(overall_cloud_percent).quality_level,
            total_samples,
            periods,
        })
    }
}

/// Group per-scene `(date, cloud_percent)` observations into monthly
/// quality samples, averaging cloud cover within each month.
pub fn monthly_quality(scenes: &[(NaiveDate, f64)]) -> Result<Vec<QualitySample>> {
    let mut by_month: BTreeMap<String, (f64, u32)> = BTreeMap::new();
    for (date, cloud_percent) in scenes {
        let entry = by_month.entry(month_label(date)).or_insert((0.0, 0));
        entry.0 += cloud_percent;
        entry.1 += 1;
    }
    by_month
        .into_iter()
        .map(|(label, (sum, count))| QualitySample::new(label, sum / f64::from(count), count))
        .collect()
}
