//! JSON payloads returned by the forecast query interface, and their
//! normalisation into engine types.
//!
//! Every payload carries a `status`. Anything other than `success` means
//! "no usable data" and is reported as [`ForecastError::NoData`] before any
//! array is looked at.

use crate::error::{ForecastError, Result};
use crate::quality::QualitySample;
use crate::risk::ThresholdSet;
use crate::sample::RawRecord;
use crate::series::{Batch, Precedence};
use log::warn;
use serde::{Deserialize, Serialize};

pub const FORECAST_ENDPOINT: &str = "forecast";
pub const TREND_ANALYSIS_ENDPOINT: &str = "forecast/trend-analysis";
pub const RISK_LEVELS_ENDPOINT: &str = "forecast/risk-levels";
pub const DATA_QUALITY_ENDPOINT: &str = "forecast/data-quality";
pub const UNIFIED_ENDPOINT: &str = "unified/forecast";

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Success,
    NoData,
    NoCloudData,
    #[serde(other)]
    Unknown,
}

impl ResponseStatus {
    /// `Ok` only for `success`.
    pub fn require_success(self, endpoint: &'static str) -> Result<()> {
        match self {
            ResponseStatus::Success => Ok(()),
            other => {
                warn!("{endpoint} answered {other:?}, treating as no data");
                Err(ForecastError::NoData { endpoint })
            }
        }
    }
}

/// `forecast?lake_id=<id>`: yearly actuals and model predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub years: Vec<i32>,
    #[serde(default)]
    pub actual: Vec<Option<f64>>,
    #[serde(default)]
    pub predicted: Vec<Option<f64>>,
    #[serde(default)]
    pub change_percent: Option<f64>,
    #[serde(default)]
    pub last_update: Option<String>,
}

impl ForecastResponse {
    /// Split into a historical batch (years with an actual) and a future
    /// batch (years with a prediction).
    pub fn batches(&self) -> Result<Vec<Batch>> {
        self.status.require_success(FORECAST_ENDPOINT)?;
        if self.years.is_empty() {
            return Err(ForecastError::NoData {
                endpoint: FORECAST_ENDPOINT,
            });
        }
        if self.actual.len() != self.years.len() || self.predicted.len() != self.years.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{FORECAST_ENDPOINT}: {} years but {} actual and {} predicted values",
                self.years.len(),
                self.actual.len(),
                self.predicted.len()
            )));
        }
        let historical = self
            .years
            .iter()
            .zip(&self.actual)
            .filter_map(|(year, value)| value.map(|v| RawRecord::actual(year.to_string(), v)))
            .collect();
        let future = self
            .years
            .iter()
            .zip(&self.predicted)
            .filter_map(|(year, value)| value.map(|v| RawRecord::predicted(year.to_string(), v)))
            .collect();
        Ok(vec![
            Batch::new(Precedence::Historical, historical),
            Batch::new(Precedence::Future, future),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRecord {
    pub year: i32,
    pub projected_area: f64,
}

/// `forecast/trend-analysis?lake_id=<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysisResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub historical_years: Vec<i32>,
    #[serde(default)]
    pub historical_values: Vec<Option<f64>>,
    #[serde(default)]
    pub projections: Vec<ProjectionRecord>,
    #[serde(default)]
    pub yearly_change_percent: Option<f64>,
    #[serde(default)]
    pub trend_direction: Option<String>,
}

impl TrendAnalysisResponse {
    /// The `(year, value)` points to fit; null values are skipped.
    pub fn points(&self) -> Result<Vec<(i32, f64)>> {
        self.status.require_success(TREND_ANALYSIS_ENDPOINT)?;
        if self.historical_years.len() != self.historical_values.len() {
            return Err(ForecastError::InvalidInput(format!(
                "{TREND_ANALYSIS_ENDPOINT}: {} years but {} values",
                self.historical_years.len(),
                self.historical_values.len()
            )));
        }
        let points: Vec<(i32, f64)> = self
            .historical_years
            .iter()
            .zip(&self.historical_values)
            .filter_map(|(year, value)| value.filter(|v| v.is_finite()).map(|v| (*year, v)))
            .collect();
        if points.is_empty() {
            return Err(ForecastError::NoData {
                endpoint: TREND_ANALYSIS_ENDPOINT,
            });
        }
        Ok(points)
    }
}

/// `forecast/risk-levels?lake_id=<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskLevelsResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub current_value: Option<f64>,
    #[serde(default)]
    pub percentile: Option<f64>,
    #[serde(default)]
    pub risk_text: Option<String>,
    #[serde(default)]
    pub risk_color: Option<String>,
    #[serde(default)]
    pub thresholds: Option<ThresholdSet>,
}

impl RiskLevelsResponse {
    /// Current value and validated thresholds.
    pub fn inputs(&self) -> Result<(f64, ThresholdSet)> {
        self.status.require_success(RISK_LEVELS_ENDPOINT)?;
        match (self.current_value, self.thresholds) {
            (Some(value), Some(thresholds)) if value.is_finite() => {
                thresholds.validate()?;
                Ok((value, thresholds))
            }
            _ => Err(ForecastError::NoData {
                endpoint: RISK_LEVELS_ENDPOINT,
            }),
        }
    }
}

/// One period of the data-quality payload. Upstream score and level are
/// carried for reference only; they are recomputed from `cloud_percent`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecord {
    #[serde(alias = "month", alias = "period")]
    pub period_label: String,
    pub cloud_percent: f64,
    #[serde(default)]
    pub sample_count: i64,
    #[serde(default)]
    pub quality_score: Option<f64>,
    #[serde(default)]
    pub quality_level: Option<String>,
}

/// `forecast/data-quality?lake_id=<id>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub overall_quality_score: Option<f64>,
    #[serde(default)]
    pub overall_cloud_percent: Option<f64>,
    #[serde(default)]
    pub total_samples: Option<i64>,
    #[serde(default)]
    pub monthly_quality: Vec<QualityRecord>,
}

impl DataQualityResponse {
    pub fn periods(&self) -> Result<Vec<QualitySample>> {
        self.status.require_success(DATA_QUALITY_ENDPOINT)?;
        if self.monthly_quality.is_empty() {
            return Err(ForecastError::NoData {
                endpoint: DATA_QUALITY_ENDPOINT,
            });
        }
        self.monthly_quality
            .iter()
            .map(|record| {
                let count = u32::try_from(record.sample_count).map_err(|_| {
                    ForecastError::InvalidInput(format!(
                        "{}: sample count {} out of range",
                        record.period_label, record.sample_count
                    ))
                })?;
                QualitySample::new(record.period_label.clone(), record.cloud_percent, count)
            })
            .collect()
    }
}

/// `unified/forecast?lake_id=<id>&horizon=<H>`: every view in one payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnifiedResponse {
    pub status: ResponseStatus,
    #[serde(default)]
    pub lake_id: Option<String>,
    #[serde(default)]
    pub horizon: Option<String>,
    #[serde(default)]
    pub confidence: Option<String>,
    #[serde(default)]
    pub historical: Vec<RawRecord>,
    #[serde(default)]
    pub forecast: Vec<RawRecord>,
    #[serde(default)]
    pub timeseries: Vec<RawRecord>,
    #[serde(default)]
    pub trend_analysis: Option<TrendAnalysisResponse>,
    #[serde(default)]
    pub risk_levels: Option<RiskLevelsResponse>,
    #[serde(default)]
    pub data_quality: Option<DataQualityResponse>,
}

impl UnifiedResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Historical, future and overlay batches, ready for reconciliation.
    pub fn batches(&self) -> Result<Vec<Batch>> {
        self.status.require_success(UNIFIED_ENDPOINT)?;
        if self.historical.is_empty() && self.forecast.is_empty() && self.timeseries.is_empty() {
            return Err(ForecastError::NoData {
                endpoint: UNIFIED_ENDPOINT,
            });
        }
        Ok(vec![
            Batch::new(Precedence::Historical, self.historical.clone()),
            Batch::new(Precedence::Future, self.forecast.clone()),
            Batch::new(Precedence::Overlay, self.timeseries.clone()),
        ])
    }
}
