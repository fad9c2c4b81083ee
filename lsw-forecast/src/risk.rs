//! Percentile-based risk banding of a lake's current surface area.

use crate::error::{ForecastError, Result};
use crate::statistics::summarize;
use serde::{Deserialize, Serialize};

/// Percentile returned when the historical range collapses to a point.
pub const DEGENERATE_PERCENTILE: f64 = 50.0;

/// Historical bands for one lake. Expected ordering:
/// `min <= critical_low <= warning_low <= mean <= warning_high <= critical_high <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdSet {
    pub critical_low: f64,
    pub warning_low: f64,
    pub mean: f64,
    pub warning_high: f64,
    pub critical_high: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Critical,
    Warning,
    Normal,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskDirection {
    Low,
    High,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub tier: RiskTier,
    pub direction: RiskDirection,
    /// Position of the value within `[min, max]`, 0-100.
    pub percentile: f64,
}

impl RiskAssessment {
    pub fn label(&self) -> &'static str {
        match (self.tier, self.direction) {
            (RiskTier::Critical, RiskDirection::Low) => "Critically low",
            (RiskTier::Warning, RiskDirection::Low) => "Below normal",
            (RiskTier::Critical, RiskDirection::High) => "Critically high",
            (RiskTier::Warning, RiskDirection::High) => "Above normal",
            _ => "Normal",
        }
    }

    /// Display colour (hex) for this band.
    pub fn color(&self) -> &'static str {
        match self.tier {
            RiskTier::Critical => "#dc2626",
            RiskTier::Warning => "#f59e0b",
            RiskTier::Normal => "#16a34a",
        }
    }
}

impl ThresholdSet {
    /// Derive bands from a lake's historical distribution: P10/P25 below,
    /// P75/P90 above. The mean is clamped into the warning band so skewed
    /// histories still satisfy the ordering.
    pub fn from_history(values: &[f64]) -> Result<ThresholdSet> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return Err(ForecastError::NoData {
                endpoint: "historical distribution",
            });
        }
        sorted.sort_by(f64::total_cmp);
        let summary = summarize(&sorted);
        let warning_low = percentile_of_sorted(&sorted, 25.0);
        let warning_high = percentile_of_sorted(&sorted, 75.0);
        Ok(ThresholdSet {
            critical_low: percentile_of_sorted(&sorted, 10.0),
            warning_low,
            mean: summary.mean.clamp(warning_low, warning_high),
            warning_high,
            critical_high: percentile_of_sorted(&sorted, 90.0),
            min: summary.min,
            max: summary.max,
        })
    }

    /// Check the ordering invariant for caller-supplied thresholds.
    pub fn validate(&self) -> Result<()> {
        let ordered = [
            ("min", self.min),
            ("critical_low", self.critical_low),
            ("warning_low", self.warning_low),
            ("mean", self.mean),
            ("warning_high", self.warning_high),
            ("critical_high", self.critical_high),
            ("max", self.max),
        ];
        if let Some((name, value)) = ordered.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ForecastError::InvalidThresholds(format!(
                "{name} is not finite ({value})"
            )));
        }
        for pair in ordered.windows(2) {
            let ((lo_name, lo), (hi_name, hi)) = (pair[0], pair[1]);
            if lo > hi {
                return Err(ForecastError::InvalidThresholds(format!(
                    "{lo_name} ({lo}) exceeds {hi_name} ({hi})"
                )));
            }
        }
        Ok(())
    }

    /// Linear position of `value` within `[min, max]`, clamped to 0-100.
    pub fn percentile(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if range == 0.0 {
            return DEGENERATE_PERCENTILE;
        }
        ((value - self.min) / range * 100.0).clamp(0.0, 100.0)
    }
}

/// Band `current_value` against `thresholds`.
///
/// Lower bounds are inclusive: a value equal to `critical_low` is a warning,
/// one equal to `warning_low` is normal. Upper bounds are inclusive the
/// other way: `warning_high` is normal, `critical_high` is a warning.
pub fn classify(current_value: f64, thresholds: &ThresholdSet) -> RiskAssessment {
    let (tier, direction) = if current_value < thresholds.critical_low {
        (RiskTier::Critical, RiskDirection::Low)
    } else if current_value < thresholds.warning_low {
        (RiskTier::Warning, RiskDirection::Low)
    } else if current_value <= thresholds.warning_high {
        (RiskTier::Normal, RiskDirection::None)
    } else if current_value <= thresholds.critical_high {
        (RiskTier::Warning, RiskDirection::High)
    } else {
        (RiskTier::Critical, RiskDirection::High)
    };
    RiskAssessment {
        tier,
        direction,
        percentile: thresholds.percentile(current_value),
    }
}

/// Linear-interpolated percentile `p` (0-100) of an ascending, non-empty slice.
fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    let rank = p / 100.0 * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let weight = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lake_thresholds() -> ThresholdSet {
        ThresholdSet {
            min: 700_000_000.0,
            critical_low: 750_000_000.0,
            warning_low: 820_000_000.0,
            mean: 900_000_000.0,
            warning_high: 970_000_000.0,
            critical_high: 1_000_000_000.0,
            max: 1_010_000_000.0,
        }
    }

    #[test]
    fn test_classify_normal_lake() {
        let assessment = classify(887_394_142.0, &lake_thresholds());
        assert_eq!(assessment.tier, RiskTier::Normal);
        assert_eq!(assessment.direction, RiskDirection::None);
        assert_relative_eq!(
            assessment.percentile,
            (887_394_142.0 - 700_000_000.0) / (1_010_000_000.0 - 700_000_000.0) * 100.0
        );
        assert!((assessment.percentile - 60.45).abs() < 0.01);
        assert_eq!(assessment.label(), "Normal");
    }

    #[test]
    fn test_classify_every_band() {
        let t = lake_thresholds();
        let cases = [
            (720_000_000.0, RiskTier::Critical, RiskDirection::Low),
            (750_000_000.0, RiskTier::Warning, RiskDirection::Low),
            (800_000_000.0, RiskTier::Warning, RiskDirection::Low),
            (820_000_000.0, RiskTier::Normal, RiskDirection::None),
            (970_000_000.0, RiskTier::Normal, RiskDirection::None),
            (980_000_000.0, RiskTier::Warning, RiskDirection::High),
            (1_000_000_000.0, RiskTier::Warning, RiskDirection::High),
            (1_005_000_000.0, RiskTier::Critical, RiskDirection::High),
        ];
        for (value, tier, direction) in cases {
            let assessment = classify(value, &t);
            assert_eq!((assessment.tier, assessment.direction), (tier, direction), "{value}");
        }
    }

    #[test]
    fn test_percentile_is_clamped() {
        let t = lake_thresholds();
        assert_eq!(classify(100.0, &t).percentile, 0.0);
        assert_eq!(classify(5_000_000_000.0, &t).percentile, 100.0);
        assert_eq!(classify(100.0, &t).color(), "#dc2626");
    }

    #[test]
    fn test_degenerate_range() {
        let flat = ThresholdSet {
            critical_low: 5.0,
            warning_low: 5.0,
            mean: 5.0,
            warning_high: 5.0,
            critical_high: 5.0,
            min: 5.0,
            max: 5.0,
        };
        assert_eq!(flat.percentile(5.0), DEGENERATE_PERCENTILE);
        assert_eq!(classify(7.0, &flat).percentile, DEGENERATE_PERCENTILE);
    }

    #[test]
    fn test_from_history_orders_bands() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let t = ThresholdSet::from_history(&values).unwrap();
        assert_eq!(t.min, 0.0);
        assert_eq!(t.critical_low, 10.0);
        assert_eq!(t.warning_low, 25.0);
        assert_eq!(t.mean, 50.0);
        assert_eq!(t.warning_high, 75.0);
        assert_eq!(t.critical_high, 90.0);
        assert_eq!(t.max, 100.0);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_from_history_clamps_skewed_mean() {
        let mut values = vec![1.0; 20];
        values.push(1_000.0);
        let t = ThresholdSet::from_history(&values).unwrap();
        assert_eq!(t.mean, t.warning_high);
        assert!(t.validate().is_ok());
        assert!(ThresholdSet::from_history(&[]).is_err());
    }

    #[test]
    fn test_validate_rejects_out_of_order() {
        let mut t = lake_thresholds();
        t.warning_low = 990_000_000.0;
        assert!(matches!(t.validate(), Err(ForecastError::InvalidThresholds(_))));
        let mut t = lake_thresholds();
        t.max = f64::NAN;
        assert!(t.validate().is_err());
    }
}
