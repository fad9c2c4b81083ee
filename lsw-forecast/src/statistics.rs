use serde::Serialize;

/// Number of trailing values compared against the window before them.
pub const TREND_WINDOW: usize = 3;

/// Relative change (percent) beyond which a series is no longer stable.
pub const TREND_THRESHOLD_PERCENT: f64 = 5.0;

/// Coarse direction of the most recent values.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Positive,
    Negative,
    Stable,
}

/// Descriptive statistics over a series of values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Population standard deviation.
    pub std: f64,
    pub trend: Trend,
}

impl StatSummary {
    fn empty() -> Self {
        StatSummary {
            count: 0,
            mean: 0.0,
            min: 0.0,
            max: 0.0,
            std: 0.0,
            trend: Trend::Stable,
        }
    }
}

/// Summarize `values`. An empty slice yields an all-zero, stable summary.
pub fn summarize(values: &[f64]) -> StatSummary {
    if values.is_empty() {
        return StatSummary::empty();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let (min, max) = values
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    StatSummary {
        count: values.len(),
        mean,
        min,
        max,
        std: variance.sqrt(),
        trend: trend_of(values),
    }
}

/// Compare the mean of the last three values with the mean of the three
/// before them. Fewer than six values, or a zero prior mean, is `Stable`.
pub fn trend_of(values: &[f64]) -> Trend {
    let n = values.len();
    if n < 2 * TREND_WINDOW {
        return Trend::Stable;
    }
    let recent = mean_of(&values[n - TREND_WINDOW..]);
    let prior = mean_of(&values[n - 2 * TREND_WINDOW..n - TREND_WINDOW]);
    if prior == 0.0 {
        return Trend::Stable;
    }
    let change_percent = (recent - prior) / prior * 100.0;
    if change_percent > TREND_THRESHOLD_PERCENT {
        Trend::Positive
    } else if change_percent < -TREND_THRESHOLD_PERCENT {
        Trend::Negative
    } else {
        Trend::Stable
    }
}

fn mean_of(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const ACTUALS: [f64; 7] = [
        973119950.0,
        962457224.0,
        836692427.0,
        798421798.0,
        987838515.0,
        1003990060.0,
        887394142.0,
    ];

    #[test]
    fn test_summarize_lake_actuals() {
        let summary = summarize(&ACTUALS);
        assert_eq!(summary.count, 7);
        assert_relative_eq!(summary.mean, 921_273_359.0, max_relative = 1e-3);
        assert_relative_eq!(summary.mean, 6_449_914_116.0 / 7.0);
        assert_eq!(summary.min, 798421798.0);
        assert_eq!(summary.max, 1003990060.0);
        assert_relative_eq!(summary.std, 74_691_030.98, max_relative = 1e-6);
        // last three average ~10.8% above the three before
        assert_eq!(summary.trend, Trend::Positive);
    }

    #[test]
    fn test_summarize_empty_is_all_zero() {
        let summary = summarize(&[]);
        assert_eq!(summary, StatSummary::empty());
        assert_eq!(summary.trend, Trend::Stable);
        assert!(!summary.std.is_nan());
    }

    #[test]
    fn test_single_value_has_zero_spread() {
        let summary = summarize(&[42.0]);
        assert_eq!(summary.mean, 42.0);
        assert_eq!(summary.min, 42.0);
        assert_eq!(summary.max, 42.0);
        assert_eq!(summary.std, 0.0);
    }

    #[test]
    fn test_population_variance() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.std, 2.0);
    }

    #[test]
    fn test_trend_bands() {
        assert_eq!(trend_of(&[100.0, 100.0, 100.0, 90.0, 90.0, 90.0]), Trend::Negative);
        assert_eq!(trend_of(&[100.0, 100.0, 100.0, 104.0, 105.0, 106.0]), Trend::Stable);
        assert_eq!(trend_of(&[100.0, 100.0, 100.0, 106.0, 106.0, 106.0]), Trend::Positive);
    }

    #[test]
    fn test_trend_guards() {
        assert_eq!(trend_of(&[1.0, 2.0, 3.0, 40.0, 50.0]), Trend::Stable);
        assert_eq!(trend_of(&[0.0, 0.0, 0.0, 10.0, 10.0, 10.0]), Trend::Stable);
    }
}
