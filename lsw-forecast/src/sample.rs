use crate::confidence::ConfidenceLevel;
use chrono::NaiveDate;
use lsw_utils::dates::{format_date, parse_calendar_date};
use serde::{Deserialize, Serialize};

/// Why a raw record could not become a [`Sample`]. Records failing this way
/// are dropped by the reconciler and never reach the caller.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum MalformedRecord {
    UnparsableDate,
    NoValue,
}

/// Whether a sample is a measurement or a model prediction.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleKind {
    Historical,
    Future,
}

impl SampleKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleKind::Historical => "historical",
            SampleKind::Future => "future",
        }
    }
}

/// The value a sample carries. Historical samples carry a measured surface
/// area, future samples a predicted one; never both, never neither.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Reading {
    Historical { actual: f64 },
    Future { predicted: f64 },
}

/// A record exactly as it arrives from upstream, before validation.
#[derive(Debug, PartialEq, Clone, Default, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    #[serde(default)]
    pub actual: Option<f64>,
    #[serde(default)]
    pub predicted: Option<f64>,
    #[serde(default)]
    pub confidence: Option<String>,
}

impl RawRecord {
    pub fn actual(date: impl Into<String>, value: f64) -> Self {
        RawRecord {
            date: date.into(),
            actual: Some(value),
            ..Default::default()
        }
    }

    pub fn predicted(date: impl Into<String>, value: f64) -> Self {
        RawRecord {
            date: date.into(),
            predicted: Some(value),
            ..Default::default()
        }
    }
}

/// A single validated point of a lake's surface-area series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sample {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub reading: Reading,
    pub confidence: Option<ConfidenceLevel>,
}

impl Sample {
    pub fn historical(date: NaiveDate, actual: f64) -> Self {
        Sample {
            date,
            reading: Reading::Historical { actual },
            confidence: None,
        }
    }

    pub fn future(date: NaiveDate, predicted: f64, confidence: Option<ConfidenceLevel>) -> Self {
        Sample {
            date,
            reading: Reading::Future { predicted },
            confidence,
        }
    }

    pub fn kind(&self) -> SampleKind {
        match self.reading {
            Reading::Historical { .. } => SampleKind::Historical,
            Reading::Future { .. } => SampleKind::Future,
        }
    }

    pub fn actual(&self) -> Option<f64> {
        match self.reading {
            Reading::Historical { actual } => Some(actual),
            Reading::Future { .. } => None,
        }
    }

    pub fn predicted(&self) -> Option<f64> {
        match self.reading {
            Reading::Future { predicted } => Some(predicted),
            Reading::Historical { .. } => None,
        }
    }

    /// The carried value, whichever kind it is.
    pub fn value(&self) -> f64 {
        match self.reading {
            Reading::Historical { actual } => actual,
            Reading::Future { predicted } => predicted,
        }
    }
}

impl TryFrom<&RawRecord> for Sample {
    type Error = MalformedRecord;

    /// A record carrying both values is a measurement: the actual wins.
    /// Non-finite numbers count as absent.
    fn try_from(record: &RawRecord) -> Result<Self, Self::Error> {
        let date = parse_calendar_date(&record.date).map_err(|_| MalformedRecord::UnparsableDate)?;
        let confidence = record.confidence.as_deref().map(ConfidenceLevel::parse);
        let actual = record.actual.filter(|v| v.is_finite());
        let predicted = record.predicted.filter(|v| v.is_finite());
        let reading = match (actual, predicted) {
            (Some(actual), _) => Reading::Historical { actual },
            (None, Some(predicted)) => Reading::Future { predicted },
            (None, None) => return Err(MalformedRecord::NoValue),
        };
        Ok(Sample {
            date,
            reading,
            confidence,
        })
    }
}

impl From<&Sample> for RawRecord {
    fn from(sample: &Sample) -> Self {
        RawRecord {
            date: format_date(&sample.date),
            actual: sample.actual(),
            predicted: sample.predicted(),
            confidence: sample.confidence.map(|c| c.as_str().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_record_with_actual_is_historical() {
        let sample = Sample::try_from(&RawRecord::actual("2021-06-01", 798421798.0)).unwrap();
        assert_eq!(sample.kind(), SampleKind::Historical);
        assert_eq!(sample.actual(), Some(798421798.0));
        assert_eq!(sample.predicted(), None);
    }

    #[test]
    fn test_raw_record_with_both_values_keeps_actual() {
        let record = RawRecord {
            date: "2024".to_string(),
            actual: Some(887394142.0),
            predicted: Some(900000000.0),
            confidence: None,
        };
        let sample = Sample::try_from(&record).unwrap();
        assert_eq!(sample.reading, Reading::Historical { actual: 887394142.0 });
        assert_eq!(sample.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
    }

    #[test]
    fn test_raw_record_future_keeps_confidence() {
        let record = RawRecord {
            confidence: Some("Medium".to_string()),
            ..RawRecord::predicted("2025-02", 910000000.0)
        };
        let sample = Sample::try_from(&record).unwrap();
        assert_eq!(sample.kind(), SampleKind::Future);
        assert_eq!(sample.confidence, Some(ConfidenceLevel::Medium));
    }

    #[test]
    fn test_malformed_records() {
        let empty = RawRecord {
            date: "2021-06-01".to_string(),
            ..Default::default()
        };
        assert_eq!(Sample::try_from(&empty), Err(MalformedRecord::NoValue));

        let nan = RawRecord::actual("2021-06-01", f64::NAN);
        assert_eq!(Sample::try_from(&nan), Err(MalformedRecord::NoValue));

        let bad_date = RawRecord::actual("01/06/2021", 1.0);
        assert_eq!(
            Sample::try_from(&bad_date),
            Err(MalformedRecord::UnparsableDate)
        );
    }

    #[test]
    fn test_sample_to_raw_record() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let sample = Sample::future(date, 5.0, Some(ConfidenceLevel::Low));
        let raw = RawRecord::from(&sample);
        assert_eq!(raw.date, "2025-03-01");
        assert_eq!(raw.predicted, Some(5.0));
        assert_eq!(raw.confidence.as_deref(), Some("low"));
        assert_eq!(Sample::try_from(&raw).unwrap(), sample);
    }
}
