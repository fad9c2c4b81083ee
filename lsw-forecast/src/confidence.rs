use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Forecast lead-time bucket: H1/H2/H3 are roughly one, two and three months ahead.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum Horizon {
    H1,
    H2,
    H3,
}

impl Horizon {
    pub fn as_str(&self) -> &'static str {
        match self {
            Horizon::H1 => "H1",
            Horizon::H2 => "H2",
            Horizon::H3 => "H3",
        }
    }

    /// Approximate lead time in months.
    pub fn months_ahead(&self) -> u32 {
        match self {
            Horizon::H1 => 1,
            Horizon::H2 => 2,
            Horizon::H3 => 3,
        }
    }
}

impl fmt::Display for Horizon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Horizon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "H1" => Ok(Horizon::H1),
            "H2" => Ok(Horizon::H2),
            "H3" => Ok(Horizon::H3),
            other => Err(format!("unknown horizon {other:?}, expected H1, H2 or H3")),
        }
    }
}

/// Qualitative confidence attached to a forecast.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
    Unknown,
}

impl ConfidenceLevel {
    /// Lenient parse of the confidence strings found in payloads.
    /// Anything unrecognised is `Unknown`.
    pub fn parse(s: &str) -> ConfidenceLevel {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => ConfidenceLevel::High,
            "medium" | "moderate" => ConfidenceLevel::Medium,
            "low" => ConfidenceLevel::Low,
            _ => ConfidenceLevel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Unknown => "unknown",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct Confidence {
    pub level: ConfidenceLevel,
    pub label: String,
}

impl From<Horizon> for Confidence {
    fn from(horizon: Horizon) -> Self {
        let level = match horizon {
            Horizon::H1 => ConfidenceLevel::High,
            Horizon::H2 => ConfidenceLevel::Medium,
            Horizon::H3 => ConfidenceLevel::Low,
        };
        let months = horizon.months_ahead();
        let plural = if months == 1 { "" } else { "s" };
        let label = format!(
            "{} confidence ({months} month{plural} ahead)",
            capitalize(level.as_str())
        );
        Confidence { level, label }
    }
}

/// Map a horizon identifier to its confidence. Never fails: an unknown
/// identifier yields `ConfidenceLevel::Unknown`.
pub fn confidence_for(horizon: &str) -> Confidence {
    match horizon.parse::<Horizon>() {
        Ok(h) => h.into(),
        Err(_) => Confidence {
            level: ConfidenceLevel::Unknown,
            label: String::from("Unknown horizon"),
        },
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_for_known_horizons() {
        assert_eq!(confidence_for("H1").level, ConfidenceLevel::High);
        assert_eq!(confidence_for("H2").level, ConfidenceLevel::Medium);
        assert_eq!(confidence_for("H3").level, ConfidenceLevel::Low);
        assert_eq!(confidence_for("H1").label, "High confidence (1 month ahead)");
        assert_eq!(confidence_for("H3").label, "Low confidence (3 months ahead)");
    }

    #[test]
    fn test_confidence_for_unknown_horizon() {
        assert_eq!(confidence_for("H9").level, ConfidenceLevel::Unknown);
        assert_eq!(confidence_for("").level, ConfidenceLevel::Unknown);
    }

    #[test]
    fn test_horizon_parse_is_case_insensitive() {
        assert_eq!("h2".parse::<Horizon>(), Ok(Horizon::H2));
        assert!("H4".parse::<Horizon>().is_err());
    }

    #[test]
    fn test_confidence_level_parse() {
        assert_eq!(ConfidenceLevel::parse("High"), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::parse("moderate"), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::parse("???"), ConfidenceLevel::Unknown);
    }
}
