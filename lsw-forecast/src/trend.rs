//! Linear trend projection over yearly surface-area values.
//!
//! Fits an ordinary least-squares line through `(year, value)` points and
//! evaluates it at the years following the last observation. The output is
//! an unbounded extrapolation: values may go negative or exceed what the
//! lake can physically hold.

use crate::error::{ForecastError, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::num::NonZeroU32;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub year: i32,
    pub projected_value: f64,
}

/// Fitted line `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearFit {
    /// Ordinary least squares over `points`. Needs two distinct years.
    pub fn fit(points: &[(i32, f64)]) -> Result<LinearFit> {
        let distinct_years = points.iter().map(|(year, _)| *year).collect::<HashSet<_>>().len();
        if distinct_years < 2 {
            return Err(ForecastError::InsufficientHistory { distinct_years });
        }
        let n = points.len() as f64;
        let mean_x = points.iter().map(|(x, _)| f64::from(*x)).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
        // centred sums keep precision with year-sized x values
        let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
            let dx = f64::from(*x) - mean_x;
            (sxy + dx * (y - mean_y), sxx + dx * dx)
        });
        let slope = sxy / sxx;
        Ok(LinearFit {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    pub fn evaluate(&self, year: i32) -> f64 {
        self.slope * f64::from(year) + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendProjection {
    pub fit: LinearFit,
    /// Slope as a percentage of the mean historical value.
    pub yearly_change_percent: f64,
    pub direction: TrendDirection,
    pub projections: Vec<Projection>,
}

/// Fit `points` and project `horizon_years` years past the last one.
///
/// A zero historical mean reports a 0% yearly change rather than dividing
/// by zero. Horizons reaching past `i32::MAX` are `InvalidInput`.
pub fn project(points: &[(i32, f64)], horizon_years: NonZeroU32) -> Result<TrendProjection> {
    let fit = LinearFit::fit(points)?;
    let mean = points.iter().map(|(_, y)| y).sum::<f64>() / points.len() as f64;
    let yearly_change_percent = if mean == 0.0 {
        0.0
    } else {
        fit.slope / mean * 100.0
    };
    let direction = if yearly_change_percent < 0.0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::Increasing
    };
    // fit() guarantees points is non-empty
    let last_year = points.iter().map(|(year, _)| *year).max().unwrap_or_default();
    let horizon = i32::try_from(horizon_years.get()).map_err(|_| {
        ForecastError::InvalidInput(format!("horizon of {horizon_years} years is too long"))
    })?;
    // every offset up to the horizon stays representable once the last one does
    if last_year.checked_add(horizon).is_none() {
        return Err(ForecastError::InvalidInput(format!(
            "projecting {horizon} years past {last_year} leaves the calendar range"
        )));
    }
    let projections = (1..=horizon)
        .map(|offset| {
            let year = last_year + offset;
            Projection {
                year,
                projected_value: fit.evaluate(year),
            }
        })
        .collect();
    Ok(TrendProjection {
        fit,
        yearly_change_percent,
        direction,
        projections,
    })
}
