//! Forecast data analytics for lake surface-water monitoring.
//!
//! Raw record batches are reconciled into a [`series::Series`], from which
//! four independent views are derived: descriptive [`statistics`], a linear
//! [`trend`] projection, percentile [`risk`] banding and cloud-cover
//! [`quality`] scoring. Everything here is synchronous and pure; the only
//! I/O lives in [`client`] behind the `api` feature.

pub mod analysis;
#[cfg(feature = "api")]
pub mod client;
pub mod confidence;
pub mod config;
pub mod error;
pub mod payload;
pub mod quality;
pub mod risk;
pub mod sample;
pub mod selection;
pub mod series;
pub mod statistics;
pub mod trend;

pub use error::{ForecastError, Result};
