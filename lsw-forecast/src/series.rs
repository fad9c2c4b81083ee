//! Reconciliation of heterogeneous record batches into one chronological series.
//!
//! Upstream delivers a lake's surface-area history in several overlapping
//! batches: explicit historical actuals, explicit future predictions and a
//! supplementary "timeseries" overlay re-fetched from the unified endpoint.
//! [`reconcile`] merges them into a [`Series`]: one sample per date, the
//! highest-precedence batch winning each date, ascending by date.

use crate::error::Result;
use crate::sample::{RawRecord, Sample, SampleKind};
use chrono::{Datelike, NaiveDate};
use csv::Writer;
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::io::Write;

/// Source-batch precedence for duplicate dates, strongest first.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash, Serialize)]
pub enum Precedence {
    Historical,
    Future,
    Overlay,
}

/// One upstream batch of raw records with its precedence.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub precedence: Precedence,
    pub records: Vec<RawRecord>,
}

impl Batch {
    pub fn new(precedence: Precedence, records: Vec<RawRecord>) -> Self {
        Batch {
            precedence,
            records,
        }
    }

    /// Re-wrap an already reconciled series as a batch.
    pub fn from_series(series: &Series, precedence: Precedence) -> Self {
        Batch {
            precedence,
            records: series.iter().map(RawRecord::from).collect(),
        }
    }
}

/// Samples unique by date, ascending. Only [`reconcile`] builds one.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Series(Vec<Sample>);

/// Merge `batches` into a single series.
///
/// Records are visited batch by batch in precedence order (batches of equal
/// precedence keep their input order). The first valid record seen for a
/// date wins. Records with an unparsable date or no value are dropped.
pub fn reconcile(batches: &[Batch]) -> Series {
    let mut ordered: Vec<&Batch> = batches.iter().collect();
    ordered.sort_by_key(|batch| batch.precedence);

    let mut seen: HashSet<NaiveDate> = HashSet::new();
    let mut samples: Vec<Sample> = Vec::new();
    let mut dropped = 0usize;
    for batch in ordered {
        for record in &batch.records {
            match Sample::try_from(record) {
                Ok(sample) => {
                    if seen.insert(sample.date) {
                        samples.push(sample);
                    }
                }
                Err(reason) => {
                    dropped += 1;
                    debug!(
                        "Dropping {:?} record {:?}: {:?}",
                        batch.precedence, record.date, reason
                    );
                }
            }
        }
    }
    samples.sort_by_key(|sample| sample.date);
    if dropped > 0 {
        debug!("Reconciled {} samples, dropped {} malformed", samples.len(), dropped);
    }
    Series(samples)
}

impl Series {
    pub fn samples(&self) -> &[Sample] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Sample> {
        self.0.iter()
    }

    pub fn of_kind(&self, kind: SampleKind) -> impl Iterator<Item = &Sample> {
        self.0.iter().filter(move |sample| sample.kind() == kind)
    }

    /// Measured values in date order.
    pub fn actual_values(&self) -> Vec<f64> {
        self.0.iter().filter_map(Sample::actual).collect()
    }

    /// Predicted values in date order.
    pub fn predicted_values(&self) -> Vec<f64> {
        self.0.iter().filter_map(Sample::predicted).collect()
    }

    /// The most recent historical sample.
    pub fn latest_actual(&self) -> Option<&Sample> {
        self.0.iter().rev().find(|sample| sample.actual().is_some())
    }

    /// Historical actuals averaged per calendar year, ascending by year.
    pub fn yearly_actuals(&self) -> Vec<(i32, f64)> {
        let mut by_year: BTreeMap<i32, (f64, usize)> = BTreeMap::new();
        for sample in &self.0 {
            if let Some(actual) = sample.actual() {
                let entry = by_year.entry(sample.date.year()).or_insert((0.0, 0));
                entry.0 += actual;
                entry.1 += 1;
            }
        }
        by_year
            .into_iter()
            .map(|(year, (sum, count))| (year, sum / count as f64))
            .collect()
    }

    /// Percentage change from the first to the last historical actual.
    pub fn change_percent(&self) -> Option<f64> {
        let actuals = self.actual_values();
        match (actuals.first(), actuals.last()) {
            (Some(&first), Some(&last)) if actuals.len() >= 2 && first != 0.0 => {
                Some((last - first) / first * 100.0)
            }
            _ => None,
        }
    }

    /// Write the series as CSV: `date,kind,actual,predicted,confidence`.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = Writer::from_writer(writer);
        wtr.write_record(["date", "kind", "actual", "predicted", "confidence"])?;
        for sample in &self.0 {
            let kind = sample.kind().as_str();
            let date = lsw_utils::dates::format_date(&sample.date);
            let actual = sample.actual().map(|v| v.to_string()).unwrap_or_default();
            let predicted = sample.predicted().map(|v| v.to_string()).unwrap_or_default();
            let confidence = sample.confidence.map(|c| c.as_str()).unwrap_or_default();
            wtr.write_record([date.as_str(), kind, actual.as_str(), predicted.as_str(), confidence])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Sample;
    type IntoIter = std::slice::Iter<'a, Sample>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
