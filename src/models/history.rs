//! Measurement history aggregation and trend computation.
//!
//! A history is a pure projection of one query snapshot: it normalizes
//! ordering and answers the questions the frontend charts ask (series,
//! recent window, latest-vs-previous deltas). Input records are never
//! mutated, and recomputing over the same snapshot yields identical
//! output.

use crate::metrics::round_to_tenth;
use crate::models::measurement::{MeasurementKind, MeasurementRecord};

/// One user's measurement records, normalized to ascending `timestamp`
/// order.
#[derive(Debug, Clone, Default)]
pub struct MeasurementHistory {
    ascending: Vec<MeasurementRecord>,
}

impl MeasurementHistory {
    /// Default recent-window length for compact trend charts.
    pub const RECENT_WINDOW: usize = 7;

    /// Normalize a snapshot into ascending order.
    ///
    /// The sort is stable: records with equal timestamps keep the
    /// snapshot's own order (the store's native document order), in both
    /// the ascending and descending views.
    pub fn from_snapshot(mut records: Vec<MeasurementRecord>) -> MeasurementHistory {
        records.sort_by_key(|record| record.timestamp);
        MeasurementHistory { ascending: records }
    }

    pub fn len(&self) -> usize {
        self.ascending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ascending.is_empty()
    }

    /// Oldest-first view, for charting trend over time.
    pub fn ascending(&self) -> &[MeasurementRecord] {
        &self.ascending
    }

    /// Most-recent-first view, for tabular display.
    pub fn descending(&self) -> Vec<MeasurementRecord> {
        let mut records = self.ascending.clone();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }

    /// Last `n` records of the ascending view (all of them if fewer).
    pub fn recent_window(&self, n: usize) -> &[MeasurementRecord] {
        let start = self.ascending.len().saturating_sub(n);
        &self.ascending[start..]
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&MeasurementRecord> {
        self.ascending.last()
    }

    /// Whether a trend line can be drawn at all. A single point is
    /// "insufficient data", not a chart.
    pub fn has_chart_data(&self) -> bool {
        self.ascending.len() >= 2
    }

    /// Change between the two most recent records for one metric.
    ///
    /// `NoData` when fewer than two records exist or either of the two
    /// latest lacks a value for the metric — never a fabricated zero.
    pub fn progress_indicator(&self, metric: Metric) -> ProgressIndicator {
        let n = self.ascending.len();
        if n < 2 {
            return ProgressIndicator::NoData;
        }

        let latest = metric.value_in(&self.ascending[n - 1]);
        let previous = metric.value_in(&self.ascending[n - 2]);
        let (Some(latest), Some(previous)) = (latest, previous) else {
            return ProgressIndicator::NoData;
        };

        // Classify on the raw difference; the reported delta is rounded
        // for display.
        let difference = latest - previous;
        if difference > 0.0 {
            ProgressIndicator::Increase(round_to_tenth(difference))
        } else if difference < 0.0 {
            ProgressIndicator::Decrease(round_to_tenth(difference))
        } else {
            ProgressIndicator::Unchanged
        }
    }
}

/// A trackable metric: a measurement kind, or the derived BMI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Kind(MeasurementKind),
    Bmi,
}

impl Metric {
    /// All metrics in display order: the 15 kinds, then BMI.
    pub fn all() -> impl Iterator<Item = Metric> {
        MeasurementKind::ALL
            .into_iter()
            .map(Metric::Kind)
            .chain(std::iter::once(Metric::Bmi))
    }

    /// Wire/display key ("weight", ..., "bmi").
    pub fn key(&self) -> &'static str {
        match self {
            Metric::Kind(kind) => kind.as_str(),
            Metric::Bmi => "bmi",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Metric::Kind(kind) => kind.label(),
            Metric::Bmi => "BMI",
        }
    }

    /// Display unit; BMI is dimensionless.
    pub fn unit(&self) -> &'static str {
        match self {
            Metric::Kind(kind) => kind.unit(),
            Metric::Bmi => "",
        }
    }

    /// This metric's value in a record, if recorded.
    pub fn value_in(&self, record: &MeasurementRecord) -> Option<f64> {
        match self {
            Metric::Kind(kind) => record.value(*kind),
            Metric::Bmi => record.bmi,
        }
    }
}

/// Latest-vs-previous change classification for one metric.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressIndicator {
    /// Fewer than two usable data points
    NoData,
    /// Value rose by the contained delta (1 decimal)
    Increase(f64),
    /// Value fell by the contained delta (negative, 1 decimal)
    Decrease(f64),
    Unchanged,
}
