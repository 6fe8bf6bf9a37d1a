use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::model::{Channel, Reading, TimedReading};

/// A reading together with its change since the previous row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeltaRow {
    pub timestamp: NaiveDateTime,
    #[serde(flatten)]
    pub reading: Reading,
    /// `None` on the first row.
    pub eb_diff: Option<f64>,
    pub dg_diff: Option<f64>,
}

impl DeltaRow {
    pub fn diff(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Eb => self.eb_diff,
            Channel::Dg => self.dg_diff,
        }
    }
}

/// Consecutive differences per channel over chronologically ordered rows.
pub fn compute_deltas(readings: &[TimedReading]) -> Vec<DeltaRow> {
    let mut previous: Option<&Reading> = None;
    readings
        .iter()
        .map(|t| {
            let row = DeltaRow {
                timestamp: t.timestamp,
                reading: t.reading.clone(),
                eb_diff: previous.map(|p| t.reading.eb_khw - p.eb_khw),
                dg_diff: previous.map(|p| t.reading.dg_khw - p.dg_khw),
            };
            previous = Some(&t.reading);
            row
        })
        .collect()
}
