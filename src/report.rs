use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::{AnomalyFlag, ChannelStats, FlaggedRow};
use crate::data::model::Channel;

pub const NO_ANOMALIES: &str = "No anomalies detected.";
const HEADER: &str = "The following anomalies were identified in the meter readings:";
const TIMESTAMP_FORMAT: &str = "%d-%b-%Y %H:%M:%S";

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnomalyReport {
    pub rows_loaded: usize,
    pub rows_analyzed: usize,
    pub duplicates_removed: usize,
    pub eb_stats: Option<ChannelStats>,
    pub dg_stats: Option<ChannelStats>,
    pub anomalies: Vec<FlaggedRow>,
}

impl AnomalyReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn to_text(&self) -> String {
        summarize(&self.anomalies)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing report")
    }
}

/// Render flagged rows as a numbered list, one bullet per flagged channel.
///
/// ```text
/// The following anomalies were identified in the meter readings:
///
/// 1. **05-Jan-2024 14:00:00**:
///    - Negative change in `Meter Reading EB Khw` (-20.00 kWh).
/// ```
pub fn summarize(flagged: &[FlaggedRow]) -> String {
    if flagged.is_empty() {
        return NO_ANOMALIES.to_string();
    }

    let mut out = String::from(HEADER);
    out.push('\n');
    for (i, row) in flagged.iter().enumerate() {
        out.push_str(&format!(
            "\n{}. **{}**:\n",
            i + 1,
            row.timestamp.format(TIMESTAMP_FORMAT)
        ));
        for channel in Channel::ALL {
            if let (Some(text), Some(diff)) = (describe(row.flag(channel)), row.diff(channel)) {
                out.push_str(&format!("   - {text} `{}` ({diff:.2} kWh).\n", channel.column()));
            }
        }
    }
    out
}

fn describe(flag: AnomalyFlag) -> Option<&'static str> {
    match flag {
        AnomalyFlag::Normal => None,
        AnomalyFlag::Negative => Some("Negative change in"),
        AnomalyFlag::Spike => Some("Unusually high increase in"),
        AnomalyFlag::HighIncrease => Some("High increase in"),
    }
}
