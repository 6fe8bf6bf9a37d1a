//! Anomaly analysis over cleaned meter readings.
//!
//! ```text
//!   Vec<RawRow>
//!        │  retain_complete, deduplicate        (data::filter)
//!        ▼
//!   Vec<Reading>
//!        │  parse → chronological order         (timestamp)
//!        ▼
//!   Vec<TimedReading>
//!        │  compute_deltas                      (delta)
//!        ▼
//!   Vec<DeltaRow>
//!        │  classify: negative / spike / high   (classify)
//!        ▼
//!   AnomalyReport
//! ```

mod classify;
mod delta;
mod timestamp;

pub use classify::{
    classify, flag_delta, AnomalyFlag, ChannelStats, Classification, FlaggedRow, Thresholds,
};
pub use delta::{compute_deltas, DeltaRow};
pub use timestamp::parse;

use crate::config::AnalyzerConfig;
use crate::data::filter::{deduplicate, retain_complete};
use crate::data::model::RawRow;
use crate::error::AnalysisError;
use crate::report::AnomalyReport;

impl From<&AnalyzerConfig> for Thresholds {
    fn from(config: &AnalyzerConfig) -> Self {
        Self {
            high_sigma: config.high_sigma,
            spike_sigma: config.spike_sigma,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::from(&AnalyzerConfig::default())
    }
}

/// Run the whole pipeline over freshly loaded rows.
pub fn analyze(rows: Vec<RawRow>, config: &AnalyzerConfig) -> Result<AnomalyReport, AnalysisError> {
    config.validate()?;

    let rows_loaded = rows.len();
    let complete = retain_complete(rows);
    let rows_complete = complete.len();
    let readings = deduplicate(complete);
    let duplicates_removed = rows_complete - readings.len();
    log::info!(
        "{rows_loaded} rows loaded, {} incomplete, {duplicates_removed} duplicates removed",
        rows_loaded - rows_complete
    );

    let timed = parse(readings)?;
    let deltas = compute_deltas(&timed);
    let classification = classify(&deltas, Thresholds::from(config));
    log::info!(
        "{} of {} readings flagged",
        classification.flagged.len(),
        timed.len()
    );

    Ok(AnomalyReport {
        rows_loaded,
        rows_analyzed: timed.len(),
        duplicates_removed,
        eb_stats: classification.eb_stats,
        dg_stats: classification.dg_stats,
        anomalies: classification.flagged,
    })
}
