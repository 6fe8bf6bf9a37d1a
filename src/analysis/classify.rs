use chrono::NaiveDateTime;
use serde::Serialize;

use super::delta::DeltaRow;
use crate::data::model::Channel;

// ---------------------------------------------------------------------------
// Per-channel statistics
// ---------------------------------------------------------------------------

/// Mean and sample standard deviation of one channel's defined deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChannelStats {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two deltas (Bessel's correction undefined).
    pub std_dev: Option<f64>,
}

impl ChannelStats {
    /// `None` when the channel has no defined deltas.
    pub fn from_deltas(deltas: &[f64]) -> Option<Self> {
        if deltas.is_empty() {
            return None;
        }
        let n = deltas.len() as f64;
        let mean = deltas.iter().sum::<f64>() / n;
        let std_dev = (deltas.len() > 1).then(|| {
            let sq_diff: f64 = deltas.iter().map(|v| (v - mean).powi(2)).sum();
            (sq_diff / (n - 1.0)).sqrt()
        });
        Some(Self {
            count: deltas.len(),
            mean,
            std_dev,
        })
    }

    /// `mean + sigmas·σ`, when σ is defined.
    pub fn threshold(&self, sigmas: f64) -> Option<f64> {
        self.std_dev.map(|sd| self.mean + sigmas * sd)
    }
}

// ---------------------------------------------------------------------------
// Flags
// ---------------------------------------------------------------------------

/// Classification of one channel's delta on one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyFlag {
    Normal,
    /// Reading went down: rollback or misread.
    Negative,
    /// Above mean + spike σ.
    Spike,
    /// Above mean + high σ, not a spike.
    HighIncrease,
}

impl AnomalyFlag {
    pub fn is_anomaly(self) -> bool {
        self != AnomalyFlag::Normal
    }
}

/// σ multipliers for the two increase tiers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub high_sigma: f64,
    pub spike_sigma: f64,
}

/// Flag a single delta. Negative wins, then spike, then high.
pub fn flag_delta(delta: Option<f64>, stats: Option<&ChannelStats>, thresholds: Thresholds) -> AnomalyFlag {
    let Some(delta) = delta else {
        return AnomalyFlag::Normal;
    };
    if delta < 0.0 {
        return AnomalyFlag::Negative;
    }
    let Some(stats) = stats else {
        return AnomalyFlag::Normal;
    };
    match (stats.threshold(thresholds.spike_sigma), stats.threshold(thresholds.high_sigma)) {
        (Some(spike), _) if delta > spike => AnomalyFlag::Spike,
        (_, Some(high)) if delta > high => AnomalyFlag::HighIncrease,
        _ => AnomalyFlag::Normal,
    }
}

// ---------------------------------------------------------------------------
// Row classification
// ---------------------------------------------------------------------------

/// A row with at least one flagged channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlaggedRow {
    pub timestamp: NaiveDateTime,
    pub eb_diff: Option<f64>,
    pub dg_diff: Option<f64>,
    pub eb_flag: AnomalyFlag,
    pub dg_flag: AnomalyFlag,
}

impl FlaggedRow {
    pub fn diff(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::Eb => self.eb_diff,
            Channel::Dg => self.dg_diff,
        }
    }

    pub fn flag(&self, channel: Channel) -> AnomalyFlag {
        match channel {
            Channel::Eb => self.eb_flag,
            Channel::Dg => self.dg_flag,
        }
    }
}

/// Result of [`classify`]: channel statistics plus the flagged rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub eb_stats: Option<ChannelStats>,
    pub dg_stats: Option<ChannelStats>,
    pub flagged: Vec<FlaggedRow>,
}

fn channel_stats(rows: &[DeltaRow], channel: Channel) -> Option<ChannelStats> {
    let deltas: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.diff(channel))
        .filter(|d| d.is_finite())
        .collect();
    ChannelStats::from_deltas(&deltas)
}

/// Flag every row whose EB or DG delta is negative or extreme, returning
/// each such row once, ordered by timestamp.
pub fn classify(rows: &[DeltaRow], thresholds: Thresholds) -> Classification {
    let eb_stats = channel_stats(rows, Channel::Eb);
    let dg_stats = channel_stats(rows, Channel::Dg);

    let mut flagged: Vec<FlaggedRow> = rows
        .iter()
        .filter_map(|r| {
            let eb_flag = flag_delta(r.eb_diff, eb_stats.as_ref(), thresholds);
            let dg_flag = flag_delta(r.dg_diff, dg_stats.as_ref(), thresholds);
            (eb_flag.is_anomaly() || dg_flag.is_anomaly()).then(|| FlaggedRow {
                timestamp: r.timestamp,
                eb_diff: r.eb_diff,
                dg_diff: r.dg_diff,
                eb_flag,
                dg_flag,
            })
        })
        .collect();
    flagged.sort_by_key(|f| f.timestamp);

    log::debug!(
        "EB stats {eb_stats:?}, DG stats {dg_stats:?}, {} rows flagged",
        flagged.len()
    );

    Classification {
        eb_stats,
        dg_stats,
        flagged,
    }
}
