use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names of the electricity sheet
// ---------------------------------------------------------------------------

pub const DATE_COLUMN: &str = "Date";
pub const TIME_COLUMN: &str = "Time";
pub const EB_COLUMN: &str = "Meter Reading EB Khw";
pub const DG_COLUMN: &str = "Meter Reading DG Khw";

/// Sheet holding the electricity readings in the site workbooks.
pub const DEFAULT_SHEET: &str = "Meter Readings - ELECTRICITY";

/// Fixed `Date` + `Time` layout, e.g. `05-Jan-2024 08:30:00 AM`.
pub const DATETIME_FORMAT: &str = "%d-%b-%Y %I:%M:%S %p";
pub const DATE_FORMAT: &str = "%d-%b-%Y";
pub const TIME_FORMAT: &str = "%I:%M:%S %p";

// ---------------------------------------------------------------------------
// Channel – which meter a value belongs to
// ---------------------------------------------------------------------------

/// The two metered supplies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    /// Electricity board (grid).
    Eb,
    /// Diesel generator.
    Dg,
}

impl Channel {
    pub const ALL: [Channel; 2] = [Channel::Eb, Channel::Dg];

    /// Source column the channel is read from.
    pub fn column(self) -> &'static str {
        match self {
            Channel::Eb => EB_COLUMN,
            Channel::Dg => DG_COLUMN,
        }
    }
}

// ---------------------------------------------------------------------------
// RawRow – one sheet row exactly as loaded
// ---------------------------------------------------------------------------

/// A row as read from the source file. Any cell may be blank.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Time", default)]
    pub time: Option<String>,
    #[serde(rename = "Meter Reading EB Khw", default)]
    pub eb_khw: Option<f64>,
    #[serde(rename = "Meter Reading DG Khw", default)]
    pub dg_khw: Option<f64>,
}

// ---------------------------------------------------------------------------
// Reading – a complete row, ready for analysis
// ---------------------------------------------------------------------------

/// A complete meter reading. Timestamp text is kept as found in the sheet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    /// 1-based data row in the source file (header excluded); 0 if unknown.
    pub row: usize,
    pub date: String,
    pub time: String,
    pub eb_khw: f64,
    pub dg_khw: f64,
}

impl Reading {
    pub fn new(date: impl Into<String>, time: impl Into<String>, eb_khw: f64, dg_khw: f64) -> Self {
        Self {
            row: 0,
            date: date.into(),
            time: time.into(),
            eb_khw,
            dg_khw,
        }
    }

    pub fn at_row(mut self, row: usize) -> Self {
        self.row = row;
        self
    }

    /// The combined `Date Time` text that gets parsed.
    pub fn datetime_text(&self) -> String {
        format!("{} {}", self.date.trim(), self.time.trim())
    }
}

/// A reading with its parsed timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedReading {
    pub timestamp: NaiveDateTime,
    #[serde(flatten)]
    pub reading: Reading,
}
