use thiserror::Error;

/// Failures raised by the analysis pipeline itself (as opposed to I/O,
/// which is reported through `anyhow` with context).
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// A `Date` + `Time` pair did not match `%d-%b-%Y %I:%M:%S %p`.
    /// `row` is the 1-based data row of the source file, header excluded.
    #[error("data row {row}: cannot parse timestamp '{text}'")]
    Format { row: usize, text: String },

    #[error("required column '{0}' not found")]
    MissingColumn(String),

    #[error("worksheet '{0}' not found")]
    MissingSheet(String),

    #[error("invalid thresholds: high ({high}σ) must be positive and below spike ({spike}σ)")]
    InvalidThresholds { high: f64, spike: f64 },
}
