//! Meter reading anomaly detection for EB (grid) and DG (diesel generator)
//! channels: load a sheet, difference consecutive readings, flag rollbacks
//! and statistically extreme increases.

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use analysis::analyze;
pub use config::{AnalyzerConfig, OutputFormat};
pub use error::AnalysisError;
pub use report::AnomalyReport;
