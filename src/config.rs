//! Analyzer configuration

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::DEFAULT_SHEET;
use crate::error::AnalysisError;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "METER_ANOMALY_CONFIG";

/// How the report is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Worksheet read from workbooks
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// Deltas above mean + `spike_sigma`·σ are spikes
    #[serde(default = "default_spike_sigma")]
    pub spike_sigma: f64,

    /// Deltas above mean + `high_sigma`·σ (and not spikes) are high increases
    #[serde(default = "default_high_sigma")]
    pub high_sigma: f64,

    #[serde(default)]
    pub format: OutputFormat,
}

fn default_sheet_name() -> String {
    DEFAULT_SHEET.to_string()
}

fn default_spike_sigma() -> f64 {
    3.0
}

fn default_high_sigma() -> f64 {
    2.0
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sheet_name: default_sheet_name(),
            spike_sigma: default_spike_sigma(),
            high_sigma: default_high_sigma(),
            format: OutputFormat::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Load from the file named by `METER_ANOMALY_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Both multipliers must be finite and positive, high strictly below spike.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let ok = self.high_sigma.is_finite()
            && self.spike_sigma.is_finite()
            && self.high_sigma > 0.0
            && self.high_sigma < self.spike_sigma;
        if ok {
            Ok(())
        } else {
            Err(AnalysisError::InvalidThresholds {
                high: self.high_sigma,
                spike: self.spike_sigma,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_gives_defaults() {
        let config: AnalyzerConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, AnalyzerConfig::default());
        assert_eq!(config.sheet_name, "Meter Readings - ELECTRICITY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"spike_sigma": 4.0, "format": "json"}"#).unwrap();
        assert_eq!(config.spike_sigma, 4.0);
        assert_eq!(config.high_sigma, 2.0);
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn rejects_inverted_thresholds() {
        let config = AnalyzerConfig {
            high_sigma: 3.0,
            spike_sigma: 2.0,
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(AnalysisError::InvalidThresholds { high: 3.0, spike: 2.0 })
        );
    }

    #[test]
    fn from_file_validates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"high_sigma": 0.0}"#).unwrap();
        assert!(AnalyzerConfig::from_file(&path).is_err());

        std::fs::write(&path, r#"{"sheet_name": "Sheet1"}"#).unwrap();
        let config = AnalyzerConfig::from_file(&path).unwrap();
        assert_eq!(config.sheet_name, "Sheet1");
    }
}
