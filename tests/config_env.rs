use meter_anomaly::config::CONFIG_ENV;
use meter_anomaly::{AnalyzerConfig, OutputFormat};
use tempfile::TempDir;

// Single test so nothing else in this binary races on the variable.
#[test]
fn load_follows_config_env() {
    std::env::remove_var(CONFIG_ENV);
    assert_eq!(AnalyzerConfig::load().unwrap(), AnalyzerConfig::default());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("meter.json");
    std::fs::write(
        &path,
        r#"{"sheet_name": "Site B", "spike_sigma": 4.0, "format": "json"}"#,
    )
    .unwrap();
    std::env::set_var(CONFIG_ENV, &path);
    let config = AnalyzerConfig::load().unwrap();
    assert_eq!(config.sheet_name, "Site B");
    assert_eq!(config.spike_sigma, 4.0);
    assert_eq!(config.high_sigma, 2.0);
    assert_eq!(config.format, OutputFormat::Json);

    std::env::set_var(CONFIG_ENV, dir.path().join("missing.json"));
    assert!(AnalyzerConfig::load().is_err());

    std::fs::write(&path, r#"{"spike_sigma": 1.5}"#).unwrap();
    std::env::set_var(CONFIG_ENV, &path);
    assert!(AnalyzerConfig::load().is_err());

    std::env::remove_var(CONFIG_ENV);
}
