use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use meter_anomaly::data::loader::load_file;
use meter_anomaly::{analyze, AnalyzerConfig, OutputFormat};

fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Failed to analyze file: {e:#}");
            eprintln!("Error: cannot process file: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let path: PathBuf = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .context("usage: meter-anomaly <readings.xlsx|csv|json|parquet>")?;

    let config = AnalyzerConfig::load()?;
    let rows = load_file(&path, &config.sheet_name)
        .with_context(|| format!("loading {}", path.display()))?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());

    let report = analyze(rows, &config)?;
    match config.format {
        OutputFormat::Text => println!("{}", report.to_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
