use std::path::{Path, PathBuf};

use meter_anomaly::analysis::AnomalyFlag;
use meter_anomaly::data::loader::load_file;
use meter_anomaly::data::model::{DEFAULT_SHEET, DG_COLUMN, EB_COLUMN};
use meter_anomaly::{analyze, AnalysisError, AnalyzerConfig};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use tempfile::TempDir;

const HEADERS: [&str; 4] = ["Date", "Time", EB_COLUMN, DG_COLUMN];
const EB: [f64; 4] = [100.0, 105.0, 110.0, 90.0];

const EXPECTED: &str = "\
The following anomalies were identified in the meter readings:

1. **01-Jan-2024 11:00:00**:
   - Negative change in `Meter Reading EB Khw` (-20.00 kWh).
";

/// Four hourly readings from 08:00 AM with an EB rollback on the last one.
/// With `typed` the Date/Time cells are Excel serials with date formats,
/// otherwise plain text.
fn write_workbook(path: &Path, sheet_name: &str, typed: bool) {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(sheet_name).unwrap();

    for (col, header) in HEADERS.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).unwrap();
    }

    let date_format = Format::new().set_num_format("dd-mmm-yyyy");
    let time_format = Format::new().set_num_format("hh:mm:ss AM/PM");
    for (i, eb) in EB.iter().enumerate() {
        let row = i as u32 + 1;
        let hour = 8 + i as u16;
        if typed {
            let date = ExcelDateTime::from_ymd(2024, 1, 1).unwrap();
            let time = ExcelDateTime::from_hms(hour, 0, 0).unwrap();
            sheet.write_datetime_with_format(row, 0, &date, &date_format).unwrap();
            sheet.write_datetime_with_format(row, 1, &time, &time_format).unwrap();
        } else {
            sheet.write_string(row, 0, "01-Jan-2024").unwrap();
            sheet.write_string(row, 1, format!("{hour:02}:00:00 AM")).unwrap();
        }
        sheet.write_number(row, 2, *eb).unwrap();
        sheet.write_number(row, 3, 5.0).unwrap();
    }

    workbook.save(path).unwrap();
}

fn workbook_path(dir: &TempDir, sheet_name: &str, typed: bool) -> PathBuf {
    let path = dir.path().join("readings.xlsx");
    write_workbook(&path, sheet_name, typed);
    path
}

#[test]
fn xlsx_text_cells() {
    let dir = TempDir::new().unwrap();
    let path = workbook_path(&dir, DEFAULT_SHEET, false);

    let rows = load_file(&path, DEFAULT_SHEET).unwrap();
    assert_eq!(rows.len(), 4);
    let report = analyze(rows, &AnalyzerConfig::default()).unwrap();
    assert_eq!(report.anomalies.len(), 1);
    assert_eq!(report.anomalies[0].eb_flag, AnomalyFlag::Negative);
    assert_eq!(report.to_text(), EXPECTED);
}

#[test]
fn xlsx_date_formatted_cells() {
    let dir = TempDir::new().unwrap();
    let path = workbook_path(&dir, DEFAULT_SHEET, true);

    let rows = load_file(&path, DEFAULT_SHEET).unwrap();
    assert_eq!(rows[0].date.as_deref(), Some("01-Jan-2024"));
    assert_eq!(rows[0].time.as_deref(), Some("08:00:00 AM"));

    let report = analyze(rows, &AnalyzerConfig::default()).unwrap();
    assert_eq!(report.rows_analyzed, 4);
    assert_eq!(report.to_text(), EXPECTED);
}

#[test]
fn xlsx_without_electricity_sheet() {
    let dir = TempDir::new().unwrap();
    let path = workbook_path(&dir, "Sheet1", false);

    let err = load_file(&path, DEFAULT_SHEET).unwrap_err();
    assert_eq!(
        err.downcast_ref::<AnalysisError>(),
        Some(&AnalysisError::MissingSheet(DEFAULT_SHEET.to_string()))
    );
    assert_eq!(
        err.to_string(),
        "worksheet 'Meter Readings - ELECTRICITY' not found"
    );

    // A custom sheet name reaches the same data.
    assert_eq!(load_file(&path, "Sheet1").unwrap().len(), 4);
}
