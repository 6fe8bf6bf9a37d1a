use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use calamine::{open_workbook_auto, Data, DataType as _, Reader};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{
    RawRow, DATE_COLUMN, DATE_FORMAT, DG_COLUMN, EB_COLUMN, TIME_COLUMN, TIME_FORMAT,
};
use crate::error::AnalysisError;

const REQUIRED_COLUMNS: [&str; 4] = [DATE_COLUMN, TIME_COLUMN, EB_COLUMN, DG_COLUMN];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load meter rows from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xls` / `.ods` – workbook, rows read from `sheet`
/// * `.csv`     – header row with the four reading columns
/// * `.json`    – `[{ "Date": ..., "Time": ..., "Meter Reading EB Khw": ..., ... }, ...]`
/// * `.parquet` – `Date` / `Time` string columns plus numeric reading columns
///
/// `sheet` is only consulted for workbooks.
pub fn load_file(path: &Path, sheet: &str) -> Result<Vec<RawRow>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(path, sheet)?,
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::debug!("loaded {} raw rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn column_index(headers: &[String], name: &str) -> Result<usize, AnalysisError> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

/// First row of the sheet is the header; column order is free.
/// Date and time cells formatted as Excel dates are rendered back into the
/// fixed `%d-%b-%Y` / `%I:%M:%S %p` text so they parse like text cells.
fn load_workbook(path: &Path, sheet: &str) -> Result<Vec<RawRow>> {
    let mut workbook = open_workbook_auto(path).context("opening workbook")?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(AnalysisError::MissingSheet(sheet.to_string()).into());
    }
    let range = workbook
        .worksheet_range(sheet)
        .with_context(|| format!("reading worksheet '{sheet}'"))?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| header.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();

    let [date_idx, time_idx, eb_idx, dg_idx] =
        REQUIRED_COLUMNS.map(|name| column_index(&headers, name));
    let (date_idx, time_idx, eb_idx, dg_idx) = (date_idx?, time_idx?, eb_idx?, dg_idx?);

    Ok(rows
        .map(|row| RawRow {
            date: row.get(date_idx).and_then(|c| cell_text(c, CellKind::Date)),
            time: row.get(time_idx).and_then(|c| cell_text(c, CellKind::Time)),
            eb_khw: row.get(eb_idx).and_then(|c| c.as_f64()),
            dg_khw: row.get(dg_idx).and_then(|c| c.as_f64()),
        })
        .collect())
}

/// Which half of the timestamp a workbook cell holds.
#[derive(Debug, Clone, Copy)]
enum CellKind {
    Date,
    Time,
}

/// Text of a `Date` / `Time` cell. Typed cells (Excel serials, ODS ISO dates
/// and durations) are rendered in the fixed layout; anything unreadable is
/// kept as text so it fails parsing instead of vanishing.
fn cell_text(cell: &Data, kind: CellKind) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => Some(s.clone()),
        Data::DateTime(_) | Data::DateTimeIso(_) | Data::DurationIso(_) => {
            let rendered = match kind {
                CellKind::Date => cell.as_date().map(|d| d.format(DATE_FORMAT).to_string()),
                CellKind::Time => cell.as_time().map(|t| t.format(TIME_FORMAT).to_string()),
            };
            Some(rendered.unwrap_or_else(|| cell.to_string()))
        }
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names; extra columns are ignored and
/// empty cells load as missing values.
fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    for name in REQUIRED_COLUMNS {
        column_index(&headers, name)?;
    }

    reader
        .deserialize::<RawRow>()
        .enumerate()
        .map(|(row_no, result)| result.with_context(|| format!("CSV row {row_no}")))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "Date": "05-Jan-2024",
///     "Time": "08:30:00 AM",
///     "Meter Reading EB Khw": 1520.5,
///     "Meter Reading DG Khw": 12.0
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    if let Some(first) = records.first() {
        let obj = first.as_object().context("Row 0 is not a JSON object")?;
        for name in REQUIRED_COLUMNS {
            if !obj.contains_key(name) {
                return Err(AnalysisError::MissingColumn(name.to_string()).into());
            }
        }
    }

    records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            serde_json::from_value::<RawRow>(rec.clone())
                .with_context(|| format!("Row {i} is not a meter record"))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of meter readings.
///
/// Expected schema:
/// - `Date`, `Time`: Utf8 or LargeUtf8
/// - `Meter Reading EB Khw`, `Meter Reading DG Khw`: any numeric type
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let dates = extract_strings(column(&batch, DATE_COLUMN)?)
            .with_context(|| format!("reading '{DATE_COLUMN}'"))?;
        let times = extract_strings(column(&batch, TIME_COLUMN)?)
            .with_context(|| format!("reading '{TIME_COLUMN}'"))?;
        let eb = extract_f64(column(&batch, EB_COLUMN)?)
            .with_context(|| format!("reading '{EB_COLUMN}'"))?;
        let dg = extract_f64(column(&batch, DG_COLUMN)?)
            .with_context(|| format!("reading '{DG_COLUMN}'"))?;

        rows.extend(
            dates
                .into_iter()
                .zip(times)
                .zip(eb.into_iter().zip(dg))
                .map(|((date, time), (eb_khw, dg_khw))| RawRow {
                    date,
                    time,
                    eb_khw,
                    dg_khw,
                }),
        );
    }

    Ok(rows)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef, AnalysisError> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| AnalysisError::MissingColumn(name.to_string()))?;
    Ok(batch.column(idx))
}

fn extract_strings(col: &ArrayRef) -> Result<Vec<Option<String>>> {
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => {}
        other => bail!("Expected string column, got {other:?}"),
    }
    let utf8 = cast(col.as_ref(), &DataType::Utf8).context("casting to Utf8")?;
    Ok(utf8
        .as_string::<i32>()
        .iter()
        .map(|v| v.map(str::to_string))
        .collect())
}

fn extract_f64(col: &ArrayRef) -> Result<Vec<Option<f64>>> {
    if !col.data_type().is_numeric() {
        bail!("Expected numeric column, got {:?}", col.data_type());
    }
    let floats = cast(col.as_ref(), &DataType::Float64).context("casting to Float64")?;
    Ok(floats.as_primitive::<Float64Type>().iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::retain_complete;

    #[test]
    fn ods_typed_cells_render_in_fixed_layout() {
        let date = Data::DateTimeIso("2024-01-05".to_string());
        let time = Data::DurationIso("PT08H30M00S".to_string());
        assert_eq!(cell_text(&date, CellKind::Date).as_deref(), Some("05-Jan-2024"));
        assert_eq!(cell_text(&time, CellKind::Time).as_deref(), Some("08:30:00 AM"));

        let kept = retain_complete(vec![RawRow {
            date: cell_text(&date, CellKind::Date),
            time: cell_text(&time, CellKind::Time),
            eb_khw: Some(100.0),
            dg_khw: Some(2.0),
        }]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].datetime_text(), "05-Jan-2024 08:30:00 AM");
    }

    #[test]
    fn iso_datetime_cell_splits_into_date_and_time() {
        let cell = Data::DateTimeIso("2024-03-10T14:05:00".to_string());
        assert_eq!(cell_text(&cell, CellKind::Date).as_deref(), Some("10-Mar-2024"));
        assert_eq!(cell_text(&cell, CellKind::Time).as_deref(), Some("02:05:00 PM"));
    }

    #[test]
    fn unreadable_typed_cell_is_kept_as_text() {
        let cell = Data::DateTimeIso("not a date".to_string());
        assert_eq!(cell_text(&cell, CellKind::Date).as_deref(), Some("not a date"));
        assert_eq!(cell_text(&Data::Empty, CellKind::Time), None);
    }
}
