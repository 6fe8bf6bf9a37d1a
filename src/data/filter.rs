use std::collections::HashSet;

use super::model::{RawRow, Reading};

// ---------------------------------------------------------------------------
// Completeness filter
// ---------------------------------------------------------------------------

/// Keep only rows that can be analysed, converting them to [`Reading`]s.
///
/// A row is dropped when:
/// * its `Date` or `Time` cell is blank
/// * its EB reading is missing or zero (meter not read that slot)
/// * its DG reading is missing
pub fn retain_complete(rows: Vec<RawRow>) -> Vec<Reading> {
    let total = rows.len();
    let kept: Vec<Reading> = rows
        .into_iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let reading = to_reading(row).map(|r| r.at_row(i + 1));
            if reading.is_none() {
                log::debug!("dropping incomplete data row {}", i + 1);
            }
            reading
        })
        .collect();

    log::debug!("kept {} of {total} rows after completeness filter", kept.len());
    kept
}

fn to_reading(row: RawRow) -> Option<Reading> {
    let date = non_blank(row.date)?;
    let time = non_blank(row.time)?;
    let eb = row.eb_khw.filter(|v| v.is_finite() && *v != 0.0)?;
    let dg = row.dg_khw.filter(|v| v.is_finite())?;
    Some(Reading::new(date, time, eb, dg))
}

fn non_blank(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !s.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Duplicate removal
// ---------------------------------------------------------------------------

/// Remove exact duplicate rows, keeping the first occurrence in place.
/// Only cell contents are compared, not the source row.
pub fn deduplicate(readings: Vec<Reading>) -> Vec<Reading> {
    let mut seen: HashSet<(String, String, u64, u64)> = HashSet::with_capacity(readings.len());
    readings
        .into_iter()
        .filter(|r| {
            seen.insert((
                r.date.clone(),
                r.time.clone(),
                r.eb_khw.to_bits(),
                r.dg_khw.to_bits(),
            ))
        })
        .collect()
}
