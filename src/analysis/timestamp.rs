use chrono::NaiveDateTime;

use crate::data::model::{Reading, TimedReading, DATETIME_FORMAT};
use crate::error::AnalysisError;

/// Parse every reading's `Date Time` text and return them in chronological
/// order. Rows sharing a timestamp keep their input order.
///
/// Fails on the first row that doesn't match `%d-%b-%Y %I:%M:%S %p`,
/// reporting that reading's source row.
pub fn parse(readings: Vec<Reading>) -> Result<Vec<TimedReading>, AnalysisError> {
    let mut timed = readings
        .into_iter()
        .map(|reading| {
            let text = reading.datetime_text();
            match NaiveDateTime::parse_from_str(&text, DATETIME_FORMAT) {
                Ok(timestamp) => Ok(TimedReading { timestamp, reading }),
                Err(_) => Err(AnalysisError::Format {
                    row: reading.row,
                    text,
                }),
            }
        })
        .collect::<Result<Vec<_>, _>>()?;

    timed.sort_by_key(|t| t.timestamp);
    Ok(timed)
}
