use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use meter_anomaly::data::model::{
    DATE_COLUMN, DATE_FORMAT, DG_COLUMN, EB_COLUMN, TIME_COLUMN, TIME_FORMAT,
};
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in `[lo, hi)`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

/// Readings taken every 6 hours for 30 days.
const READINGS: usize = 4 * 30;
const ROLLBACK_AT: usize = 47;
const SURGE_AT: usize = 83;

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let start = NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(6, 0, 0))
        .context("invalid start timestamp")?;

    let mut dates: Vec<String> = Vec::with_capacity(READINGS + 1);
    let mut times: Vec<String> = Vec::with_capacity(READINGS + 1);
    let mut eb: Vec<f64> = Vec::with_capacity(READINGS + 1);
    let mut dg: Vec<f64> = Vec::with_capacity(READINGS + 1);

    let mut eb_meter = 15_000.0;
    let mut dg_meter = 320.0;
    for i in 0..READINGS {
        let at = start + Duration::hours(6 * i as i64);

        eb_meter += match i {
            SURGE_AT => 400.0,
            _ => rng.uniform(30.0, 45.0),
        };
        // Generator only runs during occasional outages.
        if rng.next_f64() < 0.2 {
            dg_meter += rng.uniform(2.0, 8.0);
        }
        let eb_value = if i == ROLLBACK_AT { eb_meter - 150.0 } else { eb_meter };

        dates.push(at.format(DATE_FORMAT).to_string());
        times.push(at.format(TIME_FORMAT).to_string());
        eb.push((eb_value * 10.0).round() / 10.0);
        dg.push((dg_meter * 10.0).round() / 10.0);

        // Same slot entered twice in the log.
        if i == 10 {
            dates.push(dates[dates.len() - 1].clone());
            times.push(times[times.len() - 1].clone());
            eb.push(eb[eb.len() - 1]);
            dg.push(dg[dg.len() - 1]);
        }
    }

    let schema = Arc::new(Schema::new(vec![
        Field::new(DATE_COLUMN, DataType::Utf8, false),
        Field::new(TIME_COLUMN, DataType::Utf8, false),
        Field::new(EB_COLUMN, DataType::Float64, true),
        Field::new(DG_COLUMN, DataType::Float64, true),
    ]));

    let n_rows = eb.len();
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(dates)),
            Arc::new(StringArray::from(times)),
            Arc::new(Float64Array::from(eb)),
            Arc::new(Float64Array::from(dg)),
        ],
    )
    .context("building record batch")?;

    // Write Parquet
    let output_path = "sample_readings.parquet";
    let file = std::fs::File::create(output_path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing writer")?;

    println!("Wrote {n_rows} meter readings to {output_path}");
    Ok(())
}
