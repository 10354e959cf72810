//! CSV export of sampled level curves.

use crate::{EstimatedLevelPoint, Result};
use chrono::{DateTime, Utc};
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow {
    at: String,
    level_mg: f64,
    projected: bool,
}

impl CsvRow {
    fn new(point: &EstimatedLevelPoint, now: DateTime<Utc>) -> Self {
        CsvRow {
            at: point.at.to_rfc3339(),
            level_mg: point.level_mg,
            projected: point.at > now,
        }
    }
}

/// Write `points` to `path` as CSV, flagging those after `now` as projected.
///
/// Overwrites any existing file. Returns the number of rows written.
pub fn write_curve_csv<'a, I>(path: &Path, points: I, now: DateTime<Utc>) -> Result<usize>
where
    I: IntoIterator<Item = &'a EstimatedLevelPoint>,
{
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_path(path)?;

    let mut count = 0;
    for point in points {
        writer.serialize(CsvRow::new(point, now))?;
        count += 1;
    }
    writer.flush()?;

    tracing::info!("Exported {} curve points to {:?}", count, path);
    Ok(count)
}
