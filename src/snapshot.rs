use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::chart::ChartRecord;
use crate::error::PipelineError;

/// Overwrite `path` with a CSV of `records`, header row first.
pub fn write_records(path: &Path, records: &[ChartRecord]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
    }

    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    if records.is_empty() {
        // serde only emits headers alongside the first record
        writer.write_record([
            "chart_rank",
            "track_name",
            "artist",
            "daily_streams",
            "country",
            "scrape_date",
        ])?;
    }
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!("Wrote {} records to {:?}", records.len(), path);
    Ok(())
}

/// Read a snapshot back. A field that does not fit its type fails the whole read.
pub fn read_records(path: &Path) -> Result<Vec<ChartRecord>> {
    let mut reader =
        csv::Reader::from_path(path).with_context(|| format!("Failed to open {:?}", path))?;
    let records = reader
        .deserialize()
        .collect::<Result<Vec<ChartRecord>, _>>()
        .map_err(|source| PipelineError::Coerce {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(records)
}
