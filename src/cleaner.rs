use anyhow::Result;
use tracing::info;

use crate::chart::{ChartRecord, UNKNOWN};
use crate::settings::Settings;
use crate::snapshot;

/// Fill missing names with the placeholder. Idempotent.
pub fn clean(mut records: Vec<ChartRecord>) -> Vec<ChartRecord> {
    let mut filled = 0usize;
    for record in &mut records {
        for field in [&mut record.track_name, &mut record.artist] {
            if field.is_none() {
                *field = Some(UNKNOWN.to_string());
                filled += 1;
            }
        }
    }
    info!("Filled {} missing names", filled);
    records
}

/// Clean and write the clean snapshot.
pub fn clean_and_save(records: Vec<ChartRecord>, settings: &Settings) -> Result<Vec<ChartRecord>> {
    println!("Cleaning data...");
    let records = clean(records);
    snapshot::write_records(&settings.clean_snapshot, &records)?;
    println!("Clean data saved: {}", settings.clean_snapshot.display());
    Ok(records)
}

/// Clean the raw snapshot on disk. Values that do not coerce are fatal.
pub fn clean_snapshot(settings: &Settings) -> Result<Vec<ChartRecord>> {
    let raw = snapshot::read_records(&settings.raw_snapshot)?;
    info!("Read {} records from {:?}", raw.len(), settings.raw_snapshot);
    clean_and_save(raw, settings)
}
