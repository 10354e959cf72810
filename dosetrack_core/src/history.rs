//! Dosing history loading.
//!
//! Turns the persisted dose journal into the event list the engine consumes.
//! Order is preserved as found on disk; the engine never relies on it.

use crate::{DoseRecord, DosingEvent, Medication, Result};
use std::collections::HashSet;
use std::path::Path;

/// Load all valid dose records, deduplicated by id (first occurrence wins)
pub fn load_records(journal_path: &Path) -> Result<Vec<DoseRecord>> {
    let mut seen_ids = HashSet::new();
    let records: Vec<DoseRecord> = crate::journal::read_records(journal_path)?
        .into_iter()
        .filter(|r| seen_ids.insert(r.id))
        .collect();

    tracing::info!("Loaded {} dose records from {:?}", records.len(), journal_path);
    Ok(records)
}

/// Load the dosing history as engine events.
///
/// Records that fail validation (e.g. a hand-edited negative dose) are
/// logged and skipped rather than poisoning the whole history.
pub fn load_events(journal_path: &Path) -> Result<Vec<DosingEvent>> {
    Ok(to_events(&load_records(journal_path)?, None))
}

/// Same as [`load_events`], keeping only doses of `medication`
pub fn load_events_for(journal_path: &Path, medication: Medication) -> Result<Vec<DosingEvent>> {
    Ok(to_events(&load_records(journal_path)?, Some(medication)))
}

fn to_events(records: &[DoseRecord], medication: Option<Medication>) -> Vec<DosingEvent> {
    records
        .iter()
        .filter(|r| medication.map_or(true, |m| r.medication == m))
        .filter_map(|r| match r.to_event() {
            Ok(event) => Some(event),
            Err(e) => {
                tracing::warn!("Skipping dose record {}: {}", r.id, e);
                None
            }
        })
        .collect()
}
