//! Append-only dose journal.
//!
//! Dose records are appended to a JSONL (JSON Lines) file with file locking
//! to ensure safe concurrent access.

use crate::{DoseRecord, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink for persisting dose records
pub trait DoseSink {
    fn append(&mut self, record: &DoseRecord) -> Result<()>;
}

/// JSONL-based dose journal with file locking
pub struct JsonlJournal {
    path: PathBuf,
}

impl JsonlJournal {
    /// Create a new journal writing to the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl DoseSink for JsonlJournal {
    fn append(&mut self, record: &DoseRecord) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        let mut writer = std::io::BufWriter::new(&file);
        let line = serde_json::to_string(record)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended dose {} to journal", record.id);
        Ok(())
    }
}

/// Read all dose records from a journal file
///
/// A missing file is an empty journal. Lines that fail to decode or parse
/// (including torn writes that are not valid UTF-8) are logged and skipped.
pub fn read_records(path: &Path) -> Result<Vec<DoseRecord>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.split(b'\n').enumerate() {
        let line = line_result?;
        if line.iter().all(u8::is_ascii_whitespace) {
            continue;
        }

        match serde_json::from_slice::<DoseRecord>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!("Failed to parse dose at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} dose records from journal", records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Medication;
    use chrono::Utc;

    fn create_test_record(dose_mg: f64) -> DoseRecord {
        DoseRecord::new(Medication::Tirzepatide, dose_mg, Utc::now(), None).unwrap()
    }

    #[test]
    fn test_append_and_read_single_record() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("doses.jsonl");

        let record = create_test_record(2.5);
        let mut journal = JsonlJournal::new(&path);
        journal.append(&record).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records, vec![record]);
    }

    #[test]
    fn test_append_multiple_records() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nested").join("doses.jsonl");

        let mut journal = JsonlJournal::new(&path);
        for i in 1..=5 {
            journal.append(&create_test_record(i as f64)).unwrap();
        }

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 5);
        assert_eq!(records[4].dose_mg, 5.0);
    }

    #[test]
    fn test_read_missing_journal() {
        let temp_dir = tempfile::tempdir().unwrap();
        let records = read_records(&temp_dir.path().join("nonexistent.jsonl")).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        crate::logging::init_test();
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("doses.jsonl");

        let mut journal = JsonlJournal::new(&path);
        journal.append(&create_test_record(2.5)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            writeln!(file, "{{ not json").unwrap();
            writeln!(file).unwrap();
        }
        journal.append(&create_test_record(5.0)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("doses.jsonl");

        let mut journal = JsonlJournal::new(&path);
        let first = create_test_record(2.5);
        journal.append(&first).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(&[0xff, 0xfe, b'\n']).unwrap();
        }
        let second = create_test_record(5.0);
        journal.append(&second).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records, vec![first, second]);
    }
}
