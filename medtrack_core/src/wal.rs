//! Dose event log.
//!
//! Every dose taken is appended to a JSONL (JSON Lines) file with file
//! locking to ensure safe concurrent access.

use crate::{DoseEvent, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

/// Sink for recorded dose events
pub trait DoseEventSink {
    fn append(&mut self, event: &DoseEvent) -> Result<()>;
}

/// JSONL-based event sink with file locking
pub struct JsonlSink {
    path: PathBuf,
}

impl JsonlSink {
    /// Create a new JSONL sink for the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl DoseEventSink for JsonlSink {
    fn append(&mut self, event: &DoseEvent) -> Result<()> {
        self.ensure_parent_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.lock_exclusive()?;

        // Serialize first so a failure never leaves half a line behind
        let mut line = serde_json::to_string(event)?;
        line.push('\n');

        let mut writer = std::io::BufWriter::new(&file);
        writer.write_all(line.as_bytes())?;
        writer.flush()?;
        drop(writer);

        file.unlock()?;

        tracing::debug!("Appended event {} for dose {}", event.id, event.dose_id);
        Ok(())
    }
}

/// Read all events from a log file, oldest first
pub fn read_events(path: &Path) -> Result<Vec<DoseEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut events = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<DoseEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => {
                tracing::warn!("Failed to parse dose event at line {}: {}", line_num + 1, e);
            }
        }
    }

    file.unlock()?;
    tracing::debug!("Read {} dose events", events.len());
    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoseEntry, DoseId};
    use chrono::{NaiveTime, Utc};

    fn create_test_event(id: u32) -> DoseEvent {
        let entry = DoseEntry::new(id, "Metformin", "500mg", NaiveTime::from_hms_opt(12, 0, 0).unwrap());
        DoseEvent::for_entry(&entry, Utc::now())
    }

    #[test]
    fn test_append_and_read_single_event() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("events").join("dose_events.wal");

        let event = create_test_event(2);
        let mut sink = JsonlSink::new(&path);
        sink.append(&event).unwrap();

        let events = read_events(&path).unwrap();
        assert_eq!(events, vec![event]);
    }

    #[test]
    fn test_append_preserves_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dose_events.wal");

        let mut sink = JsonlSink::new(&path);
        for id in 1..=4 {
            sink.append(&create_test_event(id)).unwrap();
        }

        let ids: Vec<_> = read_events(&path).unwrap().iter().map(|e| e.dose_id).collect();
        assert_eq!(ids, vec![DoseId(1), DoseId(2), DoseId(3), DoseId(4)]);
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("dose_events.wal");

        let mut sink = JsonlSink::new(&path);
        sink.append(&create_test_event(1)).unwrap();
        {
            let mut file = OpenOptions::new().append(true).open(&path).unwrap();
            file.write_all(b"{\"truncated\n\n").unwrap();
        }
        sink.append(&create_test_event(2)).unwrap();

        assert_eq!(read_events(&path).unwrap().len(), 2);
    }

    #[test]
    fn test_read_missing_log() {
        let temp_dir = tempfile::tempdir().unwrap();
        let events = read_events(&temp_dir.path().join("nonexistent.wal")).unwrap();
        assert!(events.is_empty());
    }
}
