//! Schedule file persistence with file locking.
//!
//! The schedule is a JSON array of dose entries. Saves are atomic, and
//! [`ScheduleStore::update`] holds an exclusive lock on a sidecar `.lock`
//! file across load-modify-save so concurrent processes never drop each
//! other's transitions.

use crate::{DoseEntry, Error, Result, ScheduleStore};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

fn lock_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".lock");
    path.with_file_name(name)
}

impl ScheduleStore {
    /// Load a schedule from a file with shared locking
    ///
    /// Returns an empty schedule if the file doesn't exist. A file that
    /// exists but can't be parsed, or breaks the schedule invariants, is an
    /// error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::info!("No schedule file at {:?}, starting with an empty day", path);
            return Ok(Self::empty());
        }

        let file = File::open(path)?;
        file.lock_shared()?;

        let mut contents = String::new();
        let read = std::io::BufReader::new(&file).read_to_string(&mut contents);
        file.unlock()?;
        read?;

        let entries: Vec<DoseEntry> = serde_json::from_str(&contents)?;
        let store = Self::new(entries)?;
        tracing::debug!("Loaded {} doses from {:?}", store.count_total(), path);
        Ok(store)
    }

    /// Save the schedule with exclusive locking
    ///
    /// Atomically writes by:
    /// 1. Writing to a temp file
    /// 2. Syncing to disk
    /// 3. Renaming over the existing file
    pub fn save(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .ok_or_else(|| Error::Other(format!("Schedule path {:?} has no parent", path)))?;
        std::fs::create_dir_all(parent)?;

        let temp = NamedTempFile::new_in(parent)?;
        temp.as_file().lock_exclusive()?;

        {
            let mut writer = std::io::BufWriter::new(temp.as_file());
            let contents = serde_json::to_string_pretty(self.entries())?;
            writer.write_all(contents.as_bytes())?;
            writer.flush()?;
        }

        temp.as_file().sync_all()?;
        temp.as_file().unlock()?;

        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::debug!("Saved {} doses to {:?}", self.count_total(), path);
        Ok(())
    }

    /// Load the schedule, transform it, and save it back under one lock
    ///
    /// `f` receives the current snapshot and returns the next one. The
    /// returned pair is `(before, after)` so callers can see what changed.
    pub fn update<F>(path: &Path, f: F) -> Result<(Self, Self)>
    where
        F: FnOnce(&ScheduleStore) -> Result<ScheduleStore>,
    {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let lock = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path(path))?;
        lock.lock_exclusive()?;

        let result = Self::load(path).and_then(|before| {
            let after = f(&before)?;
            if after != before {
                after.save(path)?;
            }
            Ok((before, after))
        });

        lock.unlock()?;
        result
    }
}
