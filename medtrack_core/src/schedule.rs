//! Today's dose schedule and its single status transition.
//!
//! The free functions here are the pure contract: they take a snapshot of
//! entries and return a new snapshot, never mutating their input.
//! [`ScheduleStore`] wraps a snapshot whose invariants (unique ids,
//! non-empty medication names) have been checked.

use crate::adherence::daily_percentage;
use crate::{DoseEntry, DoseId, DoseStatus, Error, Result};
use std::collections::HashSet;

/// Return a copy of `entries` with the dose `id` marked as taken.
///
/// Unknown ids leave the collection unchanged. Ordering is preserved and no
/// other entry is touched, so applying this twice equals applying it once.
pub fn mark_taken(entries: &[DoseEntry], id: DoseId) -> Vec<DoseEntry> {
    if !entries.iter().any(|e| e.id == id) {
        tracing::debug!("No dose with id {} in schedule, nothing to mark", id);
    }

    entries
        .iter()
        .map(|entry| {
            if entry.id == id {
                entry.clone().with_status(DoseStatus::Taken)
            } else {
                entry.clone()
            }
        })
        .collect()
}

pub fn count_taken(entries: &[DoseEntry]) -> usize {
    entries.iter().filter(|e| e.is_taken()).count()
}

pub fn count_total(entries: &[DoseEntry]) -> usize {
    entries.len()
}

/// Share of today's doses taken, as a rounded percentage (0 for no doses)
pub fn today_percentage(entries: &[DoseEntry]) -> u8 {
    daily_percentage(count_taken(entries), count_total(entries))
}

/// Check schedule invariants, returning one message per violation
pub fn validate(entries: &[DoseEntry]) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for entry in entries {
        if !seen.insert(entry.id) {
            errors.push(format!("Duplicate dose id {}", entry.id));
        }
        if entry.medication_name.trim().is_empty() {
            errors.push(format!("Dose {} has empty medication name", entry.id));
        }
    }

    errors
}

/// A validated snapshot of one day's dose entries
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScheduleStore {
    entries: Vec<DoseEntry>,
}

impl ScheduleStore {
    /// Build a schedule, rejecting duplicate ids and empty medication names
    pub fn new(entries: Vec<DoseEntry>) -> Result<Self> {
        let errors = validate(&entries);
        if !errors.is_empty() {
            return Err(Error::Schedule(errors.join("; ")));
        }
        Ok(Self { entries })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DoseEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<DoseEntry> {
        self.entries
    }

    pub fn get(&self, id: DoseId) -> Option<&DoseEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// New snapshot with `id` marked taken; `self` is left as it was
    pub fn mark_taken(&self, id: DoseId) -> Self {
        // Only the status changes, so ids and names stay valid
        Self {
            entries: mark_taken(&self.entries, id),
        }
    }

    pub fn count_taken(&self) -> usize {
        count_taken(&self.entries)
    }

    pub fn count_total(&self) -> usize {
        count_total(&self.entries)
    }

    pub fn today_percentage(&self) -> u8 {
        today_percentage(&self.entries)
    }
}
