//! Core domain types for MedTrack.
//!
//! This module defines the fundamental types used throughout the system:
//! - Dose entries and their status
//! - Daily adherence samples
//! - Medication supply levels
//! - Dose events recorded when a dose is taken

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Dose Types
// ============================================================================

/// Identifier of a dose within one day's schedule
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct DoseId(pub u32);

impl fmt::Display for DoseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status of a scheduled dose. `Taken` is terminal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    #[default]
    Pending,
    Taken,
}

impl fmt::Display for DoseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseStatus::Pending => write!(f, "Pending"),
            DoseStatus::Taken => write!(f, "Taken"),
        }
    }
}

/// One scheduled administration of a medication on a given day
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoseEntry {
    pub id: DoseId,
    pub medication_name: String,
    pub dosage: String,
    pub scheduled_time: NaiveTime,
    #[serde(default)]
    pub status: DoseStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

impl DoseEntry {
    /// Create a pending entry without instructions
    pub fn new(
        id: u32,
        medication_name: impl Into<String>,
        dosage: impl Into<String>,
        scheduled_time: NaiveTime,
    ) -> Self {
        Self {
            id: DoseId(id),
            medication_name: medication_name.into(),
            dosage: dosage.into(),
            scheduled_time,
            status: DoseStatus::Pending,
            instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_status(mut self, status: DoseStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_taken(&self) -> bool {
        self.status == DoseStatus::Taken
    }

    pub fn is_pending(&self) -> bool {
        self.status == DoseStatus::Pending
    }
}

// ============================================================================
// Adherence Types
// ============================================================================

/// A day's aggregate adherence result.
///
/// `percentage` is always within 0..=100; both `new` and deserialization
/// reject anything larger.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RawAdherenceSample")]
pub struct AdherenceSample {
    label: String,
    percentage: u8,
}

/// Unchecked wire shape of an adherence sample
#[derive(Deserialize)]
struct RawAdherenceSample {
    label: String,
    percentage: u32,
}

impl TryFrom<RawAdherenceSample> for AdherenceSample {
    type Error = crate::Error;

    fn try_from(raw: RawAdherenceSample) -> crate::Result<Self> {
        AdherenceSample::new(raw.label, raw.percentage)
    }
}

impl AdherenceSample {
    pub fn new(label: impl Into<String>, percentage: u32) -> crate::Result<Self> {
        let percentage = u8::try_from(percentage)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(crate::Error::InvalidPercentage(percentage))?;

        Ok(Self {
            label: label.into(),
            percentage,
        })
    }

    /// Build from a percentage already computed by this crate's rounding
    pub(crate) fn bounded(label: impl Into<String>, percentage: u8) -> Self {
        Self {
            label: label.into(),
            percentage: percentage.min(100),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn percentage(&self) -> u8 {
        self.percentage
    }
}

// ============================================================================
// Inventory Types
// ============================================================================

/// Remaining stock of one medication
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedicationSupply {
    pub medication_name: String,
    pub remaining: u32,
    /// Overrides the configured low-stock threshold for this medication
    #[serde(default)]
    pub refill_threshold: Option<u32>,
}

// ============================================================================
// Event Types
// ============================================================================

/// A recorded dose-taking event
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DoseEvent {
    pub id: Uuid,
    pub dose_id: DoseId,
    pub medication_name: String,
    pub dosage: String,
    pub taken_at: DateTime<Utc>,
}

impl DoseEvent {
    /// Record that `entry` was taken at `taken_at`
    pub fn for_entry(entry: &DoseEntry, taken_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            dose_id: entry.id,
            medication_name: entry.medication_name.clone(),
            dosage: entry.dosage.clone(),
            taken_at,
        }
    }
}
