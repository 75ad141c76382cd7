//! Medication supply loader.
//!
//! Supply levels are kept by an external inventory collaborator; this reads
//! its JSON export so refill queries can run against it.

use crate::{MedicationSupply, Result};
use std::path::Path;

/// Load supply levels from a JSON array
///
/// Returns an empty list if the file doesn't exist (no inventory tracked).
/// Returns an error if the file exists but is malformed.
pub fn load_supplies(path: &Path) -> Result<Vec<MedicationSupply>> {
    if !path.exists() {
        tracing::debug!("No supply file found at {:?}", path);
        return Ok(Vec::new());
    }

    let contents = std::fs::read_to_string(path)?;
    let supplies: Vec<MedicationSupply> = serde_json::from_str(&contents)?;

    tracing::info!("Loaded {} supply levels from {:?}", supplies.len(), path);
    Ok(supplies)
}
