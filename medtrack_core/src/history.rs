//! Adherence history kept as CSV.
//!
//! One row per closed day with a `label,percentage` header. Rows are
//! appended in chronological order, so file order is history order.

use crate::{AdherenceSample, Result};
use csv::ReaderBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// Load every sample from the history file, oldest first
///
/// A missing file is an empty history. Rows that fail to parse or carry a
/// percentage outside 0..=100 are skipped with a warning.
pub fn load_samples(csv_path: &Path) -> Result<Vec<AdherenceSample>> {
    if !csv_path.exists() {
        tracing::debug!("No adherence history at {:?}", csv_path);
        return Ok(Vec::new());
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(csv_path)?;

    let mut samples = Vec::new();
    for (row, result) in reader.deserialize::<AdherenceSample>().enumerate() {
        match result {
            Ok(sample) => samples.push(sample),
            Err(e) => {
                tracing::warn!("Skipping adherence row {}: {}", row + 1, e);
            }
        }
    }

    tracing::info!("Loaded {} adherence samples", samples.len());
    Ok(samples)
}

/// Append one sample to the history file
///
/// Creates the file (with headers) if needed and syncs it to disk before
/// returning.
pub fn append_sample(csv_path: &Path, sample: &AdherenceSample) -> Result<()> {
    if let Some(parent) = csv_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)?;

    let needs_headers = file.metadata()?.len() == 0;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(needs_headers)
        .from_writer(file);

    writer.serialize(sample)?;
    writer.flush()?;

    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!(
        "Recorded {}% adherence for {}",
        sample.percentage(),
        sample.label()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_creates_file_with_header() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("adherence.csv");

        append_sample(&csv_path, &AdherenceSample::new("Mon", 100).unwrap()).unwrap();
        append_sample(&csv_path, &AdherenceSample::new("Tue", 75).unwrap()).unwrap();

        let contents = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(contents, "label,percentage\nMon,100\nTue,75\n");
    }

    #[test]
    fn test_load_in_file_order() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("adherence.csv");

        for (label, pct) in [("Mon", 100), ("Tue", 50), ("Wed", 85)] {
            append_sample(&csv_path, &AdherenceSample::new(label, pct).unwrap()).unwrap();
        }

        let samples = load_samples(&csv_path).unwrap();
        let labels: Vec<_> = samples.iter().map(|s| s.label()).collect();
        assert_eq!(labels, vec!["Mon", "Tue", "Wed"]);
        assert_eq!(crate::rolling_average(&samples), 78);
    }

    #[test]
    fn test_invalid_rows_skipped() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("adherence.csv");
        std::fs::write(
            &csv_path,
            "label,percentage\nMon,100\nTue,140\nWed,abc\nThu, 60\n",
        )
        .unwrap();

        let samples = load_samples(&csv_path).unwrap();
        let kept: Vec<_> = samples.iter().map(|s| (s.label(), s.percentage())).collect();
        assert_eq!(kept, vec![("Mon", 100), ("Thu", 60)]);
    }

    #[test]
    fn test_missing_history_is_empty() {
        let temp_dir = tempfile::tempdir().unwrap();
        let samples = load_samples(&temp_dir.path().join("none.csv")).unwrap();
        assert!(samples.is_empty());
    }
}
