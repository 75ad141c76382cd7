//! Derived dashboard values.
//!
//! Pure queries over dose entries and supply levels, kept apart from the
//! transition logic in [`crate::schedule`].

use crate::{DoseEntry, MedicationSupply};
use chrono::NaiveTime;

/// Number of doses still waiting to be taken
pub fn pending_count(entries: &[DoseEntry]) -> usize {
    entries.iter().filter(|e| e.is_pending()).count()
}

/// Earliest pending dose by scheduled time.
///
/// Doses scheduled at the same time resolve to the first one in schedule
/// order.
pub fn next_pending(entries: &[DoseEntry]) -> Option<&DoseEntry> {
    entries
        .iter()
        .filter(|e| e.is_pending())
        .min_by_key(|e| e.scheduled_time)
}

/// Earliest pending dose at or after `now`, falling back to the earliest
/// overdue one when nothing is left later in the day.
pub fn next_pending_after(entries: &[DoseEntry], now: NaiveTime) -> Option<&DoseEntry> {
    entries
        .iter()
        .filter(|e| e.is_pending() && e.scheduled_time >= now)
        .min_by_key(|e| e.scheduled_time)
        .or_else(|| next_pending(entries))
}

/// Supplies at or below their refill threshold.
///
/// A supply's own `refill_threshold` wins over `default_threshold`.
pub fn low_stock(supplies: &[MedicationSupply], default_threshold: u32) -> Vec<&MedicationSupply> {
    supplies
        .iter()
        .filter(|s| s.remaining <= s.refill_threshold.unwrap_or(default_threshold))
        .collect()
}

pub fn refills_needed(supplies: &[MedicationSupply], default_threshold: u32) -> usize {
    low_stock(supplies, default_threshold).len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DoseId, DoseStatus};

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn entries() -> Vec<DoseEntry> {
        vec![
            DoseEntry::new(1, "Vitamin D3", "1000 IU", at(8, 0)).with_status(DoseStatus::Taken),
            DoseEntry::new(4, "Aspirin", "81mg", at(20, 0)),
            DoseEntry::new(2, "Metformin", "500mg", at(12, 0)),
            DoseEntry::new(3, "Lisinopril", "10mg", at(18, 0)),
        ]
    }

    fn supply(name: &str, remaining: u32, threshold: Option<u32>) -> MedicationSupply {
        MedicationSupply {
            medication_name: name.into(),
            remaining,
            refill_threshold: threshold,
        }
    }

    #[test]
    fn test_pending_count() {
        assert_eq!(pending_count(&entries()), 3);
        assert_eq!(pending_count(&[]), 0);
    }

    #[test]
    fn test_next_pending_uses_time_not_order() {
        let entries = entries();
        assert_eq!(next_pending(&entries).map(|e| e.id), Some(DoseId(2)));
    }

    #[test]
    fn test_next_pending_tie_keeps_schedule_order() {
        let entries = vec![
            DoseEntry::new(7, "B", "1", at(9, 0)),
            DoseEntry::new(5, "A", "1", at(9, 0)),
        ];
        assert_eq!(next_pending(&entries).map(|e| e.id), Some(DoseId(7)));
    }

    #[test]
    fn test_next_pending_none_when_all_taken() {
        let entries: Vec<_> = entries()
            .into_iter()
            .map(|e| e.with_status(DoseStatus::Taken))
            .collect();
        assert!(next_pending(&entries).is_none());
        assert!(next_pending_after(&entries, at(0, 0)).is_none());
    }

    #[test]
    fn test_next_pending_after() {
        let entries = entries();
        assert_eq!(next_pending_after(&entries, at(13, 30)).map(|e| e.id), Some(DoseId(3)));
        assert_eq!(next_pending_after(&entries, at(18, 0)).map(|e| e.id), Some(DoseId(3)));
        // Nothing left later today, so the earliest overdue dose comes back
        assert_eq!(next_pending_after(&entries, at(21, 0)).map(|e| e.id), Some(DoseId(2)));
    }

    #[test]
    fn test_low_stock_with_default_threshold() {
        let supplies = vec![
            supply("Aspirin", 5, None),
            supply("Metformin", 60, None),
            supply("Vitamin D3", 7, None),
        ];

        let low: Vec<_> = low_stock(&supplies, 7)
            .into_iter()
            .map(|s| s.medication_name.as_str())
            .collect();
        assert_eq!(low, vec!["Aspirin", "Vitamin D3"]);
        assert_eq!(refills_needed(&supplies, 7), 2);
    }

    #[test]
    fn test_low_stock_override_wins() {
        let supplies = vec![
            supply("Lisinopril", 10, Some(14)),
            supply("Aspirin", 5, Some(2)),
        ];
        assert_eq!(refills_needed(&supplies, 7), 1);
        assert_eq!(low_stock(&supplies, 7)[0].medication_name, "Lisinopril");
        assert_eq!(refills_needed(&[], 7), 0);
    }
}
