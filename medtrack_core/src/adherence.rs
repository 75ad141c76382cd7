//! Adherence aggregation over daily results.
//!
//! All percentages are integers in 0..=100. Ratios are computed in `f64` and
//! rounded exactly once, half away from zero (`f64::round`), so 12.5 becomes
//! 13 and 83.57 becomes 84. Intermediate ratios are never rounded before
//! being combined.

use crate::schedule::today_percentage;
use crate::{AdherenceSample, DoseEntry};
use serde::Serialize;

/// Round a percentage in `f64` to the integer shown to users
fn round_percentage(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

/// Rounded percentage of `taken_count` out of `total_count`, 0 when there is
/// nothing scheduled.
///
/// Callers must ensure `taken_count <= total_count`.
pub fn daily_percentage(taken_count: usize, total_count: usize) -> u8 {
    debug_assert!(
        taken_count <= total_count,
        "taken count {} exceeds total {}",
        taken_count,
        total_count
    );

    if total_count == 0 {
        return 0;
    }

    round_percentage(100.0 * taken_count as f64 / total_count as f64)
}

/// Mean percentage across all samples, 0 for an empty history
pub fn rolling_average(samples: &[AdherenceSample]) -> u8 {
    if samples.is_empty() {
        return 0;
    }

    let sum: u32 = samples.iter().map(|s| u32::from(s.percentage())).sum();
    round_percentage(f64::from(sum) / samples.len() as f64)
}

/// Mean of the last `window` samples (all of them if there are fewer)
pub fn trailing_average(samples: &[AdherenceSample], window: usize) -> u8 {
    if window == 0 {
        return 0;
    }

    let start = samples.len().saturating_sub(window);
    rolling_average(&samples[start..])
}

/// Smoothed series: each point averages itself and up to `window - 1`
/// preceding samples. A `window` of 0 yields 0 for every point, matching
/// [`trailing_average`].
pub fn rolling_window(samples: &[AdherenceSample], window: usize) -> Vec<u8> {
    if window == 0 {
        return vec![0; samples.len()];
    }

    (0..samples.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            rolling_average(&samples[start..=i])
        })
        .collect()
}

/// Reduce one day's dose outcomes to a sample
pub fn sample_from_entries(label: impl Into<String>, entries: &[DoseEntry]) -> AdherenceSample {
    AdherenceSample::bounded(label, today_percentage(entries))
}

/// Headline numbers for a run of daily samples
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TrendSummary {
    pub days: usize,
    pub average: u8,
    pub lowest: u8,
    pub highest: u8,
    pub days_at_or_above_goal: usize,
}

/// Summarize a history against a daily goal percentage
pub fn summarize(samples: &[AdherenceSample], goal_percentage: u8) -> TrendSummary {
    let percentages = samples.iter().map(|s| s.percentage());

    TrendSummary {
        days: samples.len(),
        average: rolling_average(samples),
        lowest: percentages.clone().min().unwrap_or(0),
        highest: percentages.clone().max().unwrap_or(0),
        days_at_or_above_goal: percentages.filter(|p| *p >= goal_percentage).count(),
    }
}
