#![forbid(unsafe_code)]

//! Core domain model and business logic for MedTrack.
//!
//! This crate provides:
//! - Domain types (dose entries, adherence samples, supplies, dose events)
//! - Schedule state transitions and same-day counts
//! - Adherence aggregation (daily and rolling-window percentages)
//! - Derived dashboard queries (next dose, refills needed)
//! - Boundary adapters (schedule file, dose event log, adherence history)

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod schedule;
pub mod adherence;
pub mod queries;
pub mod store;
pub mod wal;
pub mod history;
pub mod supply;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use schedule::ScheduleStore;
pub use adherence::{
    daily_percentage, rolling_average, rolling_window, sample_from_entries, summarize,
    trailing_average, TrendSummary,
};
pub use queries::{low_stock, next_pending, next_pending_after, pending_count, refills_needed};
pub use wal::{DoseEventSink, JsonlSink};
pub use history::{append_sample, load_samples};
pub use supply::load_supplies;
