#![forbid(unsafe_code)]

//! Core domain model and estimation engine for Dosetrack.
//!
//! This crate provides:
//! - Domain types (medications, dosing events, level points)
//! - Decay model, level aggregation, curve sampling, next-dose estimation
//! - Chart window selection on top of the sampler
//! - Persistence helpers (dose journal, CSV export) and configuration

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod decay;
pub mod level;
pub mod sampler;
pub mod next_dose;
pub mod chart;
pub mod journal;
pub mod history;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use level::current_level;
pub use sampler::{sample, sample_hours};
pub use next_dose::{next_due_date, next_due_in_days};
pub use chart::{render_series, ChartPeriod, ChartSeries, ChartWindow};
pub use journal::{DoseSink, JsonlJournal};
pub use history::load_events;
