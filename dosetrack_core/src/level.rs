//! Estimated drug level at a single instant.
//!
//! The level is the superposition of every past dose's decayed contribution.
//! Future doses are never assumed, so evaluating at a time after the last
//! event yields the projected decay with no further treatment.

use crate::decay::{contribution_unchecked, elapsed_days};
use crate::{DecayParameters, DosingEvent};
use chrono::{DateTime, Utc};

/// Sum the contributions of `events` at `at`.
///
/// Order-independent and infallible: events and parameters are valid by
/// construction. Returns `0.0` for an empty history.
pub fn current_level(events: &[DosingEvent], at: DateTime<Utc>, params: &DecayParameters) -> f64 {
    events
        .iter()
        .map(|e| {
            contribution_unchecked(params, e.dose_mg(), elapsed_days(e.administered_at(), at))
        })
        .sum()
}
