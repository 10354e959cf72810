//! Uniform time-series sampling of the estimated level curve.
//!
//! The sampler evaluates [`current_level`] on the grid
//! `start, start + interval, ...` up to and including `end`. It has no notion
//! of "now": points past the present are simply projected decay.

use crate::level::current_level;
use crate::{DecayParameters, DosingEvent, Error, EstimatedLevelPoint, Result};
use chrono::{DateTime, Duration, Utc};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Sample the level curve over `[start, end]` every `interval`.
///
/// Returns `floor((end - start) / interval) + 1` points in strictly
/// ascending order. The number of points is not capped here; callers
/// choosing dense grids over long windows pay O(points × events).
pub fn sample(
    events: &[DosingEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval: Duration,
    params: &DecayParameters,
) -> Result<Vec<EstimatedLevelPoint>> {
    if end < start {
        return Err(Error::InvalidInput(format!(
            "sampling window ends ({}) before it starts ({})",
            end, start
        )));
    }

    let interval_ms = interval.num_milliseconds();
    if interval_ms <= 0 {
        return Err(Error::InvalidInput(format!(
            "sampling interval must be at least one millisecond, got {}",
            interval
        )));
    }

    let steps = (end - start).num_milliseconds() / interval_ms;
    tracing::debug!(
        "Sampling {} points over {} events every {} ms",
        steps + 1,
        events.len(),
        interval_ms
    );

    let points = (0..=steps)
        .map(|i| {
            let at = start + Duration::milliseconds(i * interval_ms);
            EstimatedLevelPoint {
                at,
                level_mg: current_level(events, at, params),
            }
        })
        .collect();

    Ok(points)
}

/// Same as [`sample`], with the interval given in (fractional) hours.
pub fn sample_hours(
    events: &[DosingEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    interval_hours: f64,
    params: &DecayParameters,
) -> Result<Vec<EstimatedLevelPoint>> {
    if !interval_hours.is_finite() || interval_hours <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "sampling interval must be a positive finite number of hours, got {}",
            interval_hours
        )));
    }
    let interval = Duration::milliseconds((interval_hours * MILLIS_PER_HOUR).round() as i64);
    sample(events, start, end, interval, params)
}
