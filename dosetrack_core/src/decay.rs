//! First-order exponential decay of a single dose.
//!
//! A dose `D` administered `Δt` days ago contributes `D · e^(-k·Δt)`,
//! with `k = ln(2) / half_life`. Before administration it contributes nothing.

use crate::types::validate_dose;
use crate::{DecayParameters, Error, Result};
use chrono::{DateTime, Utc};

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Fractional days from `since` to `at` (negative when `at` is earlier)
pub fn elapsed_days(since: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    (at - since).num_milliseconds() as f64 / MILLIS_PER_DAY
}

/// Fraction of a dose still present after `elapsed_days`.
///
/// Returns `0.0` for negative elapsed time and underflows toward `0.0` for
/// very long durations.
pub fn remaining_fraction(params: &DecayParameters, elapsed_days: f64) -> Result<f64> {
    if !elapsed_days.is_finite() {
        return Err(Error::InvalidInput(format!(
            "elapsed time must be finite, got {}",
            elapsed_days
        )));
    }
    Ok(fraction_unchecked(params, elapsed_days))
}

/// Amount (mg) of `dose_mg` remaining `elapsed_days` after administration.
pub fn contribution(params: &DecayParameters, dose_mg: f64, elapsed_days: f64) -> Result<f64> {
    validate_dose(dose_mg)?;
    Ok(dose_mg * remaining_fraction(params, elapsed_days)?)
}

/// Inputs already validated: dose comes from a `DosingEvent` and elapsed
/// time from integer milliseconds.
pub(crate) fn contribution_unchecked(params: &DecayParameters, dose_mg: f64, elapsed_days: f64) -> f64 {
    dose_mg * fraction_unchecked(params, elapsed_days)
}

fn fraction_unchecked(params: &DecayParameters, elapsed_days: f64) -> f64 {
    if elapsed_days < 0.0 {
        return 0.0;
    }
    (-params.decay_constant() * elapsed_days).exp()
}
