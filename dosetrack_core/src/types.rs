//! Core domain types for the Dosetrack system.
//!
//! This module defines the fundamental types used throughout the system:
//! - Medications and their decay parameters
//! - Dosing events (the engine's input)
//! - Estimated level points (the engine's output)
//! - Persisted dose records

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Half-life used when no medication-specific value is configured.
pub const DEFAULT_HALF_LIFE_DAYS: f64 = 5.0;

// ============================================================================
// Medication Types
// ============================================================================

/// GLP-1 receptor agonist being tracked
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Medication {
    #[default]
    Tirzepatide,
    Semaglutide,
    Dulaglutide,
    Liraglutide,
}

impl Medication {
    /// Approximate elimination half-life in days
    pub fn half_life_days(self) -> f64 {
        match self {
            Medication::Tirzepatide => 5.0,
            Medication::Semaglutide => 7.0,
            Medication::Dulaglutide => 5.0,
            Medication::Liraglutide => 13.0 / 24.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Medication::Tirzepatide => "tirzepatide",
            Medication::Semaglutide => "semaglutide",
            Medication::Dulaglutide => "dulaglutide",
            Medication::Liraglutide => "liraglutide",
        }
    }
}

impl fmt::Display for Medication {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Medication {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "tirzepatide" => Ok(Medication::Tirzepatide),
            "semaglutide" => Ok(Medication::Semaglutide),
            "dulaglutide" => Ok(Medication::Dulaglutide),
            "liraglutide" => Ok(Medication::Liraglutide),
            other => Err(Error::InvalidInput(format!("unknown medication: {}", other))),
        }
    }
}

// ============================================================================
// Decay Parameters
// ============================================================================

/// First-order elimination parameters for one medication.
///
/// Always holds a finite, strictly positive half-life.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDecayParameters")]
pub struct DecayParameters {
    half_life_days: f64,
}

#[derive(Deserialize)]
struct RawDecayParameters {
    half_life_days: f64,
}

impl TryFrom<RawDecayParameters> for DecayParameters {
    type Error = Error;

    fn try_from(raw: RawDecayParameters) -> Result<Self> {
        DecayParameters::new(raw.half_life_days)
    }
}

impl DecayParameters {
    pub fn new(half_life_days: f64) -> Result<Self> {
        if !half_life_days.is_finite() || half_life_days <= 0.0 {
            return Err(Error::InvalidInput(format!(
                "half-life must be a positive finite number of days, got {}",
                half_life_days
            )));
        }
        Ok(Self { half_life_days })
    }

    pub fn for_medication(medication: Medication) -> Self {
        Self {
            half_life_days: medication.half_life_days(),
        }
    }

    pub fn half_life_days(&self) -> f64 {
        self.half_life_days
    }

    /// Elimination rate constant `k = ln(2) / half_life`, per day
    pub fn decay_constant(&self) -> f64 {
        std::f64::consts::LN_2 / self.half_life_days
    }
}

impl Default for DecayParameters {
    fn default() -> Self {
        Self {
            half_life_days: DEFAULT_HALF_LIFE_DAYS,
        }
    }
}

// ============================================================================
// Dosing Events and Level Points
// ============================================================================

/// A single administration of medication.
///
/// The dose is always finite and strictly positive; construction and
/// deserialization both go through [`DosingEvent::new`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDosingEvent")]
pub struct DosingEvent {
    dose_mg: f64,
    administered_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct RawDosingEvent {
    dose_mg: f64,
    administered_at: DateTime<Utc>,
}

impl TryFrom<RawDosingEvent> for DosingEvent {
    type Error = Error;

    fn try_from(raw: RawDosingEvent) -> Result<Self> {
        DosingEvent::new(raw.dose_mg, raw.administered_at)
    }
}

impl DosingEvent {
    pub fn new(dose_mg: f64, administered_at: DateTime<Utc>) -> Result<Self> {
        validate_dose(dose_mg)?;
        Ok(Self {
            dose_mg,
            administered_at,
        })
    }

    pub fn dose_mg(&self) -> f64 {
        self.dose_mg
    }

    pub fn administered_at(&self) -> DateTime<Utc> {
        self.administered_at
    }
}

pub(crate) fn validate_dose(dose_mg: f64) -> Result<()> {
    if !dose_mg.is_finite() || dose_mg <= 0.0 {
        return Err(Error::InvalidInput(format!(
            "dose must be a positive finite amount in mg, got {}",
            dose_mg
        )));
    }
    Ok(())
}

/// One sample of the estimated drug level curve
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EstimatedLevelPoint {
    pub at: DateTime<Utc>,
    pub level_mg: f64,
}

// ============================================================================
// Persisted Records
// ============================================================================

/// A logged injection as stored in the dose journal
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DoseRecord {
    pub id: Uuid,
    pub medication: Medication,
    pub dose_mg: f64,
    pub administered_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl DoseRecord {
    /// Create a new record with a fresh id, rejecting invalid doses up front
    pub fn new(
        medication: Medication,
        dose_mg: f64,
        administered_at: DateTime<Utc>,
        note: Option<String>,
    ) -> Result<Self> {
        validate_dose(dose_mg)?;
        Ok(Self {
            id: Uuid::new_v4(),
            medication,
            dose_mg,
            administered_at,
            note,
        })
    }

    pub fn to_event(&self) -> Result<DosingEvent> {
        DosingEvent::new(self.dose_mg, self.administered_at)
    }
}
