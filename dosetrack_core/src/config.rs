//! Configuration file support for Dosetrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/dosetrack/config.toml`.

use crate::{DecayParameters, Error, Medication, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Longest dosing cadence accepted from config
pub const MAX_INTERVAL_DAYS: u32 = 365;

/// Longest chart projection accepted from config
pub const MAX_PROJECTION_DAYS: u32 = 365;

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub regimen: RegimenConfig,

    #[serde(default)]
    pub chart: ChartConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Treatment regimen configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegimenConfig {
    #[serde(default)]
    pub medication: Medication,

    #[serde(default = "default_interval_days")]
    pub interval_days: u32,

    /// Overrides the medication's built-in half-life
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub half_life_days: Option<f64>,
}

impl Default for RegimenConfig {
    fn default() -> Self {
        Self {
            medication: Medication::default(),
            interval_days: default_interval_days(),
            half_life_days: None,
        }
    }
}

impl RegimenConfig {
    /// Decay parameters for this regimen, preferring the explicit override
    pub fn decay_parameters(&self) -> Result<DecayParameters> {
        match self.half_life_days {
            Some(days) => DecayParameters::new(days),
            None => Ok(DecayParameters::for_medication(self.medication)),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::days(i64::from(self.interval_days))
    }
}

/// Chart rendering configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChartConfig {
    #[serde(default = "default_projection_days")]
    pub projection_days: u32,

    #[serde(default = "default_max_points")]
    pub max_points: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            projection_days: default_projection_days(),
            max_points: default_max_points(),
        }
    }
}

impl ChartConfig {
    pub fn projection(&self) -> Duration {
        Duration::days(i64::from(self.projection_days))
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        std::env::var_os("HOME")
            .map(|home| PathBuf::from(home).join(".local/share"))
            .unwrap_or_else(|| PathBuf::from("."))
    });
    base.join("dosetrack")
}

fn default_interval_days() -> u32 {
    7
}

fn default_projection_days() -> u32 {
    7
}

fn default_max_points() -> usize {
    500
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject values the engine would refuse later anyway
    pub fn validate(&self) -> Result<()> {
        if self.regimen.interval_days == 0 {
            return Err(Error::Config("regimen.interval_days must be at least 1".into()));
        }
        if self.regimen.interval_days > MAX_INTERVAL_DAYS {
            return Err(Error::Config(format!(
                "regimen.interval_days must be at most {}, got {}",
                MAX_INTERVAL_DAYS, self.regimen.interval_days
            )));
        }
        if let Some(days) = self.regimen.half_life_days {
            if !days.is_finite() || days <= 0.0 {
                return Err(Error::Config(format!(
                    "regimen.half_life_days must be positive, got {}",
                    days
                )));
            }
        }
        if self.chart.max_points == 0 {
            return Err(Error::Config("chart.max_points must be at least 1".into()));
        }
        if self.chart.projection_days > MAX_PROJECTION_DAYS {
            return Err(Error::Config(format!(
                "chart.projection_days must be at most {}, got {}",
                MAX_PROJECTION_DAYS, self.chart.projection_days
            )));
        }
        Ok(())
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            std::env::var_os("HOME")
                .map(|home| PathBuf::from(home).join(".config"))
                .unwrap_or_else(|| PathBuf::from("."))
        });
        base.join("dosetrack").join("config.toml")
    }

    /// Save the current configuration to the default path
    pub fn save(&self) -> Result<()> {
        let config_path = Self::default_config_path();
        self.save_to(&config_path)
    }

    /// Save the current configuration to a specific path
    ///
    /// Writes to a temp file in the same directory and renames it over the
    /// target, so a crash never leaves a half-written config behind.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(parent)?;

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        let mut temp = NamedTempFile::new_in(parent)?;
        temp.write_all(contents.as_bytes())?;
        temp.as_file().sync_all()?;
        temp.persist(path).map_err(|e| Error::Io(e.error))?;

        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
