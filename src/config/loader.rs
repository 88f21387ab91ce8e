//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a scheduling
//! period's configuration from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{PeriodMetadata, RulesConfig, ScheduleConfig};

/// Loads and provides access to a scheduling period's configuration.
///
/// # Directory Structure
///
/// ```text
/// config/worcester_finals_2024/
/// ├── period.yaml   # Period metadata and final-week date keys
/// └── rules.yaml    # Primary areas, caps, annotation delimiters
/// ```
///
/// # Example
///
/// ```no_run
/// use shift_resolver::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/worcester_finals_2024").unwrap();
/// println!("Loaded period: {}", loader.period().name);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: ScheduleConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if either file is missing, contains invalid YAML,
    /// or the combined configuration fails validation (for example a date
    /// key listed in both final weeks).
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<PeriodMetadata>(&path.join("period.yaml"))?;
        let rules = Self::load_yaml::<RulesConfig>(&path.join("rules.yaml"))?;

        let config = ScheduleConfig::new(metadata, rules)?;
        tracing::debug!(
            path = %path.display(),
            period = %config.period().name,
            primary_areas = ?config.rules().primary_areas,
            "Loaded schedule configuration"
        );

        Ok(Self { config })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying schedule configuration.
    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    /// Consumes the loader, returning the schedule configuration.
    pub fn into_config(self) -> ScheduleConfig {
        self.config
    }

    /// Returns the period metadata.
    pub fn period(&self) -> &PeriodMetadata {
        self.config.period()
    }
}
