//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading schedule
//! policies from YAML files.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::schedule::SchedulePolicy;

use super::types::PolicyConfig;

/// Loads a [`SchedulePolicy`] from YAML.
///
/// # File format
///
/// ```yaml
/// workdays_weekly: [0, 1, 2, 3, 4]
/// daily_shifts: ["08301145", "13301800"]
/// resolve_policy: throw-error
/// days_off:
///   - "20240101"
///   - { span: "20240101-20240105", calendar: lunar }
/// special_shifts:
///   2024-01-01: ["13301430"]
/// ```
///
/// Shift literals must be quoted, otherwise YAML reads them as numbers.
///
/// # Example
///
/// ```no_run
/// use shift_sla::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/policy.yaml").unwrap();
/// println!("Worked weekdays: {:?}", loader.policy().workdays_weekly());
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    policy: SchedulePolicy,
}

impl ConfigLoader {
    /// Loads a policy from the YAML file at `path`.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` on success, or an error if:
    /// - The file does not exist ([`EngineError::ConfigNotFound`])
    /// - The file is not valid YAML for a policy ([`EngineError::ConfigParseError`])
    /// - A shift or date literal is malformed, or shifts overlap under the
    ///   configured resolution policy (the literal's or resolution's own error)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();
        let config = Self::load_yaml::<PolicyConfig>(path)?;
        let loader = Self::from_config(config)?;
        info!(
            path = %path.display(),
            workdays = loader.policy.workdays_weekly().len(),
            days_off = loader.policy.days_off().len(),
            special_shifts = loader.policy.special_shifts().len(),
            "Loaded schedule policy"
        );
        Ok(loader)
    }

    /// Parses a policy from an in-memory YAML document.
    pub fn from_yaml_str(yaml: &str) -> EngineResult<Self> {
        let config: PolicyConfig =
            serde_yaml::from_str(yaml).map_err(|e| EngineError::ConfigParseError {
                path: "<inline>".to_string(),
                message: e.to_string(),
            })?;
        Self::from_config(config)
    }

    /// Wraps an already deserialized configuration.
    pub fn from_config(config: PolicyConfig) -> EngineResult<Self> {
        Ok(Self {
            policy: config.into_policy()?,
        })
    }

    /// The loaded policy.
    pub fn policy(&self) -> &SchedulePolicy {
        &self.policy
    }

    /// Consumes the loader, returning the policy.
    pub fn into_policy(self) -> SchedulePolicy {
        self.policy
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
}
