//! Cabinet configuration.
//!
//! Configuration is a plain serde structure with sensible defaults. The
//! wiring layer loads it from a JSON file and hands the relevant sections
//! to each controller.
//!
//! ```
//! use cabinet_core::CabinetConfig;
//!
//! let config: CabinetConfig = serde_json::from_str(r#"{ "charge": { "threshold_error": 750.0 } }"#).unwrap();
//! assert_eq!(config.charge.threshold_error, 750.0);
//! assert!(config.validate().is_ok());
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EVENT_CAPACITY, DEFAULT_THRESHOLD_ERROR};
use crate::{Error, Result};

/// Charge controller configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeConfig {
    /// Readings strictly above this value are over-current faults.
    pub threshold_error: f64,
}

impl Default for ChargeConfig {
    fn default() -> Self {
        Self {
            threshold_error: DEFAULT_THRESHOLD_ERROR,
        }
    }
}

impl ChargeConfig {
    /// Create a configuration with a custom fault threshold.
    pub fn with_threshold(threshold_error: f64) -> Self {
        Self { threshold_error }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    /// Returns `Error::Config` if the threshold is not a finite, positive value.
    pub fn validate(&self) -> Result<()> {
        if !self.threshold_error.is_finite() || self.threshold_error <= 0.0 {
            return Err(Error::Config(format!(
                "threshold_error must be a positive finite value, got {}",
                self.threshold_error
            )));
        }
        Ok(())
    }
}

/// Top-level configuration for one cabinet slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CabinetConfig {
    /// Charge controller settings.
    pub charge: ChargeConfig,

    /// Append door lock/unlock records to this file. When unset, records
    /// only go to the tracing log.
    pub door_log_path: Option<PathBuf>,

    /// Capacity of the peripheral event channel.
    pub event_capacity: usize,
}

impl Default for CabinetConfig {
    fn default() -> Self {
        Self {
            charge: ChargeConfig::default(),
            door_log_path: None,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

impl CabinetConfig {
    /// Load and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON,
    /// or fails validation.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: CabinetConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        self.charge.validate()?;
        if self.event_capacity == 0 {
            return Err(Error::Config("event_capacity must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = CabinetConfig::default();
        assert_eq!(config.charge.threshold_error, DEFAULT_THRESHOLD_ERROR);
        assert_eq!(config.event_capacity, DEFAULT_EVENT_CAPACITY);
        assert!(config.door_log_path.is_none());
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(0.0)]
    #[case(-5.0)]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    fn test_invalid_threshold(#[case] threshold: f64) {
        let config = ChargeConfig::with_threshold(threshold);
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_event_capacity_rejected() {
        let config = CabinetConfig {
            event_capacity: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CabinetConfig =
            serde_json::from_str(r#"{ "door_log_path": "/tmp/door.log" }"#).unwrap();
        assert_eq!(config.charge, ChargeConfig::default());
        assert_eq!(config.door_log_path, Some(PathBuf::from("/tmp/door.log")));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "charge": {{ "threshold_error": 600.0 }}, "event_capacity": 8 }}"#)
            .unwrap();

        let config = CabinetConfig::from_file(file.path()).unwrap();
        assert_eq!(config.charge.threshold_error, 600.0);
        assert_eq!(config.event_capacity, 8);
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "charge": {{ "threshold_error": -1.0 }} }}"#).unwrap();

        assert!(matches!(
            CabinetConfig::from_file(file.path()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_file_rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert!(matches!(
            CabinetConfig::from_file(file.path()),
            Err(Error::ConfigParse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = CabinetConfig::from_file("/nonexistent/cabinet.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
