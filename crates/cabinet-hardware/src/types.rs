//! Common types shared across hardware device implementations.

use serde::{Deserialize, Serialize};

use crate::{HardwareError, Result};

/// A single current reading published by a charger.
///
/// Readings are validated at construction so the controllers never see NaN,
/// infinite or negative values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurrentEvent {
    /// Instantaneous current, in the charger's reporting unit (mA).
    pub current: f64,
}

impl CurrentEvent {
    /// Create a validated current reading.
    ///
    /// # Errors
    ///
    /// Returns an error if the reading is not finite or is negative.
    ///
    /// # Examples
    ///
    /// ```
    /// use cabinet_hardware::CurrentEvent;
    ///
    /// assert_eq!(CurrentEvent::new(6.0).unwrap().current, 6.0);
    /// assert!(CurrentEvent::new(-1.0).is_err());
    /// assert!(CurrentEvent::new(f64::NAN).is_err());
    /// ```
    pub fn new(current: f64) -> Result<Self> {
        if !current.is_finite() || current < 0.0 {
            return Err(HardwareError::invalid_data(format!(
                "Current reading must be a finite, non-negative value, got {}",
                current
            )));
        }
        Ok(Self { current })
    }
}

/// Generic device information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    /// Device name (e.g., "Mock RFID Reader").
    pub name: String,

    /// Device model identifier.
    pub model: String,

    /// Optional firmware version string.
    pub firmware_version: Option<String>,
}

impl DeviceInfo {
    /// Create a new DeviceInfo with required fields.
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
            firmware_version: None,
        }
    }

    /// Set the firmware version.
    pub fn with_firmware_version(mut self, firmware_version: impl Into<String>) -> Self {
        self.firmware_version = Some(firmware_version.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_event_accepts_zero_and_positive() {
        assert_eq!(CurrentEvent::new(0.0).unwrap().current, 0.0);
        assert_eq!(CurrentEvent::new(530.0).unwrap().current, 530.0);
    }

    #[test]
    fn test_current_event_rejects_malformed_readings() {
        for reading in [-0.5, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = CurrentEvent::new(reading);
            assert!(matches!(result, Err(HardwareError::InvalidData { .. })));
        }
    }

    #[test]
    fn test_device_info_builder() {
        let info = DeviceInfo::new("Slot 1 reader", "Mock").with_firmware_version("v1.2");

        assert_eq!(info.name, "Slot 1 reader");
        assert_eq!(info.model, "Mock");
        assert_eq!(info.firmware_version, Some("v1.2".to_string()));
    }

    #[test]
    fn test_current_event_serialization() {
        let event = CurrentEvent::new(6.0).unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"current":6.0}"#);
    }
}
