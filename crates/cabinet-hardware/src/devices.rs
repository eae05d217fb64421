//! Enum wrappers for RFID reader dispatch.
//!
//! Native `async fn` in traits (RPITIT) is not object-safe, so readers cannot
//! be stored as `Box<dyn RfidDevice>`. [`AnyRfidDevice`] provides concrete
//! type dispatch instead, which keeps the reader futures `Send` for spawning
//! on the Tokio runtime.
//!
//! # Examples
//!
//! ```
//! use cabinet_hardware::devices::AnyRfidDevice;
//! use cabinet_hardware::mock::MockRfid;
//!
//! let (reader, _handle) = MockRfid::new();
//! let any_reader = AnyRfidDevice::Mock(reader);
//! ```

use cabinet_core::RfidId;

use crate::mock::MockRfid;
use crate::traits::RfidDevice;
use crate::{DeviceInfo, Result};

/// Enum wrapper for RFID reader dispatch.
#[derive(Debug)]
#[non_exhaustive]
pub enum AnyRfidDevice {
    /// Mock reader for development and testing.
    Mock(MockRfid),
}

impl RfidDevice for AnyRfidDevice {
    async fn read_tag(&mut self) -> Result<RfidId> {
        match self {
            Self::Mock(device) => device.read_tag().await,
        }
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        match self {
            Self::Mock(device) => device.get_info().await,
        }
    }
}

impl From<MockRfid> for AnyRfidDevice {
    fn from(device: MockRfid) -> Self {
        Self::Mock(device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_any_rfid_device_dispatch() {
        let (reader, handle) = MockRfid::with_name("Dispatch".to_string());
        let mut any_reader = AnyRfidDevice::from(reader);

        handle.present_tag(RfidId::new(9)).await.unwrap();

        assert_eq!(any_reader.read_tag().await.unwrap(), RfidId::new(9));
        assert_eq!(any_reader.get_info().await.unwrap().name, "Dispatch");
    }
}
