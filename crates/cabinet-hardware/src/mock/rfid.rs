//! Mock RFID reader implementation for testing and development.
//!
//! This module provides a simulated RFID reader whose tags are presented
//! programmatically through a [`MockRfidHandle`].

use cabinet_core::RfidId;
use tokio::sync::mpsc;

use crate::{HardwareError, Result, traits::RfidDevice, types::DeviceInfo};

/// Mock RFID reader for testing and development.
///
/// # Examples
///
/// ```
/// use cabinet_core::RfidId;
/// use cabinet_hardware::mock::MockRfid;
/// use cabinet_hardware::traits::RfidDevice;
///
/// #[tokio::main]
/// async fn main() -> cabinet_hardware::Result<()> {
///     let (mut reader, handle) = MockRfid::new();
///
///     handle.present_tag(RfidId::new(42)).await?;
///
///     let tag = reader.read_tag().await?;
///     assert_eq!(tag, RfidId::new(42));
///
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct MockRfid {
    /// Channel receiver for presented tags
    tag_rx: mpsc::Receiver<RfidId>,

    /// Device name
    name: String,
}

impl MockRfid {
    /// Create a new mock RFID reader with the default name.
    ///
    /// Returns a tuple of (MockRfid, MockRfidHandle) where the handle
    /// is used to simulate tag presentations.
    pub fn new() -> (Self, MockRfidHandle) {
        Self::with_name("Mock RFID Reader".to_string())
    }

    /// Create a new mock RFID reader with a custom name.
    pub fn with_name(name: String) -> (Self, MockRfidHandle) {
        let (tag_tx, tag_rx) = mpsc::channel(32);

        let reader = Self {
            tag_rx,
            name: name.clone(),
        };

        let handle = MockRfidHandle { tag_tx, name };

        (reader, handle)
    }
}

impl RfidDevice for MockRfid {
    async fn read_tag(&mut self) -> Result<RfidId> {
        self.tag_rx
            .recv()
            .await
            .ok_or_else(|| {
                HardwareError::disconnected(format!("{}: tag channel closed", self.name))
            })
    }

    async fn get_info(&self) -> Result<DeviceInfo> {
        Ok(DeviceInfo::new(self.name.clone(), "Mock").with_firmware_version("1.0.0"))
    }
}

/// Handle for controlling a mock RFID reader.
///
/// Dropping every handle disconnects the reader: pending tags are still
/// delivered, after which `read_tag` fails.
#[derive(Debug, Clone)]
pub struct MockRfidHandle {
    /// Channel sender for presented tags
    tag_tx: mpsc::Sender<RfidId>,

    /// Device name
    name: String,
}

impl MockRfidHandle {
    /// Present a tag to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader has been dropped.
    pub async fn present_tag(&self, id: RfidId) -> Result<()> {
        self.tag_tx
            .send(id)
            .await
            .map_err(|_| HardwareError::disconnected(format!("{}: reader dropped", self.name)))
    }

    /// Get the device name.
    pub fn name(&self) -> &str {
        &self.name
    }
}
