//! Peripheral input manager.
//!
//! The `PeripheralManager` runs each input device in its own async task and
//! funnels their events into one channel, so the cabinet runtime can handle
//! them strictly one at a time in arrival order.
//!
//! ```text
//! ┌──────────┐       ┌─────────────────┐
//! │ RFID     │──────►│  Event Channel  │──────► Cabinet runtime
//! │ Task     │       │  (mpsc)         │
//! └──────────┘       └─────────────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use cabinet_hardware::manager::{PeripheralManager, PeripheralConfig};
//! use cabinet_hardware::devices::AnyRfidDevice;
//! use cabinet_hardware::mock::MockRfid;
//!
//! #[tokio::main]
//! async fn main() -> cabinet_hardware::Result<()> {
//!     let mut manager = PeripheralManager::new(PeripheralConfig::default());
//!
//!     let (reader, _handle) = MockRfid::new();
//!     manager.register_rfid(AnyRfidDevice::Mock(reader));
//!
//!     let mut handle = manager.start();
//!     while let Some(event) = handle.recv().await {
//!         println!("Event: {:?}", event);
//!     }
//!
//!     handle.shutdown().await
//! }
//! ```

use cabinet_core::RfidId;
use cabinet_core::constants::DEFAULT_EVENT_CAPACITY;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::devices::AnyRfidDevice;
use crate::traits::RfidDevice;
use crate::{HardwareError, Result};

/// Unified event from any input peripheral.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum PeripheralEvent {
    /// A tag was presented to the cabinet's RFID reader.
    RfidDetected(RfidId),

    /// Device error occurred.
    ///
    /// The device task terminates after sending this event.
    DeviceError {
        /// Name of the device that failed.
        device: String,

        /// Error message.
        error: String,
    },
}

/// Configuration for input peripherals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeripheralConfig {
    /// Enable the RFID reader task.
    pub rfid_enabled: bool,

    /// Capacity of the shared event channel.
    pub event_capacity: usize,
}

impl Default for PeripheralConfig {
    fn default() -> Self {
        Self {
            rfid_enabled: true,
            event_capacity: DEFAULT_EVENT_CAPACITY,
        }
    }
}

/// Handle for receiving events from peripheral devices.
pub struct PeripheralHandle {
    /// Event receiver for consuming events from devices.
    event_rx: mpsc::Receiver<PeripheralEvent>,

    /// Running device tasks.
    tasks: JoinSet<Result<()>>,
}

impl PeripheralHandle {
    /// Receive the next event from any peripheral device.
    ///
    /// Returns `None` once every device task has terminated.
    pub async fn recv(&mut self) -> Option<PeripheralEvent> {
        self.event_rx.recv().await
    }

    /// Abort all device tasks and wait for them to terminate.
    ///
    /// Individual task failures are logged, not returned.
    pub async fn shutdown(mut self) -> Result<()> {
        self.tasks.abort_all();

        while let Some(result) = self.tasks.join_next().await {
            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => debug!("Peripheral task ended with error: {}", e),
                Err(e) if e.is_cancelled() => {}
                Err(e) => warn!("Peripheral task panicked: {}", e),
            }
        }

        Ok(())
    }
}

/// Manages input peripherals for one cabinet slot.
///
/// # Lifecycle
///
/// 1. Create manager with configuration
/// 2. Register devices using `register_*` methods
/// 3. Call `start()` to spawn device tasks and get the event handle
/// 4. Device tasks run until error or the handle is dropped
pub struct PeripheralManager {
    /// Registered RFID reader.
    rfid: Option<AnyRfidDevice>,

    /// Configuration.
    config: PeripheralConfig,
}

impl PeripheralManager {
    /// Create new peripheral manager with configuration.
    pub fn new(config: PeripheralConfig) -> Self {
        Self { rfid: None, config }
    }

    /// Register the RFID reader.
    pub fn register_rfid(&mut self, device: AnyRfidDevice) {
        self.rfid = Some(device);
    }

    /// Whether an RFID reader has been registered.
    pub fn has_rfid(&self) -> bool {
        self.rfid.is_some()
    }

    /// Spawn a task per enabled device and return the event handle.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(mut self) -> PeripheralHandle {
        let (event_tx, event_rx) = mpsc::channel(self.config.event_capacity.max(1));
        let mut tasks = JoinSet::new();

        if self.config.rfid_enabled
            && let Some(device) = self.rfid.take()
        {
            tasks.spawn(Self::rfid_task(device, event_tx));
        }

        PeripheralHandle { event_rx, tasks }
    }

    async fn rfid_task(mut device: AnyRfidDevice, tx: mpsc::Sender<PeripheralEvent>) -> Result<()> {
        let name = match device.get_info().await {
            Ok(info) => info.name,
            Err(_) => "RFID reader".to_string(),
        };
        debug!("RFID task started for {}", name);

        loop {
            match device.read_tag().await {
                Ok(id) => {
                    if tx.send(PeripheralEvent::RfidDetected(id)).await.is_err() {
                        // Channel closed
                        break;
                    }
                }
                Err(e) => {
                    warn!("{} failed: {}", name, e);
                    let _ = tx
                        .send(PeripheralEvent::DeviceError {
                            device: name,
                            error: e.to_string(),
                        })
                        .await;
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

impl PeripheralEvent {
    /// The presented tag, if this is a detection event.
    pub fn rfid(&self) -> Option<RfidId> {
        match self {
            PeripheralEvent::RfidDetected(id) => Some(*id),
            PeripheralEvent::DeviceError { .. } => None,
        }
    }

    /// Convert a device error event into a [`HardwareError`].
    pub fn as_error(&self) -> Option<HardwareError> {
        match self {
            PeripheralEvent::DeviceError { device, error } => {
                Some(HardwareError::communication(format!("{}: {}", device, error)))
            }
            PeripheralEvent::RfidDetected(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockRfid;

    #[tokio::test]
    async fn test_manager_forwards_tags_in_order() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());
        let (reader, reader_handle) = MockRfid::new();
        manager.register_rfid(AnyRfidDevice::Mock(reader));
        assert!(manager.has_rfid());

        let mut handle = manager.start();

        reader_handle.present_tag(RfidId::new(42)).await.unwrap();
        reader_handle.present_tag(RfidId::new(99)).await.unwrap();

        assert_eq!(
            handle.recv().await,
            Some(PeripheralEvent::RfidDetected(RfidId::new(42)))
        );
        assert_eq!(
            handle.recv().await,
            Some(PeripheralEvent::RfidDetected(RfidId::new(99)))
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_manager_reports_device_error() {
        let mut manager = PeripheralManager::new(PeripheralConfig::default());
        let (reader, reader_handle) = MockRfid::with_name("Flaky".to_string());
        manager.register_rfid(AnyRfidDevice::Mock(reader));

        let mut handle = manager.start();
        drop(reader_handle);

        let event = handle.recv().await.unwrap();
        match &event {
            PeripheralEvent::DeviceError { device, .. } => assert_eq!(device, "Flaky"),
            other => panic!("unexpected event {:?}", other),
        }
        assert!(event.as_error().is_some());

        // Task terminated, channel closes
        assert_eq!(handle.recv().await, None);
    }

    #[tokio::test]
    async fn test_disabled_rfid_is_not_started() {
        let config = PeripheralConfig {
            rfid_enabled: false,
            ..Default::default()
        };
        let mut manager = PeripheralManager::new(config);
        let (reader, _reader_handle) = MockRfid::new();
        manager.register_rfid(AnyRfidDevice::Mock(reader));

        let mut handle = manager.start();
        assert_eq!(handle.recv().await, None);
    }

    #[test]
    fn test_peripheral_event_accessors() {
        let detected = PeripheralEvent::RfidDetected(RfidId::new(5));
        assert_eq!(detected.rfid(), Some(RfidId::new(5)));
        assert!(detected.as_error().is_none());

        let failed = PeripheralEvent::DeviceError {
            device: "reader".to_string(),
            error: "unplugged".to_string(),
        };
        assert_eq!(failed.rfid(), None);
        assert_eq!(
            failed.as_error().unwrap().to_string(),
            "Communication error: reader: unplugged"
        );
    }
}
