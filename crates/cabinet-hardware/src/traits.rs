//! Hardware capability trait definitions.
//!
//! These traits establish the contract between the cabinet controllers and
//! the peripheral drivers. Command capabilities (charger, display, door) are
//! plain synchronous traits so they can be shared as `Arc<dyn Trait>`; the
//! RFID reader uses native `async fn` methods (Rust 1.90 + Edition 2024
//! RPITIT) and is dispatched through [`AnyRfidDevice`](crate::devices::AnyRfidDevice).

#![allow(async_fn_in_trait)]

use cabinet_core::RfidId;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::{CurrentEvent, DeviceInfo};

/// USB charger capability.
///
/// Commands are fire-and-forget: implementations forward them to the driver
/// and return immediately. Current readings are published asynchronously to
/// every subscriber in the order the charger produced them.
pub trait ChargerDevice: Send + Sync {
    /// Begin delivering current to the connected device.
    fn start_charge(&self);

    /// Stop delivering current.
    fn stop_charge(&self);

    /// Whether a device is physically connected to the charger.
    fn is_connected(&self) -> bool;

    /// The most recent current reading.
    fn current_value(&self) -> f64;

    /// Subscribe to current readings.
    ///
    /// Each call returns an independent receiver that observes every reading
    /// published after the call, in order. Readings are never dropped for a
    /// slow subscriber.
    fn subscribe(&self) -> mpsc::UnboundedReceiver<CurrentEvent>;
}

/// Cabinet display capability.
///
/// The display has two independent text areas: the main area for station
/// instructions and the charging area for charger status.
pub trait DisplayDevice: Send + Sync {
    /// Replace the main text area.
    fn set_main_text(&self, text: &str);

    /// Replace the charging status text area.
    fn set_charging_text(&self, text: &str);
}

/// Door lock capability.
pub trait DoorDevice: Send + Sync {
    /// Engage the door lock.
    fn lock_door(&self);

    /// Release the door lock.
    fn unlock_door(&self);
}

/// RFID reader capability.
///
/// # Examples
///
/// ```no_run
/// use cabinet_hardware::traits::RfidDevice;
/// use cabinet_hardware::error::Result;
///
/// async fn log_tags<R: RfidDevice>(reader: &mut R) -> Result<()> {
///     let info = reader.get_info().await?;
///     loop {
///         let tag = reader.read_tag().await?;
///         println!("{} read tag {}", info.name, tag);
///     }
/// }
/// ```
pub trait RfidDevice: Send {
    /// Wait for the next tag presented to the reader.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader is disconnected or the tag cannot be
    /// decoded.
    async fn read_tag(&mut self) -> Result<RfidId>;

    /// Get reader information.
    async fn get_info(&self) -> Result<DeviceInfo>;
}
