//! Hardware capability layer for the charging cabinet controller.
//!
//! This crate provides trait-based abstractions for the peripherals a cabinet
//! slot drives: the USB charger, the display, the door lock and the RFID
//! reader. The controllers in `cabinet-control` only ever talk to these
//! traits, so mock implementations (for development and testing) and real
//! drivers can be swapped freely.
//!
//! # Design Philosophy
//!
//! - **Fire-and-forget commands**: charger, display and door commands are
//!   synchronous and never wait on the physical device.
//! - **Shared, not owned**: command capabilities are `Send + Sync` and are
//!   handed to controllers as `Arc<dyn Trait>`; the wiring layer owns them.
//! - **Asynchronous input**: current readings are delivered on an unbounded
//!   per-subscriber channel, and RFID readers are polled with native `async fn`
//!   (Rust 1.90 + Edition 2024 RPITIT).
//!
//! # Charger
//!
//! ```
//! use cabinet_hardware::mock::MockCharger;
//! use cabinet_hardware::traits::ChargerDevice;
//!
//! # #[tokio::main]
//! # async fn main() -> cabinet_hardware::Result<()> {
//! let (charger, handle) = MockCharger::new();
//! let mut readings = charger.subscribe();
//!
//! handle.set_connected(true);
//! handle.emit_current(320.0)?;
//!
//! assert!(charger.is_connected());
//! assert_eq!(readings.recv().await.unwrap().current, 320.0);
//! # Ok(())
//! # }
//! ```
//!
//! # RFID Readers
//!
//! ```no_run
//! use cabinet_core::RfidId;
//! use cabinet_hardware::traits::RfidDevice;
//! use cabinet_hardware::error::Result;
//!
//! async fn next_tag<R: RfidDevice>(reader: &mut R) -> Result<RfidId> {
//!     reader.read_tag().await
//! }
//! ```
//!
//! # Error Handling
//!
//! Fallible operations return [`Result<T>`][error::Result] with
//! [`HardwareError`].

pub mod devices;
pub mod error;
pub mod manager;
pub mod mock;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{HardwareError, Result};
pub use traits::{ChargerDevice, DisplayDevice, DoorDevice, RfidDevice};
pub use types::{CurrentEvent, DeviceInfo};

// Re-export manager types
pub use manager::{PeripheralConfig, PeripheralEvent, PeripheralHandle, PeripheralManager};
