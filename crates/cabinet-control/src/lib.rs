//! Charging cabinet controllers.
//!
//! Two cooperating state machines drive one cabinet slot:
//!
//! - [`ChargeControl`] reacts to charger current readings (Ready, Charging,
//!   FullyCharged, Error) and publishes over-current notices.
//! - [`StationControl`] handles RFID access to the door (Free, Occupied) and
//!   composes a `ChargeControl`.
//!
//! [`CabinetRuntime`] owns a station and dispatches every input event to it
//! from a single task, so handlers never overlap.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cabinet_core::ChargeConfig;
//! use cabinet_control::{CabinetRuntime, ChargeControl, StationControl};
//! use cabinet_hardware::devices::AnyRfidDevice;
//! use cabinet_hardware::mock::{MockCharger, MockDisplay, MockDoor, MockRfid};
//! use cabinet_hardware::{PeripheralConfig, PeripheralManager};
//!
//! #[tokio::main]
//! async fn main() -> cabinet_hardware::Result<()> {
//!     let (charger, _charger_handle) = MockCharger::new();
//!     let (display, _display_handle) = MockDisplay::new();
//!     let (door, _door_handle) = MockDoor::new();
//!     let (reader, _reader_handle) = MockRfid::new();
//!     let display = Arc::new(display);
//!
//!     let charge = ChargeControl::new(Arc::new(charger), display.clone(), ChargeConfig::default());
//!     let station = StationControl::builder(charge, Arc::new(door), display).build();
//!
//!     let mut manager = PeripheralManager::new(PeripheralConfig::default());
//!     manager.register_rfid(AnyRfidDevice::from(reader));
//!
//!     let mut runtime = CabinetRuntime::new(station);
//!     runtime.run(manager.start(), std::future::pending()).await
//! }
//! ```

pub mod charge_control;
pub mod door_log;
pub mod events;
pub mod history;
pub mod runtime;
pub mod station_control;

pub use charge_control::ChargeControl;
pub use door_log::{
    DoorAction, DoorLog, DoorLogEntry, FileDoorLog, MemoryDoorLog, TracingDoorLog,
};
pub use events::{CurrentEvent, ErrorEventArgs};
pub use history::{StateTransition, TransitionHistory};
pub use runtime::CabinetRuntime;
pub use station_control::{StationControl, StationControlBuilder};
