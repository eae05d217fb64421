//! Mock device implementations for testing and development.
//!
//! This module provides simulated devices that can be controlled and
//! inspected programmatically without requiring physical hardware. Every
//! mock is created together with a handle that shares its state.

pub mod charger;
pub mod display;
pub mod door;
pub mod rfid;

// Re-export commonly used types
pub use charger::{MockCharger, MockChargerHandle};
pub use display::{MockDisplay, MockDisplayHandle};
pub use door::{MockDoor, MockDoorHandle};
pub use rfid::{MockRfid, MockRfidHandle};
