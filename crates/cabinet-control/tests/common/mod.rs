//! Common test utilities for cabinet integration tests.
//!
//! Builds a fully wired cabinet slot backed by mock devices and exposes the
//! mock handles so tests can drive the hardware and observe its commands.

use std::sync::Arc;
use std::time::Duration;

use cabinet_control::{ChargeControl, MemoryDoorLog, StationControl};
use cabinet_core::{ChargeConfig, RfidId};
use cabinet_hardware::DisplayDevice;
use cabinet_hardware::mock::{
    MockCharger, MockChargerHandle, MockDisplay, MockDisplayHandle, MockDoor, MockDoorHandle,
};

/// Standard owner tag.
pub const OWNER: RfidId = RfidId::new(42);

/// Tag that does not own the cabinet.
pub const STRANGER: RfidId = RfidId::new(99);

/// A cabinet slot wired to mock devices.
pub struct Cabinet {
    pub station: StationControl,
    pub charger: MockChargerHandle,
    pub display: MockDisplayHandle,
    pub door: MockDoorHandle,
    pub log: Arc<MemoryDoorLog>,
}

/// Free cabinet with the default fault threshold.
pub fn cabinet() -> Cabinet {
    build(ChargeConfig::default(), None, false)
}

/// Cabinet already occupied by `owner`, as after a restart with no phone
/// connected.
pub fn occupied_cabinet(owner: RfidId) -> Cabinet {
    build(ChargeConfig::default(), Some(owner), false)
}

/// Cabinet restored after a restart with the owner's phone still connected.
pub fn restored_charging_cabinet(owner: RfidId) -> Cabinet {
    build(ChargeConfig::default(), Some(owner), true)
}

fn build(config: ChargeConfig, owner: Option<RfidId>, connected: bool) -> Cabinet {
    let (charger, charger_handle) = MockCharger::new();
    charger_handle.set_connected(connected);
    let (display, display_handle) = MockDisplay::new();
    let (door, door_handle) = MockDoor::new();
    let display: Arc<dyn DisplayDevice> = Arc::new(display);
    let log = Arc::new(MemoryDoorLog::new());

    let charge = ChargeControl::new(Arc::new(charger), Arc::clone(&display), config);
    let mut builder =
        StationControl::builder(charge, Arc::new(door), display).with_door_log(log.clone());
    if let Some(id) = owner {
        builder = builder.with_occupant(id);
    }

    Cabinet {
        station: builder.build(),
        charger: charger_handle,
        display: display_handle,
        door: door_handle,
        log,
    }
}

/// Poll `condition` until it holds, failing the test after one second.
pub async fn wait_until(what: &str, mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(1);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {}",
            what
        );
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
