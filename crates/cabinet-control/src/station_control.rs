//! Station control state machine.
//!
//! `StationControl` owns one cabinet slot: it decides who may lock and
//! unlock the door and drives the composed [`ChargeControl`].
//!
//! # States
//!
//! - `Free`: door unlocked, no occupant. A tag presented with a phone
//!   connected locks the door, records the tag and starts charging.
//! - `Occupied`: door locked. Only the recorded tag unlocks it; any other
//!   tag is rejected on the display and never touches the door.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cabinet_core::{ChargeConfig, RfidId, StationStateId};
//! use cabinet_control::{ChargeControl, StationControl};
//! use cabinet_hardware::mock::{MockCharger, MockDisplay, MockDoor};
//!
//! let (charger, charger_handle) = MockCharger::new();
//! let (display, display_handle) = MockDisplay::new();
//! let (door, door_handle) = MockDoor::new();
//! let display = Arc::new(display);
//!
//! let charge = ChargeControl::new(Arc::new(charger), display.clone(), ChargeConfig::default());
//! let mut station = StationControl::builder(charge, Arc::new(door), display).build();
//!
//! charger_handle.set_connected(true);
//! station.on_rfid_detected(RfidId::new(42));
//! assert_eq!(station.state(), StationStateId::Occupied);
//! assert!(door_handle.is_locked());
//!
//! station.on_rfid_detected(RfidId::new(99));
//! assert_eq!(display_handle.main_text().as_deref(), Some("Incorrect RFID!"));
//! assert!(door_handle.is_locked());
//!
//! station.on_rfid_detected(RfidId::new(42));
//! assert_eq!(station.state(), StationStateId::Free);
//! assert!(!door_handle.is_locked());
//! ```

use std::fmt;
use std::sync::Arc;

use cabinet_core::constants::{
    MSG_CABINET_LOCKED, MSG_CHARGE_FAULT, MSG_CONNECT_PHONE, MSG_INCORRECT_RFID, MSG_REMOVE_PHONE,
};
use cabinet_core::{RfidId, StationStateId};
use cabinet_hardware::{DisplayDevice, DoorDevice};
use tracing::{debug, info, warn};

use crate::charge_control::ChargeControl;
use crate::door_log::{DoorLog, TracingDoorLog};
use crate::events::ErrorEventArgs;
use crate::history::TransitionHistory;

/// Station controller for one cabinet slot.
///
/// Invariant: `saved_id` is `Some` exactly while the station is `Occupied`.
pub struct StationControl {
    state: StationStateId,
    charge_control: ChargeControl,
    door: Arc<dyn DoorDevice>,
    display: Arc<dyn DisplayDevice>,
    door_log: Arc<dyn DoorLog>,
    saved_id: Option<RfidId>,
    history: TransitionHistory<StationStateId>,
}

impl StationControl {
    /// Create a free station that reports door activity to `door_log`.
    pub fn new(
        charge_control: ChargeControl,
        door: Arc<dyn DoorDevice>,
        display: Arc<dyn DisplayDevice>,
        door_log: Arc<dyn DoorLog>,
    ) -> Self {
        Self::builder(charge_control, door, display)
            .with_door_log(door_log)
            .build()
    }

    /// Create a builder, e.g. to restore an occupied station after a restart.
    pub fn builder(
        charge_control: ChargeControl,
        door: Arc<dyn DoorDevice>,
        display: Arc<dyn DisplayDevice>,
    ) -> StationControlBuilder {
        StationControlBuilder {
            charge_control,
            door,
            display,
            door_log: Arc::new(TracingDoorLog),
            occupant: None,
        }
    }

    /// React to a tag presented to the cabinet's reader.
    pub fn on_rfid_detected(&mut self, id: RfidId) {
        match self.state {
            StationStateId::Free => self.lock_for(id),
            StationStateId::Occupied => {
                if self.saved_id == Some(id) {
                    self.door.unlock_door();
                    self.log_door_unlocked(id);
                    self.display.set_main_text(MSG_REMOVE_PHONE);
                    self.charging_finished();
                } else {
                    warn!("Rejected RFID {} for occupied station", id);
                    self.display.set_main_text(MSG_INCORRECT_RFID);
                }
            }
        }
    }

    /// End the occupant's session: stop charging, reset the charger state,
    /// forget the saved tag and free the station.
    pub fn charging_finished(&mut self) {
        self.charge_control.charger().stop_charge();
        self.charge_control.reset();
        self.saved_id = None;
        if self.state != StationStateId::Free {
            self.change_state(StationStateId::Free);
        }
    }

    /// React to an over-current notification from the charge controller.
    ///
    /// The door stays locked; the occupant still needs their tag to
    /// retrieve the phone.
    pub fn on_charge_error(&mut self, error: &ErrorEventArgs) {
        warn!("Charging fault at {} in {} station", error.current, self.state);
        if self.state == StationStateId::Occupied {
            self.display.set_main_text(MSG_CHARGE_FAULT);
        }
    }

    pub fn log_door_locked(&self, id: RfidId) {
        self.door_log.log_door_locked(id);
    }

    pub fn log_door_unlocked(&self, id: RfidId) {
        self.door_log.log_door_unlocked(id);
    }

    pub fn state(&self) -> StationStateId {
        self.state
    }

    /// Tag of the current occupant.
    pub fn saved_id(&self) -> Option<RfidId> {
        self.saved_id
    }

    pub fn charge_control(&self) -> &ChargeControl {
        &self.charge_control
    }

    pub fn charge_control_mut(&mut self) -> &mut ChargeControl {
        &mut self.charge_control
    }

    pub fn history(&self) -> &TransitionHistory<StationStateId> {
        &self.history
    }

    fn lock_for(&mut self, id: RfidId) {
        if !self.charge_control.device_connected() {
            debug!("RFID {} presented without a connected phone", id);
            self.display.set_main_text(MSG_CONNECT_PHONE);
            return;
        }

        self.door.lock_door();
        self.saved_id = Some(id);
        self.charge_control.start_charge();
        self.log_door_locked(id);
        self.display.set_main_text(MSG_CABINET_LOCKED);
        self.change_state(StationStateId::Occupied);
    }

    fn change_state(&mut self, next: StationStateId) {
        info!("Station state {} -> {}", self.state, next);
        self.history.record(self.state, next);
        self.state = next;
    }
}

impl fmt::Debug for StationControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StationControl")
            .field("state", &self.state)
            .field("saved_id", &self.saved_id)
            .field("charge_control", &self.charge_control)
            .finish_non_exhaustive()
    }
}

/// Builder for [`StationControl`].
pub struct StationControlBuilder {
    charge_control: ChargeControl,
    door: Arc<dyn DoorDevice>,
    display: Arc<dyn DisplayDevice>,
    door_log: Arc<dyn DoorLog>,
    occupant: Option<RfidId>,
}

impl StationControlBuilder {
    /// Report door activity to `door_log` instead of the tracing log.
    pub fn with_door_log(mut self, door_log: Arc<dyn DoorLog>) -> Self {
        self.door_log = door_log;
        self
    }

    /// Start `Occupied`, locked by `id`.
    ///
    /// The door is assumed to be locked already. [`build`](Self::build)
    /// resumes charging so current readings are monitored again.
    pub fn with_occupant(mut self, id: RfidId) -> Self {
        self.occupant = Some(id);
        self
    }

    pub fn build(self) -> StationControl {
        let mut charge_control = self.charge_control;
        let state = match self.occupant {
            Some(id) => {
                info!("Restoring station occupied by RFID {}", id);
                charge_control.start_charge();
                StationStateId::Occupied
            }
            None => StationStateId::Free,
        };

        StationControl {
            state,
            charge_control,
            door: self.door,
            display: self.display,
            door_log: self.door_log,
            saved_id: self.occupant,
            history: TransitionHistory::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::door_log::{DoorAction, MemoryDoorLog};
    use cabinet_core::{ChargeConfig, ChargeStateId};
    use cabinet_hardware::mock::{
        MockCharger, MockChargerHandle, MockDisplay, MockDisplayHandle, MockDoor, MockDoorHandle,
    };

    struct Fixture {
        charger: MockChargerHandle,
        display: MockDisplayHandle,
        door: MockDoorHandle,
        log: Arc<MemoryDoorLog>,
        charge_control: Option<ChargeControl>,
        door_device: Arc<dyn DoorDevice>,
        display_device: Arc<dyn DisplayDevice>,
    }

    fn setup() -> Fixture {
        let (charger, charger_handle) = MockCharger::new();
        let (display, display_handle) = MockDisplay::new();
        let (door, door_handle) = MockDoor::new();
        let display_device: Arc<dyn DisplayDevice> = Arc::new(display);

        let charge_control = ChargeControl::new(
            Arc::new(charger),
            Arc::clone(&display_device),
            ChargeConfig::default(),
        );

        Fixture {
            charger: charger_handle,
            display: display_handle,
            door: door_handle,
            log: Arc::new(MemoryDoorLog::new()),
            charge_control: Some(charge_control),
            door_device: Arc::new(door),
            display_device,
        }
    }

    impl Fixture {
        fn free_station(&mut self) -> StationControl {
            StationControl::new(
                self.charge_control.take().unwrap(),
                Arc::clone(&self.door_device),
                Arc::clone(&self.display_device),
                self.log.clone(),
            )
        }

        fn occupied_station(&mut self, id: u32) -> StationControl {
            StationControl::builder(
                self.charge_control.take().unwrap(),
                Arc::clone(&self.door_device),
                Arc::clone(&self.display_device),
            )
            .with_door_log(self.log.clone())
            .with_occupant(RfidId::new(id))
            .build()
        }
    }

    #[test]
    fn test_new_station_is_free() {
        let mut f = setup();
        let station = f.free_station();

        assert_eq!(station.state(), StationStateId::Free);
        assert_eq!(station.saved_id(), None);
        assert!(station.history().is_empty());
    }

    #[test]
    fn test_occupied_matching_id_unlocks_door() {
        let mut f = setup();
        let mut station = f.occupied_station(42);

        station.on_rfid_detected(RfidId::new(42));

        assert_eq!(f.door.unlock_count(), 1);
        assert_eq!(
            f.display.main_text().as_deref(),
            Some("Remove your phone, peasant")
        );
        let entries = f.log.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, DoorAction::Unlocked);
        assert_eq!(entries[0].id, RfidId::new(42));
    }

    #[test]
    fn test_occupied_matching_id_finishes_charging() {
        let mut f = setup();
        let mut station = f.occupied_station(42);

        station.on_rfid_detected(RfidId::new(42));

        assert_eq!(station.state(), StationStateId::Free);
        assert_eq!(station.saved_id(), None);
        assert_eq!(station.charge_control().state(), ChargeStateId::Ready);
        assert!(f.charger.stop_count() >= 1);
    }

    #[test]
    fn test_occupied_wrong_id_is_rejected() {
        let mut f = setup();
        let mut station = f.occupied_station(42);

        station.on_rfid_detected(RfidId::new(99));

        assert_eq!(f.display.main_text().as_deref(), Some("Incorrect RFID!"));
        assert_eq!(f.door.unlock_count(), 0);
        assert_eq!(station.state(), StationStateId::Occupied);
        assert_eq!(station.saved_id(), Some(RfidId::new(42)));
        assert!(f.log.entries().is_empty());
    }

    #[test]
    fn test_free_with_phone_locks_and_starts_charging() {
        // Assumed policy: a free cabinet locks on the first tag only when a
        // phone is already connected
        let mut f = setup();
        f.charger.set_connected(true);
        let mut station = f.free_station();

        station.on_rfid_detected(RfidId::new(42));

        assert_eq!(station.state(), StationStateId::Occupied);
        assert_eq!(station.saved_id(), Some(RfidId::new(42)));
        assert!(f.door.is_locked());
        assert_eq!(station.charge_control().state(), ChargeStateId::Charging);
        assert_eq!(f.charger.start_count(), 1);
        assert_eq!(
            f.display.main_text().as_deref(),
            Some("Cabinet locked. Use your RFID tag to unlock.")
        );
        assert_eq!(f.log.entries()[0].action, DoorAction::Locked);
    }

    #[test]
    fn test_free_without_phone_stays_free() {
        // Assumed policy: without a phone the tag is refused with a prompt
        let mut f = setup();
        let mut station = f.free_station();

        station.on_rfid_detected(RfidId::new(42));

        assert_eq!(station.state(), StationStateId::Free);
        assert_eq!(station.saved_id(), None);
        assert_eq!(f.door.lock_count(), 0);
        assert_eq!(f.display.main_text().as_deref(), Some("Connect your phone."));
    }

    #[test]
    fn test_full_session_history() {
        let mut f = setup();
        f.charger.set_connected(true);
        let mut station = f.free_station();

        station.on_rfid_detected(RfidId::new(7));
        station.on_rfid_detected(RfidId::new(8));
        station.on_rfid_detected(RfidId::new(7));

        let states: Vec<_> = station.history().entries().iter().map(|t| t.to).collect();
        assert_eq!(states, vec![StationStateId::Occupied, StationStateId::Free]);
        assert_eq!(f.door.lock_count(), 1);
        assert_eq!(f.door.unlock_count(), 1);
    }

    #[test]
    fn test_charge_error_keeps_door_locked() {
        let mut f = setup();
        f.charger.set_connected(true);
        let mut station = f.free_station();
        let mut errors = station.charge_control().subscribe_errors();
        station.on_rfid_detected(RfidId::new(42));

        f.charger.emit_current(530.0).unwrap();
        station.charge_control_mut().process_pending_events();
        let error = errors.try_recv().unwrap();
        station.on_charge_error(&error);

        assert_eq!(station.charge_control().state(), ChargeStateId::Error);
        assert!(f.door.is_locked());
        assert_eq!(
            f.display.main_text().as_deref(),
            Some("Charging stopped. Use your RFID tag to unlock.")
        );

        // Owner can still retrieve the phone, which clears the fault
        station.on_rfid_detected(RfidId::new(42));
        assert!(!f.door.is_locked());
        assert_eq!(station.charge_control().state(), ChargeStateId::Ready);
    }

    #[test]
    fn test_restored_station_monitors_current() {
        let mut f = setup();
        f.charger.set_connected(true);
        let mut station = f.occupied_station(42);
        let mut errors = station.charge_control().subscribe_errors();

        assert!(station.charge_control().is_subscribed());
        assert_eq!(station.charge_control().state(), ChargeStateId::Charging);
        assert_eq!(f.charger.start_count(), 1);

        f.charger.emit_current(530.0).unwrap();
        station.charge_control_mut().process_pending_events();

        assert_eq!(station.charge_control().state(), ChargeStateId::Error);
        assert!(!f.charger.is_charging());
        assert_eq!(errors.try_recv().unwrap().current, 530.0);
        assert_eq!(station.state(), StationStateId::Occupied);
    }

    #[test]
    fn test_restored_station_without_phone_still_subscribes() {
        let mut f = setup();
        let station = f.occupied_station(42);

        assert!(station.charge_control().is_subscribed());
        assert_eq!(station.charge_control().state(), ChargeStateId::Ready);
        assert_eq!(f.charger.start_count(), 0);
    }

    #[test]
    fn test_charge_error_while_free_leaves_main_text() {
        let mut f = setup();
        let mut station = f.free_station();

        station.on_charge_error(&ErrorEventArgs::new(600.0));

        assert_eq!(f.display.main_text(), None);
    }
}
