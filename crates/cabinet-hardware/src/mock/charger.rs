//! Mock USB charger for testing and development.
//!
//! The mock records every command it receives and lets tests publish current
//! readings and toggle the connection flag through a [`MockChargerHandle`].

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::trace;

use crate::{CurrentEvent, Result, traits::ChargerDevice};

/// Shared charger state observed by both the device and its handle.
#[derive(Debug, Default)]
struct ChargerState {
    connected: bool,
    current: f64,
    charging: bool,
    start_count: usize,
    stop_count: usize,
    subscribers: Vec<mpsc::UnboundedSender<CurrentEvent>>,
}

/// Mock USB charger.
///
/// # Examples
///
/// ```
/// use cabinet_hardware::mock::MockCharger;
/// use cabinet_hardware::traits::ChargerDevice;
///
/// let (charger, handle) = MockCharger::new();
/// handle.set_connected(true);
///
/// charger.start_charge();
/// charger.stop_charge();
///
/// assert_eq!(handle.start_count(), 1);
/// assert_eq!(handle.stop_count(), 1);
/// assert!(!handle.is_charging());
/// ```
#[derive(Debug)]
pub struct MockCharger {
    state: Arc<Mutex<ChargerState>>,
}

impl MockCharger {
    /// Create a disconnected mock charger and its control handle.
    pub fn new() -> (Self, MockChargerHandle) {
        let state = Arc::new(Mutex::new(ChargerState::default()));

        let charger = Self {
            state: Arc::clone(&state),
        };
        let handle = MockChargerHandle { state };

        (charger, handle)
    }

    fn state(&self) -> MutexGuard<'_, ChargerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ChargerDevice for MockCharger {
    fn start_charge(&self) {
        let mut state = self.state();
        state.charging = true;
        state.start_count += 1;
        trace!("Mock charger started");
    }

    fn stop_charge(&self) {
        let mut state = self.state();
        state.charging = false;
        state.stop_count += 1;
        trace!("Mock charger stopped");
    }

    fn is_connected(&self) -> bool {
        self.state().connected
    }

    fn current_value(&self) -> f64 {
        self.state().current
    }

    fn subscribe(&self) -> mpsc::UnboundedReceiver<CurrentEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.state().subscribers.push(tx);
        rx
    }
}

/// Handle for controlling a [`MockCharger`].
#[derive(Debug, Clone)]
pub struct MockChargerHandle {
    state: Arc<Mutex<ChargerState>>,
}

impl MockChargerHandle {
    fn state(&self) -> MutexGuard<'_, ChargerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Simulate plugging a device in (`true`) or removing it (`false`).
    pub fn set_connected(&self, connected: bool) {
        self.state().connected = connected;
    }

    /// Publish a current reading to every subscriber.
    ///
    /// The reading becomes the charger's `current_value()`. Publishing with
    /// no subscribers is not an error; the reading is simply dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if the reading is NaN, infinite or negative.
    pub fn emit_current(&self, current: f64) -> Result<()> {
        let event = CurrentEvent::new(current)?;
        let mut state = self.state();
        state.current = current;
        // Dropped receivers are pruned here
        state.subscribers.retain(|tx| tx.send(event).is_ok());
        Ok(())
    }

    /// Whether the last command was a start command.
    pub fn is_charging(&self) -> bool {
        self.state().charging
    }

    /// Number of start commands received.
    pub fn start_count(&self) -> usize {
        self.state().start_count
    }

    /// Number of stop commands received.
    pub fn stop_count(&self) -> usize {
        self.state().stop_count
    }

    /// Number of live current-reading subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.state()
            .subscribers
            .iter()
            .filter(|tx| !tx.is_closed())
            .count()
    }
}
