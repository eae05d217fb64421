//! Charge control state machine.
//!
//! `ChargeControl` watches the charger's current readings and decides when
//! charging starts, completes or must be cut off because of over-current.
//!
//! # States
//!
//! - `Ready`: idle, charging text cleared
//! - `Charging`: current commanded to a connected device
//! - `FullyCharged`: device connected but drawing no current
//! - `Error`: over-current detected, held until [`ChargeControl::reset`]
//!
//! # Transitions
//!
//! | From | Reading `c` | To |
//! |---|---|---|
//! | Charging | `c > threshold` | Error |
//! | Charging | `c == 0`, connected | FullyCharged |
//! | Charging | `c == 0`, disconnected | Ready |
//! | Charging | `0 < c <= threshold` | Charging |
//! | FullyCharged | `c > threshold` | Error |
//! | Ready | `c == 0` | Ready |
//!
//! Entry side effects (start/stop commands and charging text) run inside the
//! transition, before the next reading is looked at, so a fault current is
//! stopped the instant it is detected. Readings outside these rows leave the
//! state unchanged.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use cabinet_core::{ChargeConfig, ChargeStateId};
//! use cabinet_control::ChargeControl;
//! use cabinet_hardware::mock::{MockCharger, MockDisplay};
//!
//! let (charger, charger_handle) = MockCharger::new();
//! let (display, display_handle) = MockDisplay::new();
//! let mut control = ChargeControl::new(Arc::new(charger), Arc::new(display), ChargeConfig::default());
//!
//! charger_handle.set_connected(true);
//! control.start_charge();
//! assert_eq!(control.state(), ChargeStateId::Charging);
//!
//! charger_handle.emit_current(0.0).unwrap();
//! control.process_pending_events();
//! assert_eq!(control.state(), ChargeStateId::FullyCharged);
//! assert_eq!(display_handle.charging_text().as_deref(), Some("Device fully charged."));
//! ```

use std::fmt;
use std::sync::Arc;

use cabinet_core::constants::{
    MSG_CHARGE_ERROR, MSG_CHARGING, MSG_FULLY_CHARGED, MSG_READY, NOTIFICATION_CAPACITY,
    ZERO_CURRENT,
};
use cabinet_core::{ChargeConfig, ChargeStateId};
use cabinet_hardware::{ChargerDevice, CurrentEvent, DisplayDevice};
use tokio::sync::broadcast;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, trace, warn};

use crate::events::ErrorEventArgs;
use crate::history::TransitionHistory;

/// Classification of a current reading against the fault threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CurrentLevel {
    Zero,
    Normal,
    OverCurrent,
    Unmodeled,
}

impl CurrentLevel {
    fn classify(current: f64, threshold: f64) -> Self {
        if current > threshold {
            CurrentLevel::OverCurrent
        } else if current == ZERO_CURRENT {
            CurrentLevel::Zero
        } else if current > ZERO_CURRENT {
            CurrentLevel::Normal
        } else {
            CurrentLevel::Unmodeled
        }
    }
}

/// Charge controller for one charger slot.
///
/// The charger and display are shared with the wiring layer and are never
/// closed by the controller.
///
/// # Thread Safety
///
/// Methods take `&mut self`; readings must be delivered one at a time. When
/// events can arrive concurrently, wrap the controller in a
/// `tokio::sync::Mutex` or drive it from a single task as
/// [`CabinetRuntime`](crate::CabinetRuntime) does.
pub struct ChargeControl {
    state: ChargeStateId,
    charger: Arc<dyn ChargerDevice>,
    display: Arc<dyn DisplayDevice>,
    config: ChargeConfig,
    current_rx: Option<UnboundedReceiver<CurrentEvent>>,
    error_tx: broadcast::Sender<ErrorEventArgs>,
    history: TransitionHistory<ChargeStateId>,
}

impl ChargeControl {
    /// Create a controller in the `Ready` state.
    ///
    /// Entering `Ready` clears the charging text.
    pub fn new(
        charger: Arc<dyn ChargerDevice>,
        display: Arc<dyn DisplayDevice>,
        config: ChargeConfig,
    ) -> Self {
        let (error_tx, _) = broadcast::channel(NOTIFICATION_CAPACITY);

        let control = Self {
            state: ChargeStateId::Ready,
            charger,
            display,
            config,
            current_rx: None,
            error_tx,
            history: TransitionHistory::new(),
        };
        control.enter(ChargeStateId::Ready);
        control
    }

    /// Subscribe to current readings and start charging if a device is
    /// connected.
    ///
    /// Repeated calls keep the existing subscription. Without a connected
    /// device the controller stays in, or returns to, `Ready`. The `Error`
    /// state is left untouched; only [`reset`](Self::reset) clears it.
    pub fn start_charge(&mut self) {
        if self.current_rx.is_none() {
            self.current_rx = Some(self.charger.subscribe());
            debug!("Subscribed to charger current readings");
        }

        let connected = self.device_connected();
        match (self.state, connected) {
            (ChargeStateId::Ready | ChargeStateId::FullyCharged, true) => {
                self.change_state(ChargeStateId::Charging);
            }
            (ChargeStateId::Charging, true) => {
                trace!("start_charge while already charging");
            }
            (ChargeStateId::Charging | ChargeStateId::FullyCharged, false) => {
                self.charger.stop_charge();
                self.change_state(ChargeStateId::Ready);
            }
            (ChargeStateId::Ready, false) => {
                debug!("start_charge without a connected device");
            }
            (ChargeStateId::Error, _) => {
                warn!("start_charge ignored in Error state, reset required");
            }
        }
    }

    /// React to one current reading.
    pub fn monitor_current_level(&mut self, current: f64) {
        let level = CurrentLevel::classify(current, self.config.threshold_error);

        match (self.state, level) {
            (ChargeStateId::Charging | ChargeStateId::FullyCharged, CurrentLevel::OverCurrent) => {
                warn!(
                    "Over-current {} exceeds threshold {} in {} state",
                    current, self.config.threshold_error, self.state
                );
                self.change_state(ChargeStateId::Error);
                self.on_error(current);
            }
            (ChargeStateId::Charging, CurrentLevel::Zero) => {
                if self.device_connected() {
                    self.change_state(ChargeStateId::FullyCharged);
                } else {
                    self.charger.stop_charge();
                    self.change_state(ChargeStateId::Ready);
                }
            }
            (ChargeStateId::Charging, CurrentLevel::Normal) => {
                self.display.set_charging_text(MSG_CHARGING);
            }
            (ChargeStateId::Ready, CurrentLevel::Zero) => {
                self.charger.stop_charge();
                self.change_state(ChargeStateId::Ready);
            }
            (state, level) => {
                trace!("Reading {} ({:?}) ignored in {} state", current, level, state);
            }
        }
    }

    /// Apply every reading already queued on the subscription, in arrival
    /// order. Returns the number of readings processed.
    pub fn process_pending_events(&mut self) -> usize {
        let mut processed = 0;

        while let Some(rx) = self.current_rx.as_mut() {
            match rx.try_recv() {
                Ok(event) => {
                    self.monitor_current_level(event.current);
                    processed += 1;
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    debug!("Charger current readings closed");
                    self.current_rx = None;
                }
            }
        }

        processed
    }

    /// Wait for the next current reading on the subscription.
    ///
    /// Never resolves before [`start_charge`](Self::start_charge) has
    /// subscribed. Returns `None` once the charger stops publishing.
    pub async fn next_current_event(&mut self) -> Option<CurrentEvent> {
        let Some(rx) = self.current_rx.as_mut() else {
            return std::future::pending().await;
        };

        let event = rx.recv().await;
        if event.is_none() {
            debug!("Charger current readings closed");
            self.current_rx = None;
        }
        event
    }

    /// Return to `Ready` regardless of the current state.
    pub fn reset(&mut self) {
        info!("Charge control reset from {}", self.state);
        self.change_state(ChargeStateId::Ready);
    }

    /// Publish an over-current notification carrying `current`.
    pub fn on_error(&self, current: f64) {
        // No listeners is fine
        let _ = self.error_tx.send(ErrorEventArgs::new(current));
    }

    /// Register a listener for over-current notifications.
    pub fn subscribe_errors(&self) -> broadcast::Receiver<ErrorEventArgs> {
        self.error_tx.subscribe()
    }

    pub fn state(&self) -> ChargeStateId {
        self.state
    }

    pub fn charger(&self) -> &Arc<dyn ChargerDevice> {
        &self.charger
    }

    /// Whether the charger reports a physically connected device.
    pub fn device_connected(&self) -> bool {
        self.charger.is_connected()
    }

    /// Whether current readings are being received.
    pub fn is_subscribed(&self) -> bool {
        self.current_rx.is_some()
    }

    pub fn config(&self) -> &ChargeConfig {
        &self.config
    }

    pub fn history(&self) -> &TransitionHistory<ChargeStateId> {
        &self.history
    }

    /// Move to `next` and run its entry side effects. Re-entering the
    /// current state repeats the entry actions but is not recorded.
    fn change_state(&mut self, next: ChargeStateId) {
        if self.state != next {
            debug!("Charge state {} -> {}", self.state, next);
            self.history.record(self.state, next);
        }
        self.state = next;
        self.enter(next);
    }

    fn enter(&self, state: ChargeStateId) {
        match state {
            ChargeStateId::Ready => {
                self.display.set_charging_text(MSG_READY);
            }
            ChargeStateId::Charging => {
                self.charger.start_charge();
            }
            ChargeStateId::FullyCharged => {
                self.charger.stop_charge();
                self.display.set_charging_text(MSG_FULLY_CHARGED);
            }
            ChargeStateId::Error => {
                self.charger.stop_charge();
                self.display.set_charging_text(MSG_CHARGE_ERROR);
            }
        }
    }
}

impl fmt::Debug for ChargeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChargeControl")
            .field("state", &self.state)
            .field("config", &self.config)
            .field("subscribed", &self.current_rx.is_some())
            .finish_non_exhaustive()
    }
}
