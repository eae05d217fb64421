//! Event loop for one cabinet slot.
//!
//! `CabinetRuntime` owns the [`StationControl`] and feeds it every input the
//! slot produces, strictly one at a time:
//!
//! ```text
//! ┌─────────────────┐
//! │ Error notices   │──┐
//! └─────────────────┘  │
//! ┌─────────────────┐  │   ┌──────────────┐    ┌────────────────┐
//! │ Current readings│──┼──►│  select!     │───►│ StationControl │
//! └─────────────────┘  │   └──────────────┘    └────────────────┘
//! ┌─────────────────┐  │
//! │ Peripheral tasks│──┘
//! └─────────────────┘
//! ```
//!
//! Selection is biased in the order shown, so an over-current notice is
//! handled before any reading or tag that arrived after the fault.

use std::future::Future;

use cabinet_hardware::{CurrentEvent, PeripheralEvent, PeripheralHandle};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::{debug, info, warn};

use crate::events::ErrorEventArgs;
use crate::station_control::StationControl;

/// Single-task driver for a [`StationControl`].
#[derive(Debug)]
pub struct CabinetRuntime {
    station: StationControl,
    errors: broadcast::Receiver<ErrorEventArgs>,
}

impl CabinetRuntime {
    /// Take ownership of `station` and listen to its charge error notices.
    pub fn new(station: StationControl) -> Self {
        let errors = station.charge_control().subscribe_errors();
        Self { station, errors }
    }

    /// Dispatch one peripheral event to the station.
    pub fn handle_event(&mut self, event: PeripheralEvent) {
        match event {
            PeripheralEvent::RfidDetected(id) => {
                debug!("RFID {} detected", id);
                self.station.on_rfid_detected(id);
            }
            PeripheralEvent::DeviceError { device, error } => {
                warn!("Peripheral {} failed: {}", device, error);
            }
            other => {
                debug!("Unhandled peripheral event {:?}", other);
            }
        }
    }

    /// Dispatch one current reading to the charge controller.
    pub fn handle_current(&mut self, event: CurrentEvent) {
        self.station
            .charge_control_mut()
            .monitor_current_level(event.current);
    }

    /// Forward queued error notices to the station. Returns how many were
    /// handled.
    pub fn handle_pending_errors(&mut self) -> usize {
        let mut handled = 0;

        loop {
            match self.errors.try_recv() {
                Ok(error) => {
                    self.station.on_charge_error(&error);
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!("Missed {} charge error notices", skipped);
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        handled
    }

    /// Run until the peripheral stream ends or `shutdown` resolves, then stop
    /// the peripheral tasks.
    ///
    /// # Errors
    ///
    /// Returns an error if the peripheral tasks cannot be shut down.
    pub async fn run<F>(
        &mut self,
        mut peripherals: PeripheralHandle,
        shutdown: F,
    ) -> cabinet_hardware::Result<()>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        info!("Cabinet runtime started in {} state", self.station.state());

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                notice = self.errors.recv() => match notice {
                    Ok(error) => self.station.on_charge_error(&error),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("Missed {} charge error notices", skipped);
                    }
                    // Sender lives inside the station we own
                    Err(RecvError::Closed) => break,
                },
                Some(reading) = self.station.charge_control_mut().next_current_event() => {
                    self.handle_current(reading);
                }
                event = peripherals.recv() => match event {
                    Some(event) => self.handle_event(event),
                    None => {
                        info!("Peripheral inputs closed");
                        break;
                    }
                },
            }
        }

        peripherals.shutdown().await
    }

    pub fn station(&self) -> &StationControl {
        &self.station
    }

    pub fn station_mut(&mut self) -> &mut StationControl {
        &mut self.station
    }

    /// Stop driving the station and hand it back.
    pub fn into_station(self) -> StationControl {
        self.station
    }
}
