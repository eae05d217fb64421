//! Charging cabinet simulator.
//!
//! Wires one cabinet slot to mock devices and plays a scripted session
//! through the event loop: a phone is connected, the owner locks the
//! cabinet, the phone charges until full, a stranger is rejected and the
//! owner finally collects the phone.
//!
//! # Usage
//!
//! ```bash
//! # Defaults
//! cabinet-sim
//!
//! # Custom configuration
//! cabinet-sim cabinet.json
//!
//! # Verbose state machine output
//! RUST_LOG=debug cabinet-sim
//! ```

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use cabinet_control::{
    CabinetRuntime, ChargeControl, DoorLog, FileDoorLog, StationControl, TracingDoorLog,
};
use cabinet_core::{CabinetConfig, RfidId};
use cabinet_hardware::devices::AnyRfidDevice;
use cabinet_hardware::mock::{MockCharger, MockDisplay, MockDoor, MockRfid};
use cabinet_hardware::{DisplayDevice, PeripheralConfig, PeripheralManager};
use tokio::sync::oneshot;
use tracing::info;

/// Pause between scripted steps so each one is handled before the next.
const STEP_DELAY: Duration = Duration::from_millis(50);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            let config = CabinetConfig::from_file(&path)
                .with_context(|| format!("failed to load configuration from {}", path))?;
            info!("Configuration loaded from {}", path);
            config
        }
        None => CabinetConfig::default(),
    };

    let door_log: Arc<dyn DoorLog> = match &config.door_log_path {
        Some(path) => Arc::new(
            FileDoorLog::open(path)
                .with_context(|| format!("failed to open door log {}", path.display()))?,
        ),
        None => Arc::new(TracingDoorLog),
    };

    let (charger, charger_handle) = MockCharger::new();
    let (display, display_handle) = MockDisplay::new();
    let (door, door_handle) = MockDoor::new();
    let (reader, reader_handle) = MockRfid::with_name("Cabinet reader".to_string());
    let display: Arc<dyn DisplayDevice> = Arc::new(display);

    let charge = ChargeControl::new(Arc::new(charger), Arc::clone(&display), config.charge);
    let station = StationControl::new(charge, Arc::new(door), display, door_log);

    let mut manager = PeripheralManager::new(PeripheralConfig {
        event_capacity: config.event_capacity,
        ..Default::default()
    });
    manager.register_rfid(AnyRfidDevice::from(reader));
    let peripherals = manager.start();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let runtime_task = tokio::spawn(async move {
        let mut runtime = CabinetRuntime::new(station);
        let result = runtime
            .run(peripherals, async {
                let _ = shutdown_rx.await;
            })
            .await;
        result.map(|()| runtime.into_station())
    });

    let owner = RfidId::new(42);
    let stranger = RfidId::new(99);

    info!("Phone connected");
    charger_handle.set_connected(true);

    info!("Owner presents tag {}", owner);
    reader_handle.present_tag(owner).await?;
    tokio::time::sleep(STEP_DELAY).await;

    for current in [320.0, 180.0, 0.0] {
        info!("Charger reports {}", current);
        charger_handle.emit_current(current)?;
        tokio::time::sleep(STEP_DELAY).await;
    }

    info!("Stranger presents tag {}", stranger);
    reader_handle.present_tag(stranger).await?;
    tokio::time::sleep(STEP_DELAY).await;

    info!("Owner presents tag {}", owner);
    reader_handle.present_tag(owner).await?;
    tokio::time::sleep(STEP_DELAY).await;
    charger_handle.set_connected(false);

    let _ = shutdown_tx.send(());
    let station = runtime_task.await.context("runtime task failed")??;

    info!(
        "Session finished: station {}, charge {}, door locked: {}",
        station.state(),
        station.charge_control().state(),
        door_handle.is_locked()
    );
    for text in display_handle.main_history() {
        info!("Display: {}", text);
    }

    Ok(())
}
