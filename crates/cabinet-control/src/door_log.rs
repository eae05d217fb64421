//! Door access log sinks.
//!
//! Every lock and unlock performed by [`StationControl`](crate::StationControl)
//! is reported to a [`DoorLog`]. Writes are fire-and-forget: a failing sink
//! logs a warning and never blocks the door.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use cabinet_core::RfidId;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Door action recorded in the access log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoorAction {
    Locked,
    Unlocked,
}

impl fmt::Display for DoorAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoorAction::Locked => write!(f, "locked"),
            DoorAction::Unlocked => write!(f, "unlocked"),
        }
    }
}

/// One access log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoorLogEntry {
    pub timestamp: DateTime<Local>,
    pub action: DoorAction,
    pub id: RfidId,
}

impl DoorLogEntry {
    pub fn now(action: DoorAction, id: RfidId) -> Self {
        Self {
            timestamp: Local::now(),
            action,
            id,
        }
    }
}

impl fmt::Display for DoorLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: Door {} with RFID {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.action,
            self.id
        )
    }
}

/// Sink for door access records.
pub trait DoorLog: Send + Sync {
    fn record(&self, entry: DoorLogEntry);

    fn log_door_locked(&self, id: RfidId) {
        self.record(DoorLogEntry::now(DoorAction::Locked, id));
    }

    fn log_door_unlocked(&self, id: RfidId) {
        self.record(DoorLogEntry::now(DoorAction::Unlocked, id));
    }
}

/// Writes access records to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDoorLog;

impl DoorLog for TracingDoorLog {
    fn record(&self, entry: DoorLogEntry) {
        info!(
            rfid = %entry.id,
            action = %entry.action,
            "Door {} with RFID {}",
            entry.action,
            entry.id
        );
    }
}

/// Appends access records to a text file, one line per record.
#[derive(Debug)]
pub struct FileDoorLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileDoorLog {
    /// Open (or create) the log file in append mode.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened for appending.
    pub fn open(path: impl AsRef<Path>) -> cabinet_core::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file(&self) -> MutexGuard<'_, File> {
        self.file.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DoorLog for FileDoorLog {
    fn record(&self, entry: DoorLogEntry) {
        info!(
            rfid = %entry.id,
            action = %entry.action,
            "Door {} with RFID {}",
            entry.action,
            entry.id
        );
        let mut file = self.file();
        if let Err(e) = writeln!(file, "{}", entry).and_then(|_| file.flush()) {
            warn!("Failed to append to door log {}: {}", self.path.display(), e);
        }
    }
}

/// Keeps access records in memory.
#[derive(Debug, Default)]
pub struct MemoryDoorLog {
    entries: Mutex<Vec<DoorLogEntry>>,
}

impl MemoryDoorLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded entries, oldest first.
    pub fn entries(&self) -> Vec<DoorLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl DoorLog for MemoryDoorLog {
    fn record(&self, entry: DoorLogEntry) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}
