use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// RFID tag identifier read from a cabinet reader.
///
/// # Security
/// Equality uses constant-time comparison so the unlock check does not leak
/// how close a presented tag is to the occupant's tag.
#[derive(Debug, Clone, Copy, Eq, Serialize, Deserialize)]
pub struct RfidId(u32);

impl RfidId {
    /// Create a tag identifier from its raw numeric value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        RfidId(id)
    }

    /// Get the raw tag value.
    #[must_use]
    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl PartialEq for RfidId {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl From<u32> for RfidId {
    fn from(id: u32) -> Self {
        RfidId(id)
    }
}

impl fmt::Display for RfidId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for RfidId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let id: u32 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidRfid(format!("Invalid RFID tag: {s}")))?;
        Ok(RfidId(id))
    }
}

/// Charge controller state identifier.
///
/// Exactly one of these is active per charge controller at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeStateId {
    /// Idle, no current commanded.
    Ready,
    /// Current flowing to a connected device.
    Charging,
    /// Device connected but drawing no current.
    FullyCharged,
    /// Over-current detected; requires an explicit reset.
    Error,
}

impl fmt::Display for ChargeStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            ChargeStateId::Ready => "Ready",
            ChargeStateId::Charging => "Charging",
            ChargeStateId::FullyCharged => "FullyCharged",
            ChargeStateId::Error => "Error",
        };
        write!(f, "{}", state_str)
    }
}

/// Station (cabinet slot) state identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StationStateId {
    /// No occupant; the door is unlocked.
    Free,
    /// Locked by the holder of the saved tag.
    Occupied,
}

impl fmt::Display for StationStateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StationStateId::Free => write!(f, "Free"),
            StationStateId::Occupied => write!(f, "Occupied"),
        }
    }
}
