//! Core constants for the charging cabinet controller.
//!
//! This module centralizes the fault-current defaults, bookkeeping limits and
//! every text the controllers push to the cabinet display. Display texts are
//! matched verbatim by operators' documentation and by the test suite, so
//! they must not be reworded casually.
//!
//! # Usage
//!
//! ```
//! use cabinet_core::constants::*;
//!
//! assert!(DEFAULT_THRESHOLD_ERROR > 0.0);
//! assert_eq!(MSG_CHARGING, "Charging...");
//! ```

// ============================================================================
// Charging Current
// ============================================================================

/// Default fault-current threshold, in the charger's reporting unit (mA).
///
/// A reading strictly greater than this value is an over-current fault.
/// A reading equal to it is still accepted as normal charging current.
///
/// # Value: 500 mA
///
/// Chargers with a different rating override this through
/// [`ChargeConfig::threshold_error`](crate::config::ChargeConfig).
pub const DEFAULT_THRESHOLD_ERROR: f64 = 500.0;

/// Reading reported by the charger when no current flows.
pub const ZERO_CURRENT: f64 = 0.0;

// ============================================================================
// Bookkeeping
// ============================================================================

/// Maximum number of state transitions kept in a controller's history.
///
/// Each record is a pair of state ids plus an `Instant`, so 100 entries
/// stays well under 4KB per controller while covering dozens of complete
/// lock/charge/unlock cycles.
pub const MAX_HISTORY_SIZE: usize = 100;

/// Default capacity of the peripheral event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Capacity of the broadcast channel carrying over-current notifications.
///
/// Slow listeners that fall further behind than this observe a lag and
/// skip the oldest notices. Current readings are never bounded.
pub const NOTIFICATION_CAPACITY: usize = 64;

// ============================================================================
// Charging Display Texts
// ============================================================================

/// Charging text shown while the charger is idle.
pub const MSG_READY: &str = "";

/// Charging text shown while current flows within the normal band.
pub const MSG_CHARGING: &str = "Charging...";

/// Charging text shown once the device reports zero current while connected.
pub const MSG_FULLY_CHARGED: &str = "Device fully charged.";

/// Charging text shown after an over-current fault.
pub const MSG_CHARGE_ERROR: &str = "Charging error. Contact support.";

// ============================================================================
// Station Display Texts
// ============================================================================

/// Main text shown when the occupant unlocks the cabinet with their own tag.
pub const MSG_REMOVE_PHONE: &str = "Remove your phone, peasant";

/// Main text shown when a tag other than the occupant's is presented.
pub const MSG_INCORRECT_RFID: &str = "Incorrect RFID!";

/// Main text shown when a free cabinet is locked by a new occupant.
pub const MSG_CABINET_LOCKED: &str = "Cabinet locked. Use your RFID tag to unlock.";

/// Main text shown when a tag is presented to a free cabinet with no phone attached.
pub const MSG_CONNECT_PHONE: &str = "Connect your phone.";

/// Main text shown to the occupant after charging stopped on a fault.
pub const MSG_CHARGE_FAULT: &str = "Charging stopped. Use your RFID tag to unlock.";
