//! Notification payloads published by the controllers.

use serde::{Deserialize, Serialize};

pub use cabinet_hardware::CurrentEvent;

/// Over-current notification published by
/// [`ChargeControl`](crate::ChargeControl) whenever it enters the error state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ErrorEventArgs {
    /// The offending current reading.
    pub current: f64,
}

impl ErrorEventArgs {
    pub fn new(current: f64) -> Self {
        Self { current }
    }
}
