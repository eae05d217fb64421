//! Mock cabinet display.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::DisplayDevice;

#[derive(Debug, Default)]
struct DisplayLog {
    main: Vec<String>,
    charging: Vec<String>,
}

/// Mock display that records every text it is asked to show.
///
/// # Examples
///
/// ```
/// use cabinet_hardware::mock::MockDisplay;
/// use cabinet_hardware::traits::DisplayDevice;
///
/// let (display, handle) = MockDisplay::new();
/// display.set_charging_text("Charging...");
///
/// assert_eq!(handle.charging_text().as_deref(), Some("Charging..."));
/// assert!(handle.received_charging_text("Charging..."));
/// assert_eq!(handle.main_text(), None);
/// ```
#[derive(Debug)]
pub struct MockDisplay {
    log: Arc<Mutex<DisplayLog>>,
}

impl MockDisplay {
    /// Create a blank mock display and its inspection handle.
    pub fn new() -> (Self, MockDisplayHandle) {
        let log = Arc::new(Mutex::new(DisplayLog::default()));
        (
            Self {
                log: Arc::clone(&log),
            },
            MockDisplayHandle { log },
        )
    }

    fn log(&self) -> MutexGuard<'_, DisplayLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DisplayDevice for MockDisplay {
    fn set_main_text(&self, text: &str) {
        self.log().main.push(text.to_string());
    }

    fn set_charging_text(&self, text: &str) {
        self.log().charging.push(text.to_string());
    }
}

/// Handle for inspecting a [`MockDisplay`].
#[derive(Debug, Clone)]
pub struct MockDisplayHandle {
    log: Arc<Mutex<DisplayLog>>,
}

impl MockDisplayHandle {
    fn log(&self) -> MutexGuard<'_, DisplayLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Text currently shown in the main area, if any was ever set.
    pub fn main_text(&self) -> Option<String> {
        self.log().main.last().cloned()
    }

    /// Text currently shown in the charging area, if any was ever set.
    pub fn charging_text(&self) -> Option<String> {
        self.log().charging.last().cloned()
    }

    /// Every main text set so far, oldest first.
    pub fn main_history(&self) -> Vec<String> {
        self.log().main.clone()
    }

    /// Every charging text set so far, oldest first.
    pub fn charging_history(&self) -> Vec<String> {
        self.log().charging.clone()
    }

    /// Whether `text` was ever shown in the main area.
    pub fn received_main_text(&self, text: &str) -> bool {
        self.log().main.iter().any(|t| t == text)
    }

    /// Whether `text` was ever shown in the charging area.
    pub fn received_charging_text(&self, text: &str) -> bool {
        self.log().charging.iter().any(|t| t == text)
    }

    /// Forget everything recorded so far.
    pub fn clear(&self) {
        let mut log = self.log();
        log.main.clear();
        log.charging.clear();
    }
}
