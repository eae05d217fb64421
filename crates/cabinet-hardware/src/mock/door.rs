//! Mock door lock.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::traits::DoorDevice;

#[derive(Debug, Default)]
struct DoorState {
    locked: bool,
    lock_count: usize,
    unlock_count: usize,
}

/// Mock door lock that records lock and unlock commands.
///
/// # Examples
///
/// ```
/// use cabinet_hardware::mock::MockDoor;
/// use cabinet_hardware::traits::DoorDevice;
///
/// let (door, handle) = MockDoor::new();
/// door.lock_door();
/// assert!(handle.is_locked());
///
/// door.unlock_door();
/// assert!(!handle.is_locked());
/// assert_eq!(handle.unlock_count(), 1);
/// ```
#[derive(Debug)]
pub struct MockDoor {
    state: Arc<Mutex<DoorState>>,
}

impl MockDoor {
    /// Create an unlocked mock door and its inspection handle.
    pub fn new() -> (Self, MockDoorHandle) {
        let state = Arc::new(Mutex::new(DoorState::default()));
        (
            Self {
                state: Arc::clone(&state),
            },
            MockDoorHandle { state },
        )
    }

    fn state(&self) -> MutexGuard<'_, DoorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DoorDevice for MockDoor {
    fn lock_door(&self) {
        let mut state = self.state();
        state.locked = true;
        state.lock_count += 1;
    }

    fn unlock_door(&self) {
        let mut state = self.state();
        state.locked = false;
        state.unlock_count += 1;
    }
}

/// Handle for inspecting a [`MockDoor`].
#[derive(Debug, Clone)]
pub struct MockDoorHandle {
    state: Arc<Mutex<DoorState>>,
}

impl MockDoorHandle {
    fn state(&self) -> MutexGuard<'_, DoorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether the door is currently locked.
    pub fn is_locked(&self) -> bool {
        self.state().locked
    }

    /// Number of lock commands received.
    pub fn lock_count(&self) -> usize {
        self.state().lock_count
    }

    /// Number of unlock commands received.
    pub fn unlock_count(&self) -> usize {
        self.state().unlock_count
    }
}
