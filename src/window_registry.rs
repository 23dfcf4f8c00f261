//! Window registry
//!
//! Maps window handles to the controller that owns each window. Event
//! delivery looks the handle up explicitly instead of stashing controller
//! pointers in per-window user data, so a message for a window that was
//! never registered (or already removed) is an error the caller can see.
//!
//! ```text
//!   driver ──(WindowId, InputEvent)──▶ WindowRegistry ──▶ Controller
//!                                          │
//!                                          └─ unknown id ──▶ LauncherError::UnknownWindow
//! ```
//!
//! The registry is owned by the UI thread; it is neither `Sync` nor global.

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, warn};

use crate::controller::{Controller, InputEvent};
use crate::error::{LauncherError, Result};
use crate::launcher::ProcessLauncher;

/// Opaque handle of a registered window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowId(u64);

impl WindowId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "window#{}", self.0)
    }
}

/// Handle → controller map
#[derive(Debug)]
pub struct WindowRegistry<C> {
    windows: BTreeMap<WindowId, C>,
    next_id: u64,
}

impl<C> Default for WindowRegistry<C> {
    fn default() -> Self {
        Self {
            windows: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<C> WindowRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `controller` and hand out its handle. Handles are never reused.
    pub fn register(&mut self, controller: C) -> WindowId {
        let id = WindowId(self.next_id);
        self.next_id += 1;
        self.windows.insert(id, controller);
        debug!(window = %id, "Registered window");
        id
    }

    pub fn get(&self, id: WindowId) -> Result<&C> {
        self.windows
            .get(&id)
            .ok_or(LauncherError::UnknownWindow(id.as_u64()))
    }

    pub fn get_mut(&mut self, id: WindowId) -> Result<&mut C> {
        self.windows
            .get_mut(&id)
            .ok_or(LauncherError::UnknownWindow(id.as_u64()))
    }

    /// Run `f` against the controller registered for `id`
    pub fn dispatch<R>(&mut self, id: WindowId, f: impl FnOnce(&mut C) -> R) -> Result<R> {
        match self.windows.get_mut(&id) {
            Some(controller) => Ok(f(controller)),
            None => {
                warn!(window = %id, "Dropped message for unknown window");
                Err(LauncherError::UnknownWindow(id.as_u64()))
            }
        }
    }

    /// Unregister and return the controller; later dispatches to `id` fail
    pub fn remove(&mut self, id: WindowId) -> Result<C> {
        let controller = self
            .windows
            .remove(&id)
            .ok_or(LauncherError::UnknownWindow(id.as_u64()))?;
        debug!(window = %id, "Removed window");
        Ok(controller)
    }

    pub fn contains(&self, id: WindowId) -> bool {
        self.windows.contains_key(&id)
    }

    /// Registered handles in registration order
    pub fn ids(&self) -> impl Iterator<Item = WindowId> + '_ {
        self.windows.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}

impl<L: ProcessLauncher> WindowRegistry<Controller<L>> {
    /// Deliver an input event. Returns whether the window needs repainting.
    pub fn send(&mut self, id: WindowId, event: InputEvent) -> Result<bool> {
        self.dispatch(id, |controller| controller.dispatch(event))
    }
}
