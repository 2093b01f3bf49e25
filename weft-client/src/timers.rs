//! Per-page client timer table.
//!
//! The table is created on page load and owned by the runtime; it holds at
//! most one timer per component id. Actually starting and cancelling timers
//! is delegated to a [`Scheduler`] (the browser's `setInterval`/`setTimeout`
//! in the JavaScript runtime).

use std::collections::HashMap;
use std::time::Duration;

use weft_api::{ComponentId, TimerSpec};

/// Opaque handle returned by a [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub u64);

/// Starts and cancels timers on behalf of a [`TimerTable`].
pub trait Scheduler {
    /// Start a timer for `id` firing after `timeout` (every `timeout` when
    /// `repeat` is set).
    fn start(&mut self, id: ComponentId, timeout: Duration, repeat: bool) -> TimerHandle;

    fn cancel(&mut self, handle: TimerHandle, repeat: bool);
}

/// Outcome of [`TimerTable::setup`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerChange {
    /// A new timer was installed where none existed.
    Installed,
    /// The old timer was cleared and a new one installed.
    Replaced,
    /// Parameters matched the installed timer; it keeps running.
    Unchanged,
    /// The timer was torn down and nothing was installed.
    Removed,
    /// Inactive setup with nothing installed.
    Ignored,
}

#[derive(Debug, Clone)]
struct Installed {
    spec: TimerSpec,
    handle: TimerHandle,
}

#[derive(Debug, Default)]
pub struct TimerTable {
    timers: HashMap<ComponentId, Installed>,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install, replace, keep or tear down the timer of `id`.
    ///
    /// An installed timer is replaced only when the script, timeout, repeat or
    /// reset flag differs. An inactive spec tears the installed timer down
    /// without installing anything.
    pub fn setup(
        &mut self,
        scheduler: &mut dyn Scheduler,
        id: ComponentId,
        spec: TimerSpec,
    ) -> TimerChange {
        let mut replaced = false;
        if let Some(current) = self.timers.get(&id) {
            let changed = current.spec.js != spec.js
                || current.spec.timeout_ms != spec.timeout_ms
                || current.spec.repeat != spec.repeat
                || current.spec.reset != spec.reset;
            if !spec.active || changed {
                self.clear(scheduler, id);
                replaced = true;
            }
            if !changed {
                return if spec.active {
                    TimerChange::Unchanged
                } else {
                    TimerChange::Removed
                };
            }
        }
        if !spec.active {
            return if replaced {
                TimerChange::Removed
            } else {
                TimerChange::Ignored
            };
        }

        let handle = scheduler.start(id, Duration::from_millis(spec.timeout_ms), spec.repeat);
        tracing::debug!(component = %id, timeout_ms = spec.timeout_ms, repeat = spec.repeat, "timer installed");
        self.timers.insert(id, Installed { spec, handle });
        if replaced {
            TimerChange::Replaced
        } else {
            TimerChange::Installed
        }
    }

    /// Tear down the timer of `id`, if any.
    pub fn clear(&mut self, scheduler: &mut dyn Scheduler, id: ComponentId) -> bool {
        match self.timers.remove(&id) {
            Some(installed) => {
                scheduler.cancel(installed.handle, installed.spec.repeat);
                true
            }
            None => false,
        }
    }

    /// Tear down every timer (page unload).
    pub fn clear_all(&mut self, scheduler: &mut dyn Scheduler) {
        for (_, installed) in self.timers.drain() {
            scheduler.cancel(installed.handle, installed.spec.repeat);
        }
    }

    pub fn get(&self, id: ComponentId) -> Option<&TimerSpec> {
        self.timers.get(&id).map(|i| &i.spec)
    }

    pub fn handle(&self, id: ComponentId) -> Option<TimerHandle> {
        self.timers.get(&id).map(|i| i.handle)
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}
