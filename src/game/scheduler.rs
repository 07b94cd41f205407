//! Cancellable timer queue on a virtual clock.
//!
//! Deadlines are `Duration`s since the session started. The queue never
//! looks at a wall clock; whoever owns it decides what "now" is.

use std::collections::BTreeMap;
use std::time::Duration;

/// Handle to a scheduled task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskHandle {
    due: Duration,
    id: u64,
}

impl TaskHandle {
    /// When the task is due to fire
    pub fn due(&self) -> Duration {
        self.due
    }
}

/// Tasks ordered by deadline, ties broken by scheduling order
#[derive(Debug, Clone)]
pub struct TimerQueue<T> {
    tasks: BTreeMap<TaskHandle, T>,
    next_id: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: 0,
        }
    }

    /// Schedule `task` to fire at `due`
    pub fn schedule(&mut self, due: Duration, task: T) -> TaskHandle {
        let handle = TaskHandle {
            due,
            id: self.next_id,
        };
        self.next_id += 1;
        self.tasks.insert(handle, task);
        handle
    }

    /// Drop every pending task
    pub fn cancel_all(&mut self) {
        self.tasks.clear();
    }

    /// Earliest pending deadline
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.keys().next().map(|h| h.due)
    }

    /// Remove and return the earliest task if it is due at or before `now`
    pub fn pop_due(&mut self, now: Duration) -> Option<(TaskHandle, T)> {
        let handle = *self.tasks.keys().next()?;
        if handle.due > now {
            return None;
        }
        self.tasks.remove(&handle).map(|task| (handle, task))
    }

    /// Whether the task behind `handle` is still waiting
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
