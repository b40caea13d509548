//! Completion counter shared by the walk unit and every per-file unit.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct CounterState {
    pending: usize,
    completed: usize,
}

/// Counts pending units of work. Cloning shares the same count.
///
/// Producers call [`add`](Self::add) before handing work off and [`done`](Self::done) once per
/// finished unit; the host blocks in [`wait`](Self::wait) until nothing is pending.
#[derive(Clone, Debug, Default)]
pub struct CompletionCounter {
    inner: Arc<(Mutex<CounterState>, Condvar)>,
}

impl CompletionCounter {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, CounterState> {
        // A panic while holding the lock cannot leave the counts half-written.
        self.inner.0.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register `n` more pending units.
    pub fn add(&self, n: usize) {
        self.state().pending += n;
    }

    /// Mark one unit finished. Wakes waiters when the count reaches zero.
    pub fn done(&self) {
        let mut state = self.state();
        if state.pending == 0 {
            log::error!("completion counter: done() called with nothing pending");
            return;
        }
        state.pending -= 1;
        state.completed += 1;
        if state.pending == 0 {
            self.inner.1.notify_all();
        }
    }

    /// Guard that marks one already registered unit done when dropped, including while
    /// unwinding from a panic.
    pub fn guard(&self) -> UnitGuard {
        UnitGuard {
            counter: self.clone(),
        }
    }

    /// Units registered but not yet done.
    pub fn pending(&self) -> usize {
        self.state().pending
    }

    /// Total `done` calls since creation.
    pub fn completed(&self) -> usize {
        self.state().completed
    }

    /// Block until nothing is pending.
    pub fn wait(&self) {
        let mut state = self.state();
        while state.pending > 0 {
            state = self.inner.1.wait(state).unwrap_or_else(|e| e.into_inner());
        }
    }

    /// Block until nothing is pending or `timeout` elapses. Returns true when drained.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut state = self.state();
        while state.pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            state = match self.inner.1.wait_timeout(state, deadline - now) {
                Ok((s, _)) => s,
                Err(e) => e.into_inner().0,
            };
        }
        true
    }
}

/// Releases one unit of a [`CompletionCounter`] on drop. See [`CompletionCounter::guard`].
#[must_use = "the unit is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct UnitGuard {
    counter: CompletionCounter,
}

impl Drop for UnitGuard {
    fn drop(&mut self) {
        self.counter.done();
    }
}
