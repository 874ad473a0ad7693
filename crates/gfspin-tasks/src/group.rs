//! Task groups with a completion callback.
//!
//! A group counts its pending tasks. At most one completion callback may be
//! registered. If tasks are still pending it runs in whichever thread
//! finishes the last one; otherwise it runs at once in the registering
//! thread. Registering the callback seals the group: no further tasks may
//! join it.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

type Callback = Box<dyn FnOnce() + Send>;
type Panic = Box<dyn Any + Send>;

enum Finalizer {
    Unset,
    Scheduled(Callback),
    Fired,
}

struct GroupState {
    pending: usize,
    finalizer: Finalizer,
    finalizing: bool,
    panic: Option<Panic>,
}

struct GroupInner {
    state: Mutex<GroupState>,
    changed: Condvar,
}

/// A set of tasks tracked together.
///
/// Cloning yields another handle to the same group.
#[derive(Clone)]
pub struct TaskGroup {
    inner: Arc<GroupInner>,
}

impl TaskGroup {
    /// Creates an empty, unsealed group.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Arc::new(GroupInner {
                state: Mutex::new(GroupState {
                    pending: 0,
                    finalizer: Finalizer::Unset,
                    finalizing: false,
                    panic: None,
                }),
                changed: Condvar::new(),
            }),
        }
    }

    /// Number of member tasks not yet finished.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.state.lock().pending
    }

    /// Returns true once a completion callback has been registered.
    #[must_use]
    pub fn is_sealed(&self) -> bool {
        !matches!(self.inner.state.lock().finalizer, Finalizer::Unset)
    }

    /// Registers the completion callback.
    ///
    /// Runs `f` immediately in this thread if nothing is pending; otherwise
    /// `f` runs in the thread that finishes the last pending task.
    ///
    /// # Panics
    ///
    /// Panics if a callback was already registered.
    pub fn on_complete(&self, f: impl FnOnce() + Send + 'static) {
        let mut state = self.inner.state.lock();
        assert!(
            matches!(state.finalizer, Finalizer::Unset),
            "task group completion callback registered twice"
        );
        if state.pending > 0 {
            state.finalizer = Finalizer::Scheduled(Box::new(f));
        } else {
            state.finalizer = Finalizer::Fired;
            drop(state);
            f();
        }
    }

    /// Blocks until every member task has finished and the completion
    /// callback, if scheduled, has run.
    ///
    /// # Panics
    ///
    /// Re-raises the first panic of a member task or of the callback.
    pub fn wait(&self) {
        let mut state = self.inner.state.lock();
        while state.pending > 0 || state.finalizing {
            self.inner.changed.wait(&mut state);
        }
        if let Some(payload) = state.panic.take() {
            drop(state);
            panic::resume_unwind(payload);
        }
    }

    /// Blocks until fewer than `limit` member tasks are pending.
    ///
    /// # Panics
    ///
    /// Panics if `limit` is zero.
    pub fn wait_until_pending_below(&self, limit: usize) {
        assert!(limit > 0, "pending limit must be positive");
        let mut state = self.inner.state.lock();
        while state.pending >= limit {
            self.inner.changed.wait(&mut state);
        }
    }

    pub(crate) fn begin(&self) {
        let mut state = self.inner.state.lock();
        assert!(
            matches!(state.finalizer, Finalizer::Unset),
            "task submitted to a sealed task group"
        );
        state.pending += 1;
    }

    pub(crate) fn finish(&self, panic: Option<Panic>) {
        let callback = {
            let mut state = self.inner.state.lock();
            debug_assert!(state.pending > 0);
            state.pending -= 1;
            if state.panic.is_none() {
                state.panic = panic;
            }
            let callback = if state.pending == 0 {
                match std::mem::replace(&mut state.finalizer, Finalizer::Fired) {
                    Finalizer::Scheduled(f) => Some(f),
                    other => {
                        state.finalizer = other;
                        None
                    }
                }
            } else {
                None
            };
            state.finalizing = callback.is_some();
            callback
        };

        if let Some(f) = callback {
            let result = panic::catch_unwind(AssertUnwindSafe(f));
            let mut state = self.inner.state.lock();
            state.finalizing = false;
            if let Err(payload) = result {
                state.panic.get_or_insert(payload);
            }
        }
        self.inner.changed.notify_all();
    }
}

impl Default for TaskGroup {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TaskGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.state.lock();
        f.debug_struct("TaskGroup")
            .field("pending", &state.pending)
            .field("sealed", &!matches!(state.finalizer, Finalizer::Unset))
            .finish()
    }
}
