//! Units of deferred work.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// Shared body of a range task.
pub type RangeFn = Arc<dyn Fn(Range<usize>) + Send + Sync>;

/// A unit of work for the pool.
pub enum Task {
    /// A one-shot callback.
    Call(Box<dyn FnOnce() + Send>),
    /// A callback applied to one sub-range of a larger range.
    Range {
        /// The sub-range to process.
        range: Range<usize>,
        /// The body, shared between all chunks of the larger range.
        f: RangeFn,
    },
}

impl Task {
    /// A task running `f` once.
    pub fn call(f: impl FnOnce() + Send + 'static) -> Self {
        Task::Call(Box::new(f))
    }

    /// A task running `f` on `range`.
    #[must_use]
    pub fn range(range: Range<usize>, f: RangeFn) -> Self {
        Task::Range { range, f }
    }

    pub(crate) fn run(self) {
        match self {
            Task::Call(f) => f(),
            Task::Range { range, f } => f(range),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Task::Call(_) => f.write_str("Task::Call"),
            Task::Range { range, .. } => write!(f, "Task::Range({range:?})"),
        }
    }
}
