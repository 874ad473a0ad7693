//! Fixed-size worker pool.
//!
//! Workers pull jobs from one FIFO queue. A pool with zero threads runs
//! every submitted task inline, in the submitting thread, before `submit`
//! returns.

use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::ops::Range;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, trace, warn};

use crate::group::TaskGroup;
use crate::task::Task;

/// Configuration for [`ThreadPool`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolConfig {
    /// Number of worker threads. Zero selects synchronous execution.
    pub threads: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: thread::available_parallelism().map_or(1, NonZeroUsize::get),
        }
    }
}

impl PoolConfig {
    /// A configuration running every task inline.
    #[must_use]
    pub fn synchronous() -> Self {
        Self { threads: 0 }
    }

    /// A configuration with exactly `threads` workers.
    #[must_use]
    pub fn with_threads(threads: usize) -> Self {
        Self { threads }
    }
}

struct Job {
    task: Task,
    group: Option<TaskGroup>,
}

struct Queue {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

struct Shared {
    queue: Mutex<Queue>,
    available: Condvar,
}

/// A pool of worker threads sharing one FIFO queue.
///
/// Dropping the pool lets the workers drain the queue, then joins them.
pub struct ThreadPool {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
}

impl ThreadPool {
    /// Starts a pool as configured.
    ///
    /// If the OS refuses to spawn a worker the pool keeps the ones it has;
    /// with none at all it runs synchronously.
    #[must_use]
    pub fn new(config: &PoolConfig) -> Self {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Queue {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            available: Condvar::new(),
        });

        let mut workers = Vec::with_capacity(config.threads);
        for i in 0..config.threads {
            let shared = Arc::clone(&shared);
            let spawned = thread::Builder::new()
                .name(format!("gfspin-worker-{i}"))
                .spawn(move || worker_loop(&shared));
            match spawned {
                Ok(handle) => workers.push(handle),
                Err(err) => {
                    warn!(worker = i, %err, "failed to spawn worker thread");
                    break;
                }
            }
        }
        debug!(threads = workers.len(), "thread pool started");

        Self { shared, workers }
    }

    /// A pool that runs every task inline.
    #[must_use]
    pub fn synchronous() -> Self {
        Self::new(&PoolConfig::synchronous())
    }

    /// Number of worker threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// Returns true if tasks run inline in the submitting thread.
    #[must_use]
    pub fn is_synchronous(&self) -> bool {
        self.workers.is_empty()
    }

    /// Number of jobs waiting for a worker.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.shared.queue.lock().jobs.len()
    }

    /// Submits a task outside any group.
    ///
    /// A panic in such a task is logged and otherwise dropped.
    pub fn submit(&self, task: Task) {
        self.dispatch(Job { task, group: None });
    }

    /// Submits a task as a member of `group`.
    ///
    /// # Panics
    ///
    /// Panics if the group is sealed.
    pub fn submit_in(&self, group: &TaskGroup, task: Task) {
        group.begin();
        self.dispatch(Job {
            task,
            group: Some(group.clone()),
        });
    }

    /// Runs `f` over `range` split into chunks of at most `chunk` indices,
    /// and waits for all of them.
    ///
    /// # Panics
    ///
    /// Panics if `chunk` is zero, and re-raises a panic from `f`.
    pub fn parallel_for(
        &self,
        range: Range<usize>,
        chunk: usize,
        f: impl Fn(Range<usize>) + Send + Sync + 'static,
    ) {
        assert!(chunk > 0, "parallel_for: chunk size must be positive");
        let f: crate::RangeFn = Arc::new(f);
        let group = TaskGroup::new();
        let mut start = range.start;
        while start < range.end {
            let end = range.end.min(start.saturating_add(chunk));
            self.submit_in(&group, Task::range(start..end, Arc::clone(&f)));
            start = end;
        }
        group.wait();
    }

    fn dispatch(&self, job: Job) {
        if self.workers.is_empty() {
            run_job(job);
            return;
        }
        self.shared.queue.lock().jobs.push_back(job);
        self.shared.available.notify_one();
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new(&PoolConfig::default())
    }
}

impl std::fmt::Debug for ThreadPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.workers.len())
            .field("queued", &self.queued())
            .finish()
    }
}

impl Drop for ThreadPool {
    fn drop(&mut self) {
        self.shared.queue.lock().shutdown = true;
        self.shared.available.notify_all();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                error!("worker thread terminated abnormally");
            }
        }
        debug!("thread pool stopped");
    }
}

fn worker_loop(shared: &Shared) {
    loop {
        let job = {
            let mut queue = shared.queue.lock();
            loop {
                if let Some(job) = queue.jobs.pop_front() {
                    break job;
                }
                if queue.shutdown {
                    return;
                }
                shared.available.wait(&mut queue);
            }
        };
        run_job(job);
    }
}

fn run_job(job: Job) {
    let Job { task, group } = job;
    trace!(?task, "running task");
    let result = panic::catch_unwind(AssertUnwindSafe(|| task.run()));
    match group {
        Some(group) => group.finish(result.err()),
        None => {
            if result.is_err() {
                error!("ungrouped task panicked");
            }
        }
    }
}
