//! Parallel seed search.
//!
//! Each seed is one task on the pool. Attempts run independently in their
//! own workspaces; they share only the search context, which keeps the
//! success with the smallest seed index. Completion order therefore never
//! changes the answer. An attempt whose seed index is above the best one
//! found so far gives up at its next expansion step, and the submitting
//! loop stops once any success is known. All seeds below that point have
//! already been submitted, so the final result is the smallest successful
//! seed overall.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use gfspin_linalg::Matrix;
use gfspin_tasks::{Task, TaskGroup, ThreadPool};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::goal::{Goal, Outcome};
use crate::repr::Representation;
use crate::script::Script;
use crate::seed::{SeedMode, SeedSource};
use crate::workspace::{WorkspaceOptions, WorkspacePool};

const NO_SEED: usize = usize::MAX;

/// Options for [`spin_up_find_submodule`] and [`spin_up_find_cyclic_vector`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Return the standard basis instead of the semi-echelon one.
    pub standard: bool,
    /// Record a script for the returned subspace.
    pub script: bool,
    /// Maximum number of attempts queued or running at once.
    pub queue_ahead: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            standard: false,
            script: false,
            queue_ahead: 32,
        }
    }
}

/// A successful search.
#[derive(Clone, Debug)]
pub struct Found {
    /// Index of the seed, counting from 1.
    pub seed_index: usize,
    /// Closure of that seed.
    pub subspace: Matrix,
    /// Script, if requested.
    pub script: Option<Script>,
}

/// State shared by all attempts of one search.
#[derive(Debug)]
pub struct SpinUpContext {
    repr: Representation,
    seeds: SeedSource,
    goal: Goal,
    options: WorkspaceOptions,
    // Mirrors `best` for lock-free peeking; only written under its lock.
    best_index: AtomicUsize,
    best: Mutex<Option<Found>>,
    workspaces: WorkspacePool,
}

impl SpinUpContext {
    /// Creates the context of a search for `goal`.
    ///
    /// # Panics
    ///
    /// Panics if the seeds do not fit `repr`, or for a submodule goal whose
    /// `max_dim` is not below the module dimension.
    #[must_use]
    pub fn new(repr: Representation, seeds: SeedSource, goal: Goal, config: &SearchConfig) -> Self {
        repr.assert_seeds(seeds.matrix(), "seed search");
        goal.assert_valid(repr.dim());
        Self {
            repr,
            seeds,
            goal,
            options: WorkspaceOptions {
                standard: config.standard,
                script: config.script,
            },
            best_index: AtomicUsize::new(NO_SEED),
            best: Mutex::new(None),
            workspaces: WorkspacePool::new(),
        }
    }

    /// Number of seeds to search.
    #[must_use]
    pub fn seeds(&self) -> usize {
        self.seeds.len()
    }

    /// Index of the best success so far.
    #[must_use]
    pub fn best_index(&self) -> Option<usize> {
        match self.best_index.load(Ordering::Acquire) {
            NO_SEED => None,
            index => Some(index),
        }
    }

    /// Spins up seed `index` and offers a success to the context.
    pub fn attempt(&self, index: usize) -> Outcome {
        if self.best_index.load(Ordering::Acquire) < index {
            return Outcome::Abandoned;
        }
        let mut ws = self
            .workspaces
            .checkout(self.repr.field(), self.repr.dim(), self.options);
        let abandon = || self.best_index.load(Ordering::Acquire) < index;
        let outcome = ws.spin(&self.repr, &self.seeds, index, self.goal, &abandon);
        match outcome {
            Outcome::Success => {
                let result = ws.cede();
                self.offer(Found {
                    seed_index: index,
                    subspace: result.basis,
                    script: result.script,
                });
            }
            Outcome::Failure => self.workspaces.give_back(ws),
            Outcome::Abandoned => drop(ws),
        }
        outcome
    }

    fn offer(&self, found: Found) {
        let mut best = self.best.lock();
        let index = found.seed_index;
        if best.as_ref().map_or(true, |b| index < b.seed_index) {
            debug!(seed = index, dim = found.subspace.nor(), "new best seed");
            *best = Some(found);
            self.best_index.store(index, Ordering::Release);
        } else {
            trace!(seed = index, "discarding result of superseded seed");
        }
    }

    /// Takes the best result.
    #[must_use]
    pub fn into_result(self) -> Option<Found> {
        self.best.into_inner()
    }

    fn take_result(&self) -> Option<Found> {
        self.best.lock().take()
    }
}

/// Runs one attempt per seed on `pool` until the goal is met.
///
/// # Panics
///
/// Panics if `config.queue_ahead` is zero, and re-raises a panic from an
/// attempt, such as a zero seed.
pub fn search(ctx: Arc<SpinUpContext>, pool: &ThreadPool, config: &SearchConfig) -> Option<Found> {
    assert!(config.queue_ahead > 0, "seed search: queue_ahead must be positive");
    debug!(
        seeds = ctx.seeds(),
        goal = ?ctx.goal,
        threads = pool.threads(),
        "seed search started"
    );
    let group = TaskGroup::new();
    for index in 1..=ctx.seeds() {
        if ctx.best_index().is_some() {
            break;
        }
        group.wait_until_pending_below(config.queue_ahead);
        let ctx = Arc::clone(&ctx);
        pool.submit_in(
            &group,
            Task::call(move || {
                ctx.attempt(index);
            }),
        );
    }
    group.wait();
    let found = ctx.take_result();
    debug!(seed = ?found.as_ref().map(|f| f.seed_index), "seed search finished");
    found
}

/// Finds the first seed whose closure has dimension at most `max_dim`.
///
/// Returns `None` if every seed spins up to more than `max_dim`.
///
/// # Panics
///
/// Panics if `max_dim` is not below the module dimension, if the seeds do
/// not fit `repr`, or if a seed is zero.
#[must_use]
pub fn spin_up_find_submodule(
    seeds: &Matrix,
    repr: &Representation,
    mode: SeedMode,
    max_dim: usize,
    pool: &ThreadPool,
    config: &SearchConfig,
) -> Option<Found> {
    let source = SeedSource::new(seeds.clone(), mode);
    let goal = Goal::Submodule { max_dim };
    let ctx = Arc::new(SpinUpContext::new(repr.clone(), source, goal, config));
    search(ctx, pool, config)
}

/// Finds the first seed that spins up to the whole module.
///
/// Returns `None` if no seed is a cyclic vector.
///
/// # Panics
///
/// Panics if the seeds do not fit `repr` or if a seed is zero.
#[must_use]
pub fn spin_up_find_cyclic_vector(
    seeds: &Matrix,
    repr: &Representation,
    mode: SeedMode,
    pool: &ThreadPool,
    config: &SearchConfig,
) -> Option<Found> {
    let source = SeedSource::new(seeds.clone(), mode);
    let ctx = Arc::new(SpinUpContext::new(repr.clone(), source, Goal::Cyclic, config));
    search(ctx, pool, config)
}
