//! Per-attempt spin-up state and the pool that recycles it.
//!
//! A workspace holds the growing basis in semi-echelon form: every row is
//! normalized at its pivot column and zero at the pivot columns of all
//! earlier rows. When a standard basis is requested, a second buffer
//! receives the raw image of every accepted row, and images are computed
//! from that buffer. Both buffers span the same space row by row, and the
//! raw buffer transforms along with a change of basis.
//!
//! Handing the result to the caller cedes the buffers; a ceded workspace
//! is never pooled again.

use std::mem;

use gfspin_field::{Field, FieldKernel, Variant};
use gfspin_linalg::{is_zero_row, map_row, pivotize, Matrix};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::trace;

use crate::goal::{Goal, Outcome};
use crate::repr::Representation;
use crate::script::{Script, ScriptEntry};
use crate::seed::SeedSource;

/// Which optional buffers a workspace keeps.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct WorkspaceOptions {
    /// Keep the standard basis.
    pub standard: bool,
    /// Record a script.
    pub script: bool,
}

/// The basis and optional records produced by a spin-up.
#[derive(Clone, Debug)]
pub struct SpinUpResult {
    /// The standard basis if it was requested, otherwise the semi-echelon
    /// basis with its pivot table.
    pub basis: Matrix,
    /// The script, if it was requested.
    pub script: Option<Script>,
}

/// How a closure run stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Closure {
    Complete,
    CapExceeded,
    Abandoned,
}

/// State of one spin-up.
#[derive(Debug)]
pub struct Workspace {
    field: Field,
    dim: usize,
    stride: usize,
    options: WorkspaceOptions,
    // dim + 1 rows; row `nor` is the candidate slot.
    basis: Vec<u8>,
    standard: Option<Vec<u8>>,
    pivots: Vec<usize>,
    script: Option<Script>,
    nor: usize,
    expanded: usize,
    ceded: bool,
}

impl Workspace {
    /// Allocates a workspace for modules of dimension `dim` over `field`.
    #[must_use]
    pub fn new(field: &Field, dim: usize, options: WorkspaceOptions) -> Self {
        let stride = field.row_bytes(dim);
        let size = (dim + 1) * stride;
        Self {
            field: field.clone(),
            dim,
            stride,
            options,
            basis: vec![0; size],
            standard: options.standard.then(|| vec![0; size]),
            pivots: Vec::with_capacity(dim),
            script: options.script.then(Script::default),
            nor: 0,
            expanded: 0,
            ceded: false,
        }
    }

    /// Module dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Current basis size.
    #[must_use]
    pub fn nor(&self) -> usize {
        self.nor
    }

    /// Returns true once the basis spans the whole module.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.nor == self.dim
    }

    /// Returns true once the buffers went to a result.
    #[must_use]
    pub fn is_ceded(&self) -> bool {
        self.ceded
    }

    /// The buffers this workspace keeps.
    #[must_use]
    pub fn options(&self) -> WorkspaceOptions {
        self.options
    }

    /// Empties the basis for another attempt.
    ///
    /// # Panics
    ///
    /// Panics if the workspace was ceded.
    pub fn reset(&mut self) {
        self.assert_usable();
        self.nor = 0;
        self.expanded = 0;
        self.pivots.clear();
        if let Some(script) = &mut self.script {
            *script = Script::default();
        }
    }

    /// Adds seed `index` of `seeds` to the basis and returns whether it was
    /// independent of the rows already present.
    ///
    /// # Panics
    ///
    /// Panics if the seed vector is zero or the workspace was ceded.
    pub fn add_seed(&mut self, seeds: &SeedSource, index: usize) -> bool {
        self.assert_usable();
        let s = self.stride;
        let slot = self.nor * s..(self.nor + 1) * s;
        let candidate = &mut self.basis[slot.clone()];
        seeds.seed_into(index, candidate);
        assert!(!is_zero_row(candidate), "spin-up: seed {index} is zero");
        if let Some(standard) = &mut self.standard {
            standard[slot].copy_from_slice(&self.basis[self.nor * s..(self.nor + 1) * s]);
        }
        self.accept(ScriptEntry::seed(index - 1))
    }

    /// Runs seed `index` to completion or until `goal` can no longer be
    /// reached, polling `abandon` before each row is expanded.
    ///
    /// # Panics
    ///
    /// Panics if the seed vector is zero or the workspace was ceded.
    pub fn spin(
        &mut self,
        repr: &Representation,
        seeds: &SeedSource,
        index: usize,
        goal: Goal,
        abandon: &dyn Fn() -> bool,
    ) -> Outcome {
        self.add_seed(seeds, index);
        match self.close(repr, goal.cap(self.dim), abandon) {
            Closure::Complete => goal.judge(self.nor, self.dim),
            Closure::CapExceeded => Outcome::Failure,
            Closure::Abandoned => Outcome::Abandoned,
        }
    }

    /// Expands unexpanded rows until the basis is invariant, exceeds `cap`
    /// rows, or `abandon` returns true.
    pub(crate) fn close(
        &mut self,
        repr: &Representation,
        cap: usize,
        abandon: &dyn Fn() -> bool,
    ) -> Closure {
        self.assert_usable();
        while self.expanded < self.nor {
            if self.nor > cap {
                return Closure::CapExceeded;
            }
            if self.is_full() {
                self.expanded = self.nor;
                break;
            }
            if abandon() {
                return Closure::Abandoned;
            }
            let row = self.expanded;
            for (g, generator) in repr.generators().iter().enumerate() {
                self.map_to_candidate(row, generator);
                if self.accept(ScriptEntry::image(row, g)) && self.nor > cap {
                    return Closure::CapExceeded;
                }
            }
            self.expanded += 1;
        }
        trace!(nor = self.nor, dim = self.dim, "closure complete");
        Closure::Complete
    }

    /// Hands the basis and script to a result.
    ///
    /// # Panics
    ///
    /// Panics if the workspace was already ceded.
    pub fn cede(&mut self) -> SpinUpResult {
        self.assert_usable();
        self.ceded = true;
        let len = self.nor * self.stride;
        let basis = match self.standard.take() {
            Some(mut standard) => {
                standard.truncate(len);
                Matrix::from_raw_parts(&self.field, self.nor, self.dim, standard)
            }
            None => {
                let mut data = mem::take(&mut self.basis);
                data.truncate(len);
                let mut m = Matrix::from_raw_parts(&self.field, self.nor, self.dim, data);
                pivotize(&mut m);
                m
            }
        };
        SpinUpResult {
            basis,
            script: self.script.take(),
        }
    }

    fn assert_usable(&self) {
        assert!(!self.ceded, "workspace was ceded to a result");
    }

    fn map_to_candidate(&mut self, row: usize, generator: &Matrix) {
        let s = self.stride;
        let split = self.nor * s;
        let source = row * s..(row + 1) * s;
        match &mut self.standard {
            Some(standard) => {
                let (done, rest) = standard.split_at_mut(split);
                map_row(&self.field, &done[source], generator, &mut rest[..s]);
                self.basis[split..split + s].copy_from_slice(&rest[..s]);
            }
            None => {
                let (done, rest) = self.basis.split_at_mut(split);
                map_row(&self.field, &done[source], generator, &mut rest[..s]);
            }
        }
    }

    // Clears the candidate slot against the basis and keeps it if non-zero.
    fn accept(&mut self, entry: ScriptEntry) -> bool {
        let s = self.stride;
        let (done, rest) = self.basis.split_at_mut(self.nor * s);
        let candidate = &mut rest[..s];
        for (i, &col) in self.pivots.iter().enumerate() {
            let a = self.field.extract(candidate, col);
            if !a.is_zero() {
                let f = self.field.neg(a);
                self.field.add_scaled_row(candidate, &done[i * s..(i + 1) * s], f);
            }
        }
        let Some((col, a)) = self.field.find_pivot(candidate, self.dim) else {
            return false;
        };
        self.field.scale_row(candidate, self.field.inv(a));
        self.pivots.push(col);
        if let Some(script) = &mut self.script {
            script.push(entry);
        }
        self.nor += 1;
        true
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PoolKey {
    order: u32,
    variant: Variant,
    dim: usize,
    options: WorkspaceOptions,
}

impl PoolKey {
    fn new(field: &Field, dim: usize, options: WorkspaceOptions) -> Self {
        Self {
            order: field.order(),
            variant: field.variant(),
            dim,
            options,
        }
    }
}

/// A free list of workspaces, keyed by field, dimension and options.
#[derive(Debug, Default)]
pub struct WorkspacePool {
    free: Mutex<FxHashMap<PoolKey, Vec<Workspace>>>,
}

impl WorkspacePool {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes an idle workspace of the right shape, or allocates one.
    #[must_use]
    pub fn checkout(&self, field: &Field, dim: usize, options: WorkspaceOptions) -> Workspace {
        let key = PoolKey::new(field, dim, options);
        let recycled = self.free.lock().get_mut(&key).and_then(Vec::pop);
        recycled.unwrap_or_else(|| Workspace::new(field, dim, options))
    }

    /// Returns a workspace for reuse. Ceded workspaces are dropped.
    pub fn give_back(&self, mut ws: Workspace) {
        if ws.is_ceded() {
            return;
        }
        ws.reset();
        let key = PoolKey::new(&ws.field, ws.dim, ws.options);
        self.free.lock().entry(key).or_default().push(ws);
    }

    /// Number of idle workspaces.
    #[must_use]
    pub fn idle(&self) -> usize {
        self.free.lock().values().map(Vec::len).sum()
    }
}
