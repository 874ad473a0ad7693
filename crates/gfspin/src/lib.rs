//! # gfspin
//!
//! Linear algebra over finite fields for computational representation
//! theory.
//!
//! ## Features
//!
//! - **Field Kernels**: GF(q) for q ≤ 65536, packed tables for q ≤ 256 and
//!   Zech logarithms above, with an on-disk table cache
//! - **Packed Matrices**: echelon forms, pivot tables, left null spaces,
//!   products and inverses, binary object files
//! - **Spin-Up**: closures, standard bases and replayable scripts
//! - **Parallel Search**: seed-by-seed searches for submodules and cyclic
//!   vectors on a worker pool, with a thread-count independent answer
//!
//! ## Quick Start
//!
//! ```rust
//! use gfspin::prelude::*;
//!
//! let f = Field::new(2);
//! let cycle = Permutation::from_images(vec![1, 2, 0]).to_matrix(&f);
//! let rep = Representation::new(vec![cycle]);
//! let seeds = Matrix::identity(&f, 3);
//!
//! let pool = ThreadPool::new(&PoolConfig::with_threads(2));
//! let found = spin_up_find_submodule(&seeds, &rep, SeedMode::Make, 1, &pool, &SearchConfig::default())
//!     .expect("the all-ones vector is fixed");
//! assert_eq!(found.subspace.to_ints(), vec![vec![1, 1, 1]]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use gfspin_field as field;
pub use gfspin_linalg as linalg;
pub use gfspin_spinup as spinup;
pub use gfspin_tasks as tasks;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use gfspin_field::{Fel, Field, FieldConfig, FieldKernel, Variant};
    pub use gfspin_linalg::{
        clean, echelonize, null_space, pivotize, rank, IntMatrix, Matrix, Permutation,
    };
    pub use gfspin_spinup::{
        spin_up, spin_up_find_cyclic_vector, spin_up_find_submodule, spin_up_standard_basis,
        spin_up_with_script, Found, Representation, Script, SearchConfig, SeedMode,
    };
    pub use gfspin_tasks::{PoolConfig, Task, TaskGroup, ThreadPool};
}
