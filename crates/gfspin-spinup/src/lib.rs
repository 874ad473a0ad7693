//! # gfspin-spinup
//!
//! Invariant subspaces of matrix representations over GF(q).
//!
//! Spinning up a seed vector means closing it under a set of generator
//! matrices: the result is the smallest subspace that contains the seed and
//! is mapped into itself by every generator.
//!
//! This crate provides:
//! - [`spin_up`]: the closure of a set of seed vectors, in semi-echelon form
//! - [`spin_up_standard_basis`]: the closure as a standard basis, which
//!   transforms along with a change of basis, optionally with a [`Script`]
//! - [`spin_up_with_script`]: replays a script on another representation
//! - [`spin_up_find_submodule`] and [`spin_up_find_cyclic_vector`]: parallel
//!   searches over numbered seeds that return the smallest seed index
//!   meeting the goal, whatever the number of worker threads
//!
//! ## Example
//!
//! ```
//! use gfspin_field::Field;
//! use gfspin_linalg::{Matrix, Permutation};
//! use gfspin_spinup::{spin_up, Representation};
//!
//! let f = Field::new(2);
//! let cycle = Permutation::from_images(vec![1, 2, 0]).to_matrix(&f);
//! let rep = Representation::new(vec![cycle]);
//! let seed = Matrix::from_ints(&f, 3, &[vec![1, 0, 0]]);
//! assert_eq!(spin_up(&seed, &rep).nor(), 3);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod error;
pub mod goal;
pub mod repr;
pub mod script;
pub mod search;
pub mod seed;
pub mod spinup;
pub mod workspace;

pub use error::ScriptError;
pub use goal::{Goal, Outcome};
pub use repr::Representation;
pub use script::{Script, ScriptEntry};
pub use search::{
    search, spin_up_find_cyclic_vector, spin_up_find_submodule, Found, SearchConfig,
    SpinUpContext,
};
pub use seed::{SeedMode, SeedSource};
pub use spinup::{spin_up, spin_up_standard_basis, spin_up_with_script};
pub use workspace::{SpinUpResult, Workspace, WorkspaceOptions, WorkspacePool};

#[cfg(test)]
mod proptests;
