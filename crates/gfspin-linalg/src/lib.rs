//! # gfspin-linalg
//!
//! Dense linear algebra over GF(q) on packed rows.
//!
//! This crate provides:
//! - `Matrix`: contiguous packed rows with an optional pivot table
//! - Row helpers: vector-by-matrix mapping, copy, comparison
//! - Echelonization, pivot tables, cleaning and left null spaces
//! - Matrix algebra: products (sequential and rayon-parallel), transpose,
//!   inverse, powers
//! - `Permutation` and `IntMatrix`
//! - Binary object files for matrices, permutations and integer matrices
//!
//! Every matrix carries its [`Field`](gfspin_field::Field); combining
//! matrices over different fields panics.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod echelon;
pub mod error;
pub mod int_matrix;
pub mod io;
pub mod matrix;
pub mod permutation;
pub mod row;

mod ops;

pub use echelon::{clean, echelonize, null_space, null_space_with_echelon, pivotize, rank};
pub use error::ObjectError;
pub use int_matrix::IntMatrix;
pub use matrix::Matrix;
pub use permutation::Permutation;
pub use row::{copy_row, is_zero_row, map_row, rows_equal};

#[cfg(test)]
mod proptests;
