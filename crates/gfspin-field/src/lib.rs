//! # gfspin-field
//!
//! Arithmetic in the finite fields GF(q), q = p^n ≤ 65536.
//!
//! This crate provides:
//! - `Field`: an explicit, cheaply clonable field context
//! - `FieldKernel`: the capability interface shared by both numeric kernels
//! - `PackedKernel`: several elements per byte, whole-byte lookup tables (q ≤ 256)
//! - `LogKernel`: discrete logarithms with Zech-logarithm addition (q ≤ 65536)
//! - An on-disk table cache so a field's tables are built once per machine
//!
//! ## Kernel Selection
//!
//! `Variant::Auto` picks the packed kernel for q ≤ 256 and the logarithm
//! kernel above that. Both kernels can be requested explicitly and coexist
//! in one process; rows built over one kernel must never be handed to the
//! other.
//!
//! ## Element Encoding
//!
//! A `Fel` is opaque. The only way to move field data to or from plain
//! integers is `FieldKernel::to_int` / `FieldKernel::from_int`, which use the
//! canonical numbering: the polynomial `c_0 + c_1 x + ... + c_{n-1} x^{n-1}`
//! (modulo the defining polynomial) is the integer `c_0 + c_1 p + ...`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod cache;
pub mod config;
pub mod element;
pub mod error;
pub mod field;
pub mod kernel;
pub mod logtab;
pub mod packed;
pub mod params;

#[cfg(test)]
mod proptests;

pub use config::FieldConfig;
pub use element::Fel;
pub use error::TableError;
pub use field::{Field, Variant};
pub use kernel::FieldKernel;
pub use logtab::LogKernel;
pub use packed::PackedKernel;
pub use params::{FieldParams, MAX_ORDER};
