//! Errors from the table cache.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::field::Variant;

/// Errors that can occur while reading or writing a table file.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum TableError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{}: malformed table data: {source}", path.display())]
    Codec {
        path: PathBuf,
        #[source]
        source: bincode::Error,
    },

    #[error("{}: not a table file", path.display())]
    BadMagic { path: PathBuf },

    #[error("{}: table version {found}, expected {expected}", path.display())]
    Version {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error(
        "{}: {} tables, expected {}",
        path.display(),
        found.name(),
        expected.name()
    )]
    WrongVariant {
        path: PathBuf,
        found: Variant,
        expected: Variant,
    },

    #[error("{}: tables are for GF({found}), expected GF({expected})", path.display())]
    WrongField {
        path: PathBuf,
        found: u32,
        expected: u32,
    },
}
