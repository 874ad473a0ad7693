//! Errors from reading and writing object files.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing an object file.
#[derive(Debug, Error)]
pub enum ObjectError {
    /// The underlying reader or writer failed, including on early end of
    /// file.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// The header tag does not describe the expected kind of object.
    #[error("expected {expected}, found object with tag {tag}")]
    UnexpectedTag {
        /// Kind of object the caller asked for.
        expected: &'static str,
        /// Tag found in the header.
        tag: i32,
    },

    /// A matrix header names an unsupported field order.
    #[error("invalid field order {0}")]
    BadField(i32),

    /// The header shape is inconsistent with the object kind.
    #[error("bad header: {0}")]
    BadHeader(String),

    /// The stored images are not a permutation.
    #[error("not a permutation of degree {0}")]
    BadPermutation(usize),

    /// Context wrapper naming the file.
    #[error("{}: {source}", path.display())]
    File {
        /// The offending file.
        path: PathBuf,
        /// The underlying failure.
        #[source]
        source: Box<ObjectError>,
    },
}

impl ObjectError {
    pub(crate) fn in_file(self, path: impl Into<PathBuf>) -> Self {
        ObjectError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
