//! Script errors.

use gfspin_linalg::ObjectError;
use thiserror::Error;

/// A script that cannot be read or does not fit a representation.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The integer matrix does not have two columns.
    #[error("script must have 2 columns, found {0}")]
    Columns(usize),

    /// The script has no rows.
    #[error("script is empty")]
    Empty,

    /// Row 0 is not a seed row.
    #[error("script row 0 is not a seed row")]
    NoSeed,

    /// An image row refers to itself or a later row.
    #[error("script row {row} refers to row {from}, which is not earlier")]
    ForwardReference {
        /// The offending row.
        row: usize,
        /// The row it refers to.
        from: usize,
    },

    /// An image row names a generator the representation does not have.
    #[error("script row {row} uses generator {generator}, but there are only {ngen}")]
    Generator {
        /// The offending row.
        row: usize,
        /// The generator index found.
        generator: usize,
        /// Number of generators available.
        ngen: usize,
    },

    /// A negative value other than the seed marker.
    #[error("script row {row} holds invalid value {value}")]
    Negative {
        /// The offending row.
        row: usize,
        /// The value found.
        value: i32,
    },

    /// A seed row refers to a seed that does not exist.
    #[error("script row {row} uses seed {seed}, but there are only {seeds}")]
    Seed {
        /// The offending row.
        row: usize,
        /// The 0-based seed index found.
        seed: usize,
        /// Number of seeds available.
        seeds: usize,
    },

    /// An index too large for the integer form.
    #[error("script row {row} holds index {value}, which does not fit in i32")]
    Overflow {
        /// The offending row.
        row: usize,
        /// The index found.
        value: usize,
    },

    /// Reading or writing the script file failed.
    #[error(transparent)]
    Object(#[from] ObjectError),
}
