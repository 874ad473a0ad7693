//! Field construction settings.

use std::path::PathBuf;

/// Environment variable naming the table cache directory.
pub const TABLE_DIR_ENV: &str = "GFSPIN_TABLE_DIR";

/// Configuration for building or loading field tables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldConfig {
    /// Directory holding cached table files. `None` disables the cache and
    /// tables are built in memory.
    pub table_dir: Option<PathBuf>,
}

impl FieldConfig {
    /// A configuration that never touches the file system.
    #[must_use]
    pub fn in_memory() -> Self {
        Self { table_dir: None }
    }

    /// A configuration caching tables in `dir`.
    #[must_use]
    pub fn with_table_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            table_dir: Some(dir.into()),
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            table_dir: std::env::var_os(TABLE_DIR_ENV).map(PathBuf::from),
        }
    }
}
