//! Spin-up scripts.
//!
//! A script records how each row of a standard basis was produced: either
//! from a seed, or as the image of an earlier row under one generator.
//! Replaying a script against another representation of the same module
//! reproduces the corresponding standard basis.
//!
//! Persisted, a script is an integer matrix with two columns. Column 0 is
//! the source (seed index or earlier row), column 1 the generator index,
//! or [`Script::NONE`] for seed rows.

use std::path::Path;

use gfspin_linalg::io::{load_int_matrix, save_int_matrix};
use gfspin_linalg::IntMatrix;

use crate::error::ScriptError;

/// One row of a script.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScriptEntry {
    /// For a seed row, the 0-based seed index; otherwise the 0-based index
    /// of the basis row that was mapped.
    pub source: usize,
    /// The generator applied, or `None` for a seed row.
    pub generator: Option<usize>,
}

impl ScriptEntry {
    /// A seed row taken from seed `index` (0-based).
    #[must_use]
    pub fn seed(index: usize) -> Self {
        Self {
            source: index,
            generator: None,
        }
    }

    /// The image of row `row` under generator `generator`.
    #[must_use]
    pub fn image(row: usize, generator: usize) -> Self {
        Self {
            source: row,
            generator: Some(generator),
        }
    }

    /// Returns true for seed rows.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.generator.is_none()
    }
}

/// A replayable record of a spin-up.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Script {
    entries: Vec<ScriptEntry>,
}

impl Script {
    /// Generator marker of seed rows in the integer form.
    pub const NONE: i32 = -1;

    /// Wraps `entries` without validation.
    #[must_use]
    pub fn from_entries(entries: Vec<ScriptEntry>) -> Self {
        Self { entries }
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the script has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The rows in order.
    #[must_use]
    pub fn entries(&self) -> &[ScriptEntry] {
        &self.entries
    }

    pub(crate) fn push(&mut self, entry: ScriptEntry) {
        self.entries.push(entry);
    }

    /// Number of seed rows.
    #[must_use]
    pub fn seeds(&self) -> usize {
        self.entries.iter().filter(|e| e.is_seed()).count()
    }

    /// Checks the structure of the script for a representation with `ngen`
    /// generators.
    ///
    /// Row 0 must be a seed row, image rows must refer to an earlier row,
    /// and generator indices must be below `ngen`.
    pub fn validate(&self, ngen: usize) -> Result<(), ScriptError> {
        match self.entries.first() {
            None => return Err(ScriptError::Empty),
            Some(first) if !first.is_seed() => return Err(ScriptError::NoSeed),
            Some(_) => {}
        }
        for (row, entry) in self.entries.iter().enumerate() {
            if let Some(generator) = entry.generator {
                if entry.source >= row {
                    return Err(ScriptError::ForwardReference {
                        row,
                        from: entry.source,
                    });
                }
                if generator >= ngen {
                    return Err(ScriptError::Generator {
                        row,
                        generator,
                        ngen,
                    });
                }
            }
        }
        Ok(())
    }

    /// The two-column integer form.
    ///
    /// # Errors
    ///
    /// Returns [`ScriptError::Overflow`] if an index does not fit in `i32`.
    /// Seeds generated over large fields can number more than that.
    pub fn try_to_int_matrix(&self) -> Result<IntMatrix, ScriptError> {
        let encode = |row, value: usize| {
            i32::try_from(value).map_err(|_| ScriptError::Overflow { row, value })
        };
        let mut m = IntMatrix::zeros(self.entries.len(), 2);
        for (i, entry) in self.entries.iter().enumerate() {
            let generator = match entry.generator {
                Some(g) => encode(i, g)?,
                None => Self::NONE,
            };
            m.set(i, 0, encode(i, entry.source)?);
            m.set(i, 1, generator);
        }
        Ok(m)
    }

    /// The two-column integer form.
    ///
    /// # Panics
    ///
    /// Panics if an index does not fit in `i32`; see
    /// [`Script::try_to_int_matrix`].
    #[must_use]
    pub fn to_int_matrix(&self) -> IntMatrix {
        self.try_to_int_matrix().unwrap_or_else(|err| panic!("{err}"))
    }

    /// Parses the two-column integer form.
    ///
    /// Only the encoding is checked here; use [`Script::validate`] to check
    /// the structure against a representation.
    pub fn from_int_matrix(m: &IntMatrix) -> Result<Self, ScriptError> {
        if m.noc() != 2 {
            return Err(ScriptError::Columns(m.noc()));
        }
        let mut entries = Vec::with_capacity(m.nor());
        for (row, values) in m.rows().enumerate() {
            let source = usize::try_from(values[0])
                .map_err(|_| ScriptError::Negative { row, value: values[0] })?;
            let generator = match values[1] {
                Self::NONE => None,
                g => Some(
                    usize::try_from(g).map_err(|_| ScriptError::Negative { row, value: g })?,
                ),
            };
            entries.push(ScriptEntry { source, generator });
        }
        Ok(Self { entries })
    }

    /// Writes the script as an integer matrix object file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScriptError> {
        save_int_matrix(path, &self.try_to_int_matrix()?)?;
        Ok(())
    }

    /// Reads a script written by [`Script::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScriptError> {
        Self::from_int_matrix(&load_int_matrix(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Script {
        Script::from_entries(vec![
            ScriptEntry::seed(3),
            ScriptEntry::image(0, 0),
            ScriptEntry::image(0, 1),
            ScriptEntry::image(1, 1),
        ])
    }

    #[test]
    fn test_int_matrix_form() {
        let m = sample().to_int_matrix();
        assert_eq!(m.noc(), 2);
        assert_eq!(m.row(0), &[3, Script::NONE]);
        assert_eq!(m.row(3), &[1, 1]);
        assert_eq!(Script::from_int_matrix(&m).unwrap(), sample());
    }

    #[test]
    fn test_validate() {
        assert!(sample().validate(2).is_ok());
        assert!(matches!(
            sample().validate(1),
            Err(ScriptError::Generator { row: 2, generator: 1, ngen: 1 })
        ));
        assert!(matches!(Script::default().validate(2), Err(ScriptError::Empty)));

        let no_seed = Script::from_entries(vec![ScriptEntry::image(0, 0)]);
        assert!(matches!(no_seed.validate(2), Err(ScriptError::NoSeed)));

        let forward = Script::from_entries(vec![ScriptEntry::seed(0), ScriptEntry::image(1, 0)]);
        assert!(matches!(
            forward.validate(1),
            Err(ScriptError::ForwardReference { row: 1, from: 1 })
        ));
    }

    #[test]
    fn test_from_int_matrix_rejects_bad_encoding() {
        let three = IntMatrix::zeros(1, 3);
        assert!(matches!(Script::from_int_matrix(&three), Err(ScriptError::Columns(3))));

        let negative = IntMatrix::from_rows(2, &[vec![0, -1], vec![0, -5]]);
        assert!(matches!(
            Script::from_int_matrix(&negative),
            Err(ScriptError::Negative { row: 1, value: -5 })
        ));
    }

    #[test]
    fn test_seed_index_beyond_i32() {
        let big = i32::MAX as usize + 1;
        let script = Script::from_entries(vec![ScriptEntry::seed(big), ScriptEntry::image(0, 0)]);
        assert!(matches!(
            script.try_to_int_matrix(),
            Err(ScriptError::Overflow { row: 0, value }) if value == big
        ));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.scr");
        assert!(matches!(script.save(&path), Err(ScriptError::Overflow { .. })));
        assert!(!path.exists());
    }

    #[test]
    #[should_panic(expected = "does not fit")]
    fn test_to_int_matrix_panics_on_overflow() {
        let _ = Script::from_entries(vec![ScriptEntry::seed(i32::MAX as usize + 1)]).to_int_matrix();
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spin.scr");
        sample().save(&path).unwrap();
        assert_eq!(Script::load(&path).unwrap(), sample());
        assert_eq!(sample().seeds(), 1);
    }
}
