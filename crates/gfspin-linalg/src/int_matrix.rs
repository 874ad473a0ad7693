//! Plain integer matrices.

/// A dense row-major matrix of `i32`.
///
/// Used for data that is not over a field, such as spin-up scripts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IntMatrix {
    nor: usize,
    noc: usize,
    data: Vec<i32>,
}

impl IntMatrix {
    /// Creates a matrix filled with zeros.
    #[must_use]
    pub fn zeros(nor: usize, noc: usize) -> Self {
        Self {
            nor,
            noc,
            data: vec![0; nor * noc],
        }
    }

    /// Creates a matrix from row-major data.
    ///
    /// # Panics
    ///
    /// Panics if `data.len() != nor * noc`.
    #[must_use]
    pub fn from_data(nor: usize, noc: usize, data: Vec<i32>) -> Self {
        assert_eq!(data.len(), nor * noc, "{nor}x{noc} needs {} entries", nor * noc);
        Self { nor, noc, data }
    }

    /// Creates a matrix from rows.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have `noc` entries.
    #[must_use]
    pub fn from_rows(noc: usize, rows: &[Vec<i32>]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * noc);
        for row in rows {
            assert_eq!(row.len(), noc, "row has {} entries, expected {noc}", row.len());
            data.extend_from_slice(row);
        }
        Self::from_data(rows.len(), noc, data)
    }

    /// Number of rows.
    #[must_use]
    pub fn nor(&self) -> usize {
        self.nor
    }

    /// Number of columns.
    #[must_use]
    pub fn noc(&self) -> usize {
        self.noc
    }

    /// The entry at `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        assert!(j < self.noc);
        self.data[i * self.noc + j]
    }

    /// Sets the entry at `(i, j)`.
    pub fn set(&mut self, i: usize, j: usize, value: i32) {
        assert!(j < self.noc);
        self.data[i * self.noc + j] = value;
    }

    /// Row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[i32] {
        &self.data[i * self.noc..(i + 1) * self.noc]
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[i32]> + '_ {
        (0..self.nor).map(|i| self.row(i))
    }

    /// All entries, row-major.
    #[must_use]
    pub fn as_slice(&self) -> &[i32] {
        &self.data
    }
}
