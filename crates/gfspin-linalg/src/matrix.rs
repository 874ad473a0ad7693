//! Dense matrices of packed rows.

use std::fmt;
use std::ops::Range;

use gfspin_field::{Fel, Field, FieldKernel};

/// A dense matrix over GF(q) stored as contiguous packed rows.
///
/// Row `i` occupies bytes `i * stride .. (i + 1) * stride` of the data
/// buffer, where `stride = field.row_bytes(noc)`. A pivot table is present
/// only after echelonization; any mutation through `row_mut` or `set`
/// discards it.
#[derive(Clone)]
pub struct Matrix {
    field: Field,
    nor: usize,
    noc: usize,
    stride: usize,
    data: Vec<u8>,
    pivots: Option<Vec<usize>>,
}

impl Matrix {
    /// Creates a matrix filled with zeros.
    #[must_use]
    pub fn zeros(field: &Field, nor: usize, noc: usize) -> Self {
        let stride = field.row_bytes(noc);
        Self {
            field: field.clone(),
            nor,
            noc,
            stride,
            data: vec![0; nor * stride],
            pivots: None,
        }
    }

    /// Creates an identity matrix.
    #[must_use]
    pub fn identity(field: &Field, n: usize) -> Self {
        let mut m = Self::zeros(field, n, n);
        for i in 0..n {
            m.set(i, i, Fel::ONE);
        }
        m
    }

    /// Creates a matrix from rows of canonical integers.
    ///
    /// # Panics
    ///
    /// Panics if a row does not have `noc` entries.
    #[must_use]
    pub fn from_ints(field: &Field, noc: usize, rows: &[Vec<u32>]) -> Self {
        let mut m = Self::zeros(field, rows.len(), noc);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.len(), noc, "row {i} has {} entries, expected {noc}", row.len());
            let dst = m.row_mut(i);
            for (j, &n) in row.iter().enumerate() {
                field.insert(dst, j, field.from_int(n));
            }
        }
        m
    }

    /// Creates a matrix from packed rows laid out for `field`.
    ///
    /// # Panics
    ///
    /// Panics if `data` is not exactly `nor` rows long.
    #[must_use]
    pub fn from_raw_parts(field: &Field, nor: usize, noc: usize, data: Vec<u8>) -> Self {
        let stride = field.row_bytes(noc);
        assert_eq!(data.len(), nor * stride, "{nor} rows need {} bytes", nor * stride);
        Self {
            field: field.clone(),
            nor,
            noc,
            stride,
            data,
            pivots: None,
        }
    }

    /// Creates a one-row matrix holding a copy of `row`.
    #[must_use]
    pub fn from_row(field: &Field, noc: usize, row: &[u8]) -> Self {
        let stride = field.row_bytes(noc);
        Self::from_raw_parts(field, 1, noc, row[..stride].to_vec())
    }

    /// The field of the entries.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
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

    /// Bytes per row.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns true if the matrix is square.
    #[must_use]
    pub fn is_square(&self) -> bool {
        self.nor == self.noc
    }

    /// The packed row data.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the matrix and returns its packed row data.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Returns row `i`.
    #[must_use]
    pub fn row(&self, i: usize) -> &[u8] {
        debug_assert!(i < self.nor, "row {i} out of range");
        &self.data[i * self.stride..(i + 1) * self.stride]
    }

    /// Returns row `i` for writing and discards the pivot table.
    pub fn row_mut(&mut self, i: usize) -> &mut [u8] {
        debug_assert!(i < self.nor, "row {i} out of range");
        self.pivots = None;
        &mut self.data[i * self.stride..(i + 1) * self.stride]
    }

    /// Iterates over the rows.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u8]> + '_ {
        (0..self.nor).map(|i| self.row(i))
    }

    /// The entry at `(i, j)`.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Fel {
        debug_assert!(j < self.noc, "column {j} out of range");
        self.field.extract(self.row(i), j)
    }

    /// Sets the entry at `(i, j)` and discards the pivot table.
    pub fn set(&mut self, i: usize, j: usize, a: Fel) {
        debug_assert!(j < self.noc, "column {j} out of range");
        let field = self.field.clone();
        field.insert(self.row_mut(i), j, a);
    }

    /// The entries as canonical integers, row by row.
    #[must_use]
    pub fn to_ints(&self) -> Vec<Vec<u32>> {
        self.rows()
            .map(|row| {
                (0..self.noc)
                    .map(|j| self.field.to_int(self.field.extract(row, j)))
                    .collect()
            })
            .collect()
    }

    /// Column `j` as a vector of elements.
    #[must_use]
    pub fn column(&self, j: usize) -> Vec<Fel> {
        (0..self.nor).map(|i| self.get(i, j)).collect()
    }

    /// The submatrix made of the columns in `cols`.
    #[must_use]
    pub fn column_range(&self, cols: Range<usize>) -> Self {
        assert!(cols.end <= self.noc, "columns {cols:?} out of range");
        let mut m = Self::zeros(&self.field, self.nor, cols.len());
        for i in 0..self.nor {
            for (k, j) in cols.clone().enumerate() {
                let a = self.get(i, j);
                if !a.is_zero() {
                    m.set(i, k, a);
                }
            }
        }
        m
    }

    /// The pivot table, present after echelonization.
    ///
    /// The first `nor` entries are the pivot columns of the rows in order;
    /// the rest are the remaining columns ascending.
    #[must_use]
    pub fn pivot_table(&self) -> Option<&[usize]> {
        self.pivots.as_deref()
    }

    pub(crate) fn set_pivot_table(&mut self, pivots: Vec<usize>) {
        debug_assert_eq!(pivots.len(), self.noc);
        self.pivots = Some(pivots);
    }

    /// Returns true if every entry is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Keeps only the first `nor` rows.
    pub fn truncate(&mut self, nor: usize) {
        if nor < self.nor {
            self.nor = nor;
            self.data.truncate(nor * self.stride);
            if let Some(pivots) = &mut self.pivots {
                pivots[nor..].sort_unstable();
            }
        }
    }

    /// Appends a copy of a packed row and discards the pivot table.
    ///
    /// # Panics
    ///
    /// Panics if `row` is shorter than a row of this matrix.
    pub fn push_row(&mut self, row: &[u8]) {
        assert!(row.len() >= self.stride, "row too short");
        self.data.extend_from_slice(&row[..self.stride]);
        self.nor += 1;
        self.pivots = None;
    }

    /// Appends the rows of `other`.
    ///
    /// # Panics
    ///
    /// Panics if the field or column count differs.
    pub fn append_rows(&mut self, other: &Matrix) {
        self.assert_compatible(other, "append");
        self.data.extend_from_slice(&other.data);
        self.nor += other.nor;
        self.pivots = None;
    }

    /// The matrix made of the listed rows, in the given order.
    #[must_use]
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut data = Vec::with_capacity(rows.len() * self.stride);
        for &i in rows {
            assert!(i < self.nor, "row {i} out of range");
            data.extend_from_slice(self.row(i));
        }
        Self::from_raw_parts(&self.field, rows.len(), self.noc, data)
    }

    /// The same matrix over another kernel variant of the same field.
    ///
    /// # Panics
    ///
    /// Panics if `field` has a different order.
    #[must_use]
    pub fn convert(&self, field: &Field) -> Self {
        assert_eq!(field.order(), self.field.order(), "cannot convert between fields");
        if *field == self.field {
            return self.clone();
        }
        let mut m = Self::zeros(field, self.nor, self.noc);
        for i in 0..self.nor {
            for j in 0..self.noc {
                let n = self.field.to_int(self.get(i, j));
                if n != 0 {
                    m.set(i, j, field.from_int(n));
                }
            }
        }
        m
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        self.pivots = None;
        &mut self.data
    }

    /// Panics unless `other` has the same field and column count.
    pub(crate) fn assert_compatible(&self, other: &Matrix, what: &str) {
        assert!(
            self.field == other.field,
            "{what}: field mismatch ({} vs {})",
            self.field,
            other.field
        );
        assert_eq!(
            self.noc, other.noc,
            "{what}: column count mismatch ({} vs {})",
            self.noc, other.noc
        );
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field
            && self.nor == other.nor
            && self.noc == other.noc
            && self.data == other.data
    }
}

impl Eq for Matrix {}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} over {}", self.nor, self.noc, self.field)?;
        for row in self.rows() {
            writeln!(f, "  [{}]", self.field.format_row(row, self.noc))?;
        }
        Ok(())
    }
}

/// Splits the data into a mutable target row and a shared source row.
pub(crate) fn row_pair(
    data: &mut [u8],
    stride: usize,
    target: usize,
    source: usize,
) -> (&mut [u8], &[u8]) {
    debug_assert_ne!(target, source);
    if target < source {
        let (head, tail) = data.split_at_mut(source * stride);
        (&mut head[target * stride..(target + 1) * stride], &tail[..stride])
    } else {
        let (head, tail) = data.split_at_mut(target * stride);
        (&mut tail[..stride], &head[source * stride..(source + 1) * stride])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_ints_round_trip() {
        let f = Field::new(5);
        let rows = vec![vec![1, 2, 3, 4, 0, 1, 2], vec![4, 4, 4, 4, 4, 4, 4]];
        let m = Matrix::from_ints(&f, 7, &rows);
        assert_eq!(m.nor(), 2);
        assert_eq!(m.stride(), 8);
        assert_eq!(m.to_ints(), rows);
        assert_eq!(m.column(3), vec![f.from_int(4), f.from_int(4)]);
    }

    #[test]
    fn test_identity() {
        let f = Field::new(3);
        let m = Matrix::identity(&f, 4);
        assert_eq!(
            m.to_ints(),
            vec![vec![1, 0, 0, 0], vec![0, 1, 0, 0], vec![0, 0, 1, 0], vec![0, 0, 0, 1]]
        );
    }

    #[test]
    fn test_push_and_select() {
        let f = Field::new(2);
        let mut m = Matrix::zeros(&f, 0, 3);
        m.push_row(Matrix::from_ints(&f, 3, &[vec![1, 0, 1]]).row(0));
        m.push_row(Matrix::from_ints(&f, 3, &[vec![0, 1, 1]]).row(0));
        assert_eq!(m.nor(), 2);
        let s = m.select_rows(&[1, 0, 1]);
        assert_eq!(s.to_ints(), vec![vec![0, 1, 1], vec![1, 0, 1], vec![0, 1, 1]]);
    }

    #[test]
    fn test_column_range() {
        let f = Field::new(7);
        let m = Matrix::from_ints(&f, 4, &[vec![1, 2, 3, 4], vec![5, 6, 0, 1]]);
        assert_eq!(m.column_range(1..3).to_ints(), vec![vec![2, 3], vec![6, 0]]);
    }

    #[test]
    fn test_convert_between_variants() {
        use gfspin_field::{FieldConfig, Variant};
        let packed = Field::with_variant(16, Variant::Packed, &FieldConfig::in_memory());
        let log = Field::with_variant(16, Variant::Log, &FieldConfig::in_memory());
        let m = Matrix::from_ints(&packed, 3, &[vec![15, 0, 7], vec![1, 2, 3]]);
        let c = m.convert(&log);
        assert_eq!(c.field(), &log);
        assert_eq!(c.to_ints(), m.to_ints());
    }

    #[test]
    #[should_panic(expected = "field mismatch")]
    fn test_append_rejects_other_field() {
        let mut a = Matrix::zeros(&Field::new(2), 1, 3);
        let b = Matrix::zeros(&Field::new(3), 1, 3);
        a.append_rows(&b);
    }

    #[test]
    fn test_mutation_clears_pivots() {
        let f = Field::new(2);
        let mut m = Matrix::identity(&f, 2);
        m.set_pivot_table(vec![0, 1]);
        assert!(m.pivot_table().is_some());
        m.set(0, 1, Fel::ONE);
        assert!(m.pivot_table().is_none());
    }
}
