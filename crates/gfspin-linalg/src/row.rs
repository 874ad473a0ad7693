//! Operations on single packed rows.
//!
//! Element-level primitives (`extract`, `insert`, `add_row`, ...) live on
//! [`FieldKernel`] because they depend on the packing. The helpers here
//! combine rows with matrices.

use gfspin_field::{Field, FieldKernel};

use crate::matrix::Matrix;

/// Computes `result = row * m`.
///
/// `row` has `m.nor()` columns and `result` has `m.noc()` columns. The
/// borrow rules keep `result` from aliasing `row`.
pub fn map_row(field: &Field, row: &[u8], m: &Matrix, result: &mut [u8]) {
    debug_assert!(*field == *m.field());
    debug_assert!(result.len() >= m.stride());
    result.fill(0);
    for (i, src) in m.rows().enumerate() {
        let a = field.extract(row, i);
        if !a.is_zero() {
            field.add_scaled_row(result, src, a);
        }
    }
}

/// Copies `src` into `dst`.
#[inline]
pub fn copy_row(dst: &mut [u8], src: &[u8]) {
    dst.copy_from_slice(src);
}

/// Returns true if two rows of the same field and width are equal.
#[inline]
#[must_use]
pub fn rows_equal(a: &[u8], b: &[u8]) -> bool {
    a == b
}

/// Returns true if every entry of `row` is zero.
#[inline]
#[must_use]
pub fn is_zero_row(row: &[u8]) -> bool {
    row.iter().all(|&b| b == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_row_permutes() {
        let f = Field::new(3);
        // (a, b, c) -> (c, a, b)
        let m = Matrix::from_ints(&f, 3, &[vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]);
        let v = Matrix::from_ints(&f, 3, &[vec![1, 2, 0]]);
        let mut out = vec![0u8; m.stride()];
        map_row(&f, v.row(0), &m, &mut out);
        assert_eq!(Matrix::from_row(&f, 3, &out).to_ints(), vec![vec![0, 1, 2]]);
    }

    #[test]
    fn test_map_row_rectangular() {
        let f = Field::new(7);
        let m = Matrix::from_ints(&f, 2, &[vec![1, 2], vec![3, 4], vec![5, 6]]);
        let v = Matrix::from_ints(&f, 3, &[vec![1, 1, 1]]);
        let mut out = vec![0xffu8; m.stride()];
        map_row(&f, v.row(0), &m, &mut out);
        assert_eq!(Matrix::from_row(&f, 2, &out).to_ints(), vec![vec![2, 5]]);
    }

    #[test]
    fn test_zero_and_equal() {
        let f = Field::new(4);
        let a = Matrix::from_ints(&f, 5, &[vec![0, 0, 0, 0, 0], vec![0, 0, 0, 0, 3]]);
        assert!(is_zero_row(a.row(0)));
        assert!(!is_zero_row(a.row(1)));
        let mut b = vec![0u8; a.stride()];
        copy_row(&mut b, a.row(1));
        assert!(rows_equal(&b, a.row(1)));
    }
}
