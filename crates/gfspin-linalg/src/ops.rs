//! Matrix algebra.

use gfspin_field::{Fel, FieldKernel};
use rayon::prelude::*;

use crate::matrix::{row_pair, Matrix};
use crate::row::map_row;

impl Matrix {
    /// Computes `self * other`.
    ///
    /// # Panics
    ///
    /// Panics if the fields differ or `self.noc() != other.nor()`.
    #[must_use]
    pub fn mul(&self, other: &Matrix) -> Matrix {
        self.assert_multipliable(other);
        let field = self.field();
        let mut result = Matrix::zeros(field, self.nor(), other.noc());
        for i in 0..self.nor() {
            map_row(field, self.row(i), other, result.row_mut(i));
        }
        result
    }

    /// Computes `self * other`, distributing rows over the rayon pool.
    ///
    /// # Panics
    ///
    /// Panics if the fields differ or `self.noc() != other.nor()`.
    #[must_use]
    pub fn mul_parallel(&self, other: &Matrix) -> Matrix {
        self.assert_multipliable(other);
        let field = self.field();
        let mut result = Matrix::zeros(field, self.nor(), other.noc());
        let stride = result.stride();
        if stride == 0 {
            return result;
        }
        result
            .data_mut()
            .par_chunks_mut(stride)
            .enumerate()
            .for_each(|(i, out)| map_row(field, self.row(i), other, out));
        result
    }

    fn assert_multipliable(&self, other: &Matrix) {
        assert!(
            self.field() == other.field(),
            "mul: field mismatch ({} vs {})",
            self.field(),
            other.field()
        );
        assert_eq!(
            self.noc(),
            other.nor(),
            "mul: {}x{} times {}x{}",
            self.nor(),
            self.noc(),
            other.nor(),
            other.noc()
        );
    }

    /// Returns the transpose.
    #[must_use]
    pub fn transpose(&self) -> Matrix {
        let mut result = Matrix::zeros(self.field(), self.noc(), self.nor());
        for i in 0..self.nor() {
            for j in 0..self.noc() {
                let a = self.get(i, j);
                if !a.is_zero() {
                    result.set(j, i, a);
                }
            }
        }
        result
    }

    /// Computes `self + other`.
    ///
    /// # Panics
    ///
    /// Panics if the shapes or fields differ.
    #[must_use]
    pub fn add(&self, other: &Matrix) -> Matrix {
        self.assert_compatible(other, "add");
        assert_eq!(self.nor(), other.nor(), "add: row count mismatch");
        let mut result = self.clone();
        let field = self.field().clone();
        for i in 0..self.nor() {
            field.add_row(result.row_mut(i), other.row(i));
        }
        result
    }

    /// Computes `a * self`.
    #[must_use]
    pub fn scale(&self, a: Fel) -> Matrix {
        let mut result = self.clone();
        let field = self.field().clone();
        field.scale_row(result.data_mut(), a);
        result
    }

    /// Concatenates `other` to the right of `self`.
    ///
    /// # Panics
    ///
    /// Panics if the fields or row counts differ.
    #[must_use]
    pub fn hcat(&self, other: &Matrix) -> Matrix {
        assert!(self.field() == other.field(), "hcat: field mismatch");
        assert_eq!(self.nor(), other.nor(), "hcat: row count mismatch");
        let mut result = Matrix::zeros(self.field(), self.nor(), self.noc() + other.noc());
        for i in 0..self.nor() {
            for j in 0..self.noc() {
                result.set(i, j, self.get(i, j));
            }
            for j in 0..other.noc() {
                result.set(i, self.noc() + j, other.get(i, j));
            }
        }
        result
    }

    /// Returns the inverse by Gauss-Jordan elimination on `[self | I]`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square or is singular.
    #[must_use]
    pub fn inverse(&self) -> Matrix {
        assert!(self.is_square(), "inverse: {}x{} is not square", self.nor(), self.noc());
        let n = self.nor();
        let field = self.field().clone();
        let mut aug = self.hcat(&Matrix::identity(&field, n));
        let stride = aug.stride();

        for col in 0..n {
            let pivot = (col..n).find(|&r| !aug.get(r, col).is_zero());
            let Some(pivot) = pivot else {
                panic!("inverse: matrix is singular");
            };
            if pivot != col {
                let data = aug.data_mut();
                let (a, b) = data.split_at_mut(pivot * stride);
                a[col * stride..(col + 1) * stride].swap_with_slice(&mut b[..stride]);
            }
            let a = aug.get(col, col);
            field.scale_row(aug.row_mut(col), field.inv(a));
            for r in 0..n {
                if r == col {
                    continue;
                }
                let a = aug.get(r, col);
                if !a.is_zero() {
                    let (dst, src) = row_pair(aug.data_mut(), stride, r, col);
                    field.add_scaled_row(dst, src, field.neg(a));
                }
            }
        }
        aug.column_range(n..2 * n)
    }

    /// Computes `self^e` by repeated squaring.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is not square.
    #[must_use]
    pub fn power(&self, mut e: u64) -> Matrix {
        assert!(self.is_square(), "power: {}x{} is not square", self.nor(), self.noc());
        let mut base = self.clone();
        let mut result = Matrix::identity(self.field(), self.nor());
        while e > 0 {
            if e & 1 == 1 {
                result = result.mul(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul(&base);
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use gfspin_field::Field;

    use super::*;

    #[test]
    fn test_mul() {
        let f = Field::new(7);
        let a = Matrix::from_ints(&f, 2, &[vec![1, 2], vec![3, 4]]);
        let b = Matrix::from_ints(&f, 3, &[vec![5, 6, 0], vec![1, 0, 2]]);
        let c = a.mul(&b);
        assert_eq!(c.to_ints(), vec![vec![0, 6, 4], vec![5, 4, 1]]);
        assert_eq!(a.mul_parallel(&b), c);
    }

    #[test]
    #[should_panic(expected = "mul: 2x2 times 3x3")]
    fn test_mul_shape_mismatch() {
        let f = Field::new(2);
        let _ = Matrix::identity(&f, 2).mul(&Matrix::identity(&f, 3));
    }

    #[test]
    fn test_transpose_add_scale() {
        let f = Field::new(5);
        let a = Matrix::from_ints(&f, 3, &[vec![1, 2, 3], vec![4, 0, 1]]);
        assert_eq!(a.transpose().to_ints(), vec![vec![1, 4], vec![2, 0], vec![3, 1]]);
        assert_eq!(a.add(&a).to_ints(), vec![vec![2, 4, 1], vec![3, 0, 2]]);
        assert_eq!(a.scale(f.from_int(2)), a.add(&a));
        assert!(a.scale(Fel::ZERO).is_zero());
    }

    #[test]
    fn test_inverse() {
        let f = Field::new(3);
        let a = Matrix::from_ints(&f, 3, &[vec![0, 1, 2], vec![1, 0, 0], vec![2, 2, 2]]);
        let inv = a.inverse();
        assert_eq!(a.mul(&inv), Matrix::identity(&f, 3));
        assert_eq!(inv.mul(&a), Matrix::identity(&f, 3));
    }

    #[test]
    #[should_panic(expected = "singular")]
    fn test_inverse_singular() {
        let f = Field::new(2);
        let _ = Matrix::from_ints(&f, 2, &[vec![1, 1], vec![1, 1]]).inverse();
    }

    #[test]
    fn test_power_of_cycle() {
        let f = Field::new(2);
        let cycle = Matrix::from_ints(&f, 3, &[vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]);
        assert_eq!(cycle.power(3), Matrix::identity(&f, 3));
        assert_eq!(cycle.power(4), cycle);
        assert_eq!(cycle.power(0), Matrix::identity(&f, 3));
    }
}
