//! The arithmetic kernel interface.
//!
//! A kernel owns both element arithmetic and the packed row layout, since
//! the two are inseparable: how many elements share a byte is a property of
//! the element encoding.
//!
//! # Row Layout
//!
//! A row of `noc` elements occupies `row_bytes(noc)` bytes, always a
//! multiple of 8. Rows never carry their length; callers pass `noc`
//! alongside. Padding past the last column is always zero, so two rows can
//! be compared bytewise.
//!
//! # Contracts
//!
//! Elements and rows passed to a kernel must belong to that kernel. Nothing
//! is checked in release builds; debug builds assert element ranges.

use std::fmt::Debug;

use crate::element::Fel;
use crate::params::FieldParams;

/// Arithmetic in one GF(q) together with its packed row primitives.
pub trait FieldKernel: Debug + Send + Sync {
    /// Defining data shared by every kernel of this field.
    fn params(&self) -> &FieldParams;

    /// Field order q.
    fn order(&self) -> u32 {
        self.params().order()
    }

    /// Characteristic p.
    fn characteristic(&self) -> u32 {
        self.params().characteristic()
    }

    /// The generator of the multiplicative group.
    fn gen(&self) -> Fel {
        self.from_int(self.params().generator())
    }

    /// Sum of two elements.
    fn add(&self, a: Fel, b: Fel) -> Fel;

    /// Difference of two elements.
    fn sub(&self, a: Fel, b: Fel) -> Fel {
        self.add(a, self.neg(b))
    }

    /// Product of two elements.
    fn mul(&self, a: Fel, b: Fel) -> Fel;

    /// Quotient of two elements.
    ///
    /// # Panics
    ///
    /// Panics if `b` is zero.
    fn div(&self, a: Fel, b: Fel) -> Fel {
        self.mul(a, self.inv(b))
    }

    /// Additive inverse.
    fn neg(&self, a: Fel) -> Fel;

    /// Multiplicative inverse.
    ///
    /// # Panics
    ///
    /// Panics if `a` is zero.
    fn inv(&self, a: Fel) -> Fel;

    /// Computes `a^e`.
    fn pow(&self, a: Fel, mut e: u64) -> Fel {
        let mut base = a;
        let mut result = Fel::ONE;
        while e > 0 {
            if e & 1 == 1 {
                result = self.mul(result, base);
            }
            base = self.mul(base, base);
            e >>= 1;
        }
        result
    }

    /// Canonical integer in `0..q` of an element.
    fn to_int(&self, a: Fel) -> u32;

    /// Element with canonical integer `n mod q`.
    fn from_int(&self, n: u32) -> Fel;

    /// Number of bytes occupied by a row of `noc` elements.
    fn row_bytes(&self, noc: usize) -> usize;

    /// Reads the element in column `col`.
    fn extract(&self, row: &[u8], col: usize) -> Fel;

    /// Writes `a` into column `col`.
    fn insert(&self, row: &mut [u8], col: usize, a: Fel);

    /// `dst += src`.
    fn add_row(&self, dst: &mut [u8], src: &[u8]) {
        self.add_row_from(dst, src, 0);
    }

    /// `dst += src`, assuming both rows are zero in columns `< first`.
    ///
    /// The result is unspecified if that assumption does not hold.
    fn add_row_from(&self, dst: &mut [u8], src: &[u8], first: usize);

    /// `row *= f`.
    fn scale_row(&self, row: &mut [u8], f: Fel);

    /// `dst += f * src`.
    fn add_scaled_row(&self, dst: &mut [u8], src: &[u8], f: Fel) {
        self.add_scaled_row_from(dst, src, f, 0);
    }

    /// `dst += f * src`, assuming both rows are zero in columns `< first`.
    ///
    /// The result is unspecified if that assumption does not hold.
    fn add_scaled_row_from(&self, dst: &mut [u8], src: &[u8], f: Fel, first: usize);

    /// First non-zero column of `row` and its value.
    fn find_pivot(&self, row: &[u8], noc: usize) -> Option<(usize, Fel)>;
}

/// Rounds a byte count up to the row alignment.
#[inline]
#[must_use]
pub(crate) fn align_row(bytes: usize) -> usize {
    (bytes + 7) & !7
}
