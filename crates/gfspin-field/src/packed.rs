//! Packed-table kernel for small fields (q ≤ 256).
//!
//! Elements are canonical integers. A row packs `k` elements per byte,
//! where `k` is the largest exponent with `q^k ≤ 256`; column `j` of a byte
//! is the base-q digit of weight `q^(k-1-j)`, so the first column sits in
//! the most significant digit. Row arithmetic works on whole bytes through
//! 256×256 addition and q×256 scaling tables.
//!
//! | q        | elements per byte |
//! |----------|-------------------|
//! | 2        | 8                 |
//! | 3        | 5                 |
//! | 4        | 4                 |
//! | 5, 6     | 3                 |
//! | 7..=16   | 2                 |
//! | 17..=256 | 1                 |

use serde::{Deserialize, Serialize};

use crate::element::Fel;
use crate::kernel::{align_row, FieldKernel};
use crate::params::FieldParams;

/// Largest order handled by the packed kernel.
pub const MAX_PACKED_ORDER: u32 = 256;

/// Table-driven arithmetic with several elements per byte.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackedKernel {
    params: FieldParams,
    per_byte: usize,
    /// Digit weights, most significant first.
    weights: Vec<u32>,
    add: Vec<u8>,
    mul: Vec<u8>,
    neg: Vec<u8>,
    inv: Vec<u8>,
    /// Digit-wise sum of two packed bytes, indexed `a << 8 | b`.
    byte_add: Vec<u8>,
    /// Digit-wise product of a packed byte with a scalar, indexed `f << 8 | b`.
    byte_scale: Vec<u8>,
    /// Digit in position `j` of a packed byte, indexed `j << 8 | b`.
    extract: Vec<u8>,
}

impl PackedKernel {
    /// Builds the tables for the field described by `params`.
    ///
    /// # Panics
    ///
    /// Panics if the field order exceeds 256.
    #[must_use]
    pub fn new(params: FieldParams) -> Self {
        let q = params.order();
        assert!(
            q <= MAX_PACKED_ORDER,
            "packed kernel supports q <= {MAX_PACKED_ORDER}, not {q}"
        );
        let qs = q as usize;

        let mut per_byte = 1usize;
        while qs.pow(per_byte as u32 + 1) <= 256 {
            per_byte += 1;
        }
        let weights: Vec<u32> = (0..per_byte)
            .map(|j| q.pow((per_byte - 1 - j) as u32))
            .collect();

        let mut add = vec![0u8; qs * qs];
        let mut mul = vec![0u8; qs * qs];
        let mut neg = vec![0u8; qs];
        let mut inv = vec![0u8; qs];
        for a in 0..q {
            neg[a as usize] = params.neg_int(a) as u8;
            if a != 0 {
                inv[a as usize] = params.inv_int(a) as u8;
            }
            for b in 0..q {
                add[(a * q + b) as usize] = params.add_ints(a, b) as u8;
                mul[(a * q + b) as usize] = params.mul_ints(a, b) as u8;
            }
        }

        let valid = qs.pow(per_byte as u32);
        let digit = |byte: usize, j: usize| byte / weights[j] as usize % qs;
        let pack = |digits: &mut dyn Iterator<Item = usize>| -> u8 {
            digits
                .zip(&weights)
                .map(|(d, &w)| d * w as usize)
                .sum::<usize>() as u8
        };

        let mut byte_add = vec![0u8; 256 * 256];
        for x in 0..valid {
            for y in 0..valid {
                byte_add[x << 8 | y] = pack(
                    &mut (0..per_byte).map(|j| add[digit(x, j) * qs + digit(y, j)] as usize),
                );
            }
        }

        let mut byte_scale = vec![0u8; qs * 256];
        for f in 0..qs {
            for x in 0..valid {
                byte_scale[f << 8 | x] =
                    pack(&mut (0..per_byte).map(|j| mul[f * qs + digit(x, j)] as usize));
            }
        }

        let mut extract = vec![0u8; per_byte * 256];
        for j in 0..per_byte {
            for x in 0..valid {
                extract[j << 8 | x] = digit(x, j) as u8;
            }
        }

        Self {
            params,
            per_byte,
            weights,
            add,
            mul,
            neg,
            inv,
            byte_add,
            byte_scale,
            extract,
        }
    }

    /// Number of elements stored in one byte.
    #[must_use]
    pub fn per_byte(&self) -> usize {
        self.per_byte
    }

    #[inline]
    fn index(&self, a: Fel, b: Fel) -> usize {
        debug_assert!(u32::from(a.0) < self.params.order());
        debug_assert!(u32::from(b.0) < self.params.order());
        a.0 as usize * self.params.order() as usize + b.0 as usize
    }

    #[inline]
    fn scale_table(&self, f: Fel) -> &[u8] {
        debug_assert!(u32::from(f.0) < self.params.order());
        let start = (f.0 as usize) << 8;
        &self.byte_scale[start..start + 256]
    }
}

impl FieldKernel for PackedKernel {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    #[inline]
    fn add(&self, a: Fel, b: Fel) -> Fel {
        Fel(self.add[self.index(a, b)].into())
    }

    #[inline]
    fn mul(&self, a: Fel, b: Fel) -> Fel {
        Fel(self.mul[self.index(a, b)].into())
    }

    #[inline]
    fn neg(&self, a: Fel) -> Fel {
        Fel(self.neg[a.0 as usize].into())
    }

    #[inline]
    fn inv(&self, a: Fel) -> Fel {
        assert!(!a.is_zero(), "division by zero");
        Fel(self.inv[a.0 as usize].into())
    }

    #[inline]
    fn to_int(&self, a: Fel) -> u32 {
        debug_assert!(u32::from(a.0) < self.params.order());
        a.0.into()
    }

    #[inline]
    fn from_int(&self, n: u32) -> Fel {
        Fel((n % self.params.order()) as u16)
    }

    #[inline]
    fn row_bytes(&self, noc: usize) -> usize {
        align_row((noc + self.per_byte - 1) / self.per_byte)
    }

    #[inline]
    fn extract(&self, row: &[u8], col: usize) -> Fel {
        let byte = row[col / self.per_byte] as usize;
        Fel(self.extract[(col % self.per_byte) << 8 | byte].into())
    }

    #[inline]
    fn insert(&self, row: &mut [u8], col: usize, a: Fel) {
        debug_assert!(u32::from(a.0) < self.params.order());
        let old = u32::from(self.extract(row, col).0);
        let w = self.weights[col % self.per_byte];
        let byte = &mut row[col / self.per_byte];
        *byte = (u32::from(*byte) - old * w + u32::from(a.0) * w) as u8;
    }

    fn add_row_from(&self, dst: &mut [u8], src: &[u8], first: usize) {
        let start = first / self.per_byte;
        let dst = &mut dst[start..];
        let src = &src[start..];
        if self.params.characteristic() == 2 {
            for (d, s) in dst.iter_mut().zip(src) {
                *d ^= *s;
            }
        } else {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = self.byte_add[(*d as usize) << 8 | s as usize];
            }
        }
    }

    fn scale_row(&self, row: &mut [u8], f: Fel) {
        if f.is_zero() {
            row.fill(0);
        } else if f != Fel::ONE {
            let table = self.scale_table(f);
            for b in row {
                *b = table[*b as usize];
            }
        }
    }

    fn add_scaled_row_from(&self, dst: &mut [u8], src: &[u8], f: Fel, first: usize) {
        if f.is_zero() {
            return;
        }
        if f == Fel::ONE {
            self.add_row_from(dst, src, first);
            return;
        }
        let start = first / self.per_byte;
        let table = self.scale_table(f);
        for (d, &s) in dst[start..].iter_mut().zip(&src[start..]) {
            if s != 0 {
                *d = self.byte_add[(*d as usize) << 8 | table[s as usize] as usize];
            }
        }
    }

    fn find_pivot(&self, row: &[u8], noc: usize) -> Option<(usize, Fel)> {
        // The last used byte may hold entries at or past `noc`.
        let used = (noc + self.per_byte - 1) / self.per_byte;
        row[..used]
            .iter()
            .enumerate()
            .filter(|(_, &b)| b != 0)
            .find_map(|(i, &byte)| {
                let first = i * self.per_byte;
                (0..self.per_byte.min(noc - first)).find_map(|j| {
                    let v = self.extract[j << 8 | byte as usize];
                    (v != 0).then(|| (first + j, Fel(v.into())))
                })
            })
    }
}
