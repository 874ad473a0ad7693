//! Logarithm kernel for large fields (q ≤ 65536).
//!
//! A non-zero element `gen^k` is stored as `k + 1`, zero as `0`.
//! Multiplication adds logarithms; addition uses the Zech logarithm
//! `Z(n)` defined by `1 + gen^n = gen^Z(n)`, since
//! `gen^a + gen^b = gen^(a + Z(b - a))`.
//!
//! Rows hold one little-endian `u16` per element.

use serde::{Deserialize, Serialize};

use crate::element::Fel;
use crate::kernel::{align_row, FieldKernel};
use crate::params::FieldParams;

/// Zech-logarithm arithmetic with one element per 16-bit word.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogKernel {
    params: FieldParams,
    /// Order of the multiplicative group.
    group: u32,
    /// Logarithm of -1.
    minus_one: u32,
    /// `zech[n]` is the raw element `1 + gen^n`.
    zech: Vec<u16>,
    /// Canonical integer of each raw element.
    ints: Vec<u16>,
    /// Raw element of each canonical integer.
    raws: Vec<u16>,
}

impl LogKernel {
    /// Builds the tables for the field described by `params`.
    #[must_use]
    pub fn new(params: FieldParams) -> Self {
        let q = params.order();
        let group = q - 1;
        let minus_one = if params.characteristic() == 2 {
            0
        } else {
            group / 2
        };

        let zech = (0..group)
            .map(|n| match params.add_ints(1, params.gen_power(n)) {
                0 => 0,
                c => (params.log(c) + 1) as u16,
            })
            .collect();

        let mut ints = vec![0u16; q as usize];
        let mut raws = vec![0u16; q as usize];
        for k in 0..group {
            let c = params.gen_power(k);
            ints[k as usize + 1] = c as u16;
            raws[c as usize] = (k + 1) as u16;
        }

        Self {
            params,
            group,
            minus_one,
            zech,
            ints,
            raws,
        }
    }

    #[inline]
    fn add_raw(&self, a: u16, b: u16) -> u16 {
        debug_assert!(u32::from(a) < self.params.order());
        debug_assert!(u32::from(b) < self.params.order());
        if a == 0 {
            return b;
        }
        if b == 0 {
            return a;
        }
        let ka = u32::from(a) - 1;
        let kb = u32::from(b) - 1;
        let diff = (kb + self.group - ka) % self.group;
        match self.zech[diff as usize] {
            0 => 0,
            z => ((ka + u32::from(z) - 1) % self.group + 1) as u16,
        }
    }

    #[inline]
    fn mul_raw(&self, a: u16, b: u16) -> u16 {
        debug_assert!(u32::from(a) < self.params.order());
        debug_assert!(u32::from(b) < self.params.order());
        if a == 0 || b == 0 {
            return 0;
        }
        ((u32::from(a) + u32::from(b) - 2) % self.group + 1) as u16
    }
}

#[inline]
fn get(row: &[u8], col: usize) -> u16 {
    u16::from_le_bytes([row[2 * col], row[2 * col + 1]])
}

#[inline]
fn put(row: &mut [u8], col: usize, v: u16) {
    row[2 * col..2 * col + 2].copy_from_slice(&v.to_le_bytes());
}

impl FieldKernel for LogKernel {
    fn params(&self) -> &FieldParams {
        &self.params
    }

    #[inline]
    fn add(&self, a: Fel, b: Fel) -> Fel {
        Fel(self.add_raw(a.0, b.0))
    }

    #[inline]
    fn mul(&self, a: Fel, b: Fel) -> Fel {
        Fel(self.mul_raw(a.0, b.0))
    }

    #[inline]
    fn neg(&self, a: Fel) -> Fel {
        if a.is_zero() {
            return a;
        }
        Fel(((u32::from(a.0) - 1 + self.minus_one) % self.group + 1) as u16)
    }

    #[inline]
    fn inv(&self, a: Fel) -> Fel {
        assert!(!a.is_zero(), "division by zero");
        let k = u32::from(a.0) - 1;
        Fel(((self.group - k) % self.group + 1) as u16)
    }

    #[inline]
    fn to_int(&self, a: Fel) -> u32 {
        self.ints[a.0 as usize].into()
    }

    #[inline]
    fn from_int(&self, n: u32) -> Fel {
        Fel(self.raws[(n % self.params.order()) as usize])
    }

    #[inline]
    fn row_bytes(&self, noc: usize) -> usize {
        align_row(2 * noc)
    }

    #[inline]
    fn extract(&self, row: &[u8], col: usize) -> Fel {
        Fel(get(row, col))
    }

    #[inline]
    fn insert(&self, row: &mut [u8], col: usize, a: Fel) {
        debug_assert!(u32::from(a.0) < self.params.order());
        put(row, col, a.0);
    }

    fn add_row_from(&self, dst: &mut [u8], src: &[u8], first: usize) {
        let start = 2 * first;
        for (d, s) in dst[start..]
            .chunks_exact_mut(2)
            .zip(src[start..].chunks_exact(2))
        {
            let s = u16::from_le_bytes([s[0], s[1]]);
            if s != 0 {
                let v = self.add_raw(u16::from_le_bytes([d[0], d[1]]), s);
                d.copy_from_slice(&v.to_le_bytes());
            }
        }
    }

    fn scale_row(&self, row: &mut [u8], f: Fel) {
        if f.is_zero() {
            row.fill(0);
            return;
        }
        if f == Fel::ONE {
            return;
        }
        for d in row.chunks_exact_mut(2) {
            let v = self.mul_raw(u16::from_le_bytes([d[0], d[1]]), f.0);
            d.copy_from_slice(&v.to_le_bytes());
        }
    }

    fn add_scaled_row_from(&self, dst: &mut [u8], src: &[u8], f: Fel, first: usize) {
        if f.is_zero() {
            return;
        }
        let start = 2 * first;
        for (d, s) in dst[start..]
            .chunks_exact_mut(2)
            .zip(src[start..].chunks_exact(2))
        {
            let s = u16::from_le_bytes([s[0], s[1]]);
            if s != 0 {
                let v = self.add_raw(u16::from_le_bytes([d[0], d[1]]), self.mul_raw(s, f.0));
                d.copy_from_slice(&v.to_le_bytes());
            }
        }
    }

    fn find_pivot(&self, row: &[u8], noc: usize) -> Option<(usize, Fel)> {
        (0..noc).find_map(|col| {
            let v = get(row, col);
            (v != 0).then_some((col, Fel(v)))
        })
    }
}
