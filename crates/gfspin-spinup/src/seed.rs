//! Seed vectors.
//!
//! Seeds are numbered from 1. In [`SeedMode::Make`] the seed matrix holds
//! `k` independent rows `b_0, ..., b_{k-1}` and seed `n` is one vector from
//! each 1-dimensional subspace of their span, normalized so its first
//! non-zero coefficient is 1. The numbering runs through the leading
//! position from `k-1` down to `0`; within one leading position `l` the
//! coefficients of `b_{l+1}, b_{l+2}, ...` are the base-q digits of the
//! offset, least significant first. So seeds 1, 2, 3 are `b_{k-1}`,
//! `b_{k-2}` and `b_{k-2} + b_{k-1}`.

use gfspin_field::{Fel, FieldKernel};
use gfspin_linalg::{rank, Matrix};

/// How the seed matrix is turned into seed vectors.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SeedMode {
    /// Only the first row.
    First,
    /// Every row in turn.
    #[default]
    Each,
    /// One vector per point of the projective space spanned by the rows.
    Make,
}

/// Numbered seed vectors drawn from a seed matrix.
#[derive(Clone, Debug)]
pub struct SeedSource {
    seeds: Matrix,
    mode: SeedMode,
    count: usize,
}

impl SeedSource {
    /// Wraps a seed matrix.
    ///
    /// # Panics
    ///
    /// Panics in [`SeedMode::Make`] if the rows are linearly dependent.
    #[must_use]
    pub fn new(seeds: Matrix, mode: SeedMode) -> Self {
        let k = seeds.nor();
        let count = match mode {
            SeedMode::First => k.min(1),
            SeedMode::Each => k,
            SeedMode::Make => {
                assert_eq!(rank(&seeds), k, "seed rows must be independent to make seed vectors");
                projective_points(seeds.field().order(), k)
            }
        };
        Self { seeds, mode, count }
    }

    /// Number of seeds, saturating at `usize::MAX`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if there is no seed at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The seed mode.
    #[must_use]
    pub fn mode(&self) -> SeedMode {
        self.mode
    }

    /// The underlying seed matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix {
        &self.seeds
    }

    /// Writes seed `index` (1-based) into `row`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `1..=len()`.
    pub fn seed_into(&self, index: usize, row: &mut [u8]) {
        assert!(
            (1..=self.count).contains(&index),
            "seed {index} out of range 1..={}",
            self.count
        );
        match self.mode {
            SeedMode::First | SeedMode::Each => {
                row[..self.seeds.stride()].copy_from_slice(self.seeds.row(index - 1));
            }
            SeedMode::Make => self.make_seed(index - 1, row),
        }
    }

    /// Seed `index` (1-based) as a fresh row.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not in `1..=len()`.
    #[must_use]
    pub fn seed(&self, index: usize) -> Vec<u8> {
        let mut row = vec![0; self.seeds.stride()];
        self.seed_into(index, &mut row);
        row
    }

    /// Every seed with its index.
    pub fn iter(&self) -> impl Iterator<Item = (usize, Vec<u8>)> + '_ {
        (1..=self.count).map(|i| (i, self.seed(i)))
    }

    fn make_seed(&self, mut offset: usize, row: &mut [u8]) {
        let field = self.seeds.field();
        let q = field.order() as usize;
        let k = self.seeds.nor();
        row.fill(0);

        for lead in (0..k).rev() {
            let block = checked_power(q, k - 1 - lead);
            if block.is_some_and(|b| offset >= b) {
                offset -= block.unwrap_or(0);
                continue;
            }
            field.add_row(row, self.seeds.row(lead));
            for b in lead + 1..k {
                let digit = offset % q;
                offset /= q;
                if digit != 0 {
                    let c: Fel = field.from_int(digit as u32);
                    field.add_scaled_row(row, self.seeds.row(b), c);
                }
            }
            return;
        }
        unreachable!("seed offset beyond the projective space");
    }
}

fn checked_power(q: usize, e: usize) -> Option<usize> {
    u32::try_from(e).ok().and_then(|e| q.checked_pow(e))
}

/// `(q^k - 1) / (q - 1)`, saturating.
fn projective_points(q: u32, k: usize) -> usize {
    let mut total = 0usize;
    for e in 0..k {
        match checked_power(q as usize, e) {
            Some(block) => total = total.saturating_add(block),
            None => return usize::MAX,
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use gfspin_field::Field;
    use rustc_hash::FxHashSet;

    use super::*;

    #[test]
    fn test_counts() {
        let f = Field::new(3);
        let m = Matrix::identity(&f, 3);
        assert_eq!(SeedSource::new(m.clone(), SeedMode::First).len(), 1);
        assert_eq!(SeedSource::new(m.clone(), SeedMode::Each).len(), 3);
        assert_eq!(SeedSource::new(m, SeedMode::Make).len(), 13);
        assert!(SeedSource::new(Matrix::zeros(&f, 0, 3), SeedMode::First).is_empty());
        assert_eq!(projective_points(65536, 20), usize::MAX);
    }

    #[test]
    fn test_each_returns_rows() {
        let f = Field::new(5);
        let m = Matrix::from_ints(&f, 2, &[vec![1, 2], vec![3, 4]]);
        let src = SeedSource::new(m.clone(), SeedMode::Each);
        assert_eq!(src.seed(2), m.row(1));
    }

    #[test]
    fn test_make_order() {
        let f = Field::new(3);
        let src = SeedSource::new(Matrix::identity(&f, 3), SeedMode::Make);
        let ints = |i| Matrix::from_row(&f, 3, &src.seed(i)).to_ints().remove(0);
        assert_eq!(ints(1), vec![0, 0, 1]);
        assert_eq!(ints(2), vec![0, 1, 0]);
        assert_eq!(ints(3), vec![0, 1, 1]);
        assert_eq!(ints(4), vec![0, 1, 2]);
        assert_eq!(ints(5), vec![1, 0, 0]);
        assert_eq!(ints(13), vec![1, 2, 2]);
    }

    #[test]
    fn test_make_hits_every_projective_point_once() {
        let f = Field::new(4);
        let src = SeedSource::new(Matrix::identity(&f, 3), SeedMode::Make);
        let mut seen = FxHashSet::default();
        for (_, row) in src.iter() {
            let (_, lead) = f.find_pivot(&row, 3).unwrap();
            assert_eq!(lead, Fel::ONE);
            assert!(seen.insert(row));
        }
        assert_eq!(seen.len(), 21);
    }

    #[test]
    #[should_panic(expected = "independent")]
    fn test_make_rejects_dependent_rows() {
        let f = Field::new(2);
        let m = Matrix::from_ints(&f, 2, &[vec![1, 1], vec![1, 1]]);
        let _ = SeedSource::new(m, SeedMode::Make);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_zero_panics() {
        let f = Field::new(2);
        let _ = SeedSource::new(Matrix::identity(&f, 2), SeedMode::Each).seed(0);
    }
}
