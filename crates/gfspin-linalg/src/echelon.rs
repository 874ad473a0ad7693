//! Echelonization, cleaning and null spaces.
//!
//! "Echelon form" here is the semi-echelon form used throughout: every row
//! has a leading (pivot) entry equal to one, and every row is zero in the
//! pivot columns of all rows above it. Pivot columns need not increase, so
//! the pivot table records them explicitly.
//!
//! Elimination is deterministic: row `i` is cleaned only with rows accepted
//! before it, in acceptance order, and rows are never reordered beyond
//! dropping dependent ones.

use gfspin_field::{Fel, Field, FieldKernel};
use tracing::trace;

use crate::matrix::Matrix;

/// Clears `row` in every pivot column of the first `rank` rows of `basis`.
///
/// Basis rows must have pivot value one.
fn clean_row(field: &Field, row: &mut [u8], basis: &[u8], stride: usize, pivots: &[usize]) {
    for (k, &col) in pivots.iter().enumerate() {
        let a = field.extract(row, col);
        if !a.is_zero() {
            let src = &basis[k * stride..(k + 1) * stride];
            field.add_scaled_row_from(row, src, field.neg(a), col);
        }
    }
}

/// Completes a list of pivot columns to a full pivot table.
fn pivot_table(pivots: Vec<usize>, noc: usize) -> Vec<usize> {
    let mut used = vec![false; noc];
    for &col in &pivots {
        used[col] = true;
    }
    let mut table = pivots;
    table.extend((0..noc).filter(|&col| !used[col]));
    table
}

/// Runs one elimination pass over the rows of `m`, pivoting only in the
/// first `pivot_cols` columns.
///
/// Accepted rows are normalized and compacted to the front in input order.
/// Rows that vanish in the pivot region are handed to `rejected` before
/// being discarded. Returns the pivot columns of the accepted rows.
fn eliminate(m: &mut Matrix, pivot_cols: usize, mut rejected: impl FnMut(&[u8])) -> Vec<usize> {
    let field = m.field().clone();
    let (nor, stride) = (m.nor(), m.stride());
    let data = m.data_mut();
    let mut pivots = Vec::new();

    for i in 0..nor {
        let rank = pivots.len();
        let (head, tail) = data.split_at_mut(i * stride);
        let row = &mut tail[..stride];
        clean_row(&field, row, head, stride, &pivots);

        match field.find_pivot(row, pivot_cols) {
            Some((col, a)) => {
                field.scale_row(row, field.inv(a));
                if rank != i {
                    data.copy_within(i * stride..(i + 1) * stride, rank * stride);
                }
                pivots.push(col);
            }
            None => rejected(row),
        }
    }
    pivots
}

/// Reduces `m` to echelon form in place and returns its rank.
///
/// Dependent rows are removed, every pivot is normalized to one and the
/// pivot table is rebuilt.
pub fn echelonize(m: &mut Matrix) -> usize {
    let noc = m.noc();
    let pivots = eliminate(m, noc, |_| {});
    let rank = pivots.len();
    trace!(nor = m.nor(), noc, rank, "echelonized");
    m.truncate(rank);
    m.set_pivot_table(pivot_table(pivots, noc));
    rank
}

/// Rebuilds the pivot table of a matrix already in echelon form.
///
/// Pivot values need not be one.
///
/// # Panics
///
/// Panics if a row is zero or if a row is non-zero in the pivot column of
/// an earlier row.
pub fn pivotize(m: &mut Matrix) {
    let field = m.field().clone();
    let noc = m.noc();
    let mut pivots = Vec::with_capacity(m.nor());
    for (i, row) in m.rows().enumerate() {
        let Some((col, _)) = field.find_pivot(row, noc) else {
            panic!("pivotize: row {i} is zero");
        };
        assert!(
            pivots.iter().all(|&p| field.extract(row, p).is_zero()),
            "pivotize: matrix is not in echelon form at row {i}"
        );
        pivots.push(col);
    }
    m.set_pivot_table(pivot_table(pivots, noc));
}

/// Clears `m` against the echelonized `subspace`, then echelonizes what is
/// left and returns its rank.
///
/// Afterwards `m` spans a complement of `subspace` inside
/// `subspace + m`; a rank of zero means the rows of `m` lay in `subspace`.
///
/// # Panics
///
/// Panics if the fields or column counts differ, or if `subspace` has no
/// pivot table.
pub fn clean(m: &mut Matrix, subspace: &Matrix) -> usize {
    m.assert_compatible(subspace, "clean");
    let Some(table) = subspace.pivot_table() else {
        panic!("clean: subspace has no pivot table");
    };
    let field = m.field().clone();
    let pivots = &table[..subspace.nor()];

    for i in 0..m.nor() {
        let row = m.row_mut(i);
        for (k, &col) in pivots.iter().enumerate() {
            let a = field.extract(row, col);
            if !a.is_zero() {
                let src = subspace.row(k);
                let factor = field.neg(field.div(a, field.extract(src, col)));
                field.add_scaled_row_from(row, src, factor, col);
            }
        }
    }
    echelonize(m)
}

/// Returns the rank of `m` without modifying it.
#[must_use]
pub fn rank(m: &Matrix) -> usize {
    echelonize(&mut m.clone())
}

/// Computes the left null space `{v : v·m = 0}` and the echelon form of
/// `m` in one elimination over `[m | I]`.
///
/// Both results are in echelon form with pivot tables. The null space has
/// `m.nor()` columns and dimension `m.nor() - rank(m)`.
#[must_use]
pub fn null_space_with_echelon(m: &Matrix) -> (Matrix, Matrix) {
    let field = m.field().clone();
    let (nor, noc) = (m.nor(), m.noc());

    let mut aug = Matrix::zeros(&field, nor, noc + nor);
    for i in 0..nor {
        for j in 0..noc {
            let a = m.get(i, j);
            if !a.is_zero() {
                aug.set(i, j, a);
            }
        }
        aug.set(i, noc + i, Fel::ONE);
    }

    let mut null = Matrix::zeros(&field, 0, nor);
    let mut row = vec![0u8; null.stride()];
    let pivots = eliminate(&mut aug, noc, |rejected| {
        for k in 0..nor {
            field.insert(&mut row, k, field.extract(rejected, noc + k));
        }
        null.push_row(&row);
    });

    let rank = pivots.len();
    aug.truncate(rank);
    let mut echelon = aug.column_range(0..noc);
    echelon.set_pivot_table(pivot_table(pivots, noc));

    echelonize(&mut null);
    trace!(nor, noc, rank, nullity = null.nor(), "null space");
    (null, echelon)
}

/// Computes the left null space `{v : v·m = 0}` in echelon form.
#[must_use]
pub fn null_space(m: &Matrix) -> Matrix {
    null_space_with_echelon(m).0
}
