//! Property-based tests for echelonization and null spaces.

#[cfg(test)]
mod tests {
    use gfspin_field::{Fel, Field, FieldConfig, FieldKernel, Variant};
    use proptest::prelude::*;

    use crate::{
        clean, echelonize, is_zero_row, map_row, null_space, null_space_with_echelon, Matrix,
    };

    fn any_field() -> impl Strategy<Value = Field> {
        prop::sample::select(vec![
            (2, Variant::Packed),
            (3, Variant::Packed),
            (4, Variant::Packed),
            (5, Variant::Log),
            (8, Variant::Packed),
            (9, Variant::Log),
            (13, Variant::Packed),
            (256, Variant::Packed),
            (257, Variant::Log),
            (3125, Variant::Log),
        ])
        .prop_map(|(q, v)| Field::with_variant(q, v, &FieldConfig::in_memory()))
    }

    // Matrices biased towards low rank so dependent rows show up.
    fn any_matrix() -> impl Strategy<Value = Matrix> {
        (any_field(), 0usize..12, 0usize..12, 1usize..4).prop_flat_map(|(f, nor, noc, sparsity)| {
            let q = f.order();
            prop::collection::vec(
                prop::collection::vec(
                    (0..q, 0usize..sparsity).prop_map(|(n, keep)| if keep == 0 { n } else { 0 }),
                    noc,
                ),
                nor,
            )
            .prop_map(move |rows| Matrix::from_ints(&f, noc, &rows))
        })
    }

    fn square_matrix() -> impl Strategy<Value = Matrix> {
        (any_field(), 0usize..10).prop_flat_map(|(f, n)| {
            let q = f.order();
            prop::collection::vec(prop::collection::vec(0..q, n), n)
                .prop_map(move |rows| Matrix::from_ints(&f, n, &rows))
        })
    }

    proptest! {
        #[test]
        fn echelonize_is_idempotent(m in any_matrix()) {
            let mut once = m.clone();
            let rank = echelonize(&mut once);
            let mut twice = once.clone();
            prop_assert_eq!(echelonize(&mut twice), rank);
            prop_assert_eq!(&twice, &once);
            prop_assert_eq!(twice.pivot_table(), once.pivot_table());
        }

        #[test]
        fn echelon_form_invariants(m in any_matrix()) {
            let mut e = m.clone();
            let rank = echelonize(&mut e);
            prop_assert_eq!(e.nor(), rank);
            let f = e.field().clone();
            let table = e.pivot_table().unwrap().to_vec();
            prop_assert_eq!(table.len(), e.noc());

            let mut sorted = table.clone();
            sorted.sort_unstable();
            prop_assert_eq!(sorted, (0..e.noc()).collect::<Vec<_>>());

            for (i, row) in e.rows().enumerate() {
                prop_assert_eq!(f.find_pivot(row, e.noc()), Some((table[i], Fel::ONE)));
                for &col in &table[..i] {
                    prop_assert!(f.extract(row, col).is_zero());
                }
            }
        }

        #[test]
        fn input_rows_lie_in_echelon_span(m in any_matrix()) {
            let mut e = m.clone();
            echelonize(&mut e);
            let mut residue = m.clone();
            prop_assert_eq!(clean(&mut residue, &e), 0);
        }

        #[test]
        fn rank_nullity(m in any_matrix()) {
            let (null, echelon) = null_space_with_echelon(&m);
            prop_assert_eq!(echelon.nor() + null.nor(), m.nor());
            prop_assert_eq!(null.noc(), m.nor());

            let mut e = m.clone();
            echelonize(&mut e);
            prop_assert_eq!(&echelon, &e);
            prop_assert_eq!(echelon.pivot_table(), e.pivot_table());
        }

        #[test]
        fn rank_nullity_square(m in square_matrix()) {
            let mut e = m.clone();
            let rank = echelonize(&mut e);
            prop_assert_eq!(rank + null_space(&m).nor(), m.noc());
        }

        #[test]
        fn null_space_rows_annihilate(m in any_matrix()) {
            let null = null_space(&m);
            let f = m.field().clone();
            let mut out = vec![0u8; m.stride()];
            for v in null.rows() {
                prop_assert!(!is_zero_row(v));
                map_row(&f, v, &m, &mut out);
                prop_assert!(is_zero_row(&out));
            }
        }

        #[test]
        fn parallel_product_matches(a in square_matrix()) {
            let b = a.transpose();
            prop_assert_eq!(a.mul_parallel(&b), a.mul(&b));
            prop_assert_eq!(a.mul(&b).transpose(), b.transpose().mul(&a.transpose()));
        }

        #[test]
        fn inverse_when_full_rank(m in square_matrix()) {
            let mut e = m.clone();
            prop_assume!(echelonize(&mut e) == m.nor());
            let inv = m.inverse();
            prop_assert_eq!(m.mul(&inv), Matrix::identity(m.field(), m.nor()));
        }
    }
}
