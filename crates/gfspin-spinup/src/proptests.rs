//! Property-based tests for spin-up.

#[cfg(test)]
mod tests {
    use gfspin_field::{Field, FieldKernel};
    use gfspin_linalg::{clean, rank, Matrix};
    use proptest::prelude::*;

    use crate::{
        spin_up, spin_up_standard_basis, spin_up_with_script, Representation, SeedMode,
    };

    fn matrix(f: &Field, nor: usize, noc: usize) -> impl Strategy<Value = Matrix> {
        let f = f.clone();
        let q = f.order();
        prop::collection::vec(prop::collection::vec(0..q, noc), nor)
            .prop_map(move |rows| Matrix::from_ints(&f, noc, &rows))
    }

    // A field, a representation with one to three generators, and seeds.
    fn setup(seeds: usize) -> impl Strategy<Value = (Representation, Matrix)> {
        (prop::sample::select(vec![2u32, 3, 4, 5, 8, 9, 311]), 1usize..7, 1usize..4).prop_flat_map(
            move |(q, dim, ngen)| {
                let f = Field::new(q);
                (
                    prop::collection::vec(matrix(&f, dim, dim), ngen),
                    matrix(&f, seeds, dim),
                )
                    .prop_map(|(gens, seeds)| (Representation::new(gens), seeds))
            },
        )
    }

    fn has_zero_row(m: &Matrix) -> bool {
        m.rows().any(gfspin_linalg::is_zero_row)
    }

    proptest! {
        #[test]
        fn closure_is_invariant((rep, seeds) in setup(2)) {
            prop_assume!(!has_zero_row(&seeds));
            let u = spin_up(&seeds, &rep);
            let mut residue = seeds.clone();
            prop_assert_eq!(clean(&mut residue, &u), 0);
            for g in rep.generators() {
                let mut images = u.mul(g);
                prop_assert_eq!(clean(&mut images, &u), 0);
            }
        }

        #[test]
        fn standard_basis_spans_closure((rep, seeds) in setup(2)) {
            prop_assume!(!has_zero_row(&seeds));
            let u = spin_up(&seeds, &rep);
            let std = spin_up_standard_basis(&seeds, &rep, SeedMode::Each, false).basis;
            prop_assert_eq!(std.nor(), u.nor());
            prop_assert_eq!(rank(&std), u.nor());
            let mut residue = std.clone();
            prop_assert_eq!(clean(&mut residue, &u), 0);
        }

        #[test]
        fn standard_basis_is_equivariant(
            ((rep, seeds), a) in setup(1).prop_flat_map(|(rep, seeds)| {
                let a = matrix(rep.field(), rep.dim(), rep.dim());
                (Just((rep, seeds)), a)
            })
        ) {
            prop_assume!(!has_zero_row(&seeds));
            prop_assume!(rank(&a) == a.nor());
            let before = spin_up_standard_basis(&seeds, &rep, SeedMode::First, false).basis;
            let after = spin_up_standard_basis(
                &seeds.mul(&a),
                &rep.conjugate(&a),
                SeedMode::First,
                false,
            )
            .basis;
            prop_assert_eq!(after, before.mul(&a));
        }

        #[test]
        fn script_replay_reproduces_basis((rep, seeds) in setup(3)) {
            prop_assume!(!has_zero_row(&seeds));
            let result = spin_up_standard_basis(&seeds, &rep, SeedMode::Each, true);
            let script = result.script.unwrap();
            prop_assert_eq!(script.len(), result.basis.nor());
            prop_assert!(script.validate(rep.ngen()).is_ok());
            let replayed = spin_up_with_script(&seeds, &rep, SeedMode::Each, &script);
            prop_assert_eq!(replayed, result.basis);
        }
    }
}
