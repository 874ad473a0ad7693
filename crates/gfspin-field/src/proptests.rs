//! Property-based tests for field and row arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::{Field, FieldConfig, FieldKernel, Variant};

    const ORDERS: &[u32] = &[2, 3, 4, 5, 7, 8, 9, 16, 25, 27, 49, 64, 121, 128, 243, 256];
    const LARGE_ORDERS: &[u32] = &[257, 289, 512, 625, 2187, 4096, 65521];

    fn field(q: u32, variant: Variant) -> Field {
        Field::with_variant(q, variant, &FieldConfig::in_memory())
    }

    fn any_field() -> impl Strategy<Value = Field> {
        let small = ORDERS
            .iter()
            .flat_map(|&q| [(q, Variant::Packed), (q, Variant::Log)]);
        let large = LARGE_ORDERS.iter().map(|&q| (q, Variant::Log));
        prop::sample::select(small.chain(large).collect::<Vec<_>>())
            .prop_map(|(q, variant)| field(q, variant))
    }

    // A field together with three canonical integers
    fn field_and_ints() -> impl Strategy<Value = (Field, u32, u32, u32)> {
        any_field().prop_flat_map(|f| {
            let q = f.order();
            (Just(f), 0..q, 0..q, 0..q)
        })
    }

    // A field together with two rows of canonical integers and a scalar
    fn field_and_rows() -> impl Strategy<Value = (Field, Vec<u32>, Vec<u32>, u32)> {
        (any_field(), 1usize..40).prop_flat_map(|(f, noc)| {
            let q = f.order();
            (
                Just(f),
                prop::collection::vec(0..q, noc),
                prop::collection::vec(0..q, noc),
                0..q,
            )
        })
    }

    fn pack(f: &Field, ints: &[u32]) -> Vec<u8> {
        let mut row = vec![0u8; f.row_bytes(ints.len())];
        for (col, &n) in ints.iter().enumerate() {
            f.insert(&mut row, col, f.from_int(n));
        }
        row
    }

    fn unpack(f: &Field, row: &[u8], noc: usize) -> Vec<u32> {
        (0..noc).map(|col| f.to_int(f.extract(row, col))).collect()
    }

    proptest! {
        // Field axioms

        #[test]
        fn add_commutative_associative((f, a, b, c) in field_and_ints()) {
            let (a, b, c) = (f.from_int(a), f.from_int(b), f.from_int(c));
            prop_assert_eq!(f.add(a, b), f.add(b, a));
            prop_assert_eq!(f.add(f.add(a, b), c), f.add(a, f.add(b, c)));
        }

        #[test]
        fn mul_commutative_associative((f, a, b, c) in field_and_ints()) {
            let (a, b, c) = (f.from_int(a), f.from_int(b), f.from_int(c));
            prop_assert_eq!(f.mul(a, b), f.mul(b, a));
            prop_assert_eq!(f.mul(f.mul(a, b), c), f.mul(a, f.mul(b, c)));
        }

        #[test]
        fn distributive((f, a, b, c) in field_and_ints()) {
            let (a, b, c) = (f.from_int(a), f.from_int(b), f.from_int(c));
            prop_assert_eq!(f.mul(a, f.add(b, c)), f.add(f.mul(a, b), f.mul(a, c)));
        }

        #[test]
        fn identities_and_inverses((f, a, _b, _c) in field_and_ints()) {
            let a = f.from_int(a);
            prop_assert_eq!(f.add(a, crate::Fel::ZERO), a);
            prop_assert_eq!(f.mul(a, crate::Fel::ONE), a);
            prop_assert!(f.add(a, f.neg(a)).is_zero());
            if !a.is_zero() {
                prop_assert_eq!(f.mul(a, f.inv(a)), crate::Fel::ONE);
                prop_assert_eq!(f.div(a, a), crate::Fel::ONE);
            }
        }

        #[test]
        fn canonical_round_trip((f, a, _b, _c) in field_and_ints()) {
            prop_assert_eq!(f.to_int(f.from_int(a)), a);
            prop_assert_eq!(f.from_int(a + f.order()), f.from_int(a));
        }

        #[test]
        fn prime_field_is_modular((f, a, b, _c) in field_and_ints()) {
            prop_assume!(f.params().degree() == 1);
            let q = u64::from(f.order());
            let sum = f.add(f.from_int(a), f.from_int(b));
            let product = f.mul(f.from_int(a), f.from_int(b));
            prop_assert_eq!(u64::from(f.to_int(sum)), (u64::from(a) + u64::from(b)) % q);
            prop_assert_eq!(u64::from(f.to_int(product)), u64::from(a) * u64::from(b) % q);
        }

        #[test]
        fn kernels_agree_on_small_fields((f, a, b, _c) in field_and_ints()) {
            prop_assume!(f.order() <= 256);
            let other = field(
                f.order(),
                if f.variant() == Variant::Packed { Variant::Log } else { Variant::Packed },
            );
            let ops: [fn(&Field, crate::Fel, crate::Fel) -> crate::Fel; 3] =
                [|f, x, y| f.add(x, y), |f, x, y| f.mul(x, y), |f, x, y| f.sub(x, y)];
            for op in ops {
                let here = f.to_int(op(&f, f.from_int(a), f.from_int(b)));
                let there = other.to_int(op(&other, other.from_int(a), other.from_int(b)));
                prop_assert_eq!(here, there);
            }
        }

        #[test]
        fn frobenius_is_additive((f, a, b, _c) in field_and_ints()) {
            let p = u64::from(f.characteristic());
            let (a, b) = (f.from_int(a), f.from_int(b));
            prop_assert_eq!(f.pow(f.add(a, b), p), f.add(f.pow(a, p), f.pow(b, p)));
        }

        // Row primitives

        #[test]
        fn add_scaled_row_matches_elementwise((f, x, y, s) in field_and_rows()) {
            let noc = x.len();
            let mut row = pack(&f, &x);
            let other = pack(&f, &y);
            let s = f.from_int(s);
            f.add_scaled_row(&mut row, &other, s);

            let expected: Vec<u32> = x
                .iter()
                .zip(&y)
                .map(|(&a, &b)| f.to_int(f.add(f.from_int(a), f.mul(s, f.from_int(b)))))
                .collect();
            prop_assert_eq!(unpack(&f, &row, noc), expected);
        }

        #[test]
        fn scale_row_matches_elementwise((f, x, _y, s) in field_and_rows()) {
            let noc = x.len();
            let mut row = pack(&f, &x);
            let s = f.from_int(s);
            f.scale_row(&mut row, s);
            let expected: Vec<u32> = x
                .iter()
                .map(|&a| f.to_int(f.mul(s, f.from_int(a))))
                .collect();
            prop_assert_eq!(unpack(&f, &row, noc), expected);
        }

        #[test]
        fn padding_stays_zero((f, x, y, s) in field_and_rows()) {
            let noc = x.len();
            let mut row = pack(&f, &x);
            let other = pack(&f, &y);
            f.add_row(&mut row, &other);
            f.add_scaled_row(&mut row, &other, f.from_int(s));
            f.scale_row(&mut row, f.from_int(s));
            let padded = pack(&f, &unpack(&f, &row, noc));
            prop_assert_eq!(row, padded);
        }

        #[test]
        fn find_pivot_is_first_nonzero((f, x, _y, _s) in field_and_rows()) {
            let noc = x.len();
            let row = pack(&f, &x);
            let expected = x
                .iter()
                .position(|&n| n != 0)
                .map(|col| (col, f.from_int(x[col])));
            prop_assert_eq!(f.find_pivot(&row, noc), expected);
        }

        #[test]
        fn find_pivot_ignores_trailing_columns((f, x, y, _s) in field_and_rows()) {
            // Pack x followed by y, then search only the columns of x.
            let noc = x.len();
            let wide: Vec<u32> = x.iter().chain(&y).copied().collect();
            let row = pack(&f, &wide);
            let expected = x
                .iter()
                .position(|&n| n != 0)
                .map(|col| (col, f.from_int(x[col])));
            prop_assert_eq!(f.find_pivot(&row, noc), expected);
        }

        #[test]
        fn add_row_from_skips_leading_columns((f, x, y, s) in field_and_rows()) {
            // Zero the first half of both rows, then start at the midpoint.
            let noc = x.len();
            let first = noc / 2;
            let zeroed = |v: &[u32]| -> Vec<u32> {
                v.iter().enumerate().map(|(i, &n)| if i < first { 0 } else { n }).collect()
            };
            let (x, y) = (zeroed(&x), zeroed(&y));
            let s = f.from_int(s);

            let mut full = pack(&f, &x);
            let mut partial = full.clone();
            let other = pack(&f, &y);
            f.add_scaled_row(&mut full, &other, s);
            f.add_scaled_row_from(&mut partial, &other, s, first);
            prop_assert_eq!(full, partial);
        }
    }
}
