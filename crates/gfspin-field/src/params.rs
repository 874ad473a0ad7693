//! Defining data of GF(q).
//!
//! Everything here is expressed in canonical integers, independent of the
//! kernel that will later encode elements. Both kernels derive their
//! lookup tables from a `FieldParams`.
//!
//! # Defining Polynomial
//!
//! For q = p the generator is the smallest primitive root modulo p. For
//! q = p^n with n > 1 the defining polynomial is the first monic primitive
//! polynomial of degree n, enumerating `(c_0, ..., c_{n-1})` as the base-p
//! number `c_0 + c_1 p + ...`, and the generator is the class of `x`.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Largest supported field order.
pub const MAX_ORDER: u32 = 65536;

/// Splits `q` into `(p, n)` with `q = p^n`, or returns `None` if `q` is not
/// a prime power.
#[must_use]
pub fn prime_power(q: u32) -> Option<(u32, u32)> {
    if q < 2 {
        return None;
    }
    let p = smallest_factor(q);
    let mut rest = q;
    let mut n = 0;
    while rest % p == 0 {
        rest /= p;
        n += 1;
    }
    (rest == 1).then_some((p, n))
}

fn smallest_factor(n: u32) -> u32 {
    let mut d = 2u32;
    while u64::from(d) * u64::from(d) <= u64::from(n) {
        if n % d == 0 {
            return d;
        }
        d += 1;
    }
    n
}

/// Distinct prime factors of `n`.
#[must_use]
pub fn prime_factors(mut n: u32) -> SmallVec<[u32; 8]> {
    let mut factors = SmallVec::new();
    let mut d = 2u32;
    while u64::from(d) * u64::from(d) <= u64::from(n) {
        if n % d == 0 {
            factors.push(d);
            while n % d == 0 {
                n /= d;
            }
        }
        d += 1;
    }
    if n > 1 {
        factors.push(n);
    }
    factors
}

fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// Polynomials over GF(p) reduced modulo a monic polynomial of degree n.
///
/// Elements are coefficient vectors of length n, constant term first.
struct PolyRing<'a> {
    p: u32,
    /// Low coefficients of the monic modulus.
    modulus: &'a [u32],
}

impl PolyRing<'_> {
    fn degree(&self) -> usize {
        self.modulus.len()
    }

    fn one(&self) -> Vec<u32> {
        let mut v = vec![0; self.degree()];
        v[0] = 1;
        v
    }

    fn x(&self) -> Vec<u32> {
        let mut v = vec![0; self.degree()];
        self.mul_x_into(&self.one(), &mut v);
        v
    }

    fn is_one(v: &[u32]) -> bool {
        v[0] == 1 && v[1..].iter().all(|&c| c == 0)
    }

    /// `out = a * x` reduced.
    fn mul_x_into(&self, a: &[u32], out: &mut [u32]) {
        let n = self.degree();
        let p = u64::from(self.p);
        let top = u64::from(a[n - 1]);
        for i in (1..n).rev() {
            out[i] = a[i - 1];
        }
        out[0] = 0;
        if top != 0 {
            for (o, &m) in out.iter_mut().zip(self.modulus) {
                let m = u64::from(m);
                *o = ((u64::from(*o) + (p - m) % p * top) % p) as u32;
            }
        }
    }

    fn mul(&self, a: &[u32], b: &[u32]) -> Vec<u32> {
        let n = self.degree();
        let p = u64::from(self.p);
        let mut prod = vec![0u64; 2 * n - 1];
        for (i, &ai) in a.iter().enumerate() {
            if ai == 0 {
                continue;
            }
            for (j, &bj) in b.iter().enumerate() {
                prod[i + j] = (prod[i + j] + u64::from(ai) * u64::from(bj)) % p;
            }
        }
        for d in (n..2 * n - 1).rev() {
            let top = prod[d];
            if top == 0 {
                continue;
            }
            prod[d] = 0;
            for (i, &m) in self.modulus.iter().enumerate() {
                let m = u64::from(m);
                prod[d - n + i] = (prod[d - n + i] + (p - m) % p * top) % p;
            }
        }
        prod.truncate(n);
        prod.into_iter().map(|c| c as u32).collect()
    }

    fn pow(&self, base: &[u32], mut exp: u64) -> Vec<u32> {
        let mut result = self.one();
        let mut base = base.to_vec();
        while exp > 0 {
            if exp & 1 == 1 {
                result = self.mul(&result, &base);
            }
            base = self.mul(&base, &base);
            exp >>= 1;
        }
        result
    }

    /// True if `x` has multiplicative order exactly `p^n - 1`.
    fn is_primitive(&self, q: u32) -> bool {
        if self.modulus[0] == 0 {
            return false;
        }
        let x = self.x();
        let group = u64::from(q - 1);
        if !Self::is_one(&self.pow(&x, group)) {
            return false;
        }
        prime_factors(q - 1)
            .iter()
            .all(|&r| !Self::is_one(&self.pow(&x, group / u64::from(r))))
    }

    fn encode(&self, v: &[u32]) -> u32 {
        v.iter().rev().fold(0, |acc, &c| acc * self.p + c)
    }
}

/// Finds the defining polynomial for GF(p^n).
///
/// Returns the low coefficients `c_0, ..., c_{n-1}` of the monic polynomial.
fn defining_polynomial(p: u32, n: u32) -> Vec<u32> {
    let q = p.pow(n);
    if n == 1 {
        // x - g: the class of x is g itself.
        for g in 1..p {
            let modulus = [(p - g) % p];
            if (PolyRing { p, modulus: &modulus }).is_primitive(q) {
                return modulus.to_vec();
            }
        }
        panic!("no primitive root modulo {p}");
    }
    let n = n as usize;
    let mut coeffs = vec![0u32; n];
    for code in 0..q {
        let mut c = code;
        for slot in &mut coeffs {
            *slot = c % p;
            c /= p;
        }
        if coeffs[0] == 0 {
            continue;
        }
        if (PolyRing { p, modulus: &coeffs }).is_primitive(q) {
            return coeffs;
        }
    }
    panic!("no primitive polynomial of degree {n} over GF({p})");
}

/// Embedding of a proper subfield GF(p^d) into GF(q).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubfieldEmbedding {
    order: u32,
    /// `embed[c]` is the canonical integer in GF(q) of the subfield element
    /// with canonical integer `c`.
    embed: Vec<u16>,
    /// `restrict[k / step]` is the subfield canonical integer of `gen^k`,
    /// defined only when `step` divides `k`.
    restrict: Vec<u16>,
    step: u32,
}

impl SubfieldEmbedding {
    /// Order of the subfield.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }
}

/// Complete defining data of one finite field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldParams {
    order: u32,
    characteristic: u32,
    degree: u32,
    polynomial: Vec<u32>,
    /// `powers[k]` is the canonical integer of `gen^k`, `k < q - 1`.
    powers: Vec<u16>,
    /// `logs[c]` is the `k` with `gen^k = c`; `logs[0]` is unused.
    logs: Vec<u16>,
    subfields: Vec<SubfieldEmbedding>,
}

impl FieldParams {
    /// Computes the defining data of GF(q).
    ///
    /// # Panics
    ///
    /// Panics if `q` is not a prime power in `2..=MAX_ORDER`.
    #[must_use]
    pub fn new(q: u32) -> Self {
        let Some((p, n)) = prime_power(q).filter(|_| q <= MAX_ORDER) else {
            panic!("invalid field order {q}");
        };
        let mut params = Self::without_subfields(p, n);
        params.subfields = (1..n)
            .filter(|d| n % d == 0)
            .map(|d| params.embedding_of(&Self::without_subfields(p, d)))
            .collect();
        params
    }

    fn without_subfields(p: u32, n: u32) -> Self {
        let q = p.pow(n);
        let polynomial = defining_polynomial(p, n);
        let ring = PolyRing {
            p,
            modulus: &polynomial,
        };

        let mut powers = Vec::with_capacity(q as usize - 1);
        let mut logs = vec![0u16; q as usize];
        let mut current = ring.one();
        let mut next = vec![0; n as usize];
        for k in 0..q - 1 {
            let c = ring.encode(&current);
            powers.push(c as u16);
            logs[c as usize] = k as u16;
            ring.mul_x_into(&current, &mut next);
            std::mem::swap(&mut current, &mut next);
        }

        Self {
            order: q,
            characteristic: p,
            degree: n,
            polynomial,
            powers,
            logs,
            subfields: Vec::new(),
        }
    }

    /// Locates `sub` inside `self` by finding a root of the subfield's
    /// defining polynomial among the generators of the multiplicative
    /// subgroup of order `|sub| - 1`.
    fn embedding_of(&self, sub: &Self) -> SubfieldEmbedding {
        let group = self.order - 1;
        let sub_group = sub.order - 1;
        let step = group / sub_group;

        let root_log = (1..=sub_group)
            .filter(|&j| gcd(j, sub_group) == 1)
            .map(|j| j * step % group)
            .find(|&k| self.is_root(&sub.polynomial, self.powers[k as usize].into()))
            .unwrap_or_else(|| {
                panic!(
                    "GF({}) has no root of the defining polynomial of GF({})",
                    self.order, sub.order
                )
            });

        let mut embed = vec![0u16; sub.order as usize];
        let mut restrict = vec![0u16; sub_group as usize];
        for i in 0..sub_group {
            let k = (u64::from(root_log) * u64::from(i) % u64::from(group)) as u32;
            let sub_int = sub.powers[i as usize];
            embed[sub_int as usize] = self.powers[k as usize];
            restrict[(k / step) as usize] = sub_int;
        }

        SubfieldEmbedding {
            order: sub.order,
            embed,
            restrict,
            step,
        }
    }

    /// Evaluates the monic polynomial with low coefficients `poly` at `y`.
    fn is_root(&self, poly: &[u32], y: u32) -> bool {
        let mut acc = 1;
        for &c in poly.iter().rev() {
            acc = self.add_ints(self.mul_ints(acc, y), c);
        }
        acc == 0
    }

    /// Field order q.
    #[must_use]
    pub fn order(&self) -> u32 {
        self.order
    }

    /// Characteristic p.
    #[must_use]
    pub fn characteristic(&self) -> u32 {
        self.characteristic
    }

    /// Degree n over the prime field.
    #[must_use]
    pub fn degree(&self) -> u32 {
        self.degree
    }

    /// Low coefficients of the monic defining polynomial, constant first.
    #[must_use]
    pub fn polynomial(&self) -> &[u32] {
        &self.polynomial
    }

    /// Canonical integer of the generator.
    #[must_use]
    pub fn generator(&self) -> u32 {
        self.gen_power(1)
    }

    /// Canonical integer of `gen^k`.
    #[must_use]
    pub fn gen_power(&self, k: u32) -> u32 {
        self.powers[(k % (self.order - 1)) as usize].into()
    }

    /// Discrete logarithm of the non-zero canonical integer `c`.
    #[must_use]
    pub fn log(&self, c: u32) -> u32 {
        debug_assert!(c != 0 && c < self.order);
        self.logs[c as usize].into()
    }

    /// Orders of the proper subfields, ascending.
    #[must_use]
    pub fn subfield_orders(&self) -> Vec<u32> {
        self.subfields.iter().map(SubfieldEmbedding::order).collect()
    }

    /// Embedding data for the proper subfield of order `sub_order`.
    #[must_use]
    pub fn subfield(&self, sub_order: u32) -> Option<&SubfieldEmbedding> {
        self.subfields.iter().find(|s| s.order == sub_order)
    }

    /// Maps a subfield canonical integer to a canonical integer of this field.
    ///
    /// # Panics
    ///
    /// Panics if `sub_order` is not a proper subfield order.
    #[must_use]
    pub fn embed_int(&self, c: u32, sub_order: u32) -> u32 {
        let sub = self.require_subfield(sub_order);
        assert!(c < sub_order, "{c} is not an element of GF({sub_order})");
        sub.embed[c as usize].into()
    }

    /// Maps a canonical integer of this field to the subfield, or `None` if
    /// the element does not lie in it.
    ///
    /// # Panics
    ///
    /// Panics if `sub_order` is not a proper subfield order.
    #[must_use]
    pub fn restrict_int(&self, c: u32, sub_order: u32) -> Option<u32> {
        let sub = self.require_subfield(sub_order);
        if c == 0 {
            return Some(0);
        }
        let k = self.log(c);
        (k % sub.step == 0).then(|| sub.restrict[(k / sub.step) as usize].into())
    }

    fn require_subfield(&self, sub_order: u32) -> &SubfieldEmbedding {
        self.subfield(sub_order).unwrap_or_else(|| {
            panic!("GF({sub_order}) is not a proper subfield of GF({})", self.order)
        })
    }

    /// Sum of two canonical integers (digit-wise modulo p).
    #[must_use]
    pub fn add_ints(&self, mut a: u32, mut b: u32) -> u32 {
        let p = self.characteristic;
        let mut result = 0;
        let mut weight = 1;
        while a > 0 || b > 0 {
            result += (a % p + b % p) % p * weight;
            a /= p;
            b /= p;
            weight *= p;
        }
        result
    }

    /// Negation of a canonical integer (digit-wise modulo p).
    #[must_use]
    pub fn neg_int(&self, mut a: u32) -> u32 {
        let p = self.characteristic;
        let mut result = 0;
        let mut weight = 1;
        while a > 0 {
            result += (p - a % p) % p * weight;
            a /= p;
            weight *= p;
        }
        result
    }

    /// Product of two canonical integers.
    #[must_use]
    pub fn mul_ints(&self, a: u32, b: u32) -> u32 {
        if a == 0 || b == 0 {
            return 0;
        }
        self.gen_power(self.log(a) + self.log(b))
    }

    /// Multiplicative inverse of a non-zero canonical integer.
    #[must_use]
    pub fn inv_int(&self, a: u32) -> u32 {
        debug_assert!(a != 0);
        let group = self.order - 1;
        self.gen_power((group - self.log(a)) % group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prime_power() {
        assert_eq!(prime_power(2), Some((2, 1)));
        assert_eq!(prime_power(9), Some((3, 2)));
        assert_eq!(prime_power(256), Some((2, 8)));
        assert_eq!(prime_power(65536), Some((2, 16)));
        assert_eq!(prime_power(6), None);
        assert_eq!(prime_power(1), None);
        assert_eq!(prime_power(0), None);
    }

    #[test]
    fn test_prime_field_generator() {
        assert_eq!(FieldParams::new(2).generator(), 1);
        assert_eq!(FieldParams::new(5).generator(), 2);
        assert_eq!(FieldParams::new(7).generator(), 3);
        assert_eq!(FieldParams::new(23).generator(), 5);
    }

    #[test]
    fn test_gf4_polynomial() {
        // x^2 + x + 1 is the only irreducible quadratic over GF(2).
        let params = FieldParams::new(4);
        assert_eq!(params.polynomial(), &[1, 1]);
        assert_eq!(params.generator(), 2);
        // x^2 = x + 1
        assert_eq!(params.gen_power(2), 3);
    }

    #[test]
    fn test_powers_are_a_permutation() {
        for q in [8, 9, 25, 27, 64] {
            let params = FieldParams::new(q);
            let mut seen = vec![false; q as usize];
            for k in 0..q - 1 {
                let c = params.gen_power(k) as usize;
                assert!(!seen[c], "GF({q}): repeated power");
                seen[c] = true;
            }
            assert!(!seen[0]);
        }
    }

    #[test]
    fn test_subfield_embedding_is_homomorphism() {
        for (q, sub) in [(16, 4), (16, 2), (64, 8), (64, 4), (81, 9), (81, 3)] {
            let big = FieldParams::new(q);
            let small = FieldParams::new(sub);
            for a in 0..sub {
                for b in 0..sub {
                    let sum = big.embed_int(small.add_ints(a, b), sub);
                    assert_eq!(
                        sum,
                        big.add_ints(big.embed_int(a, sub), big.embed_int(b, sub))
                    );
                    let prod = big.embed_int(small.mul_ints(a, b), sub);
                    assert_eq!(
                        prod,
                        big.mul_ints(big.embed_int(a, sub), big.embed_int(b, sub))
                    );
                }
            }
        }
    }

    #[test]
    fn test_prime_subfield_is_constant_polynomials() {
        let params = FieldParams::new(125);
        for c in 0..5 {
            assert_eq!(params.embed_int(c, 5), c);
            assert_eq!(params.restrict_int(c, 5), Some(c));
        }
        assert_eq!(params.restrict_int(5, 5), None);
    }

    #[test]
    fn test_restrict_inverts_embed() {
        let params = FieldParams::new(256);
        assert_eq!(params.subfield_orders(), vec![2, 4, 16]);
        for sub in [4, 16] {
            for c in 0..sub {
                let big = params.embed_int(c, sub);
                assert_eq!(params.restrict_int(big, sub), Some(c));
            }
        }
    }

    #[test]
    #[should_panic(expected = "invalid field order")]
    fn test_rejects_composite() {
        let _ = FieldParams::new(12);
    }

    #[test]
    #[should_panic(expected = "invalid field order")]
    fn test_rejects_too_large() {
        let _ = FieldParams::new(131_072);
    }
}
