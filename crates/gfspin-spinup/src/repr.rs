//! Matrix representations.

use gfspin_field::Field;
use gfspin_linalg::Matrix;

/// Square matrices of one dimension over one field, read as the generators
/// of a group or algebra acting on row vectors from the right.
#[derive(Clone, Debug, PartialEq)]
pub struct Representation {
    field: Field,
    dim: usize,
    generators: Vec<Matrix>,
}

impl Representation {
    /// Creates a representation from its generators.
    ///
    /// # Panics
    ///
    /// Panics if `generators` is empty, or if a generator is not square, has
    /// another dimension than the first, or lies over another field.
    #[must_use]
    pub fn new(generators: Vec<Matrix>) -> Self {
        let Some(first) = generators.first() else {
            panic!("representation needs at least one generator");
        };
        let field = first.field().clone();
        let dim = first.nor();
        for (i, g) in generators.iter().enumerate() {
            assert!(g.is_square(), "generator {i} is not square ({}x{})", g.nor(), g.noc());
            assert_eq!(g.nor(), dim, "generator {i} has dimension {}, expected {dim}", g.nor());
            assert!(*g.field() == field, "generator {i} is over {}, expected {field}", g.field());
        }
        Self {
            field,
            dim,
            generators,
        }
    }

    /// The field of the generators.
    #[must_use]
    pub fn field(&self) -> &Field {
        &self.field
    }

    /// Dimension of the module.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of generators.
    #[must_use]
    pub fn ngen(&self) -> usize {
        self.generators.len()
    }

    /// Generator `i`.
    #[must_use]
    pub fn generator(&self, i: usize) -> &Matrix {
        &self.generators[i]
    }

    /// All generators.
    #[must_use]
    pub fn generators(&self) -> &[Matrix] {
        &self.generators
    }

    /// Gives up the generators.
    #[must_use]
    pub fn into_generators(self) -> Vec<Matrix> {
        self.generators
    }

    /// Replaces every generator `g` by `a⁻¹·g·a`, so that `v ↦ v·a` maps the
    /// old module onto the new one.
    ///
    /// # Panics
    ///
    /// Panics if `a` is singular or does not fit the representation.
    #[must_use]
    pub fn conjugate(&self, a: &Matrix) -> Self {
        let a_inv = a.inverse();
        Self::new(self.generators.iter().map(|g| a_inv.mul(g).mul(a)).collect())
    }

    pub(crate) fn assert_seeds(&self, seeds: &Matrix, what: &str) {
        assert!(
            *seeds.field() == self.field,
            "{what}: seeds are over {}, representation over {}",
            seeds.field(),
            self.field
        );
        assert_eq!(
            seeds.noc(),
            self.dim,
            "{what}: seeds have {} columns, representation has dimension {}",
            seeds.noc(),
            self.dim
        );
    }
}

#[cfg(test)]
mod tests {
    use gfspin_linalg::Permutation;

    use super::*;

    #[test]
    fn test_accessors() {
        let f = Field::new(3);
        let a = Permutation::from_images(vec![1, 2, 0]).to_matrix(&f);
        let rep = Representation::new(vec![a.clone(), Matrix::identity(&f, 3)]);
        assert_eq!(rep.dim(), 3);
        assert_eq!(rep.ngen(), 2);
        assert_eq!(rep.generator(0), &a);
        assert_eq!(rep.into_generators().len(), 2);
    }

    #[test]
    fn test_conjugate_by_identity() {
        let f = Field::new(5);
        let g = Matrix::from_ints(&f, 2, &[vec![1, 2], vec![3, 4]]);
        let rep = Representation::new(vec![g]);
        assert_eq!(rep.conjugate(&Matrix::identity(&f, 2)), rep);
    }

    #[test]
    #[should_panic(expected = "at least one generator")]
    fn test_empty_panics() {
        let _ = Representation::new(Vec::new());
    }

    #[test]
    #[should_panic(expected = "not square")]
    fn test_non_square_panics() {
        let f = Field::new(2);
        let _ = Representation::new(vec![Matrix::zeros(&f, 2, 3)]);
    }

    #[test]
    #[should_panic(expected = "expected 2")]
    fn test_mixed_dimensions_panic() {
        let f = Field::new(2);
        let _ = Representation::new(vec![Matrix::identity(&f, 2), Matrix::identity(&f, 3)]);
    }

    #[test]
    #[should_panic(expected = "is over GF(3)")]
    fn test_mixed_fields_panic() {
        let _ = Representation::new(vec![
            Matrix::identity(&Field::new(2), 2),
            Matrix::identity(&Field::new(3), 2),
        ]);
    }
}
