//! Permutations of `0..n`.

use gfspin_field::{Fel, Field};

use crate::matrix::Matrix;

/// A permutation of `0..degree`, stored as its list of images.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Permutation {
    images: Vec<usize>,
}

impl Permutation {
    /// Creates a permutation from its images, or `None` if `images` is not a
    /// permutation of `0..images.len()`.
    #[must_use]
    pub fn try_from_images(images: Vec<usize>) -> Option<Self> {
        let mut seen = vec![false; images.len()];
        for &i in &images {
            if i >= images.len() || std::mem::replace(&mut seen[i], true) {
                return None;
            }
        }
        Some(Self { images })
    }

    /// Creates a permutation from its images.
    ///
    /// # Panics
    ///
    /// Panics if `images` is not a permutation of `0..images.len()`.
    #[must_use]
    pub fn from_images(images: Vec<usize>) -> Self {
        Self::try_from_images(images).unwrap_or_else(|| panic!("not a permutation"))
    }

    /// The identity on `0..degree`.
    #[must_use]
    pub fn identity(degree: usize) -> Self {
        Self {
            images: (0..degree).collect(),
        }
    }

    /// Number of points moved or fixed.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.images.len()
    }

    /// Image of `i`.
    #[must_use]
    pub fn image(&self, i: usize) -> usize {
        self.images[i]
    }

    /// All images in order.
    #[must_use]
    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// Applies `self` first, then `other`.
    ///
    /// # Panics
    ///
    /// Panics if the degrees differ.
    #[must_use]
    pub fn then(&self, other: &Permutation) -> Permutation {
        assert_eq!(self.degree(), other.degree(), "degree mismatch");
        Self {
            images: self.images.iter().map(|&i| other.images[i]).collect(),
        }
    }

    /// The inverse permutation.
    #[must_use]
    pub fn inverse(&self) -> Permutation {
        let mut images = vec![0; self.degree()];
        for (i, &j) in self.images.iter().enumerate() {
            images[j] = i;
        }
        Self { images }
    }

    /// The permutation matrix with a one at `(i, image(i))` for every `i`.
    ///
    /// A row vector `v` maps to `v * P` with `(v * P)[image(i)] = v[i]`.
    #[must_use]
    pub fn to_matrix(&self, field: &Field) -> Matrix {
        let n = self.degree();
        let mut m = Matrix::zeros(field, n, n);
        for (i, &j) in self.images.iter().enumerate() {
            m.set(i, j, Fel::ONE);
        }
        m
    }
}
