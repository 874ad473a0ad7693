//! Opaque field elements.

/// An element of some GF(q).
///
/// The bit pattern depends on the kernel that produced it: the packed
/// kernel stores the canonical integer, the logarithm kernel stores one plus
/// the discrete logarithm. In both kernels the raw value `0` is zero and the
/// raw value `1` is one; nothing else may be assumed. Use
/// [`FieldKernel::to_int`](crate::FieldKernel::to_int) to obtain a plain
/// integer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Fel(pub(crate) u16);

impl Fel {
    /// The additive identity in every kernel.
    pub const ZERO: Self = Self(0);

    /// The multiplicative identity in every kernel.
    pub const ONE: Self = Self(1);

    /// Returns true if this is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Returns the kernel-specific raw value.
    ///
    /// Useful for hashing and table indexing inside a single field only.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}
