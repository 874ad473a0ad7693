//! The field context.
//!
//! A [`Field`] is a shared handle to the tables of one GF(q) in one kernel
//! variant. Contexts are memoized process-wide: asking twice for the same
//! `(q, variant)` returns handles to the same tables, and tables are built
//! (or loaded from the cache) at most once per process.

use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache;
use crate::config::FieldConfig;
use crate::element::Fel;
use crate::kernel::FieldKernel;
use crate::logtab::LogKernel;
use crate::packed::{PackedKernel, MAX_PACKED_ORDER};
use crate::params::{prime_power, FieldParams, MAX_ORDER};

/// Kernel selection for a field context.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Variant {
    /// Packed tables for q ≤ 256, logarithms above.
    #[default]
    Auto,
    /// Several elements per byte. Only valid for q ≤ 256.
    Packed,
    /// One element per 16-bit word, Zech-logarithm addition.
    Log,
}

impl Variant {
    /// The concrete variant used for GF(q).
    #[must_use]
    pub fn resolve(self, q: u32) -> Self {
        match self {
            Variant::Auto if q <= MAX_PACKED_ORDER => Variant::Packed,
            Variant::Auto => Variant::Log,
            v => v,
        }
    }

    /// Short lowercase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Variant::Auto => "auto",
            Variant::Packed => "packed",
            Variant::Log => "log",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) enum Kernel {
    Packed(PackedKernel),
    Log(LogKernel),
}

impl Kernel {
    pub(crate) fn build(params: FieldParams, variant: Variant) -> Self {
        match variant.resolve(params.order()) {
            Variant::Log => Kernel::Log(LogKernel::new(params)),
            _ => Kernel::Packed(PackedKernel::new(params)),
        }
    }

    pub(crate) fn variant(&self) -> Variant {
        match self {
            Kernel::Packed(_) => Variant::Packed,
            Kernel::Log(_) => Variant::Log,
        }
    }
}

macro_rules! dispatch {
    ($self:ident, $k:ident => $body:expr) => {
        match &*$self.kernel {
            Kernel::Packed($k) => $body,
            Kernel::Log($k) => $body,
        }
    };
}

/// A shared handle to the arithmetic of one GF(q).
///
/// Cloning is cheap. Every operation of [`FieldKernel`] is available on the
/// handle and dispatches to the selected kernel.
#[derive(Clone)]
pub struct Field {
    kernel: Arc<Kernel>,
}

type Registry = Mutex<FxHashMap<(u32, Variant), Field>>;

fn registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(FxHashMap::default()))
}

impl Field {
    /// The context for GF(q) with automatic kernel selection and the default
    /// configuration.
    ///
    /// # Panics
    ///
    /// Panics if `q` is not a prime power in `2..=65536`, or if a cached table
    /// file exists but cannot be read.
    #[must_use]
    pub fn new(q: u32) -> Self {
        Self::with_variant(q, Variant::Auto, &FieldConfig::default())
    }

    /// The context for GF(q) using `config` if the tables must be built.
    ///
    /// # Panics
    ///
    /// See [`Field::new`].
    #[must_use]
    pub fn with_config(q: u32, config: &FieldConfig) -> Self {
        Self::with_variant(q, Variant::Auto, config)
    }

    /// The context for GF(q) in an explicit kernel variant.
    ///
    /// The configuration only matters the first time a `(q, variant)` pair
    /// is requested in this process.
    ///
    /// # Panics
    ///
    /// Panics if `q` is not a prime power in `2..=65536`, if the packed
    /// variant is requested for q > 256, or if a cached table file exists but
    /// cannot be read.
    #[must_use]
    pub fn with_variant(q: u32, variant: Variant, config: &FieldConfig) -> Self {
        assert!(
            q <= MAX_ORDER && prime_power(q).is_some(),
            "invalid field order {q}"
        );
        let variant = variant.resolve(q);
        assert!(
            variant != Variant::Packed || q <= MAX_PACKED_ORDER,
            "packed kernel supports q <= {MAX_PACKED_ORDER}, not {q}"
        );

        let mut fields = registry().lock();
        if let Some(field) = fields.get(&(q, variant)) {
            return field.clone();
        }
        let field = Self::load_or_build(q, variant, config);
        fields.insert((q, variant), field.clone());
        field
    }

    fn load_or_build(q: u32, variant: Variant, config: &FieldConfig) -> Self {
        let path = config
            .table_dir
            .as_ref()
            .map(|dir| cache::table_path(dir, q, variant));

        if let Some(path) = &path {
            match cache::load(path, q, variant) {
                Ok(Some(field)) => {
                    debug!(q, variant = variant.name(), path = %path.display(), "loaded field tables");
                    return field;
                }
                Ok(None) => {}
                Err(err) => panic!("cannot load field tables: {err}"),
            }
        }

        info!(q, variant = variant.name(), "building field tables");
        let field = Self::build(q, variant);

        if let Some(path) = &path {
            if let Err(err) = cache::store(path, &field) {
                warn!(q, error = %err, "cannot write field tables");
            }
        }
        field
    }

    /// Builds fresh tables, bypassing the registry and the cache.
    ///
    /// # Panics
    ///
    /// Panics if `q` is not a prime power in `2..=65536` or if the packed
    /// variant is requested for q > 256.
    #[must_use]
    pub fn build(q: u32, variant: Variant) -> Self {
        Self::from_kernel(Kernel::build(FieldParams::new(q), variant))
    }

    pub(crate) fn from_kernel(kernel: Kernel) -> Self {
        Self {
            kernel: Arc::new(kernel),
        }
    }

    pub(crate) fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// The concrete kernel variant of this context.
    #[must_use]
    pub fn variant(&self) -> Variant {
        self.kernel.variant()
    }

    /// All elements, in canonical order.
    pub fn elements(&self) -> impl Iterator<Item = Fel> + '_ {
        (0..self.order()).map(|n| self.from_int(n))
    }

    /// Orders of the proper subfields, ascending.
    #[must_use]
    pub fn subfield_orders(&self) -> Vec<u32> {
        self.params().subfield_orders()
    }

    /// Maps an element of the subfield `sub` into this field.
    ///
    /// The embedding is a ring homomorphism, the same for every call.
    ///
    /// # Panics
    ///
    /// Panics if `sub` is not a subfield of this field.
    #[must_use]
    pub fn embed(&self, a: Fel, sub: &Field) -> Fel {
        let c = sub.to_int(a);
        if sub.order() == self.order() {
            return self.from_int(c);
        }
        self.from_int(self.params().embed_int(c, sub.order()))
    }

    /// Maps an element of this field lying in the subfield `sub` back to
    /// `sub`, or returns `None` if it does not lie in it.
    ///
    /// # Panics
    ///
    /// Panics if `sub` is not a subfield of this field.
    #[must_use]
    pub fn try_restrict(&self, a: Fel, sub: &Field) -> Option<Fel> {
        let c = self.to_int(a);
        if sub.order() == self.order() {
            return Some(sub.from_int(c));
        }
        self.params()
            .restrict_int(c, sub.order())
            .map(|c| sub.from_int(c))
    }

    /// Inverse of [`Field::embed`].
    ///
    /// # Panics
    ///
    /// Panics if `sub` is not a subfield of this field or `a` does not lie in
    /// it.
    #[must_use]
    pub fn restrict(&self, a: Fel, sub: &Field) -> Fel {
        self.try_restrict(a, sub).unwrap_or_else(|| {
            panic!(
                "element {} of GF({}) does not lie in GF({})",
                self.to_int(a),
                self.order(),
                sub.order()
            )
        })
    }

    /// Formats a row of `noc` elements as canonical integers.
    #[must_use]
    pub fn format_row(&self, row: &[u8], noc: usize) -> String {
        let width = self.order().saturating_sub(1).to_string().len();
        (0..noc)
            .map(|c| format!("{:>width$}", self.to_int(self.extract(row, c))))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FieldKernel for Field {
    fn params(&self) -> &FieldParams {
        dispatch!(self, k => k.params())
    }

    #[inline]
    fn add(&self, a: Fel, b: Fel) -> Fel {
        dispatch!(self, k => k.add(a, b))
    }

    #[inline]
    fn sub(&self, a: Fel, b: Fel) -> Fel {
        dispatch!(self, k => k.sub(a, b))
    }

    #[inline]
    fn mul(&self, a: Fel, b: Fel) -> Fel {
        dispatch!(self, k => k.mul(a, b))
    }

    #[inline]
    fn neg(&self, a: Fel) -> Fel {
        dispatch!(self, k => k.neg(a))
    }

    #[inline]
    fn inv(&self, a: Fel) -> Fel {
        dispatch!(self, k => k.inv(a))
    }

    #[inline]
    fn to_int(&self, a: Fel) -> u32 {
        dispatch!(self, k => k.to_int(a))
    }

    #[inline]
    fn from_int(&self, n: u32) -> Fel {
        dispatch!(self, k => k.from_int(n))
    }

    #[inline]
    fn row_bytes(&self, noc: usize) -> usize {
        dispatch!(self, k => k.row_bytes(noc))
    }

    #[inline]
    fn extract(&self, row: &[u8], col: usize) -> Fel {
        dispatch!(self, k => k.extract(row, col))
    }

    #[inline]
    fn insert(&self, row: &mut [u8], col: usize, a: Fel) {
        dispatch!(self, k => k.insert(row, col, a));
    }

    fn add_row_from(&self, dst: &mut [u8], src: &[u8], first: usize) {
        dispatch!(self, k => k.add_row_from(dst, src, first));
    }

    fn scale_row(&self, row: &mut [u8], f: Fel) {
        dispatch!(self, k => k.scale_row(row, f));
    }

    fn add_scaled_row_from(&self, dst: &mut [u8], src: &[u8], f: Fel, first: usize) {
        dispatch!(self, k => k.add_scaled_row_from(dst, src, f, first));
    }

    fn find_pivot(&self, row: &[u8], noc: usize) -> Option<(usize, Fel)> {
        dispatch!(self, k => k.find_pivot(row, noc))
    }
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.kernel, &other.kernel)
            || (self.order() == other.order() && self.variant() == other.variant())
    }
}

impl Eq for Field {}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field(GF({}), {})", self.order(), self.variant().name())
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GF({})", self.order())
    }
}
