//! Construction options shared by the geometry constructors.

/// Options accepted by every geometry constructor.
///
/// The default runs all invariant checks and leaves the input untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConstructOpts {
    /// Bypass every invariant check.
    ///
    /// Intended for inputs already known to be valid, e.g. geometries
    /// produced by this crate's own operations. Constructing an invalid
    /// geometry with this flag leaves later operations unspecified.
    pub skip_validations: bool,

    /// Close unclosed polygon rings by appending the first point.
    pub omit_ring_closing: bool,
}

impl ConstructOpts {
    /// Alias for skipping every validation.
    pub fn disable_all_validations() -> Self {
        Self { skip_validations: true, ..Self::default() }
    }

    /// Convenience constructor setting only `skip_validations`.
    pub(crate) fn skip() -> Self {
        Self::disable_all_validations()
    }
}
