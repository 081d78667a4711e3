// -----------------------------------------------------------------------------
// ManagerConfig

/// Runtime options of a [`SerializationManager`](super::SerializationManager).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Panic on contract violations instead of logging and returning them.
    ///
    /// Contract violations are codec bugs: a reader returning null, an
    /// instantiator of the wrong type, a validator answering with the wrong
    /// shape, or a copy with no implementation. Defaults to `true` in debug
    /// builds.
    pub strict_contracts: bool,
}

impl ManagerConfig {
    pub const STRICT: Self = Self {
        strict_contracts: true,
    };

    pub const LENIENT: Self = Self {
        strict_contracts: false,
    };
}

impl Default for ManagerConfig {
    #[inline]
    fn default() -> Self {
        Self {
            strict_contracts: cfg!(debug_assertions),
        }
    }
}
