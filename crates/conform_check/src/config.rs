//! Coercer configuration.

/// What the coercer does with a value whose target is an unconstrained type
/// variable.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OpaquePolicy {
    /// Accept the value unchanged and emit a warning.
    #[default]
    Accept,
    /// Report a mismatch.
    Reject,
}

/// Options for [`coerce_root_with`](crate::coerce_root_with) and
/// [`coerce_into_with`](crate::coerce_into_with).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConformConfig {
    pub opaque: OpaquePolicy,

    /// Map a plain value onto the enum member carrying that value.
    pub enums_by_value: bool,
}

impl ConformConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_opaque(mut self, policy: OpaquePolicy) -> Self {
        self.opaque = policy;
        self
    }

    #[must_use]
    pub fn with_enums_by_value(mut self, enabled: bool) -> Self {
        self.enums_by_value = enabled;
        self
    }
}
