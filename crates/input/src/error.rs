use crate::rule::RuleKind;

/// Result alias used throughout the crate.
pub type InputResult<T> = Result<T, InputError>;

/// Error type for rule resolution, chain building and strict validation.
///
/// Validation failures are only raised by [`Chain::validate_all`](crate::Chain::validate_all);
/// the polling API reports them through return values instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InputError {
    /// No registered namespace knows the rule name.
    #[error("{kind} `{name}` not found in any registered namespace")]
    UnresolvedRule { kind: RuleKind, name: String },

    /// The rule exists but its constructor rejected the parameters.
    #[error("invalid parameters for {kind} `{name}`: {reason}")]
    InvalidRuleParams {
        kind: RuleKind,
        name: String,
        reason: String,
    },

    /// A builder method was called in a state that does not allow it.
    #[error("invalid chain state: {reason}")]
    InvalidChainState { reason: String },

    /// A check failed during strict validation.
    #[error("validation of `{name}` failed: {}", messages.join("; "))]
    ValidationFailure { name: String, messages: Vec<String> },

    /// A value was requested under a name that was never checked.
    #[error("no value named `{name}`")]
    UnknownValue { name: String },
}

impl InputError {
    pub(crate) fn no_active_check(operation: &str) -> Self {
        Self::InvalidChainState {
            reason: format!("`{operation}` called without an active check"),
        }
    }

    /// Broad error category for grouping in logs.
    #[must_use]
    pub fn category(&self) -> &str {
        match self {
            Self::UnresolvedRule { .. } | Self::InvalidRuleParams { .. } => "rule",
            Self::InvalidChainState { .. } => "usage",
            Self::ValidationFailure { .. } => "validation",
            Self::UnknownValue { .. } => "lookup",
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::UnresolvedRule { .. } => "INPUT_UNRESOLVED_RULE",
            Self::InvalidRuleParams { .. } => "INPUT_INVALID_PARAMS",
            Self::InvalidChainState { .. } => "INPUT_CHAIN_STATE",
            Self::ValidationFailure { .. } => "INPUT_VALIDATION",
            Self::UnknownValue { .. } => "INPUT_UNKNOWN_VALUE",
        }
    }

    /// Whether this error reports invalid input rather than a programming mistake.
    #[must_use]
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, Self::ValidationFailure { .. })
    }
}
