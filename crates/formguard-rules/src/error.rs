//! Rule outcomes and rule-level configuration errors.

use std::fmt;
use thiserror::Error;

/// Result of a single rule invocation.
///
/// A failure here is expected, data-driven state. Misconfigured rules are
/// reported through [`RuleConfigError`] instead.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RuleOutcome {
    /// The value satisfies the rule.
    #[default]
    Success,
    /// The value violates the rule.
    Failure {
        /// Resolved, human-readable message.
        message: String,
    },
}

impl RuleOutcome {
    /// Create a failure carrying `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure {
            message: message.into(),
        }
    }

    /// Fail with `message` when `failed` holds, succeed otherwise.
    pub fn fail_if(failed: bool, message: impl FnOnce() -> String) -> Self {
        if failed {
            Self::failure(message())
        } else {
            Self::Success
        }
    }

    /// Returns `true` for [`RuleOutcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }

    /// Returns `true` for [`RuleOutcome::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// The failure message, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Success => None,
            Self::Failure { message } => Some(message),
        }
    }

    /// Evaluate `next` only when this outcome is a success.
    pub fn and_then(self, next: impl FnOnce() -> RuleOutcome) -> RuleOutcome {
        match self {
            Self::Success => next(),
            failure => failure,
        }
    }
}

impl fmt::Display for RuleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Failure { message } => write!(f, "failure: {message}"),
        }
    }
}

/// Programmer errors raised by a rule.
///
/// These are never downgraded to a [`RuleOutcome::Failure`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleConfigError {
    /// `confirmation` was bound without a `match` target.
    #[error("confirmation: the element to match must be provided")]
    MissingMatch,

    /// The `confirmation` target does not resolve to exactly one element.
    #[error("confirmation: no single element matches `{0}`")]
    UnresolvedMatch(String),

    /// `size` was bound without any of `is`, `min` or `max`.
    #[error("size: at least one of `is`, `min` or `max` must be provided")]
    MissingSize,

    /// A `format` pattern failed to compile.
    #[error("format: invalid pattern `{pattern}`: {reason}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },
}
