//! Error types for formguard

use crate::dom::ElementKind;
use crate::field::FieldId;
use formguard_rules::{ElementId, RuleConfigError, UnknownRule};
use thiserror::Error;

/// Result type alias for formguard operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Configuration and programmer errors.
///
/// A value failing a rule is not an error: it is reported through the boolean
/// returned by `validate` and the field's message. Everything here means the
/// widget was wired up wrongly and propagates out of the call that hit it.
#[derive(Debug, Error)]
pub enum Error {
    /// An `<input>` whose type cannot be validated, such as `radio`.
    #[error("cannot validate an `{0}` input")]
    UnsupportedInput(String),

    /// An element that is not an input, select or textarea.
    #[error("element must be an input, select or textarea, `{0}` was given")]
    UnsupportedElement(String),

    /// A selector that matched nothing.
    #[error("no element matches `{0}`")]
    ElementNotFound(String),

    /// A rule list named a rule outside the library.
    #[error(transparent)]
    UnknownRule(#[from] UnknownRule),

    /// `acceptance` was bound to something other than a checkbox.
    #[error("acceptance must be bound to a checkbox, {element} is a {kind}")]
    AcceptanceRequiresCheckbox {
        element: ElementId,
        kind: ElementKind,
    },

    /// A field id that this manager never issued or already destroyed.
    #[error("unknown field {0}")]
    UnknownField(FieldId),

    /// The declarative options attribute is not a valid options object.
    #[error("invalid validation options on {element}: {source}")]
    InvalidOptions {
        element: ElementId,
        #[source]
        source: serde_json::Error,
    },

    /// A rule rejected its own configuration.
    #[error(transparent)]
    Rule(#[from] RuleConfigError),
}

impl Error {
    /// Returns `true` if a rule binding, rather than the element, is misconfigured.
    pub fn is_rule_error(&self) -> bool {
        matches!(
            self,
            Error::Rule(_) | Error::UnknownRule(_) | Error::AcceptanceRequiresCheckbox { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offender() {
        assert_eq!(
            Error::UnsupportedInput("radio".into()).to_string(),
            "cannot validate an `radio` input"
        );
        assert_eq!(
            Error::UnsupportedElement("div".into()).to_string(),
            "element must be an input, select or textarea, `div` was given"
        );
        let err = Error::AcceptanceRequiresCheckbox {
            element: ElementId::new(4),
            kind: ElementKind::Text,
        };
        assert_eq!(
            err.to_string(),
            "acceptance must be bound to a checkbox, element#4 is a text"
        );
    }

    #[test]
    fn rule_errors_are_transparent() {
        let err = Error::from(RuleConfigError::MissingSize);
        assert_eq!(err.to_string(), RuleConfigError::MissingSize.to_string());
        assert!(err.is_rule_error());
        assert!(!Error::ElementNotFound("#x".into()).is_rule_error());
    }
}
