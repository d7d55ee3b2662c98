//! # formguard rules
//!
//! The fixed library of validation rules used by formguard. Every rule is a
//! plain function of `(value, options, env)` returning a [`RuleOutcome`], or a
//! [`RuleConfigError`] when the binding itself is misconfigured.
//!
//! ## Example
//!
//! ```rust
//! use formguard_rules::prelude::*;
//!
//! let options = RuleOptions::new().with_range(2.0, 5.0);
//! let outcome = RuleName::Numericality
//!     .evaluate(&FieldValue::text("6"), &options, &NoEnv)
//!     .unwrap();
//! assert_eq!(outcome.message(), Some("can't be more than 5"));
//! ```
//!
//! ## Rules
//!
//! - `presence` - value must not be empty
//! - `numericality` - number with optional integer/exact/min/max checks
//! - `size` - character count with exact/min/max checks
//! - `format` - regex match, optionally negated
//! - `email`, `chinese`, `mobile`, `identity` - fixed patterns
//! - `inclusion` / `exclusion` - membership in a candidate list
//! - `confirmation` - equal to another element's value
//! - `acceptance` - checkbox must be checked
//! - `custom` - caller-supplied predicate

mod env;
mod error;
mod options;
pub mod rules;
mod value;

pub use env::{ElementId, ElementRef, NoEnv, RuleEnv};
pub use error::{RuleConfigError, RuleOutcome};
pub use options::{Pattern, Predicate, RuleOptions};
pub use rules::{messages, RuleFn, RuleName, UnknownRule};
pub use value::FieldValue;

/// Prelude module for rules
pub mod prelude {
    pub use crate::env::{ElementId, ElementRef, NoEnv, RuleEnv};
    pub use crate::error::{RuleConfigError, RuleOutcome};
    pub use crate::options::{Pattern, RuleOptions};
    pub use crate::rules::{RuleName, UnknownRule};
    pub use crate::value::FieldValue;
}
