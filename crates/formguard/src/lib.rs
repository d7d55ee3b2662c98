//! # formguard
//!
//! Client-side form validation for a host page.
//!
//! Fields bind named rules from a fixed library, show a message next to the
//! element after each check, and report to their form, which blocks
//! submission while any field fails.
//!
//! ## Quick Start
//!
//! ```rust
//! use formguard::prelude::*;
//! use formguard_testing::MockDocument;
//!
//! # fn main() -> formguard::Result<()> {
//! let mut page = MockDocument::new();
//! let form = page.form(Some("signup"));
//! let email = page.input(form, "text");
//! page.set_attribute(email, "id", "email");
//!
//! let mut guard = FormGuard::new(page);
//! guard.attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())?;
//!
//! // empty email: the submit sweep fails and the submission is cancelled
//! assert!(!guard.dispatch(form, EventKind::Submit)?);
//! assert_eq!(guard.dom().message_after(email), Some("can't be empty"));
//!
//! guard.dom_mut().set_value(email, "me@example.com");
//! assert!(guard.dispatch(form, EventKind::Submit)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Declarative markup
//!
//! Elements carrying `data-validate="presence size"` (and optionally
//! `data-validate-options='{"min": 3}'`) are picked up by
//! [`FormGuard::init_declarative`].
//!
//! ## Optional Features
//!
//! - `tracing` (default) - log field, form and debounce activity through `tracing`
//!
//! ```toml
//! [dependencies]
//! formguard = { version = "0.1", default-features = false }
//! ```

// Re-export core functionality
pub use formguard_core::*;

// Re-export the rule library
pub use formguard_rules::{
    messages, ElementId, ElementRef, FieldValue, NoEnv, Pattern, Predicate, RuleConfigError,
    RuleEnv, RuleFn, RuleName, RuleOptions, RuleOutcome, UnknownRule,
};

/// The rule functions, callable without a field.
pub use formguard_rules::rules;

// Re-export for custom predicate arguments
pub use serde_json;

/// Prelude module - import everything you need with `use formguard::prelude::*`
pub mod prelude {
    pub use formguard_core::prelude::*;
    pub use formguard_core::{
        attrs, ClassNames, FieldAction, FormHooks, Layer, Outcome, CLEAR_EARLY_THRESHOLD,
    };
    pub use formguard_rules::messages;
    pub use serde_json::json;
}
