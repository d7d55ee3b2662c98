//! Testing utilities for formguard
//!
//! - [`MockDocument`] is an in-memory page implementing `formguard_core::Dom`.
//! - [`Spy`] hands out handlers, predicates and hooks that record their calls,
//!   then checks the count against [`Times`].
//! - [`init_tracing`] routes formguard's logs into test output.

pub mod document;
pub mod logging;
pub mod selector;
pub mod spy;

pub use document::MockDocument;
pub use logging::init_tracing;
pub use selector::{Selector, SelectorError};
pub use spy::{Call, Spy, Times};
