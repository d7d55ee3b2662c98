//! # formguard core
//!
//! Fields, form aggregators and the listener plumbing that ties them to a
//! host page.
//!
//! A [`FormGuard`] owns a [`Dom`] implementation and everything layered on
//! it. Native events are fed in through [`FormGuard::dispatch`]; each one
//! runs down the element's listener chain, where formguard's layers sit on
//! top of the handlers the page already had.
//!
//! ## Example
//!
//! ```rust,ignore
//! use formguard_core::prelude::*;
//!
//! let mut guard = FormGuard::new(page);
//! let email = guard.attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())?;
//! guard.dispatch(guard.field(email).unwrap().element(), EventKind::Blur)?;
//! ```
//!
//! ## Features
//!
//! - `tracing` (default) - log through the `tracing` crate

mod tracing_macros;

pub mod dom;
mod error;
pub mod event;
pub mod field;
pub mod form;
mod init;
mod manager;
pub mod timer;

pub use dom::{attrs, Dom, ElementKind};
pub use error::{Error, Result};
pub use event::{Event, EventKind, FieldAction, Handler, Layer, ListenerChain};
pub use field::{
    ClassNames, Field, FieldConfig, FieldId, FieldUi, Hook, HookContext, HookPoint, Hooks, Outcome,
    RuleBinding, SharedOptions,
};
pub use form::{FormAggregator, FormHook, FormHooks, FormRegistry};
pub use manager::FormGuard;
pub use timer::CLEAR_EARLY_THRESHOLD;

/// Prelude module for formguard core
pub mod prelude {
    pub use crate::dom::{Dom, ElementKind};
    pub use crate::error::{Error, Result};
    pub use crate::event::{Event, EventKind, Handler};
    pub use crate::field::{FieldConfig, FieldId, HookContext, HookPoint};
    pub use crate::form::FormAggregator;
    pub use crate::manager::FormGuard;
    pub use formguard_rules::prelude::*;
}
