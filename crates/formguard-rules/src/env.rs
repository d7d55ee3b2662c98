//! Element references and the lookup surface rules may consult.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Opaque handle to a host element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u32);

impl ElementId {
    /// Wrap a raw host index.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw host index.
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "element#{}", self.0)
    }
}

/// Either a concrete element or a selector that should resolve to one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ElementRef {
    /// A resolved element.
    Id(ElementId),
    /// A selector to resolve against the page.
    Selector(String),
}

impl From<ElementId> for ElementRef {
    fn from(id: ElementId) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ElementRef {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for ElementRef {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl fmt::Display for ElementRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Selector(selector) => f.write_str(selector),
        }
    }
}

// Configuration files can only name elements by selector.
impl<'de> Deserialize<'de> for ElementRef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::Selector)
    }
}

/// Lookups a rule may need from the page.
///
/// Only `confirmation` uses this today: it compares the value under test with
/// the current value of another element.
pub trait RuleEnv {
    /// Current value of the element `target` names, or `None` when the target
    /// does not resolve to exactly one element.
    fn element_value(&self, target: &ElementRef) -> Option<String>;
}

/// An environment with no elements in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnv;

impl RuleEnv for NoEnv {
    fn element_value(&self, _target: &ElementRef) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_ref_from_json() {
        let target: ElementRef = serde_json::from_str("\"#password\"").unwrap();
        assert_eq!(target, ElementRef::Selector("#password".into()));
    }

    #[test]
    fn element_ref_display() {
        assert_eq!(ElementRef::from(ElementId::new(3)).to_string(), "element#3");
        assert_eq!(ElementRef::from("#a").to_string(), "#a");
    }
}
