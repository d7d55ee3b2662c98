//! The host page boundary.
//!
//! formguard never touches a real document. Everything it needs from the page
//! goes through [`Dom`], which a browser binding or the in-memory mock from
//! `formguard-testing` implements.

use crate::error::{Error, Result};
use formguard_rules::{ElementId, ElementRef, RuleEnv};
use std::fmt;

/// Attribute names read from and written to the page.
pub mod attrs {
    /// Space-separated rule list for declarative init.
    pub const VALIDATE: &str = "data-validate";
    /// JSON rule options for declarative init.
    pub const VALIDATE_OPTIONS: &str = "data-validate-options";
    /// Default failure message for every rule on the element.
    pub const ERROR_MSG: &str = "data-error-msg";
    /// Default success message for the element.
    pub const SUCC_MSG: &str = "data-succ-msg";
    /// Marks an existing node as the message node for the field with this name.
    pub const MESSAGE_NAME: &str = "data-zvmsg";

    pub const ID: &str = "id";
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
}

/// Operations formguard needs from the host document.
///
/// Element handles are opaque; an implementation decides what they index.
pub trait Dom {
    /// Elements matching `selector` in document order, limited to the
    /// descendants of `scope` when given.
    fn query_all(&self, selector: &str, scope: Option<ElementId>) -> Vec<ElementId>;

    /// Lower-case tag name, e.g. `input`.
    fn tag_name(&self, element: ElementId) -> String;

    fn attribute(&self, element: ElementId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str);

    /// The control's current value.
    fn value(&self, element: ElementId) -> String;

    /// Value of a select's selected option, `None` when nothing is selected.
    fn selected_value(&self, element: ElementId) -> Option<String>;

    fn is_checked(&self, element: ElementId) -> bool;

    fn is_disabled(&self, element: ElementId) -> bool;

    fn set_disabled(&mut self, element: ElementId, disabled: bool);

    /// The form the control belongs to, if any.
    fn form_owner(&self, element: ElementId) -> Option<ElementId>;

    fn add_class(&mut self, element: ElementId, class: &str);

    fn remove_class(&mut self, element: ElementId, class: &str);

    fn has_class(&self, element: ElementId, class: &str) -> bool;

    /// Create an empty, hidden message node immediately after `anchor`.
    fn create_message_after(&mut self, anchor: ElementId) -> ElementId;

    fn set_text(&mut self, element: ElementId, text: &str);

    fn set_hidden(&mut self, element: ElementId, hidden: bool);

    /// Detach `element` from the document.
    fn remove(&mut self, element: ElementId);

    /// Resolve a reference to one element; a selector resolves to its first match.
    fn resolve(&self, target: &ElementRef) -> Option<ElementId> {
        match target {
            ElementRef::Id(id) => Some(*id),
            ElementRef::Selector(selector) => self.query_all(selector, None).first().copied(),
        }
    }
}

/// Resolve `target` or fail with [`Error::ElementNotFound`].
pub(crate) fn resolve(dom: &dyn Dom, target: &ElementRef) -> Result<ElementId> {
    dom.resolve(target)
        .ok_or_else(|| Error::ElementNotFound(target.to_string()))
}

/// The kinds of control a field can wrap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Textarea,
    Text,
    Password,
    Checkbox,
    Select,
    File,
}

impl ElementKind {
    /// Classify `element` by tag and `type` attribute.
    ///
    /// An input without a `type` is a text input.
    pub fn detect(dom: &dyn Dom, element: ElementId) -> Result<Self> {
        let tag = dom.tag_name(element).to_ascii_lowercase();
        match tag.as_str() {
            "textarea" => Ok(Self::Textarea),
            "select" => Ok(Self::Select),
            "input" => {
                let input_type = dom
                    .attribute(element, attrs::TYPE)
                    .map(|t| t.to_ascii_lowercase())
                    .unwrap_or_else(|| "text".to_string());
                match input_type.as_str() {
                    "text" => Ok(Self::Text),
                    "password" => Ok(Self::Password),
                    "checkbox" => Ok(Self::Checkbox),
                    "file" => Ok(Self::File),
                    _ => Err(Error::UnsupportedInput(input_type)),
                }
            }
            _ => Err(Error::UnsupportedElement(tag)),
        }
    }

    /// Text-entry controls validate on blur and, optionally, while typing.
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::Textarea | Self::Text | Self::Password)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Textarea => "textarea",
            Self::Text => "text",
            Self::Password => "password",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::File => "file",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lets rules look elements up in the page.
pub(crate) struct DomEnv<'a>(pub(crate) &'a dyn Dom);

impl RuleEnv for DomEnv<'_> {
    fn element_value(&self, target: &ElementRef) -> Option<String> {
        match target {
            ElementRef::Id(id) => Some(self.0.value(*id)),
            ElementRef::Selector(selector) => match self.0.query_all(selector, None).as_slice() {
                [only] => Some(self.0.value(*only)),
                _ => None,
            },
        }
    }
}
