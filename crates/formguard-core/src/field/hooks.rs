//! Hook context and the default message rendering.

use super::config::ClassNames;
use crate::dom::{Dom, ElementKind};
use formguard_rules::ElementId;
use std::rc::Rc;

/// A lifecycle hook.
pub type Hook = Rc<dyn Fn(&mut HookContext<'_>)>;

/// The message node and decoration state of one field.
#[derive(Debug, Clone)]
pub struct FieldUi {
    classes: ClassNames,
    anchor: ElementId,
    message_node: Option<ElementId>,
    owns_message_node: bool,
}

impl FieldUi {
    /// `existing` is a message node found in the page; it is reused and never removed.
    pub(crate) fn new(classes: ClassNames, anchor: ElementId, existing: Option<ElementId>) -> Self {
        Self {
            classes,
            anchor,
            message_node: existing,
            owns_message_node: false,
        }
    }

    pub fn classes(&self) -> &ClassNames {
        &self.classes
    }

    pub fn anchor(&self) -> ElementId {
        self.anchor
    }

    pub fn message_node(&self) -> Option<ElementId> {
        self.message_node
    }

    /// Whether the message node was created by this field.
    pub fn owns_message_node(&self) -> bool {
        self.owns_message_node
    }

    fn ensure_message_node(&mut self, dom: &mut dyn Dom) -> ElementId {
        match self.message_node {
            Some(node) => node,
            None => {
                let node = dom.create_message_after(self.anchor);
                self.message_node = Some(node);
                self.owns_message_node = true;
                node
            }
        }
    }

    /// Hide the message and drop the field decoration.
    pub(crate) fn clear(&self, dom: &mut dyn Dom, element: ElementId) {
        if let Some(node) = self.message_node {
            dom.set_text(node, "");
            dom.remove_class(node, &self.classes.valid_message);
            dom.remove_class(node, &self.classes.invalid_message);
            dom.set_hidden(node, true);
        }
        dom.remove_class(element, &self.classes.valid_field);
        dom.remove_class(element, &self.classes.invalid_field);
    }

    /// Clear, then remove the message node if this field created it.
    pub(crate) fn teardown(&mut self, dom: &mut dyn Dom, element: ElementId) {
        self.clear(dom, element);
        if self.owns_message_node {
            if let Some(node) = self.message_node.take() {
                dom.remove(node);
            }
            self.owns_message_node = false;
        }
    }
}

/// What a hook sees: the page, the field's element and its latest outcome.
pub struct HookContext<'a> {
    dom: &'a mut dyn Dom,
    ui: &'a mut FieldUi,
    element: ElementId,
    kind: ElementKind,
    valid: Option<bool>,
    message: &'a str,
    show_message_when_empty: bool,
}

impl<'a> HookContext<'a> {
    pub(crate) fn new(
        dom: &'a mut dyn Dom,
        ui: &'a mut FieldUi,
        element: ElementId,
        kind: ElementKind,
        valid: Option<bool>,
        message: &'a str,
        show_message_when_empty: bool,
    ) -> Self {
        Self {
            dom,
            ui,
            element,
            kind,
            valid,
            message,
            show_message_when_empty,
        }
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Outcome of the validation in progress; `None` before rules have run.
    pub fn is_valid(&self) -> Option<bool> {
        self.valid
    }

    /// The failure message, or the success message once every rule passed.
    pub fn message(&self) -> &str {
        self.message
    }

    /// Whether a bound rule insists on showing its message for blank values.
    pub fn show_message_when_empty(&self) -> bool {
        self.show_message_when_empty
    }

    pub fn message_node(&self) -> Option<ElementId> {
        self.ui.message_node()
    }

    pub fn dom(&self) -> &dyn Dom {
        &*self.dom
    }

    pub fn dom_mut(&mut self) -> &mut dyn Dom {
        &mut *self.dom
    }

    // Unchecked boxes count as blank so only always-shown rules report on them.
    fn is_blank(&self) -> bool {
        match self.kind {
            ElementKind::Checkbox => !self.dom.is_checked(self.element),
            ElementKind::Select => self
                .dom
                .selected_value(self.element)
                .map_or(true, |value| value.is_empty()),
            _ => self.dom.value(self.element).is_empty(),
        }
    }

    /// The default `OnValid`/`OnInvalid` behavior.
    ///
    /// Shows the message after the anchor and decorates the field. Blank
    /// values only get a message or the valid decoration when a bound rule
    /// always shows. An empty success message shows no node.
    pub fn render(&mut self) {
        self.clear();

        let valid = self.valid.unwrap_or(true);
        let visible = self.show_message_when_empty || !self.is_blank();

        if visible && (!valid || !self.message.is_empty()) {
            let node = self.ui.ensure_message_node(&mut *self.dom);
            let classes = &self.ui.classes;
            let state_class = if valid {
                &classes.valid_message
            } else {
                &classes.invalid_message
            };
            self.dom.set_text(node, self.message);
            self.dom.add_class(node, &classes.message);
            self.dom.add_class(node, state_class);
            self.dom.set_hidden(node, false);
        }

        let classes = &self.ui.classes;
        if !valid {
            self.dom.add_class(self.element, &classes.invalid_field);
        } else if visible {
            self.dom.add_class(self.element, &classes.valid_field);
        }
    }

    /// Hide the message and drop the field decoration.
    pub fn clear(&mut self) {
        self.ui.clear(&mut *self.dom, self.element);
    }
}
