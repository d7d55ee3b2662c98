//! Native events and per-element listener chains.
//!
//! Each `(element, event)` pair owns a [`ListenerChain`]: formguard layers
//! stacked on top of whatever native handler the host installed. Dispatch
//! runs the layers newest first and finishes with the native handler, whose
//! return value is relayed back to the caller.

use crate::field::FieldId;
use formguard_rules::ElementId;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Events formguard listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    Click,
    Change,
    Keyup,
    Submit,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Click => "click",
            EventKind::Change => "change",
            EventKind::Keyup => "keyup",
            EventKind::Submit => "submit",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A native event travelling down a listener chain.
#[derive(Debug, Clone)]
pub struct Event {
    pub kind: EventKind,
    pub target: ElementId,
    pub cancelable: bool,
    default_prevented: bool,
}

impl Event {
    /// Create an event. Only submit and click events are cancelable.
    pub fn new(target: ElementId, kind: EventKind) -> Self {
        Self {
            kind,
            target,
            cancelable: matches!(kind, EventKind::Submit | EventKind::Click),
            default_prevented: false,
        }
    }

    /// Cancel the default action, if the event allows it.
    pub fn prevent_default(&mut self) {
        if self.cancelable {
            self.default_prevented = true;
        }
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// A host-installed handler. Returning `false` asks to cancel the default action.
pub type Handler = Rc<dyn Fn(&mut Event) -> bool>;

/// What a field does when one of its layers is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAction {
    /// Clear message and decoration.
    Reset,
    /// Validate now.
    Validate,
    /// Validate after the field's debounce interval.
    Defer,
}

/// One formguard listener in a chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// Runs a field action, then continues the chain.
    Field { field: FieldId, action: FieldAction },
    /// Runs a form's submit sweep; continues only if every field passed.
    Form { form: String },
}

impl Layer {
    fn belongs_to_field(&self, id: FieldId) -> bool {
        matches!(self, Layer::Field { field, .. } if *field == id)
    }

    fn belongs_to_form(&self, key: &str) -> bool {
        matches!(self, Layer::Form { form } if form == key)
    }
}

/// Layers for one `(element, event)` pair plus the native handler beneath them.
#[derive(Clone, Default)]
pub struct ListenerChain {
    layers: Vec<Layer>,
    native: Option<Handler>,
}

impl ListenerChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a layer on top; it runs before every existing layer.
    pub fn prepend(&mut self, layer: Layer) {
        self.layers.insert(0, layer);
    }

    /// Layers in execution order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn native(&self) -> Option<&Handler> {
        self.native.as_ref()
    }

    /// Run the native handler. Without one the default action proceeds.
    pub fn call_native(&self, event: &mut Event) -> bool {
        self.native.as_ref().map_or(true, |handler| handler(event))
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty() && self.native.is_none()
    }

    /// Number of formguard layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }
}

impl fmt::Debug for ListenerChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerChain")
            .field("layers", &self.layers)
            .field("has_native", &self.native.is_some())
            .finish()
    }
}

/// Every listener chain in the page.
#[derive(Debug, Default)]
pub struct EventTable {
    chains: HashMap<(ElementId, EventKind), ListenerChain>,
}

impl EventTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install (or replace) the native handler for `(element, kind)`.
    ///
    /// Layers already stacked on top stay in place.
    pub fn set_native(&mut self, element: ElementId, kind: EventKind, handler: Option<Handler>) {
        self.chains.entry((element, kind)).or_default().native = handler;
        self.prune(element, kind);
    }

    pub fn prepend(&mut self, element: ElementId, kind: EventKind, layer: Layer) {
        self.chains.entry((element, kind)).or_default().prepend(layer);
    }

    /// A copy of the chain as it stands now, for one dispatch.
    pub fn snapshot(&self, element: ElementId, kind: EventKind) -> ListenerChain {
        self.chains
            .get(&(element, kind))
            .cloned()
            .unwrap_or_default()
    }

    pub fn chain(&self, element: ElementId, kind: EventKind) -> Option<&ListenerChain> {
        self.chains.get(&(element, kind))
    }

    /// Drop every layer installed for `field`, leaving native handlers untouched.
    pub fn remove_field(&mut self, field: FieldId) -> usize {
        self.retain_layers(|layer| !layer.belongs_to_field(field))
    }

    /// Drop the submit layer of form `key`.
    pub fn remove_form(&mut self, key: &str) -> usize {
        self.retain_layers(|layer| !layer.belongs_to_form(key))
    }

    fn retain_layers(&mut self, keep: impl Fn(&Layer) -> bool) -> usize {
        let mut removed = 0;
        for chain in self.chains.values_mut() {
            let before = chain.layers.len();
            chain.layers.retain(&keep);
            removed += before - chain.layers.len();
        }
        self.chains.retain(|_, chain| !chain.is_empty());
        removed
    }

    fn prune(&mut self, element: ElementId, kind: EventKind) {
        if self
            .chains
            .get(&(element, kind))
            .is_some_and(ListenerChain::is_empty)
        {
            self.chains.remove(&(element, kind));
        }
    }
}
