//! Per-form aggregation of fields and the registry that owns the aggregators.

use crate::dom::{attrs, Dom};
use crate::field::FieldId;
use crate::tracing_macros::trace_info;
use formguard_rules::ElementId;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// A form-level hook. It sees the aggregator as it stands at that point.
pub type FormHook = Rc<dyn Fn(&FormAggregator)>;

/// Hooks run around a submit sweep. Unset hooks do nothing.
#[derive(Clone, Default)]
pub struct FormHooks {
    pub before_validate: Option<FormHook>,
    pub on_valid: Option<FormHook>,
    pub on_invalid: Option<FormHook>,
    pub after_validate: Option<FormHook>,
}

impl FormHooks {
    pub(crate) fn run(hook: &Option<FormHook>, form: &FormAggregator) {
        if let Some(hook) = hook {
            hook(form);
        }
    }
}

impl fmt::Debug for FormHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormHooks")
            .field("before_validate", &self.before_validate.is_some())
            .field("on_valid", &self.on_valid.is_some())
            .field("on_invalid", &self.on_invalid.is_some())
            .field("after_validate", &self.after_validate.is_some())
            .finish()
    }
}

/// The fields registered to one form, validated together on submit.
#[derive(Debug)]
pub struct FormAggregator {
    key: String,
    element: ElementId,
    fields: Vec<FieldId>,
    hooks: FormHooks,
    last_result: Option<bool>,
}

impl FormAggregator {
    fn new(key: String, element: ElementId) -> Self {
        Self {
            key,
            element,
            fields: Vec::new(),
            hooks: FormHooks::default(),
            last_result: None,
        }
    }

    /// The form's id, which keys it in the registry.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    /// Registered fields in registration order.
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn contains(&self, field: FieldId) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Register `field`. Returns `false` if it was already registered.
    pub fn add_field(&mut self, field: FieldId) -> bool {
        if self.contains(field) {
            return false;
        }
        self.fields.push(field);
        true
    }

    /// Unregister `field`. Removing an absent field is a no-op.
    pub fn remove_field(&mut self, field: FieldId) -> bool {
        let before = self.fields.len();
        self.fields.retain(|f| *f != field);
        before != self.fields.len()
    }

    pub fn hooks(&self) -> &FormHooks {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut FormHooks {
        &mut self.hooks
    }

    /// Result of the last submit sweep, `None` before the first one.
    pub fn last_result(&self) -> Option<bool> {
        self.last_result
    }

    pub(crate) fn set_last_result(&mut self, valid: bool) {
        self.last_result = Some(valid);
    }
}

/// Aggregators keyed by form id.
///
/// Owned by a `FormGuard`, so separate managers never share forms.
#[derive(Debug)]
pub struct FormRegistry {
    forms: HashMap<String, FormAggregator>,
    next_id: u32,
}

impl Default for FormRegistry {
    fn default() -> Self {
        Self {
            forms: HashMap::new(),
            next_id: 1,
        }
    }
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id of `form`, generating and writing back `zv_form_<n>` if it has none.
    pub fn key_for(&mut self, dom: &mut dyn Dom, form: ElementId) -> String {
        match dom.attribute(form, attrs::ID).filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                let id = format!("zv_form_{}", self.next_id);
                self.next_id += 1;
                dom.set_attribute(form, attrs::ID, &id);
                id
            }
        }
    }

    /// Get the aggregator for `form`, creating it if needed.
    ///
    /// Returns its key and whether it was created by this call.
    pub fn get_or_create(&mut self, dom: &mut dyn Dom, form: ElementId) -> (String, bool) {
        let key = self.key_for(dom, form);
        let created = !self.forms.contains_key(&key);
        if created {
            trace_info!(form = %key, "form aggregator created");
            self.forms
                .insert(key.clone(), FormAggregator::new(key.clone(), form));
        }
        (key, created)
    }

    pub fn get(&self, key: &str) -> Option<&FormAggregator> {
        self.forms.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FormAggregator> {
        self.forms.get_mut(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.forms.contains_key(key)
    }

    pub(crate) fn remove(&mut self, key: &str) -> Option<FormAggregator> {
        self.forms.remove(key)
    }

    pub fn len(&self) -> usize {
        self.forms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forms.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.forms.keys().map(String::as_str)
    }
}
