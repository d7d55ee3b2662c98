//! The validation manager.

use crate::dom::{self, attrs, Dom, ElementKind};
use crate::error::{Error, Result};
use crate::event::{Event, EventKind, EventTable, FieldAction, Handler, Layer, ListenerChain};
use crate::field::{Field, FieldConfig, FieldId, FieldUi, SharedOptions};
use crate::form::{FormAggregator, FormHooks, FormRegistry};
use crate::timer::{TimerQueue, CLEAR_EARLY_THRESHOLD};
use crate::tracing_macros::{trace_debug, trace_error, trace_info, trace_trace};
use formguard_rules::{ElementId, ElementRef, RuleOptions};
use std::collections::HashMap;
use std::time::Duration;

/// Owns the page handle and every field, form, listener and timer on it.
///
/// All work happens synchronously inside `&mut self` calls, so a hook or
/// predicate can never re-enter the manager mid-validation.
#[derive(Debug)]
pub struct FormGuard<D: Dom> {
    dom: D,
    fields: HashMap<FieldId, Field>,
    next_field: u32,
    forms: FormRegistry,
    events: EventTable,
    timers: TimerQueue,
}

impl<D: Dom> FormGuard<D> {
    pub fn new(dom: D) -> Self {
        Self {
            dom,
            fields: HashMap::new(),
            next_field: 1,
            forms: FormRegistry::new(),
            events: EventTable::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    /// Give the page handle back, dropping every field and form.
    pub fn into_dom(self) -> D {
        self.dom
    }

    pub fn resolve(&self, target: &ElementRef) -> Result<ElementId> {
        dom::resolve(&self.dom, target)
    }

    // ----- fields -------------------------------------------------------

    /// Put the element `target` names under validation.
    ///
    /// Registers the field with its form's aggregator and layers its
    /// listeners over the element's existing handlers.
    pub fn create_field(
        &mut self,
        target: impl Into<ElementRef>,
        config: FieldConfig,
    ) -> Result<FieldId> {
        let element = self.resolve(&target.into())?;
        let kind = ElementKind::detect(&self.dom, element)?;
        let anchor = match &config.message_anchor {
            Some(anchor) => self.resolve(anchor)?,
            None => element,
        };

        let id = FieldId::new(self.next_field);
        self.next_field += 1;

        let form = self.dom.form_owner(element);
        let form_key = form.map(|form| self.register_form(form));

        let existing_node = self.find_message_node(element, &config, form);
        let success_msg = config
            .success_msg
            .clone()
            .or_else(|| self.dom.attribute(element, attrs::SUCC_MSG))
            .unwrap_or_else(|| "OK".to_string());
        let ui = FieldUi::new(config.classes.clone(), anchor, existing_node);

        self.wire(id, element, kind, &config);
        if let Some(aggregator) = form_key.as_deref().and_then(|key| self.forms.get_mut(key)) {
            aggregator.add_field(id);
        }

        trace_debug!(field = %id, %element, %kind, form = ?form_key, "field created");
        self.fields.insert(
            id,
            Field::new(id, element, kind, form_key, config, success_msg, ui),
        );
        Ok(id)
    }

    /// Create a field and bind `names` to it in one call.
    pub fn attach(
        &mut self,
        target: impl Into<ElementRef>,
        config: FieldConfig,
        names: &str,
        options: RuleOptions,
    ) -> Result<FieldId> {
        let id = self.create_field(target, config)?;
        if let Err(err) = self.add_rules(id, names, options) {
            self.destroy_field(id)?;
            return Err(err);
        }
        Ok(id)
    }

    fn find_message_node(
        &self,
        element: ElementId,
        config: &FieldConfig,
        form: Option<ElementId>,
    ) -> Option<ElementId> {
        let name = config
            .message_name
            .clone()
            .or_else(|| self.dom.attribute(element, attrs::NAME))?;
        let selector = format!("[{}={}]", attrs::MESSAGE_NAME, name);
        self.dom.query_all(&selector, form).first().copied()
    }

    fn wire(&mut self, id: FieldId, element: ElementId, kind: ElementKind, config: &FieldConfig) {
        let layer = |action| Layer::Field { field: id, action };

        self.events
            .prepend(element, EventKind::Focus, layer(FieldAction::Reset));
        if config.only_on_submit {
            return;
        }

        match kind {
            ElementKind::Checkbox => {
                self.events
                    .prepend(element, EventKind::Click, layer(FieldAction::Validate));
                self.events
                    .prepend(element, EventKind::Change, layer(FieldAction::Validate));
            }
            ElementKind::Select | ElementKind::File => {
                self.events
                    .prepend(element, EventKind::Change, layer(FieldAction::Validate));
            }
            ElementKind::Textarea | ElementKind::Text | ElementKind::Password => {
                if !config.only_on_blur {
                    self.events
                        .prepend(element, EventKind::Keyup, layer(FieldAction::Defer));
                }
                self.events
                    .prepend(element, EventKind::Blur, layer(FieldAction::Validate));
            }
        }
    }

    pub fn field(&self, id: FieldId) -> Option<&Field> {
        self.fields.get(&id)
    }

    fn field_mut(&mut self, id: FieldId) -> Result<&mut Field> {
        self.fields.get_mut(&id).ok_or(Error::UnknownField(id))
    }

    /// Ids of every live field, in creation order.
    pub fn field_ids(&self) -> Vec<FieldId> {
        let mut ids: Vec<FieldId> = self.fields.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Bind rules to a field. See [`Field`] for the sharing semantics.
    pub fn add_rules(
        &mut self,
        id: FieldId,
        names: &str,
        options: RuleOptions,
    ) -> Result<SharedOptions> {
        let field = self.fields.get_mut(&id).ok_or(Error::UnknownField(id))?;
        field.add(&self.dom, names, options)
    }

    /// Unbind every rule named in `names`. Returns how many bindings were dropped.
    pub fn remove_rules(&mut self, id: FieldId, names: &str) -> Result<usize> {
        self.field_mut(id)?.remove(names)
    }

    /// Validate one field now.
    pub fn validate(&mut self, id: FieldId) -> Result<bool> {
        let field = self.fields.get_mut(&id).ok_or(Error::UnknownField(id))?;
        field.validate(&mut self.dom)
    }

    pub fn enable(&mut self, id: FieldId) -> Result<()> {
        let element = self.field_mut(id)?.element();
        self.dom.set_disabled(element, false);
        Ok(())
    }

    /// Disable the element and clear its message and decoration.
    pub fn disable(&mut self, id: FieldId) -> Result<()> {
        let field = self.fields.get_mut(&id).ok_or(Error::UnknownField(id))?;
        self.dom.set_disabled(field.element(), true);
        field.clear_ui(&mut self.dom);
        Ok(())
    }

    /// Tear a field down.
    ///
    /// Leaves its form (destroying the aggregator if it is now empty), cancels
    /// its pending validation, removes its listeners so the element's own
    /// handlers behave as before, clears its decoration and removes any
    /// message node it created.
    pub fn destroy_field(&mut self, id: FieldId) -> Result<()> {
        let mut field = self.fields.remove(&id).ok_or(Error::UnknownField(id))?;

        if let Some(key) = field.form() {
            if let Some(form) = self.forms.get_mut(key) {
                form.remove_field(id);
            }
            self.destroy_form(key, false);
        }
        if self.timers.cancel(id) {
            trace_trace!(field = %id, "pending validation cancelled");
        }
        self.events.remove_field(id);
        field.teardown(&mut self.dom);

        trace_debug!(field = %id, "field destroyed");
        Ok(())
    }

    // ----- forms --------------------------------------------------------

    fn register_form(&mut self, form: ElementId) -> String {
        let (key, created) = self.forms.get_or_create(&mut self.dom, form);
        if created {
            self.events.prepend(
                form,
                EventKind::Submit,
                Layer::Form { form: key.clone() },
            );
        }
        key
    }

    pub fn forms(&self) -> &FormRegistry {
        &self.forms
    }

    pub fn form(&self, key: &str) -> Option<&FormAggregator> {
        self.forms.get(key)
    }

    pub fn form_mut(&mut self, key: &str) -> Option<&mut FormAggregator> {
        self.forms.get_mut(key)
    }

    /// The aggregator `field` is registered with.
    pub fn form_of(&self, field: FieldId) -> Option<&FormAggregator> {
        let key = self.fields.get(&field)?.form()?;
        self.forms.get(key)
    }

    /// The aggregator for the form element `target` names, creating it if needed.
    pub fn form_for(&mut self, target: impl Into<ElementRef>) -> Result<&mut FormAggregator> {
        let form = self.resolve(&target.into())?;
        let key = self.register_form(form);
        self.forms
            .get_mut(&key)
            .ok_or_else(|| Error::ElementNotFound(key.clone()))
    }

    /// Tear an aggregator down and restore the form's own submit behavior.
    ///
    /// Refuses while fields are still registered unless `force` is set.
    /// Returns whether it was torn down.
    pub fn destroy_form(&mut self, key: &str, force: bool) -> bool {
        match self.forms.get(key) {
            Some(form) if force || form.is_empty() => {}
            _ => return false,
        }
        self.forms.remove(key);
        self.events.remove_form(key);
        trace_info!(form = key, force, "form aggregator destroyed");
        true
    }

    /// Validate every field of a form without short-circuiting.
    pub fn validate_form(&mut self, key: &str) -> Result<bool> {
        let Some(form) = self.forms.get(key) else {
            return Ok(true);
        };
        let fields = form.fields().to_vec();
        let hooks = form.hooks().clone();

        FormHooks::run(&hooks.before_validate, form);

        let mut valid = true;
        for id in fields {
            if let Some(field) = self.fields.get_mut(&id) {
                valid &= field.validate(&mut self.dom)?;
            }
        }

        if let Some(form) = self.forms.get_mut(key) {
            form.set_last_result(valid);
        }
        if let Some(form) = self.forms.get(key) {
            let outcome_hook = if valid {
                &hooks.on_valid
            } else {
                &hooks.on_invalid
            };
            FormHooks::run(outcome_hook, form);
            FormHooks::run(&hooks.after_validate, form);
        }

        trace_info!(form = key, valid, "form validated");
        Ok(valid)
    }

    // ----- events -------------------------------------------------------

    /// Install the element's own handler for `kind`, beneath any formguard
    /// listeners. `None` removes it.
    pub fn set_handler(&mut self, element: ElementId, kind: EventKind, handler: Option<Handler>) {
        self.events.set_native(element, kind, handler);
    }

    pub fn listeners(&self, element: ElementId, kind: EventKind) -> Option<&ListenerChain> {
        self.events.chain(element, kind)
    }

    /// Fire a fresh `kind` event at `element`.
    pub fn dispatch(&mut self, element: ElementId, kind: EventKind) -> Result<bool> {
        let mut event = Event::new(element, kind);
        self.dispatch_event(&mut event)
    }

    /// Run `event` down its listener chain.
    ///
    /// Returns the native handler's result, or `false` if a form sweep
    /// blocked the submission. The chain is fixed when dispatch starts.
    pub fn dispatch_event(&mut self, event: &mut Event) -> Result<bool> {
        let chain = self.events.snapshot(event.target, event.kind);
        trace_trace!(element = %event.target, event = %event.kind, layers = chain.len(), "dispatch");

        for layer in chain.layers() {
            let proceed = match layer {
                Layer::Field { field, action } => {
                    self.run_field_action(*field, *action)?;
                    true
                }
                Layer::Form { form } => self.submit(form)?,
            };
            if !proceed {
                event.prevent_default();
                return Ok(false);
            }
        }
        Ok(chain.call_native(event))
    }

    fn submit(&mut self, key: &str) -> Result<bool> {
        let valid = self.validate_form(key).map_err(|err| {
            trace_error!(form = key, error = %err, "submit aborted");
            err
        })?;
        if !valid {
            trace_info!(form = key, "submission blocked");
        }
        Ok(valid)
    }

    fn run_field_action(&mut self, id: FieldId, action: FieldAction) -> Result<()> {
        // destroyed while the chain was running
        let Some(field) = self.fields.get_mut(&id) else {
            return Ok(());
        };
        match action {
            FieldAction::Reset => field.clear_ui(&mut self.dom),
            FieldAction::Validate => {
                field.validate(&mut self.dom)?;
            }
            FieldAction::Defer => {
                let wait = field.wait();
                if wait.is_zero() {
                    field.validate(&mut self.dom)?;
                    return Ok(());
                }
                if wait >= CLEAR_EARLY_THRESHOLD {
                    field.clear_ui(&mut self.dom);
                }
                if self.timers.schedule(id, wait) {
                    trace_trace!(field = %id, "pending validation replaced");
                } else {
                    trace_trace!(field = %id, ?wait, "validation scheduled");
                }
            }
        }
        Ok(())
    }

    // ----- time ---------------------------------------------------------

    /// Time elapsed on the debounce clock.
    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn has_pending(&self, id: FieldId) -> bool {
        self.timers.is_pending(id)
    }

    /// Advance the debounce clock and run every delayed validation that came
    /// due. Returns how many ran.
    ///
    /// A misconfigured field does not stop the others: every due validation
    /// runs, then the first error is returned.
    pub fn advance(&mut self, by: Duration) -> Result<usize> {
        let due = self.timers.advance(by);
        let mut fired = 0;
        let mut first_error = None;
        for id in due {
            let Some(field) = self.fields.get_mut(&id) else {
                continue;
            };
            trace_trace!(field = %id, "delayed validation fired");
            fired += 1;
            if let Err(err) = field.validate(&mut self.dom) {
                trace_error!(field = %id, error = %err, "delayed validation failed");
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(fired),
        }
    }
}
