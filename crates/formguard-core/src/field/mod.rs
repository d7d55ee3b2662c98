//! A single validated form control.

mod config;
mod hooks;

pub use config::{ClassNames, FieldConfig, HookPoint, Hooks};
pub use hooks::{FieldUi, Hook, HookContext};

use crate::dom::{attrs, Dom, DomEnv, ElementKind};
use crate::error::{Error, Result};
use crate::tracing_macros::{trace_debug, trace_trace, trace_warn};
use formguard_rules::{ElementId, FieldValue, RuleName, RuleOptions, RuleOutcome};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Options shared by every binding added in one `add` call.
pub type SharedOptions = Rc<RefCell<RuleOptions>>;

/// Handle to a field owned by a `FormGuard`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(u32);

impl FieldId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field#{}", self.0)
    }
}

/// One rule bound to a field.
#[derive(Debug, Clone)]
pub struct RuleBinding {
    rule: RuleName,
    options: SharedOptions,
}

impl RuleBinding {
    pub fn rule(&self) -> RuleName {
        self.rule
    }

    pub fn options(&self) -> &SharedOptions {
        &self.options
    }

    /// Whether a failure of this binding is reported even for a blank value.
    pub fn shows_when_empty(&self) -> bool {
        self.rule.shows_when_empty()
            || (self.rule == RuleName::Custom && self.options.borrow().show_message_when_empty)
    }
}

/// Result of the last `validate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    #[default]
    NotRun,
    Valid,
    Invalid,
}

/// A form control under validation.
///
/// Fields live inside a `FormGuard`; everything that touches the page goes
/// through it.
#[derive(Debug)]
pub struct Field {
    id: FieldId,
    element: ElementId,
    kind: ElementKind,
    form: Option<String>,
    config: FieldConfig,
    success_msg: String,
    bindings: Vec<RuleBinding>,
    ui: FieldUi,
    outcome: Outcome,
    message: String,
    evaluated: Vec<RuleName>,
}

impl Field {
    pub(crate) fn new(
        id: FieldId,
        element: ElementId,
        kind: ElementKind,
        form: Option<String>,
        config: FieldConfig,
        success_msg: String,
        ui: FieldUi,
    ) -> Self {
        Self {
            id,
            element,
            kind,
            form,
            config,
            success_msg,
            bindings: Vec::new(),
            ui,
            outcome: Outcome::NotRun,
            message: String::new(),
            evaluated: Vec::new(),
        }
    }

    pub fn id(&self) -> FieldId {
        self.id
    }

    pub fn element(&self) -> ElementId {
        self.element
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Key of the form aggregator this field registered with.
    pub fn form(&self) -> Option<&str> {
        self.form.as_deref()
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn bindings(&self) -> &[RuleBinding] {
        &self.bindings
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Message from the last validation: a failure message or the success message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn success_message(&self) -> &str {
        &self.success_msg
    }

    /// Rules run by the last validation, in order.
    pub fn evaluated(&self) -> &[RuleName] {
        &self.evaluated
    }

    pub fn ui(&self) -> &FieldUi {
        &self.ui
    }

    pub fn wait(&self) -> Duration {
        self.config.wait()
    }

    /// Whether any bound rule reports failures for blank values.
    pub fn shows_message_when_empty(&self) -> bool {
        self.bindings.iter().any(RuleBinding::shows_when_empty)
    }

    /// Bind every rule in the space-separated `names`, all sharing `options`.
    ///
    /// Without a `failure_msg`, the element's `data-error-msg` is used. Nothing
    /// is bound if any name is unknown.
    pub(crate) fn add(
        &mut self,
        dom: &dyn Dom,
        names: &str,
        mut options: RuleOptions,
    ) -> Result<SharedOptions> {
        let rules = RuleName::parse_list(names).map_err(|err| {
            trace_warn!(field = %self.id, error = %err, "rejected rule list");
            Error::from(err)
        })?;

        if options.failure_msg.is_none() {
            options.failure_msg = dom.attribute(self.element, attrs::ERROR_MSG);
        }

        let shared = Rc::new(RefCell::new(options));
        self.bindings
            .extend(rules.into_iter().map(|rule| RuleBinding {
                rule,
                options: Rc::clone(&shared),
            }));
        trace_debug!(field = %self.id, rules = names, "rules added");
        Ok(shared)
    }

    /// Unbind every rule named in `names`. Returns how many bindings were dropped.
    pub(crate) fn remove(&mut self, names: &str) -> Result<usize> {
        let rules = RuleName::parse_list(names)?;
        let before = self.bindings.len();
        self.bindings.retain(|binding| !rules.contains(&binding.rule));
        Ok(before - self.bindings.len())
    }

    /// Run the bindings in order, stopping at the first failure.
    ///
    /// A disabled element passes without running anything. Configuration
    /// errors abort the validation and propagate.
    pub(crate) fn validate(&mut self, dom: &mut dyn Dom) -> Result<bool> {
        if dom.is_disabled(self.element) {
            trace_trace!(field = %self.id, "skipped disabled field");
            return Ok(true);
        }

        self.run_hook(dom, HookPoint::BeforeValidate, None);

        self.evaluated.clear();
        let bindings = self.bindings.clone();
        let mut failure = None;
        for binding in &bindings {
            self.evaluated.push(binding.rule);
            if let Some(message) = self.perform(&*dom, binding)? {
                failure = Some(message);
                break;
            }
        }

        let valid = failure.is_none();
        self.message = match failure {
            Some(message) => message,
            None => self.success_msg.clone(),
        };
        self.outcome = if valid {
            Outcome::Valid
        } else {
            Outcome::Invalid
        };
        trace_debug!(field = %self.id, valid, message = %self.message, "field validated");

        let triplet = if valid {
            [HookPoint::BeforeValid, HookPoint::OnValid, HookPoint::AfterValid]
        } else {
            [
                HookPoint::BeforeInvalid,
                HookPoint::OnInvalid,
                HookPoint::AfterInvalid,
            ]
        };
        for point in triplet {
            self.run_hook(dom, point, Some(valid));
        }
        self.run_hook(dom, HookPoint::AfterValidate, Some(valid));

        Ok(valid)
    }

    /// Evaluate one binding. Returns the failure message to record, if any.
    fn perform(&self, dom: &dyn Dom, binding: &RuleBinding) -> Result<Option<String>> {
        let always_show = binding.shows_when_empty();
        let value = self.read_value(dom, binding.rule)?;
        let options = binding.options.borrow();

        let outcome = binding
            .rule
            .evaluate(&value, &options, &DomEnv(dom))
            .map_err(|err| {
                trace_warn!(field = %self.id, rule = %binding.rule, error = %err, "misconfigured rule");
                Error::from(err)
            })?;
        trace_trace!(field = %self.id, rule = %binding.rule, %outcome, "rule evaluated");

        Ok(match outcome {
            RuleOutcome::Success => None,
            RuleOutcome::Failure { message } if always_show || !value.is_blank() => Some(message),
            // blank value, rule only reports on input
            RuleOutcome::Failure { .. } => None,
        })
    }

    fn read_value(&self, dom: &dyn Dom, rule: RuleName) -> Result<FieldValue> {
        match (rule, self.kind) {
            (RuleName::Acceptance, ElementKind::Checkbox) => {
                Ok(FieldValue::Checked(dom.is_checked(self.element)))
            }
            (RuleName::Acceptance, kind) => {
                trace_warn!(field = %self.id, %kind, "acceptance bound to a non-checkbox");
                Err(Error::AcceptanceRequiresCheckbox {
                    element: self.element,
                    kind,
                })
            }
            (_, ElementKind::Select) => Ok(FieldValue::from(dom.selected_value(self.element))),
            _ => Ok(FieldValue::Text(dom.value(self.element))),
        }
    }

    fn run_hook(&mut self, dom: &mut dyn Dom, point: HookPoint, valid: Option<bool>) {
        let hook = self.config.hooks.get(point).cloned();
        if hook.is_none() && !point.renders_by_default() {
            return;
        }

        let show_message_when_empty = self.shows_message_when_empty();
        let mut ctx = HookContext::new(
            dom,
            &mut self.ui,
            self.element,
            self.kind,
            valid,
            &self.message,
            show_message_when_empty,
        );
        match hook {
            Some(hook) => hook(&mut ctx),
            None => ctx.render(),
        }
    }

    /// Clear the message and decoration, leaving the outcome in place.
    pub(crate) fn clear_ui(&mut self, dom: &mut dyn Dom) {
        self.ui.clear(dom, self.element);
    }

    pub(crate) fn teardown(&mut self, dom: &mut dyn Dom) {
        self.bindings.clear();
        self.ui.teardown(dom, self.element);
    }
}
