//! Call-counting spies with expectations.

use formguard_core::{Event, EventKind, FormAggregator, FormHook, Handler, HookContext};
use formguard_rules::{ElementId, FieldValue};
use std::cell::RefCell;
use std::rc::Rc;

/// How many calls an expectation allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Times {
    Once,
    Exactly(usize),
    AtLeast(usize),
    AtMost(usize),
    Never,
    Any,
}

impl Times {
    pub fn matches(self, count: usize) -> bool {
        match self {
            Times::Once => count == 1,
            Times::Exactly(n) => count == n,
            Times::AtLeast(n) => count >= n,
            Times::AtMost(n) => count <= n,
            Times::Never => count == 0,
            Times::Any => true,
        }
    }

    fn describe(self) -> String {
        match self {
            Times::Once => "1 call".to_string(),
            Times::Exactly(n) => format!("{n} calls"),
            Times::AtLeast(n) => format!("at least {n} calls"),
            Times::AtMost(n) => format!("at most {n} calls"),
            Times::Never => "no calls".to_string(),
            Times::Any => "any number of calls".to_string(),
        }
    }
}

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    /// A native event handler ran.
    Event { target: ElementId, kind: EventKind },
    /// A `custom` predicate ran against this value.
    Predicate(FieldValue),
    /// A field hook ran; `valid` is the outcome it saw.
    Hook { element: ElementId, valid: Option<bool> },
    /// A form hook ran; `last_result` is what the aggregator reported.
    Form { key: String, last_result: Option<bool> },
}

#[derive(Debug)]
struct SpyState {
    name: String,
    returns: bool,
    calls: Vec<Call>,
}

/// Records every call made through the closures it hands out.
///
/// Clones share the same record.
///
/// ```rust
/// use formguard_testing::{Spy, Times};
/// use formguard_rules::FieldValue;
///
/// let spy = Spy::new("length check").returning(false);
/// let predicate = spy.predicate();
/// assert!(!predicate(&FieldValue::text("abc"), &serde_json::Value::Null));
/// spy.verify(Times::Once);
/// ```
#[derive(Debug, Clone)]
pub struct Spy {
    state: Rc<RefCell<SpyState>>,
}

impl Spy {
    /// A spy whose handlers and predicates return `true`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SpyState {
                name: name.into(),
                returns: true,
                calls: Vec::new(),
            })),
        }
    }

    /// Make handlers and predicates return `value`.
    pub fn returning(self, value: bool) -> Self {
        self.state.borrow_mut().returns = value;
        self
    }

    fn record(&self, call: Call) -> bool {
        let mut state = self.state.borrow_mut();
        state.calls.push(call);
        state.returns
    }

    /// A native event handler.
    pub fn handler(&self) -> Handler {
        let spy = self.clone();
        Rc::new(move |event: &mut Event| {
            spy.record(Call::Event {
                target: event.target,
                kind: event.kind,
            })
        })
    }

    /// A predicate for the `custom` rule.
    pub fn predicate(&self) -> impl Fn(&FieldValue, &serde_json::Value) -> bool + 'static {
        let spy = self.clone();
        move |value: &FieldValue, _args: &serde_json::Value| {
            spy.record(Call::Predicate(value.clone()))
        }
    }

    /// A field hook that only records.
    pub fn hook(&self) -> impl Fn(&mut HookContext<'_>) + 'static {
        let spy = self.clone();
        move |ctx: &mut HookContext<'_>| {
            spy.record(Call::Hook {
                element: ctx.element(),
                valid: ctx.is_valid(),
            });
        }
    }

    /// A field hook that records, then renders like the default.
    pub fn rendering_hook(&self) -> impl Fn(&mut HookContext<'_>) + 'static {
        let record = self.hook();
        move |ctx: &mut HookContext<'_>| {
            record(ctx);
            ctx.render();
        }
    }

    /// A form hook.
    pub fn form_hook(&self) -> FormHook {
        let spy = self.clone();
        Rc::new(move |form: &FormAggregator| {
            spy.record(Call::Form {
                key: form.key().to_string(),
                last_result: form.last_result(),
            });
        })
    }

    pub fn call_count(&self) -> usize {
        self.state.borrow().calls.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn reset(&self) {
        self.state.borrow_mut().calls.clear();
    }

    /// Panic unless the number of recorded calls satisfies `times`.
    pub fn verify(&self, times: Times) {
        let state = self.state.borrow();
        let count = state.calls.len();
        assert!(
            times.matches(count),
            "spy `{}` expected {}, got {}: {:?}",
            state.name,
            times.describe(),
            count,
            state.calls
        );
    }
}
