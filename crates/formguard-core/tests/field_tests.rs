//! Field construction, rule binding, validation and rendering.

use formguard_core::prelude::*;
use formguard_core::{attrs, Outcome};
use formguard_rules::messages;
use formguard_testing::{init_tracing, Call, MockDocument, Spy, Times};
use std::cell::RefCell;
use std::rc::Rc;

struct Page {
    guard: FormGuard<MockDocument>,
    form: ElementId,
    email: ElementId,
}

fn page() -> Page {
    init_tracing();
    let mut doc = MockDocument::new();
    let form = doc.form(Some("signup"));
    let email = doc.input(form, "text");
    doc.set_attribute(email, "id", "email");
    doc.set_attribute(email, attrs::NAME, "email");
    Page {
        guard: FormGuard::new(doc),
        form,
        email,
    }
}

#[test]
fn unsupported_elements_are_rejected() {
    let mut page = page();
    let radio = page.guard.dom_mut().input(page.form, "radio");
    let div = page.guard.dom_mut().append(page.form, "div");

    assert!(matches!(
        page.guard.create_field(radio, FieldConfig::new()),
        Err(Error::UnsupportedInput(t)) if t == "radio"
    ));
    assert!(matches!(
        page.guard.create_field(div, FieldConfig::new()),
        Err(Error::UnsupportedElement(t)) if t == "div"
    ));
    assert!(matches!(
        page.guard.create_field("#nope", FieldConfig::new()),
        Err(Error::ElementNotFound(_))
    ));
    assert!(page.guard.field_ids().is_empty());
}

#[test]
fn element_kinds() {
    let mut page = page();
    let doc = page.guard.dom_mut();
    let untyped = doc.append(page.form, "input");
    let password = doc.input(page.form, "PASSWORD");
    let area = doc.textarea(page.form);
    let select = doc.select(page.form, &["a"]);
    let file = doc.input(page.form, "file");

    let kinds: Vec<ElementKind> = [untyped, password, area, select, file]
        .into_iter()
        .map(|element| {
            let id = page.guard.create_field(element, FieldConfig::new()).unwrap();
            page.guard.field(id).unwrap().kind()
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ElementKind::Text,
            ElementKind::Password,
            ElementKind::Textarea,
            ElementKind::Select,
            ElementKind::File
        ]
    );
}

#[test]
fn invalid_value_renders_failure() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())
        .unwrap();
    page.guard.dom_mut().set_value(page.email, "bad");

    assert!(!page.guard.validate(id).unwrap());

    let field = page.guard.field(id).unwrap();
    assert_eq!(field.outcome(), Outcome::Invalid);
    assert_eq!(field.message(), messages::EMAIL);
    assert_eq!(field.evaluated(), &[RuleName::Presence, RuleName::Email]);

    let doc = page.guard.dom();
    let node = field.ui().message_node().unwrap();
    assert_eq!(doc.message_after(page.email), Some(messages::EMAIL));
    assert!(doc.has_class(node, "zv_msg"));
    assert!(doc.has_class(node, "zv_invalid_msg"));
    assert!(doc.has_class(page.email, "zv_fail_field"));
    assert!(!doc.has_class(page.email, "zv_succ_field"));
}

#[test]
fn valid_value_renders_success() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())
        .unwrap();
    page.guard.dom_mut().set_value(page.email, "me@example.com");

    assert!(page.guard.validate(id).unwrap());
    assert_eq!(page.guard.field(id).unwrap().message(), "OK");

    let doc = page.guard.dom();
    assert_eq!(doc.message_after(page.email), Some("OK"));
    assert!(doc.has_class(page.email, "zv_succ_field"));
}

#[test]
fn revalidating_swaps_decoration() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "email", RuleOptions::new())
        .unwrap();
    page.guard.dom_mut().set_value(page.email, "bad");
    page.guard.validate(id).unwrap();
    page.guard.dom_mut().set_value(page.email, "me@example.com");
    page.guard.validate(id).unwrap();

    let doc = page.guard.dom();
    let node = page.guard.field(id).unwrap().ui().message_node().unwrap();
    assert!(doc.has_class(node, "zv_valid_msg"));
    assert!(!doc.has_class(node, "zv_invalid_msg"));
    assert!(!doc.has_class(page.email, "zv_fail_field"));
    assert_eq!(doc.children(page.form).len(), 2);
}

#[test]
fn blank_value_hides_optional_rule_failures() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "email", RuleOptions::new())
        .unwrap();

    assert!(page.guard.validate(id).unwrap());
    let field = page.guard.field(id).unwrap();
    assert_eq!(field.message(), "OK");
    assert_eq!(field.ui().message_node(), None);
    assert!(!page.guard.dom().has_class(page.email, "zv_succ_field"));
}

#[test]
fn presence_reports_on_blank_value() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence", RuleOptions::new())
        .unwrap();

    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(
        page.guard.dom().message_after(page.email),
        Some(messages::PRESENCE)
    );
}

#[test]
fn custom_can_opt_into_blank_reporting() {
    let mut page = page();
    let spy = Spy::new("never happy").returning(false);
    let options = RuleOptions::new()
        .with_predicate(spy.predicate())
        .with_message("pick something");
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "custom", options)
        .unwrap();

    assert!(page.guard.validate(id).unwrap());

    let shared = page.guard.field(id).unwrap().bindings()[0].options().clone();
    shared.borrow_mut().show_message_when_empty = true;
    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(
        page.guard.dom().message_after(page.email),
        Some("pick something")
    );
    spy.verify(Times::Exactly(2));
}

#[test]
fn empty_success_message_shows_no_node() {
    let mut page = page();
    let id = page
        .guard
        .attach(
            "#email",
            FieldConfig::new().with_success_msg(""),
            "presence",
            RuleOptions::new(),
        )
        .unwrap();
    page.guard.dom_mut().set_value(page.email, "x");

    assert!(page.guard.validate(id).unwrap());
    assert_eq!(page.guard.field(id).unwrap().ui().message_node(), None);
    assert!(page.guard.dom().has_class(page.email, "zv_succ_field"));
}

#[test]
fn messages_default_from_attributes() {
    let mut page = page();
    let doc = page.guard.dom_mut();
    doc.set_attribute(page.email, attrs::ERROR_MSG, "tell us your email");
    doc.set_attribute(page.email, attrs::SUCC_MSG, "thanks");

    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())
        .unwrap();
    assert_eq!(page.guard.field(id).unwrap().success_message(), "thanks");

    page.guard.dom_mut().set_value(page.email, "bad");
    page.guard.validate(id).unwrap();
    assert_eq!(page.guard.field(id).unwrap().message(), "tell us your email");

    page.guard.dom_mut().set_value(page.email, "me@example.com");
    page.guard.validate(id).unwrap();
    assert_eq!(page.guard.dom().message_after(page.email), Some("thanks"));
}

#[test]
fn one_add_call_shares_options() {
    let mut page = page();
    let id = page.guard.create_field("#email", FieldConfig::new()).unwrap();
    let shared = page
        .guard
        .add_rules(id, "numericality size", RuleOptions::new().with_min(3.0))
        .unwrap();

    let field = page.guard.field(id).unwrap();
    assert_eq!(field.bindings().len(), 2);
    assert!(Rc::ptr_eq(field.bindings()[0].options(), &shared));
    assert!(Rc::ptr_eq(field.bindings()[1].options(), &shared));

    shared.borrow_mut().too_low_msg = Some("too small".into());
    page.guard.dom_mut().set_value(page.email, "1");
    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(page.guard.field(id).unwrap().message(), "too small");
}

#[test]
fn unknown_rule_binds_nothing() {
    let mut page = page();
    let id = page.guard.create_field("#email", FieldConfig::new()).unwrap();

    let err = page
        .guard
        .add_rules(id, "presence postcode", RuleOptions::new())
        .unwrap_err();
    assert_eq!(err.to_string(), "unknown validation rule `postcode`");
    assert!(page.guard.field(id).unwrap().bindings().is_empty());
}

#[test]
fn remove_rules_by_name() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence email", RuleOptions::new())
        .unwrap();
    page.guard
        .add_rules(id, "email", RuleOptions::new())
        .unwrap();

    assert_eq!(page.guard.remove_rules(id, "email").unwrap(), 2);
    let rules: Vec<RuleName> = page
        .guard
        .field(id)
        .unwrap()
        .bindings()
        .iter()
        .map(|b| b.rule())
        .collect();
    assert_eq!(rules, vec![RuleName::Presence]);
    assert!(page.guard.remove_rules(id, "bogus").is_err());
}

#[test]
fn hooks_run_in_order() {
    let mut page = page();
    let log = Rc::new(RefCell::new(Vec::new()));
    let mut config = FieldConfig::new();
    for point in HookPoint::ALL {
        let log = log.clone();
        config = config.with_hook(point, move |_| log.borrow_mut().push(point));
    }
    let id = page
        .guard
        .attach("#email", config, "presence", RuleOptions::new())
        .unwrap();

    page.guard.dom_mut().set_value(page.email, "x");
    page.guard.validate(id).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            HookPoint::BeforeValidate,
            HookPoint::BeforeValid,
            HookPoint::OnValid,
            HookPoint::AfterValid,
            HookPoint::AfterValidate
        ]
    );

    log.borrow_mut().clear();
    page.guard.dom_mut().set_value(page.email, "");
    page.guard.validate(id).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            HookPoint::BeforeValidate,
            HookPoint::BeforeInvalid,
            HookPoint::OnInvalid,
            HookPoint::AfterInvalid,
            HookPoint::AfterValidate
        ]
    );

    // the override replaced rendering
    assert_eq!(page.guard.field(id).unwrap().ui().message_node(), None);
}

#[test]
fn hook_sees_outcome_and_can_render() {
    let mut page = page();
    let spy = Spy::new("on invalid");
    let config = FieldConfig::new().with_hook(HookPoint::OnInvalid, spy.rendering_hook());
    let id = page
        .guard
        .attach("#email", config, "presence", RuleOptions::new())
        .unwrap();

    page.guard.validate(id).unwrap();
    assert_eq!(
        spy.calls(),
        vec![Call::Hook {
            element: page.email,
            valid: Some(false)
        }]
    );
    assert_eq!(
        page.guard.dom().message_after(page.email),
        Some(messages::PRESENCE)
    );
}

#[test]
fn acceptance_needs_a_checkbox() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "acceptance", RuleOptions::new())
        .unwrap();
    assert!(matches!(
        page.guard.validate(id),
        Err(Error::AcceptanceRequiresCheckbox {
            kind: ElementKind::Text,
            ..
        })
    ));

    let terms = page.guard.dom_mut().input(page.form, "checkbox");
    let id = page
        .guard
        .attach(terms, FieldConfig::new(), "acceptance", RuleOptions::new())
        .unwrap();
    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(
        page.guard.dom().message_after(terms),
        Some(messages::ACCEPTANCE)
    );

    page.guard.dom_mut().set_checked(terms, true);
    assert!(page.guard.validate(id).unwrap());
}

#[test]
fn confirmation_reads_the_target() {
    let mut page = page();
    let doc = page.guard.dom_mut();
    let password = doc.input(page.form, "password");
    doc.set_attribute(password, "id", "password");
    doc.set_value(password, "hunter2");
    let again = doc.input(page.form, "password");
    doc.set_value(again, "hunter3");

    let id = page
        .guard
        .attach(
            again,
            FieldConfig::new(),
            "confirmation",
            RuleOptions::new().matching("#password"),
        )
        .unwrap();
    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(page.guard.field(id).unwrap().message(), messages::CONFIRMATION);

    page.guard.dom_mut().set_value(again, "hunter2");
    assert!(page.guard.validate(id).unwrap());

    let broken = page
        .guard
        .attach(page.email, FieldConfig::new(), "confirmation", RuleOptions::new())
        .unwrap();
    assert!(matches!(
        page.guard.validate(broken),
        Err(Error::Rule(RuleConfigError::MissingMatch))
    ));
}

#[test]
fn select_uses_selected_option() {
    let mut page = page();
    let color = page.guard.dom_mut().select(page.form, &["", "red", "blue"]);
    let id = page
        .guard
        .attach(
            color,
            FieldConfig::new(),
            "inclusion",
            RuleOptions::new().with_within(["red"]),
        )
        .unwrap();

    page.guard.dom_mut().select_option(color, Some(2));
    assert!(!page.guard.validate(id).unwrap());

    page.guard.dom_mut().select_option(color, Some(1));
    assert!(page.guard.validate(id).unwrap());

    // nothing selected counts as blank
    page.guard.dom_mut().select_option(color, None);
    assert!(page.guard.validate(id).unwrap());

    page.guard
        .add_rules(id, "presence", RuleOptions::new())
        .unwrap();
    page.guard.remove_rules(id, "inclusion").unwrap();
    assert!(!page.guard.validate(id).unwrap());
    assert_eq!(page.guard.field(id).unwrap().message(), messages::PRESENCE);
}

#[test]
fn disabled_field_passes_without_rules() {
    let mut page = page();
    let spy = Spy::new("predicate");
    let id = page
        .guard
        .attach(
            "#email",
            FieldConfig::new(),
            "presence custom",
            RuleOptions::new().with_predicate(spy.predicate()),
        )
        .unwrap();
    page.guard.validate(id).unwrap();
    assert!(page.guard.dom().has_class(page.email, "zv_fail_field"));

    page.guard.disable(id).unwrap();
    assert!(page.guard.dom().is_disabled(page.email));
    assert!(!page.guard.dom().has_class(page.email, "zv_fail_field"));
    assert_eq!(page.guard.dom().message_after(page.email), None);

    assert!(page.guard.validate(id).unwrap());
    spy.verify(Times::Never);

    page.guard.enable(id).unwrap();
    page.guard.dom_mut().set_value(page.email, "x");
    assert!(page.guard.validate(id).unwrap());
    spy.verify(Times::Once);
}

#[test]
fn message_anchor_moves_the_node() {
    let mut page = page();
    let hint = page
        .guard
        .dom_mut()
        .append_with_attr(page.form, "span", "id", "hint");
    let id = page
        .guard
        .attach(
            "#email",
            FieldConfig::new().with_message_anchor("#hint"),
            "presence",
            RuleOptions::new(),
        )
        .unwrap();

    page.guard.validate(id).unwrap();
    assert_eq!(page.guard.field(id).unwrap().ui().anchor(), hint);
    assert_eq!(
        page.guard.dom().message_after(hint),
        Some(messages::PRESENCE)
    );
}

#[test]
fn existing_message_node_is_reused_and_kept() {
    let mut page = page();
    let slot = page
        .guard
        .dom_mut()
        .append_with_attr(page.form, "span", attrs::MESSAGE_NAME, "email");
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence", RuleOptions::new())
        .unwrap();

    page.guard.validate(id).unwrap();
    assert_eq!(page.guard.field(id).unwrap().ui().message_node(), Some(slot));
    assert!(!page.guard.field(id).unwrap().ui().owns_message_node());
    assert_eq!(page.guard.dom().text(slot), messages::PRESENCE);

    page.guard.destroy_field(id).unwrap();
    let doc = page.guard.dom();
    assert!(doc.is_attached(slot));
    assert!(doc.is_hidden(slot));
    assert_eq!(doc.text(slot), "");
}

#[test]
fn created_message_node_is_removed_on_destroy() {
    let mut page = page();
    let id = page
        .guard
        .attach("#email", FieldConfig::new(), "presence", RuleOptions::new())
        .unwrap();
    page.guard.validate(id).unwrap();
    let node = page.guard.field(id).unwrap().ui().message_node().unwrap();

    page.guard.destroy_field(id).unwrap();
    assert!(!page.guard.dom().is_attached(node));
    assert!(!page.guard.dom().has_class(page.email, "zv_fail_field"));
    assert!(matches!(
        page.guard.validate(id),
        Err(Error::UnknownField(f)) if f == id
    ));
}
