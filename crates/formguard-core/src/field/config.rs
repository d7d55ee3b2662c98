//! Per-field configuration.

use super::hooks::{Hook, HookContext};
use formguard_rules::ElementRef;
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// CSS classes applied to the field and its message node.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClassNames {
    pub message: String,
    pub valid_message: String,
    pub invalid_message: String,
    pub valid_field: String,
    pub invalid_field: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            message: "zv_msg".to_string(),
            valid_message: "zv_valid_msg".to_string(),
            invalid_message: "zv_invalid_msg".to_string(),
            valid_field: "zv_succ_field".to_string(),
            invalid_field: "zv_fail_field".to_string(),
        }
    }
}

/// Points in `validate` where a hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookPoint {
    BeforeValidate,
    BeforeValid,
    /// Defaults to rendering the message and field decoration.
    OnValid,
    AfterValid,
    BeforeInvalid,
    /// Defaults to rendering the message and field decoration.
    OnInvalid,
    AfterInvalid,
    AfterValidate,
}

impl HookPoint {
    pub const ALL: [HookPoint; 8] = [
        HookPoint::BeforeValidate,
        HookPoint::BeforeValid,
        HookPoint::OnValid,
        HookPoint::AfterValid,
        HookPoint::BeforeInvalid,
        HookPoint::OnInvalid,
        HookPoint::AfterInvalid,
        HookPoint::AfterValidate,
    ];

    fn slot(self) -> usize {
        self as usize
    }

    /// Whether an unset hook at this point falls back to rendering.
    pub fn renders_by_default(self) -> bool {
        matches!(self, HookPoint::OnValid | HookPoint::OnInvalid)
    }
}

/// Hook slots; an empty slot uses the built-in behavior.
#[derive(Clone, Default)]
pub struct Hooks {
    slots: [Option<Hook>; 8],
}

impl Hooks {
    pub fn get(&self, point: HookPoint) -> Option<&Hook> {
        self.slots[point.slot()].as_ref()
    }

    pub fn set(&mut self, point: HookPoint, hook: Hook) {
        self.slots[point.slot()] = Some(hook);
    }

    /// Restore the built-in behavior at `point`.
    pub fn unset(&mut self, point: HookPoint) {
        self.slots[point.slot()] = None;
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<HookPoint> = HookPoint::ALL
            .into_iter()
            .filter(|point| self.get(*point).is_some())
            .collect();
        f.debug_struct("Hooks").field("set", &set).finish()
    }
}

/// How a field behaves and renders.
///
/// Loads from camelCase JSON with every key optional; hooks can only be set
/// from code.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldConfig {
    /// Message shown on success. Falls back to the element's `data-succ-msg`,
    /// then `"OK"`. An empty message shows no message node.
    pub success_msg: Option<String>,
    /// Node after which a created message node is inserted. Defaults to the
    /// field element.
    pub message_anchor: Option<ElementRef>,
    /// Name of an existing `[data-zvmsg=<name>]` node to reuse. Defaults to the
    /// element's `name` attribute.
    pub message_name: Option<String>,
    /// Do not validate while typing.
    pub only_on_blur: bool,
    /// Validate only when the form is submitted.
    pub only_on_submit: bool,
    /// Debounce interval for validation while typing, in milliseconds.
    #[serde(alias = "wait")]
    pub wait_ms: u64,
    pub classes: ClassNames,
    #[serde(skip)]
    pub hooks: Hooks,
}

impl FieldConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_success_msg(mut self, message: impl Into<String>) -> Self {
        self.success_msg = Some(message.into());
        self
    }

    pub fn with_message_anchor(mut self, anchor: impl Into<ElementRef>) -> Self {
        self.message_anchor = Some(anchor.into());
        self
    }

    pub fn with_message_name(mut self, name: impl Into<String>) -> Self {
        self.message_name = Some(name.into());
        self
    }

    pub fn only_on_blur(mut self) -> Self {
        self.only_on_blur = true;
        self
    }

    pub fn only_on_submit(mut self) -> Self {
        self.only_on_submit = true;
        self
    }

    /// Debounce typing-triggered validation by `wait`.
    pub fn with_wait(mut self, wait: Duration) -> Self {
        self.wait_ms = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn with_classes(mut self, classes: ClassNames) -> Self {
        self.classes = classes;
        self
    }

    /// Install a hook at `point`, replacing any previous one.
    pub fn with_hook<F>(mut self, point: HookPoint, hook: F) -> Self
    where
        F: Fn(&mut HookContext<'_>) + 'static,
    {
        self.hooks.set(point, Rc::new(hook));
        self
    }

    pub fn wait(&self) -> Duration {
        Duration::from_millis(self.wait_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_classes() {
        let classes = ClassNames::default();
        assert_eq!(classes.message, "zv_msg");
        assert_eq!(classes.valid_message, "zv_valid_msg");
        assert_eq!(classes.invalid_message, "zv_invalid_msg");
        assert_eq!(classes.valid_field, "zv_succ_field");
        assert_eq!(classes.invalid_field, "zv_fail_field");
    }

    #[test]
    fn config_from_json() {
        let config = FieldConfig::from_json(
            r#"{"successMsg": "", "onlyOnBlur": true, "waitMs": 500, "classes": {"invalidField": "bad"}}"#,
        )
        .unwrap();
        assert_eq!(config.success_msg.as_deref(), Some(""));
        assert!(config.only_on_blur);
        assert!(!config.only_on_submit);
        assert_eq!(config.wait(), Duration::from_millis(500));
        assert_eq!(config.classes.invalid_field, "bad");
        assert_eq!(config.classes.valid_field, "zv_succ_field");
    }

    #[test]
    fn wait_key_is_accepted() {
        let config = FieldConfig::from_json(r#"{"wait": 250}"#).unwrap();
        assert_eq!(config.wait(), Duration::from_millis(250));
    }

    #[test]
    fn hooks_fill_their_own_slot() {
        let config = FieldConfig::new().with_hook(HookPoint::AfterInvalid, |_| {});
        assert!(config.hooks.get(HookPoint::AfterInvalid).is_some());
        assert!(config.hooks.get(HookPoint::OnInvalid).is_none());
        assert!(format!("{:?}", config.hooks).contains("AfterInvalid"));
    }

    #[test]
    fn unset_restores_default() {
        let mut hooks = FieldConfig::new()
            .with_hook(HookPoint::OnValid, |_| {})
            .hooks;
        hooks.unset(HookPoint::OnValid);
        assert!(hooks.get(HookPoint::OnValid).is_none());
        assert!(HookPoint::OnValid.renders_by_default());
        assert!(!HookPoint::AfterValid.renders_by_default());
    }
}
