//! `presence`, `confirmation`, `acceptance` and `custom`.

use super::messages;
use crate::env::RuleEnv;
use crate::error::{RuleConfigError, RuleOutcome};
use crate::options::RuleOptions;
use crate::value::FieldValue;

fn message_or(options: &RuleOptions, default: &str) -> String {
    options
        .failure_msg
        .clone()
        .unwrap_or_else(|| default.to_string())
}

/// Fails on a missing or empty value.
pub fn presence(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    Ok(RuleOutcome::fail_if(value.is_blank(), || {
        message_or(options, messages::PRESENCE)
    }))
}

/// Fails unless the value equals the current value of the `match` element.
///
/// A missing or unresolvable target is a configuration error, not a failure.
pub fn confirmation(
    value: &FieldValue,
    options: &RuleOptions,
    env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let target = options
        .match_target
        .as_ref()
        .ok_or(RuleConfigError::MissingMatch)?;
    let expected = env
        .element_value(target)
        .ok_or_else(|| RuleConfigError::UnresolvedMatch(target.to_string()))?;

    Ok(RuleOutcome::fail_if(value.as_text() != expected, || {
        message_or(options, messages::CONFIRMATION)
    }))
}

/// Fails unless the value is truthy; for checkboxes, unless checked.
pub fn acceptance(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    Ok(RuleOutcome::fail_if(!value.is_truthy(), || {
        message_or(options, messages::ACCEPTANCE)
    }))
}

/// Fails when the `against` predicate returns `false` for `(value, args)`.
///
/// Without a predicate every value passes.
pub fn custom(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let passed = options
        .against
        .as_ref()
        .map_or(true, |predicate| predicate(value, &options.args));
    Ok(RuleOutcome::fail_if(!passed, || {
        message_or(options, messages::CUSTOM)
    }))
}
