//! `inclusion` and `exclusion`.

use super::messages;
use crate::env::RuleEnv;
use crate::error::{RuleConfigError, RuleOutcome};
use crate::options::RuleOptions;
use crate::value::FieldValue;
use serde_json::Value;
use std::borrow::Cow;

fn candidate_text(candidate: &Value, case_sensitive: bool) -> Option<Cow<'_, str>> {
    match candidate {
        Value::String(s) if case_sensitive => Some(Cow::Borrowed(s.as_str())),
        // only string candidates are lower-cased
        Value::String(s) => Some(Cow::Owned(s.to_lowercase())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

// With `partial_match`, either side containing the other counts as listed.
fn is_listed(value: &FieldValue, options: &RuleOptions) -> bool {
    let needle = match value {
        FieldValue::Text(s) if !options.case_sensitive => Cow::Owned(s.to_lowercase()),
        other => other.as_text(),
    };

    options.within.iter().any(|candidate| {
        candidate_text(candidate, options.case_sensitive).is_some_and(|candidate| {
            candidate == needle
                || (options.partial_match
                    && (needle.contains(candidate.as_ref()) || candidate.contains(needle.as_ref())))
        })
    })
}

fn membership(
    value: &FieldValue,
    options: &RuleOptions,
    negate: bool,
    default_message: &str,
) -> RuleOutcome {
    let message = || {
        options
            .failure_msg
            .clone()
            .unwrap_or_else(|| default_message.to_string())
    };

    if value.is_missing() {
        return if options.allow_null {
            RuleOutcome::Success
        } else {
            RuleOutcome::failure(message())
        };
    }

    let found = is_listed(value, options);
    RuleOutcome::fail_if(found == negate, message)
}

/// Fails unless the value is one of `within` (or, with `negate`, is not).
pub fn inclusion(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    Ok(membership(
        value,
        options,
        options.negate,
        messages::INCLUSION,
    ))
}

/// `inclusion` with `negate` forced on.
pub fn exclusion(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    Ok(membership(value, options, true, messages::EXCLUSION))
}
