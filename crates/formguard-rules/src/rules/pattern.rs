//! Regex-shaped rules: `format`, `email`, `chinese`, `mobile`, `identity`.

use super::messages;
use crate::env::RuleEnv;
use crate::error::{RuleConfigError, RuleOutcome};
use crate::options::RuleOptions;
use crate::value::FieldValue;
use regex::Regex;
use std::sync::OnceLock;

// Pre-compiled regex patterns
static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
static CHINESE_REGEX: OnceLock<Regex> = OnceLock::new();
static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();
static IDENTITY_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX
        .get_or_init(|| Regex::new(r"(?i)^([^@\s]+)@((?:[-a-z0-9]+\.)+[a-z]{2,})$").unwrap())
}

// CJK Unified Ideographs, whole string.
fn chinese_regex() -> &'static Regex {
    CHINESE_REGEX.get_or_init(|| Regex::new(r"^[\x{4E00}-\x{9FA5}]+$").unwrap())
}

fn mobile_regex() -> &'static Regex {
    MOBILE_REGEX
        .get_or_init(|| Regex::new(r"^1(?:[38][0-9]|4[57]|5[012356789]|70)[0-9]{8}$").unwrap())
}

fn identity_regex() -> &'static Regex {
    IDENTITY_REGEX.get_or_init(|| Regex::new(r"^[1-9][0-9]{14}([0-9]{2}[0-9X])?$").unwrap())
}

fn message_or(options: &RuleOptions, default: &str) -> String {
    options
        .failure_msg
        .clone()
        .unwrap_or_else(|| default.to_string())
}

fn check_format(matched: bool, negate: bool, message: impl FnOnce() -> String) -> RuleOutcome {
    RuleOutcome::fail_if(matched == negate, message)
}

/// Fails when `pattern` does not match (or, with `negate`, does match).
///
/// Without a pattern every value matches.
pub fn format(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let text = value.as_text();
    let matched = options
        .pattern
        .as_ref()
        .map_or(true, |pattern| pattern.is_match(&text));
    Ok(check_format(matched, options.negate, || {
        message_or(options, messages::FORMAT)
    }))
}

/// `format` with a fixed email-shaped pattern.
pub fn email(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let matched = email_regex().is_match(&value.as_text());
    Ok(check_format(matched, false, || {
        message_or(options, messages::EMAIL)
    }))
}

/// Fails unless the whole value is CJK ideographs.
pub fn chinese(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let matched = chinese_regex().is_match(&value.as_text());
    Ok(RuleOutcome::fail_if(!matched, || {
        message_or(options, messages::CHINESE)
    }))
}

/// Fails unless the value is an 11-digit mainland mobile number.
pub fn mobile(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let matched = mobile_regex().is_match(&value.as_text());
    Ok(RuleOutcome::fail_if(!matched, || {
        message_or(options, messages::MOBILE)
    }))
}

/// Fails unless the value has the shape of a 15- or 18-digit ID number.
pub fn identity(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let matched = identity_regex().is_match(&value.as_text());
    Ok(RuleOutcome::fail_if(!matched, || {
        message_or(options, messages::IDENTITY)
    }))
}
