//! `numericality` and `size`: the two rules built on exact/min/max limits.

use super::messages;
use crate::env::RuleEnv;
use crate::error::{RuleConfigError, RuleOutcome};
use crate::options::RuleOptions;
use crate::value::FieldValue;
use regex::Regex;
use std::sync::OnceLock;

static TRAILING_ZERO_FRACTION: OnceLock<Regex> = OnceLock::new();

// "5." and "5.00" parse as integers, so they are rejected textually.
fn trailing_zero_fraction() -> &'static Regex {
    TRAILING_ZERO_FRACTION.get_or_init(|| Regex::new(r"\.0+$|\.$").unwrap())
}

/// Limits shared by both rules.
///
/// Precedence: `is` beats `min`+`max`, which beats a lone bound.
#[derive(Debug, Clone, Copy, Default)]
struct Limits {
    is: Option<f64>,
    min: Option<f64>,
    max: Option<f64>,
}

impl Limits {
    fn from_options(options: &RuleOptions) -> Self {
        Self {
            is: options.is,
            min: options.min,
            max: options.max,
        }
    }

    fn is_empty(&self) -> bool {
        self.is.is_none() && self.min.is_none() && self.max.is_none()
    }
}

struct LimitMessages {
    wrong: String,
    too_low: String,
    too_high: String,
}

fn check_limits(actual: f64, limits: Limits, msgs: &LimitMessages) -> RuleOutcome {
    match (limits.is, limits.min, limits.max) {
        (Some(is), _, _) => RuleOutcome::fail_if(actual != is, || msgs.wrong.clone()),
        // Two independent sub-checks so each side keeps its own message.
        (None, Some(min), Some(max)) => check_limits(
            actual,
            Limits {
                min: Some(min),
                ..Limits::default()
            },
            msgs,
        )
        .and_then(|| {
            check_limits(
                actual,
                Limits {
                    max: Some(max),
                    ..Limits::default()
                },
                msgs,
            )
        }),
        (None, Some(min), None) => RuleOutcome::fail_if(actual < min, || msgs.too_low.clone()),
        (None, None, Some(max)) => RuleOutcome::fail_if(actual > max, || msgs.too_high.clone()),
        (None, None, None) => RuleOutcome::Success,
    }
}

fn resolve(custom: &Option<String>, limit: Option<f64>, default: fn(f64) -> String) -> String {
    match (custom, limit) {
        (Some(message), _) => message.clone(),
        (None, Some(limit)) => default(limit),
        (None, None) => String::new(),
    }
}

/// Fails unless the value is a finite number within the configured limits.
pub fn numericality(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let number = value.to_number();
    if !number.is_finite() {
        return Ok(RuleOutcome::failure(
            options
                .not_a_number_msg
                .clone()
                .unwrap_or_else(|| messages::NOT_A_NUMBER.to_string()),
        ));
    }

    if options.only_integer
        && (trailing_zero_fraction().is_match(&value.as_text()) || number.fract() != 0.0)
    {
        return Ok(RuleOutcome::failure(
            options
                .not_an_integer_msg
                .clone()
                .unwrap_or_else(|| messages::NOT_AN_INTEGER.to_string()),
        ));
    }

    let msgs = LimitMessages {
        wrong: resolve(&options.wrong_number_msg, options.is, messages::wrong_number),
        too_low: resolve(&options.too_low_msg, options.min, messages::too_low),
        too_high: resolve(&options.too_high_msg, options.max, messages::too_high),
    };
    Ok(check_limits(number, Limits::from_options(options), &msgs))
}

/// Fails unless the value's character count is within the configured limits.
///
/// Binding `size` without any limit is a configuration error.
pub fn size(
    value: &FieldValue,
    options: &RuleOptions,
    _env: &dyn RuleEnv,
) -> Result<RuleOutcome, RuleConfigError> {
    let limits = Limits::from_options(options);
    if limits.is_empty() {
        return Err(RuleConfigError::MissingSize);
    }

    let length = value.as_text().chars().count() as f64;
    let msgs = LimitMessages {
        wrong: resolve(&options.wrong_length_msg, options.is, messages::wrong_length),
        too_low: resolve(&options.too_short_msg, options.min, messages::too_short),
        too_high: resolve(&options.too_long_msg, options.max, messages::too_long),
    };
    Ok(check_limits(length, limits, &msgs))
}
