//! The fixed rule set and its dispatch table.

mod basic;
mod membership;
mod numeric;
mod pattern;

pub use basic::{acceptance, confirmation, custom, presence};
pub use membership::{exclusion, inclusion};
pub use numeric::{numericality, size};
pub use pattern::{chinese, email, format, identity, mobile};

use crate::env::RuleEnv;
use crate::error::{RuleConfigError, RuleOutcome};
use crate::options::RuleOptions;
use crate::value::FieldValue;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Signature every rule function shares.
pub type RuleFn =
    fn(&FieldValue, &RuleOptions, &dyn RuleEnv) -> Result<RuleOutcome, RuleConfigError>;

/// Identifier of a rule in the library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleName {
    Presence,
    Numericality,
    Format,
    Email,
    Size,
    Inclusion,
    Exclusion,
    Chinese,
    Mobile,
    Identity,
    Confirmation,
    Acceptance,
    Custom,
}

/// A rule name that is not part of the library.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown validation rule `{0}`")]
pub struct UnknownRule(pub String);

impl RuleName {
    /// Every rule, in declaration order.
    pub const ALL: [RuleName; 13] = [
        RuleName::Presence,
        RuleName::Numericality,
        RuleName::Format,
        RuleName::Email,
        RuleName::Size,
        RuleName::Inclusion,
        RuleName::Exclusion,
        RuleName::Chinese,
        RuleName::Mobile,
        RuleName::Identity,
        RuleName::Confirmation,
        RuleName::Acceptance,
        RuleName::Custom,
    ];

    /// The name used in rule lists and declarative attributes.
    pub fn as_str(self) -> &'static str {
        match self {
            RuleName::Presence => "presence",
            RuleName::Numericality => "numericality",
            RuleName::Format => "format",
            RuleName::Email => "email",
            RuleName::Size => "size",
            RuleName::Inclusion => "inclusion",
            RuleName::Exclusion => "exclusion",
            RuleName::Chinese => "chinese",
            RuleName::Mobile => "mobile",
            RuleName::Identity => "identity",
            RuleName::Confirmation => "confirmation",
            RuleName::Acceptance => "acceptance",
            RuleName::Custom => "custom",
        }
    }

    /// The function implementing this rule.
    pub fn func(self) -> RuleFn {
        match self {
            RuleName::Presence => presence,
            RuleName::Numericality => numericality,
            RuleName::Format => format,
            RuleName::Email => email,
            RuleName::Size => size,
            RuleName::Inclusion => inclusion,
            RuleName::Exclusion => exclusion,
            RuleName::Chinese => chinese,
            RuleName::Mobile => mobile,
            RuleName::Identity => identity,
            RuleName::Confirmation => confirmation,
            RuleName::Acceptance => acceptance,
            RuleName::Custom => custom,
        }
    }

    /// Rules whose failures are shown even while the field is blank.
    ///
    /// `custom` joins this set per binding via `show_message_when_empty`.
    pub fn shows_when_empty(self) -> bool {
        matches!(
            self,
            RuleName::Presence | RuleName::Confirmation | RuleName::Acceptance
        )
    }

    /// Parse a whitespace-separated rule list such as `"presence email"`.
    pub fn parse_list(list: &str) -> Result<Vec<RuleName>, UnknownRule> {
        list.split_whitespace().map(str::parse).collect()
    }

    /// Run this rule.
    pub fn evaluate(
        self,
        value: &FieldValue,
        options: &RuleOptions,
        env: &dyn RuleEnv,
    ) -> Result<RuleOutcome, RuleConfigError> {
        (self.func())(value, options, env)
    }
}

impl FromStr for RuleName {
    type Err = UnknownRule;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleName::ALL
            .into_iter()
            .find(|rule| rule.as_str() == s)
            .ok_or_else(|| UnknownRule(s.to_string()))
    }
}

impl fmt::Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default failure messages.
pub mod messages {
    pub const PRESENCE: &str = "can't be empty";
    pub const NOT_A_NUMBER: &str = "must be a number";
    pub const NOT_AN_INTEGER: &str = "must be an integer";
    pub const FORMAT: &str = "is not in the right format";
    pub const EMAIL: &str = "must be a valid email address";
    pub const INCLUSION: &str = "must be one of the listed values";
    pub const EXCLUSION: &str = "can't be one of the listed values";
    pub const CHINESE: &str = "must be Chinese characters";
    pub const MOBILE: &str = "must be a valid mobile number";
    pub const IDENTITY: &str = "must be a valid ID card number";
    pub const CONFIRMATION: &str = "doesn't match";
    pub const ACCEPTANCE: &str = "must be accepted";
    pub const CUSTOM: &str = "is not valid";

    pub fn wrong_number(is: f64) -> String {
        format!("must be {is}")
    }

    pub fn too_low(min: f64) -> String {
        format!("can't be less than {min}")
    }

    pub fn too_high(max: f64) -> String {
        format!("can't be more than {max}")
    }

    pub fn wrong_length(is: f64) -> String {
        format!("must be {is} characters long")
    }

    pub fn too_short(min: f64) -> String {
        format!("can't be shorter than {min} characters")
    }

    pub fn too_long(max: f64) -> String {
        format!("can't be longer than {max} characters")
    }
}
