//! Options recognized by the rule library.

use crate::env::ElementRef;
use crate::error::RuleConfigError;
use crate::value::FieldValue;
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::rc::Rc;

/// Predicate backing the `custom` rule: `(value, args) -> passes`.
pub type Predicate = Rc<dyn Fn(&FieldValue, &serde_json::Value) -> bool>;

/// A compiled regular expression that remembers its source text.
#[derive(Clone, Deserialize)]
#[serde(try_from = "String")]
pub struct Pattern {
    source: String,
    compiled: Regex,
}

impl Pattern {
    /// Compile `source`.
    pub fn new(source: impl Into<String>) -> Result<Self, RuleConfigError> {
        let source = source.into();
        let compiled = Regex::new(&source).map_err(|e| RuleConfigError::InvalidPattern {
            pattern: source.clone(),
            reason: e.to_string(),
        })?;
        Ok(Self { source, compiled })
    }

    /// The pattern text.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `haystack` contains a match.
    pub fn is_match(&self, haystack: &str) -> bool {
        self.compiled.is_match(haystack)
    }
}

impl TryFrom<String> for Pattern {
    type Error = RuleConfigError;

    fn try_from(source: String) -> Result<Self, Self::Error> {
        Self::new(source)
    }
}

impl From<Regex> for Pattern {
    fn from(compiled: Regex) -> Self {
        Self {
            source: compiled.as_str().to_string(),
            compiled,
        }
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.source).finish()
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Open option set shared by every rule.
///
/// Each rule reads the keys it understands and ignores the rest, so one
/// options value can back several bindings at once.
#[derive(Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleOptions {
    /// Overrides the rule's default failure message.
    pub failure_msg: Option<String>,

    /// Exact numeric value (numericality) or exact length (size).
    pub is: Option<f64>,
    /// Lower bound, inclusive.
    pub min: Option<f64>,
    /// Upper bound, inclusive.
    pub max: Option<f64>,
    /// Reject fractional numbers and trailing-dot notations like `5.` or `5.0`.
    pub only_integer: bool,
    pub not_a_number_msg: Option<String>,
    pub not_an_integer_msg: Option<String>,
    pub wrong_number_msg: Option<String>,
    pub too_low_msg: Option<String>,
    pub too_high_msg: Option<String>,
    #[serde(alias = "wrongLengthMessage")]
    pub wrong_length_msg: Option<String>,
    #[serde(alias = "tooShortMessage")]
    pub too_short_msg: Option<String>,
    #[serde(alias = "tooLongMessage")]
    pub too_long_msg: Option<String>,

    /// Pattern for `format`. Absent means "matches anything".
    pub pattern: Option<Pattern>,
    /// Invert `format` and `inclusion`.
    pub negate: bool,

    /// Candidate list for `inclusion`/`exclusion`.
    pub within: Vec<serde_json::Value>,
    /// Also accept a value that contains a candidate as a substring.
    pub partial_match: bool,
    /// Compare candidates case-sensitively. Defaults to `true`.
    pub case_sensitive: bool,
    /// Let a missing value pass `inclusion`.
    pub allow_null: bool,

    /// The element `confirmation` compares against.
    #[serde(rename = "match")]
    pub match_target: Option<ElementRef>,

    /// Predicate for `custom`. Absent means "always passes".
    #[serde(skip)]
    pub against: Option<Predicate>,
    /// Extra argument handed to the `custom` predicate.
    pub args: serde_json::Value,
    /// Let `custom` show its message even while the field is empty.
    pub show_message_when_empty: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            failure_msg: None,
            is: None,
            min: None,
            max: None,
            only_integer: false,
            not_a_number_msg: None,
            not_an_integer_msg: None,
            wrong_number_msg: None,
            too_low_msg: None,
            too_high_msg: None,
            wrong_length_msg: None,
            too_short_msg: None,
            too_long_msg: None,
            pattern: None,
            negate: false,
            within: Vec::new(),
            partial_match: false,
            case_sensitive: true,
            allow_null: false,
            match_target: None,
            against: None,
            args: serde_json::Value::Object(serde_json::Map::new()),
            show_message_when_empty: false,
        }
    }
}

impl RuleOptions {
    /// Empty options; every rule falls back to its defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set a custom failure message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.failure_msg = Some(message.into());
        self
    }

    /// Require an exact value or length.
    pub fn with_is(mut self, is: f64) -> Self {
        self.is = Some(is);
        self
    }

    /// Set a lower bound.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set an upper bound.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set both bounds.
    pub fn with_range(self, min: f64, max: f64) -> Self {
        self.with_min(min).with_max(max)
    }

    /// Only accept integers.
    pub fn integer_only(mut self) -> Self {
        self.only_integer = true;
        self
    }

    /// Compile and set a `format` pattern.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, RuleConfigError> {
        self.pattern = Some(Pattern::new(pattern)?);
        Ok(self)
    }

    /// Invert the match.
    pub fn negated(mut self) -> Self {
        self.negate = true;
        self
    }

    /// Set the candidate list.
    pub fn with_within<I, V>(mut self, within: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        self.within = within.into_iter().map(Into::into).collect();
        self
    }

    /// Accept substring matches.
    pub fn partial(mut self) -> Self {
        self.partial_match = true;
        self
    }

    /// Compare candidates case-insensitively.
    pub fn case_insensitive(mut self) -> Self {
        self.case_sensitive = false;
        self
    }

    /// Let a missing value pass `inclusion`.
    pub fn allowing_null(mut self) -> Self {
        self.allow_null = true;
        self
    }

    /// Set the `confirmation` target.
    pub fn matching(mut self, target: impl Into<ElementRef>) -> Self {
        self.match_target = Some(target.into());
        self
    }

    /// Set the `custom` predicate.
    pub fn with_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&FieldValue, &serde_json::Value) -> bool + 'static,
    {
        self.against = Some(Rc::new(predicate));
        self
    }

    /// Set the argument handed to the `custom` predicate.
    pub fn with_args(mut self, args: serde_json::Value) -> Self {
        self.args = args;
        self
    }

    /// Show the `custom` message even while the field is empty.
    pub fn showing_when_empty(mut self) -> Self {
        self.show_message_when_empty = true;
        self
    }
}

impl fmt::Debug for RuleOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleOptions")
            .field("failure_msg", &self.failure_msg)
            .field("is", &self.is)
            .field("min", &self.min)
            .field("max", &self.max)
            .field("only_integer", &self.only_integer)
            .field("pattern", &self.pattern)
            .field("negate", &self.negate)
            .field("within", &self.within)
            .field("partial_match", &self.partial_match)
            .field("case_sensitive", &self.case_sensitive)
            .field("allow_null", &self.allow_null)
            .field("match_target", &self.match_target)
            .field("has_predicate", &self.against.is_some())
            .field("args", &self.args)
            .field("show_message_when_empty", &self.show_message_when_empty)
            .finish_non_exhaustive()
    }
}
