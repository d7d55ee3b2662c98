//! The value a rule is evaluated against.

use std::borrow::Cow;
use std::fmt;

/// A form control's current value as seen by the rule library.
///
/// Text controls produce [`FieldValue::Text`], the `acceptance` rule sees a
/// checkbox's checked state as [`FieldValue::Checked`], and a select with no
/// selected option produces [`FieldValue::Missing`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldValue {
    /// No value at all (the null/undefined case).
    #[default]
    Missing,
    /// A textual value.
    Text(String),
    /// A checked state.
    Checked(bool),
}

impl FieldValue {
    /// Create a text value.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns `true` for a missing value.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns `true` for a missing value or the empty string.
    ///
    /// A checked state is never blank, even when unchecked.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Text(s) => s.is_empty(),
            Self::Checked(_) => false,
        }
    }

    /// Truthiness: missing, empty text and unchecked are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Missing => false,
            Self::Text(s) => !s.is_empty(),
            Self::Checked(b) => *b,
        }
    }

    /// String coercion used by the textual rules.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Missing => Cow::Borrowed(""),
            Self::Text(s) => Cow::Borrowed(s.as_str()),
            Self::Checked(true) => Cow::Borrowed("true"),
            Self::Checked(false) => Cow::Borrowed("false"),
        }
    }

    /// Numeric coercion.
    ///
    /// Surrounding whitespace is ignored and empty text is zero. Unsigned
    /// `0x` hex literals are read as integers. Anything that does not parse
    /// yields NaN, which the numeric rules reject.
    pub fn to_number(&self) -> f64 {
        match self {
            Self::Missing => f64::NAN,
            Self::Checked(b) => f64::from(u8::from(*b)),
            Self::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    0.0
                } else if let Some(digits) = hex_digits(trimmed) {
                    parse_hex(digits)
                } else {
                    trimmed.parse::<f64>().unwrap_or(f64::NAN)
                }
            }
        }
    }
}

fn hex_digits(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

fn parse_hex(digits: &str) -> f64 {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return f64::NAN;
    }
    digits
        .chars()
        .filter_map(|c| c.to_digit(16))
        .fold(0.0, |acc, digit| acc * 16.0 + f64::from(digit))
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_text())
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Checked(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Missing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_values() {
        assert!(FieldValue::Missing.is_blank());
        assert!(FieldValue::text("").is_blank());
        assert!(!FieldValue::text(" ").is_blank());
        assert!(!FieldValue::Checked(false).is_blank());
    }

    #[test]
    fn truthiness() {
        assert!(!FieldValue::Missing.is_truthy());
        assert!(!FieldValue::text("").is_truthy());
        assert!(FieldValue::text("0").is_truthy());
        assert!(!FieldValue::Checked(false).is_truthy());
        assert!(FieldValue::Checked(true).is_truthy());
    }

    #[test]
    fn numeric_coercion() {
        assert_eq!(FieldValue::text(" 42 ").to_number(), 42.0);
        assert_eq!(FieldValue::text("").to_number(), 0.0);
        assert_eq!(FieldValue::text("5.").to_number(), 5.0);
        assert_eq!(FieldValue::Checked(true).to_number(), 1.0);
        assert!(FieldValue::text("abc").to_number().is_nan());
        assert!(FieldValue::Missing.to_number().is_nan());
    }

    #[test]
    fn hex_coercion() {
        assert_eq!(FieldValue::text("0x1A").to_number(), 26.0);
        assert_eq!(FieldValue::text(" 0Xff ").to_number(), 255.0);
        assert!(FieldValue::text("0x").to_number().is_nan());
        assert!(FieldValue::text("0x+1").to_number().is_nan());
        assert!(FieldValue::text("-0x1A").to_number().is_nan());
        assert!(FieldValue::text("0x1G").to_number().is_nan());
    }

    #[test]
    fn option_conversion() {
        assert_eq!(FieldValue::from(None::<&str>), FieldValue::Missing);
        assert_eq!(FieldValue::from(Some("a")), FieldValue::text("a"));
    }
}
