//! Validation of untrusted book payloads.
//!
//! [`validate`] checks a raw JSON payload against the book shape for either a create or
//! an update and returns the normalized [`BookFields`]. Every violation found is
//! reported, not only the first one.
//!
//! | Field    | Create                         | Update                    |
//! |----------|--------------------------------|---------------------------|
//! | `title`  | required, non-empty string     | optional, same when given |
//! | `author` | required, non-empty string     | optional, same when given |
//! | `length` | optional integer               | same                      |
//! | `rating` | optional number, at most 5     | same                      |
//!
//! Numbers may also be given as numeric strings (`"412"`, `" 4.5 "`, `"1e2"`), which are
//! converted. Numbers beyond ±(2^53 - 1) are rejected as unsafe. Any other key is
//! rejected, which includes `id`.

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::book::BookFields;

/// Highest accepted `rating`. There is no lower bound.
pub const MAX_RATING: f64 = 5.0;

/// Largest magnitude a number can have and still be exact in a double.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

const FIELDS: [&str; 4] = ["title", "author", "length", "rating"];

/// Which operation a payload is validated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `title` and `author` are required.
    Create,
    /// Every field is optional.
    Update,
}

/// The constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    /// The payload is not a JSON object.
    Object,
    Required,
    String,
    Empty,
    Number,
    Integer,
    Max,
    /// The number is too large in magnitude to be represented exactly.
    Unsafe,
    /// The key is not part of the book shape.
    Unknown,
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => write!(f, "object"),
            Self::Required => write!(f, "required"),
            Self::String => write!(f, "string"),
            Self::Empty => write!(f, "empty"),
            Self::Number => write!(f, "number"),
            Self::Integer => write!(f, "integer"),
            Self::Max => write!(f, "max"),
            Self::Unsafe => write!(f, "unsafe"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A single failed constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

impl Violation {
    fn new(field: &str, rule: Rule) -> Self {
        let message = match rule {
            Rule::Object => format!("\"{field}\" must be of type object"),
            Rule::Required => format!("\"{field}\" is required"),
            Rule::String => format!("\"{field}\" must be a string"),
            Rule::Empty => format!("\"{field}\" is not allowed to be empty"),
            Rule::Number => format!("\"{field}\" must be a number"),
            Rule::Integer => format!("\"{field}\" must be an integer"),
            Rule::Max => format!("\"{field}\" must be less than or equal to {MAX_RATING}"),
            Rule::Unsafe => format!("\"{field}\" must be a safe number"),
            Rule::Unknown => format!("\"{field}\" is not allowed"),
        };

        Self {
            field: field.to_string(),
            rule,
            message,
        }
    }
}

/// A payload was rejected. Holds at least one [`Violation`].
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", join_messages(.violations))]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    /// The violations, in field order followed by unknown keys sorted by name.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message.as_str())
        .collect::<Vec<_>>()
        .join(". ")
}

/// Validates `payload` for the given mode.
///
/// On success in [`Mode::Create`] both `title` and `author` are set.
///
/// # Errors
///
/// Returns a [`ValidationError`] listing every violated constraint.
pub fn validate(payload: &Value, mode: Mode) -> Result<BookFields, ValidationError> {
    let Some(object) = payload.as_object() else {
        return Err(ValidationError {
            violations: vec![Violation::new("value", Rule::Object)],
        });
    };

    let mut violations = Vec::new();
    let required = mode == Mode::Create;

    let fields = BookFields {
        title: text(object, "title", required, &mut violations),
        author: text(object, "author", required, &mut violations),
        length: integer(object, "length", &mut violations),
        rating: rating(object, "rating", &mut violations),
    };

    violations.extend(
        object
            .keys()
            .filter(|key| !FIELDS.contains(&key.as_str()))
            .map(|key| Violation::new(key, Rule::Unknown)),
    );

    if violations.is_empty() {
        Ok(fields)
    } else {
        Err(ValidationError { violations })
    }
}

fn text(
    object: &Map<String, Value>,
    field: &str,
    required: bool,
    violations: &mut Vec<Violation>,
) -> Option<String> {
    match object.get(field) {
        None => {
            if required {
                violations.push(Violation::new(field, Rule::Required));
            }
            None
        }
        Some(Value::String(s)) if s.is_empty() => {
            violations.push(Violation::new(field, Rule::Empty));
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            violations.push(Violation::new(field, Rule::String));
            None
        }
    }
}

/// Reads a number, converting numeric strings.
fn number(object: &Map<String, Value>, field: &str, violations: &mut Vec<Violation>) -> Option<f64> {
    let number = match object.get(field)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => parse_numeric(text),
        _ => None,
    };

    let Some(number) = number else {
        violations.push(Violation::new(field, Rule::Number));
        return None;
    };

    if number.abs() > MAX_SAFE_INTEGER {
        violations.push(Violation::new(field, Rule::Unsafe));
        return None;
    }

    Some(number)
}

/// Parses decimal notation with optional sign, fraction, exponent and surrounding
/// whitespace. Rejects hex, `inf` and `NaN`.
fn parse_numeric(text: &str) -> Option<f64> {
    let text = text.trim();
    let unsigned = text.strip_prefix(['+', '-']).unwrap_or(text);
    let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (unsigned, None),
    };

    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let mantissa_ok = match mantissa.split_once('.') {
        Some((whole, fraction)) => {
            (digits(whole) || digits(fraction))
                && (whole.is_empty() || digits(whole))
                && (fraction.is_empty() || digits(fraction))
        }
        None => digits(mantissa),
    };
    let exponent_ok = exponent.is_none_or(|e| digits(e.strip_prefix(['+', '-']).unwrap_or(e)));

    if !(mantissa_ok && exponent_ok) {
        return None;
    }

    text.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn integer(object: &Map<String, Value>, field: &str, violations: &mut Vec<Violation>) -> Option<i64> {
    let number = number(object, field, violations)?;

    // 3.0 counts as an integer
    if number.fract() != 0.0 {
        violations.push(Violation::new(field, Rule::Integer));
        return None;
    }

    Some(number as i64)
}

fn rating(object: &Map<String, Value>, field: &str, violations: &mut Vec<Violation>) -> Option<f64> {
    let number = number(object, field, violations)?;

    if number > MAX_RATING {
        violations.push(Violation::new(field, Rule::Max));
        return None;
    }

    Some(number)
}
