//! Built-in validators.

use std::sync::{Arc, LazyLock};

use regex::Regex;
use serde_json::Value;

use crate::error::InputResult;
use crate::namespace::{check_param_count, number_param, usize_param};
use crate::rule::{RuleKind, Validator};
use crate::value::{is_integer_number, to_number, to_text};

const KIND: RuleKind = RuleKind::Validator;

static INT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+$").expect("integer pattern is valid"));

// Czech ZIP code: five digits, optionally split 3 + 2 by a space.
static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{3}\s?\d{2}$").expect("zip code pattern is valid"));

fn char_len(value: &Value) -> Option<usize> {
    to_text(value).map(|s| s.chars().count())
}

// ============================================================================
// TYPE CHECKS
// ============================================================================

/// Accepts integers and strings holding an integer.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsInt;

impl IsInt {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "isInt", params, 0)?;
        Ok(Arc::new(Self))
    }
}

impl Validator for IsInt {
    fn is_valid(&self, value: &Value) -> bool {
        match value {
            Value::Number(n) => is_integer_number(n),
            Value::String(s) => INT_PATTERN.is_match(s),
            _ => false,
        }
    }

    fn error_message(&self) -> Option<String> {
        Some("value is not an integer".to_owned())
    }
}

/// Accepts arrays and objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct IsArray;

impl IsArray {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "isArray", params, 0)?;
        Ok(Arc::new(Self))
    }
}

impl Validator for IsArray {
    fn is_valid(&self, value: &Value) -> bool {
        value.is_array() || value.is_object()
    }

    fn error_message(&self) -> Option<String> {
        Some("value is not an array".to_owned())
    }
}

/// Rejects `null`, `false`, blank strings and empty containers.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotEmpty;

impl NotEmpty {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "notEmpty", params, 0)?;
        Ok(Arc::new(Self))
    }
}

impl Validator for NotEmpty {
    fn is_valid(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => !items.is_empty(),
            Value::Object(map) => !map.is_empty(),
            other => to_text(other).is_some_and(|s| !s.trim().is_empty()),
        }
    }

    fn error_message(&self) -> Option<String> {
        Some("value is empty".to_owned())
    }
}

/// Accepts Czech ZIP codes (`12345` or `123 45`).
#[derive(Debug, Clone, Copy, Default)]
pub struct IsZipCode;

impl IsZipCode {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "isZipCode", params, 0)?;
        Ok(Arc::new(Self))
    }
}

impl Validator for IsZipCode {
    fn is_valid(&self, value: &Value) -> bool {
        to_text(value).is_some_and(|s| ZIP_PATTERN.is_match(&s))
    }

    fn error_message(&self) -> Option<String> {
        Some("value is not a zip code".to_owned())
    }
}

// ============================================================================
// COMPARISONS
// ============================================================================

/// Accepts values equal to the expected one; scalars compare by text form.
#[derive(Debug, Clone, PartialEq)]
pub struct Equals {
    pub expected: Value,
}

impl Equals {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "equals", params, 1)?;
        Ok(Arc::new(Self {
            expected: params[0].clone(),
        }))
    }
}

impl Validator for Equals {
    fn is_valid(&self, value: &Value) -> bool {
        if *value == self.expected {
            return true;
        }
        match (to_text(value), to_text(&self.expected)) {
            (Some(a), Some(b)) => a == b,
            _ => false,
        }
    }

    fn error_message(&self) -> Option<String> {
        Some(format!("value is not equal to {}", self.expected))
    }
}

/// Accepts numeric values strictly below the bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LessThan {
    pub bound: f64,
}

impl LessThan {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "lessThan", params, 1)?;
        Ok(Arc::new(Self {
            bound: number_param(KIND, "lessThan", params, 0)?,
        }))
    }
}

impl Validator for LessThan {
    fn is_valid(&self, value: &Value) -> bool {
        to_number(value).is_some_and(|n| n < self.bound)
    }

    fn error_message(&self) -> Option<String> {
        Some(format!("value is not less than {}", self.bound))
    }
}

/// Accepts numeric values strictly above the bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GreaterThan {
    pub bound: f64,
}

impl GreaterThan {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "greaterThan", params, 1)?;
        Ok(Arc::new(Self {
            bound: number_param(KIND, "greaterThan", params, 0)?,
        }))
    }
}

impl Validator for GreaterThan {
    fn is_valid(&self, value: &Value) -> bool {
        to_number(value).is_some_and(|n| n > self.bound)
    }

    fn error_message(&self) -> Option<String> {
        Some(format!("value is not greater than {}", self.bound))
    }
}

// ============================================================================
// STRING LENGTH
// ============================================================================

/// Accepts scalars whose text is longer than `min` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLengthGreaterThan {
    pub min: usize,
}

impl StringLengthGreaterThan {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "stringLengthGreaterThan", params, 1)?;
        Ok(Arc::new(Self {
            min: usize_param(KIND, "stringLengthGreaterThan", params, 0)?,
        }))
    }
}

impl Validator for StringLengthGreaterThan {
    fn is_valid(&self, value: &Value) -> bool {
        char_len(value).is_some_and(|len| len > self.min)
    }

    fn error_message(&self) -> Option<String> {
        Some(format!("value is not longer than {} characters", self.min))
    }
}

/// Accepts scalars whose text is shorter than `max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLengthLessThan {
    pub max: usize,
}

impl StringLengthLessThan {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        check_param_count(KIND, "stringLengthLessThan", params, 1)?;
        Ok(Arc::new(Self {
            max: usize_param(KIND, "stringLengthLessThan", params, 0)?,
        }))
    }
}

impl Validator for StringLengthLessThan {
    fn is_valid(&self, value: &Value) -> bool {
        char_len(value).is_some_and(|len| len < self.max)
    }

    fn error_message(&self) -> Option<String> {
        Some(format!("value is not shorter than {} characters", self.max))
    }
}

/// Accepts scalars whose text length lies in `min..=max` characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLengthBetween {
    pub min: usize,
    pub max: usize,
}

impl StringLengthBetween {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Validator>> {
        let name = "stringLengthBetween";
        check_param_count(KIND, name, params, 2)?;
        let min = usize_param(KIND, name, params, 0)?;
        let max = usize_param(KIND, name, params, 1)?;
        if min > max {
            return Err(crate::InputError::InvalidRuleParams {
                kind: KIND,
                name: crate::rule::display_name(name),
                reason: format!("minimum {min} is greater than maximum {max}"),
            });
        }
        Ok(Arc::new(Self { min, max }))
    }
}

impl Validator for StringLengthBetween {
    fn is_valid(&self, value: &Value) -> bool {
        char_len(value).is_some_and(|len| (self.min..=self.max).contains(&len))
    }

    fn error_message(&self) -> Option<String> {
        Some(format!(
            "value length is not between {} and {} characters",
            self.min, self.max
        ))
    }
}
