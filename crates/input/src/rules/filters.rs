//! Built-in filters.
//!
//! String filters descend into arrays and objects, so `lowerCase` applied to
//! a list lowercases every element.

use std::sync::Arc;

use serde_json::Value;

use crate::error::InputResult;
use crate::namespace::check_param_count;
use crate::rule::{Filter, RuleKind};
use crate::value::{is_integer_number, map_strings, to_number};

fn no_params(rule: &str, params: &[Value]) -> InputResult<()> {
    check_param_count(RuleKind::Filter, rule, params, 0)
}

/// Trims surrounding whitespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trim;

impl Trim {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        no_params("trim", params)?;
        Ok(Arc::new(Self))
    }
}

impl Filter for Trim {
    fn apply(&self, value: Value) -> Value {
        map_strings(value, &|s| s.trim().to_owned())
    }
}

/// Converts to lowercase (Unicode aware).
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerCase;

impl LowerCase {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        no_params("lowerCase", params)?;
        Ok(Arc::new(Self))
    }
}

impl Filter for LowerCase {
    fn apply(&self, value: Value) -> Value {
        map_strings(value, &str::to_lowercase)
    }
}

/// Converts to uppercase (Unicode aware).
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperCase;

impl UpperCase {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        no_params("upperCase", params)?;
        Ok(Arc::new(Self))
    }
}

impl Filter for UpperCase {
    fn apply(&self, value: Value) -> Value {
        map_strings(value, &str::to_uppercase)
    }
}

/// Converts scalars to integers, truncating fractions.
///
/// Non-numeric strings and `null` become `0`, booleans become `0`/`1`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToInt;

impl ToInt {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        no_params("toInt", params)?;
        Ok(Arc::new(Self))
    }

    fn convert(value: Value) -> Value {
        match value {
            Value::Number(n) if is_integer_number(&n) => Value::Number(n),
            Value::Array(items) => Value::Array(items.into_iter().map(Self::convert).collect()),
            Value::Object(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, Self::convert(v))).collect())
            }
            Value::Bool(b) => Value::from(i64::from(b)),
            other => Value::from(to_number(&other).map_or(0, |f| f.trunc() as i64)),
        }
    }
}

impl Filter for ToInt {
    fn apply(&self, value: Value) -> Value {
        Self::convert(value)
    }
}

/// Normalizes phone numbers by dropping whitespace and common separators.
#[derive(Debug, Clone, Copy, Default)]
pub struct Phone;

impl Phone {
    pub fn from_params(params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        no_params("phone", params)?;
        Ok(Arc::new(Self))
    }
}

impl Filter for Phone {
    fn apply(&self, value: Value) -> Value {
        map_strings(value, &|s| {
            s.chars()
                .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')' | '/' | '.'))
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn trim_and_case() {
        assert_eq!(Trim.apply(json!(" 42 ")), json!("42"));
        assert_eq!(
            LowerCase.apply(json!(["aBcDe", "ŽLUŤOUČKÝ kůň"])),
            json!(["abcde", "žluťoučký kůň"])
        );
        assert_eq!(UpperCase.apply(json!("abc")), json!("ABC"));
        assert_eq!(Trim.apply(json!(5)), json!(5));
    }

    #[test]
    fn to_int_conversions() {
        assert_eq!(ToInt.apply(json!("42")), json!(42));
        assert_eq!(ToInt.apply(json!(4.9)), json!(4));
        assert_eq!(ToInt.apply(json!("abc")), json!(0));
        assert_eq!(ToInt.apply(json!(true)), json!(1));
        assert_eq!(ToInt.apply(json!(["1", 2.5])), json!([1, 2]));
    }

    #[test]
    fn phone_strips_separators() {
        assert_eq!(Phone.apply(json!("+420 123-456 (789)")), json!("+420123456789"));
    }

    #[test]
    fn filters_reject_params() {
        assert!(Trim::from_params(&[json!(1)]).is_err());
        assert!(Trim::from_params(&[]).is_ok());
    }
}
