//! Rule namespaces: named tables of rule constructors.
//!
//! A namespace plays the role of a class-name prefix: the factory searches its
//! namespaces in registration order and the first one that knows a name builds
//! the rule. Every rule kind has its own list of namespaces.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::{InputError, InputResult};
use crate::rule::{Filter, RuleKind, Validator, display_name, normalize_name};
use crate::value::{to_number, value_type_name};

/// Builds a rule from its positional parameters.
pub type Constructor<T> = fn(&[Value]) -> InputResult<Arc<T>>;

/// Namespace of filter constructors.
pub type FilterNamespace = RuleNamespace<dyn Filter>;

/// Namespace of validator constructors.
pub type ValidatorNamespace = RuleNamespace<dyn Validator>;

/// A named table from normalized rule name to constructor.
pub struct RuleNamespace<T: ?Sized> {
    prefix: String,
    constructors: HashMap<String, Constructor<T>>,
}

impl<T: ?Sized> RuleNamespace<T> {
    /// Create an empty namespace.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            constructors: HashMap::new(),
        }
    }

    /// Register a constructor under a case-insensitive name.
    ///
    /// If the name is already registered, it is replaced.
    pub fn register(&mut self, name: &str, constructor: Constructor<T>) -> &mut Self {
        self.constructors.insert(normalize_name(name), constructor);
        self
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with(mut self, name: &str, constructor: Constructor<T>) -> Self {
        self.register(name, constructor);
        self
    }

    /// The namespace prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Check if a rule name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(&normalize_name(name))
    }

    /// Look up a constructor by an already normalized name.
    pub(crate) fn constructor(&self, normalized: &str) -> Option<Constructor<T>> {
        self.constructors.get(normalized).copied()
    }

    /// Registered (normalized) rule names.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl<T: ?Sized> Clone for RuleNamespace<T> {
    fn clone(&self) -> Self {
        Self {
            prefix: self.prefix.clone(),
            constructors: self.constructors.clone(),
        }
    }
}

impl<T: ?Sized> fmt::Debug for RuleNamespace<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleNamespace")
            .field("prefix", &self.prefix)
            .field("rules", &self.constructors.len())
            .finish()
    }
}

// ============================================================================
// PARAMETER HELPERS
// ============================================================================

fn invalid_params(kind: RuleKind, rule: &str, reason: String) -> InputError {
    InputError::InvalidRuleParams {
        kind,
        name: display_name(rule),
        reason,
    }
}

/// Helper to check the parameter count.
pub fn check_param_count(
    kind: RuleKind,
    rule: &str,
    params: &[Value],
    expected: usize,
) -> InputResult<()> {
    if params.len() == expected {
        Ok(())
    } else {
        Err(invalid_params(
            kind,
            rule,
            format!("expected {expected} parameters, got {}", params.len()),
        ))
    }
}

/// Helper to get a numeric parameter (numbers and numeric strings).
pub fn number_param(
    kind: RuleKind,
    rule: &str,
    params: &[Value],
    index: usize,
) -> InputResult<f64> {
    let value = params.get(index).ok_or_else(|| {
        invalid_params(kind, rule, format!("missing parameter at position {index}"))
    })?;
    to_number(value).ok_or_else(|| {
        invalid_params(
            kind,
            rule,
            format!(
                "parameter at position {index} must be a number, got {}",
                value_type_name(value)
            ),
        )
    })
}

/// Helper to get a non-negative integer parameter.
pub fn usize_param(
    kind: RuleKind,
    rule: &str,
    params: &[Value],
    index: usize,
) -> InputResult<usize> {
    let n = number_param(kind, rule, params, index)?;
    if n >= 0.0 && n.fract() == 0.0 {
        Ok(n as usize)
    } else {
        Err(invalid_params(
            kind,
            rule,
            format!("parameter at position {index} must be a non-negative integer, got {n}"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::filters::Trim;
    use serde_json::json;

    fn trim(_params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        Ok(Arc::new(Trim))
    }

    #[test]
    fn register_is_case_insensitive() {
        let ns = FilterNamespace::new("custom").with("myTrim", trim);
        assert!(ns.contains("mytrim"));
        assert!(ns.contains("MyTrim"));
        assert!(!ns.contains("trim"));
        assert_eq!(ns.len(), 1);
        assert_eq!(ns.prefix(), "custom");
    }

    #[test]
    fn param_count_mismatch() {
        let err = check_param_count(RuleKind::Validator, "lessThan", &[], 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid parameters for validator `LessThan`: expected 1 parameters, got 0"
        );
    }

    #[test]
    fn number_params() {
        let params = [json!(42), json!("7"), json!("x"), json!(-1)];
        let kind = RuleKind::Validator;
        assert_eq!(number_param(kind, "r", &params, 0).unwrap(), 42.0);
        assert_eq!(number_param(kind, "r", &params, 1).unwrap(), 7.0);
        assert!(number_param(kind, "r", &params, 2).is_err());
        assert!(number_param(kind, "r", &params, 9).is_err());
        assert_eq!(usize_param(kind, "r", &params, 0).unwrap(), 42);
        assert!(usize_param(kind, "r", &params, 3).is_err());
    }
}
