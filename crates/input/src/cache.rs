//! Process-wide rule cache for one-shot filtering and validation.
//!
//! Each distinct `kind + name + params` combination is resolved at most once
//! per cache and shared afterwards. Entries are never evicted.

use std::sync::{Arc, LazyLock};

use dashmap::DashMap;
use serde_json::Value;

use crate::error::InputResult;
use crate::factory::Factory;
use crate::rule::{Filter, RuleKind, Validator, normalize_name};

static GLOBAL: LazyLock<RuleCache> = LazyLock::new(RuleCache::default);

/// Cache of resolved rules in front of a [`Factory`].
///
/// Concurrent callers may resolve the same key at the same time; the first
/// insert wins and every caller gets that instance.
#[derive(Debug)]
pub struct RuleCache {
    factory: Factory,
    filters: DashMap<String, Arc<dyn Filter>>,
    validators: DashMap<String, Arc<dyn Validator>>,
}

impl RuleCache {
    /// Create a cache over the given factory.
    #[must_use]
    pub fn new(factory: Factory) -> Self {
        Self {
            factory,
            filters: DashMap::new(),
            validators: DashMap::new(),
        }
    }

    /// The process-wide cache over the built-in factory.
    #[must_use]
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Resolve a filter, reusing a cached instance when possible.
    pub fn resolve_filter(&self, name: &str, params: &[Value]) -> InputResult<Arc<dyn Filter>> {
        let key = cache_key(RuleKind::Filter, name, params);
        if let Some(hit) = self.filters.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }
        let resolved = self.factory.filter(name, params)?;
        let entry = self.filters.entry(key).or_insert(resolved);
        tracing::debug!(key = entry.key().as_str(), "cached filter");
        Ok(Arc::clone(entry.value()))
    }

    /// Resolve a validator, reusing a cached instance when possible.
    pub fn resolve_validator(
        &self,
        name: &str,
        params: &[Value],
    ) -> InputResult<Arc<dyn Validator>> {
        let key = cache_key(RuleKind::Validator, name, params);
        if let Some(hit) = self.validators.get(&key) {
            return Ok(Arc::clone(hit.value()));
        }
        let resolved = self.factory.validator(name, params)?;
        let entry = self.validators.entry(key).or_insert(resolved);
        tracing::debug!(key = entry.key().as_str(), "cached validator");
        Ok(Arc::clone(entry.value()))
    }

    /// Filter a value with a named filter.
    pub fn filter(&self, name: &str, value: Value, params: &[Value]) -> InputResult<Value> {
        Ok(self.resolve_filter(name, params)?.apply(value))
    }

    /// Validate a value with a named validator.
    pub fn validate(&self, name: &str, value: &Value, params: &[Value]) -> InputResult<bool> {
        Ok(self.resolve_validator(name, params)?.is_valid(value))
    }

    /// Apply a rule of either kind. Validators yield `Value::Bool`.
    pub fn apply(
        &self,
        kind: RuleKind,
        name: &str,
        value: Value,
        params: &[Value],
    ) -> InputResult<Value> {
        match kind {
            RuleKind::Filter => self.filter(name, value, params),
            RuleKind::Validator => self.validate(name, &value, params).map(Value::Bool),
        }
    }

    /// Check if a key is cached.
    #[must_use]
    pub fn contains(&self, kind: RuleKind, name: &str, params: &[Value]) -> bool {
        let key = cache_key(kind, name, params);
        match kind {
            RuleKind::Filter => self.filters.contains_key(&key),
            RuleKind::Validator => self.validators.contains_key(&key),
        }
    }

    /// Number of cached instances of both kinds.
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len() + self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(Factory::new())
    }
}

/// Cache key: `kind:name`, plus `/` and the JSON parameter list when present.
///
/// JSON keeps parameter order and distinguishes `24` from `"24"`.
#[must_use]
pub fn cache_key(kind: RuleKind, name: &str, params: &[Value]) -> String {
    let mut key = format!("{kind}:{}", normalize_name(name));
    if !params.is_empty() {
        key.push('/');
        key.push_str(&Value::Array(params.to_vec()).to_string());
    }
    key
}

/// Filter a value through the process-wide cache.
///
/// ```rust
/// # use serde_json::json;
/// # fn main() -> nebula_input::InputResult<()> {
/// assert_eq!(nebula_input::filter_value("trim", json!(" a "), &[])?, json!("a"));
/// # Ok(())
/// # }
/// ```
pub fn filter_value(name: &str, value: Value, params: &[Value]) -> InputResult<Value> {
    RuleCache::global().filter(name, value, params)
}

/// Validate a value through the process-wide cache.
///
/// ```rust
/// # use serde_json::json;
/// # fn main() -> nebula_input::InputResult<()> {
/// assert!(nebula_input::validate_value("lessThan", &json!(3), &[json!(5)])?);
/// # Ok(())
/// # }
/// ```
pub fn validate_value(name: &str, value: &Value, params: &[Value]) -> InputResult<bool> {
    RuleCache::global().validate(name, value, params)
}
