//! Rule factory: resolves rule names to rule instances.

use std::sync::Arc;

use serde_json::Value;

use crate::error::{InputError, InputResult};
use crate::namespace::{FilterNamespace, RuleNamespace, ValidatorNamespace};
use crate::rule::{Filter, RuleKind, RuleRef, Validator, display_name, normalize_name};
use crate::rules::{builtin_filters, builtin_validators};

/// Resolves rule names against ordered lists of namespaces.
///
/// The factory holds no cache; each call constructs a fresh instance.
/// Use [`RuleCache`](crate::RuleCache) when instances should be shared.
///
/// # Examples
///
/// ```rust
/// use nebula_input::{Factory, Validator};
/// use serde_json::json;
///
/// # fn main() -> nebula_input::InputResult<()> {
/// let factory = Factory::new();
/// let between = factory.validator("stringLengthBetween", &[json!(24), json!(42)])?;
/// assert!(between.is_valid(&json!("x".repeat(30))));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Factory {
    filters: Vec<FilterNamespace>,
    validators: Vec<ValidatorNamespace>,
}

impl Factory {
    /// Create a factory with the built-in namespaces.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: vec![builtin_filters()],
            validators: vec![builtin_validators()],
        }
    }

    /// Create a factory without any namespace.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            filters: Vec::new(),
            validators: Vec::new(),
        }
    }

    /// Append a filter namespace; it is searched after all earlier ones.
    pub fn add_filter_namespace(&mut self, namespace: FilterNamespace) -> &mut Self {
        tracing::info!(
            prefix = namespace.prefix(),
            rules = namespace.len(),
            "registered filter namespace"
        );
        self.filters.push(namespace);
        self
    }

    /// Append a validator namespace; it is searched after all earlier ones.
    pub fn add_validator_namespace(&mut self, namespace: ValidatorNamespace) -> &mut Self {
        tracing::info!(
            prefix = namespace.prefix(),
            rules = namespace.len(),
            "registered validator namespace"
        );
        self.validators.push(namespace);
        self
    }

    /// Resolve a filter by name, or pass an instance through unchanged.
    pub fn filter<'a>(
        &self,
        rule: impl Into<RuleRef<'a, dyn Filter>>,
        params: &[Value],
    ) -> InputResult<Arc<dyn Filter>> {
        resolve(&self.filters, RuleKind::Filter, rule.into(), params)
    }

    /// Resolve a validator by name, or pass an instance through unchanged.
    pub fn validator<'a>(
        &self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
        params: &[Value],
    ) -> InputResult<Arc<dyn Validator>> {
        resolve(&self.validators, RuleKind::Validator, rule.into(), params)
    }

    /// Check if any filter namespace knows the name.
    #[must_use]
    pub fn has_filter(&self, name: &str) -> bool {
        self.filters.iter().any(|ns| ns.contains(name))
    }

    /// Check if any validator namespace knows the name.
    #[must_use]
    pub fn has_validator(&self, name: &str) -> bool {
        self.validators.iter().any(|ns| ns.contains(name))
    }

    /// Filter namespace prefixes in search order.
    #[must_use]
    pub fn filter_namespaces(&self) -> Vec<&str> {
        self.filters.iter().map(RuleNamespace::prefix).collect()
    }

    /// Validator namespace prefixes in search order.
    #[must_use]
    pub fn validator_namespaces(&self) -> Vec<&str> {
        self.validators.iter().map(RuleNamespace::prefix).collect()
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

fn resolve<T: ?Sized>(
    namespaces: &[RuleNamespace<T>],
    kind: RuleKind,
    rule: RuleRef<'_, T>,
    params: &[Value],
) -> InputResult<Arc<T>> {
    let name = match rule {
        RuleRef::Instance(instance) => return Ok(instance),
        RuleRef::Name(name) => name,
    };

    let normalized = normalize_name(&name);
    for namespace in namespaces {
        if let Some(constructor) = namespace.constructor(&normalized) {
            tracing::debug!(
                kind = %kind,
                rule = %display_name(&name),
                prefix = namespace.prefix(),
                params = params.len(),
                "resolved rule"
            );
            return constructor(params);
        }
    }

    Err(InputError::UnresolvedRule {
        kind,
        name: display_name(&name),
    })
}
