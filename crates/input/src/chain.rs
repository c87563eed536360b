//! Fluent chain builder.
//!
//! A [`Chain`] collects named values ([`Check`]s) and the filters, validators
//! and branches attached to them, then validates them all at once.
//!
//! # Examples
//!
//! ```rust
//! use nebula_input::Chain;
//! use serde_json::json;
//!
//! # fn main() -> nebula_input::InputResult<()> {
//! let mut input = Chain::new();
//! input
//!     .check(json!(" 42 "), "answer")
//!     .filter("trim")?
//!     .validate("isInt")?;
//!
//! assert!(input.is_valid());
//! assert_eq!(input["answer"], json!("42"));
//! # Ok(())
//! # }
//! ```
//!
//! `condition` and `walk` open a branch; steps attached afterwards belong to
//! the branch until `close` is called:
//!
//! ```rust
//! # use nebula_input::Chain;
//! # use serde_json::json;
//! # fn main() -> nebula_input::InputResult<()> {
//! # let mut input = Chain::new();
//! input
//!     .check(json!(42), "answer")
//!     .condition("isInt")?
//!         .validate_with("lessThan", Some("too big"), &[json!(100)])?
//!         .close()?
//!     .validate("notEmpty")?;
//! assert!(input.is_valid());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::check::{Check, CheckState};
use crate::config::{ChainConfig, ErrorLayout};
use crate::error::{InputError, InputResult};
use crate::factory::Factory;
use crate::rule::{Filter, RuleRef, Validator};
use crate::source::{InputSource, RequestValues, SourceKind};
use crate::step::{Step, descend};

/// What the builder currently appends steps to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Target {
    Check(String),
    /// Index into `Chain::all_passes`.
    All(usize),
}

/// Active target plus the branch indices leading to the open branch.
#[derive(Debug, Clone)]
struct Cursor {
    target: Target,
    path: Vec<usize>,
}

/// Steps added after `all()`, applied to every check defined before it.
#[derive(Debug, Clone)]
struct AllPass {
    /// Checks with a lower definition number are covered.
    upto: u64,
    pipeline: Vec<Step>,
}

/// Error messages of a validation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Errors {
    Flat(Vec<String>),
    ByName(IndexMap<String, Vec<String>>),
}

impl Errors {
    /// Total number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Flat(messages) => messages.len(),
            Self::ByName(map) => map.values().map(Vec::len).sum(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fluent builder and evaluator for a set of named values.
pub struct Chain {
    factory: Arc<Factory>,
    source: Arc<dyn InputSource>,
    config: ChainConfig,
    checks: IndexMap<String, Check>,
    all_passes: Vec<AllPass>,
    cursor: Option<Cursor>,
    saved: Vec<Cursor>,
    layout: ErrorLayout,
    evaluated: bool,
    definitions: u64,
}

impl Chain {
    /// Create a chain with the built-in factory and an empty input source.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factory: Arc::new(Factory::new()),
            source: Arc::new(RequestValues::new()),
            config: ChainConfig::default(),
            checks: IndexMap::new(),
            all_passes: Vec::new(),
            cursor: None,
            saved: Vec::new(),
            layout: ErrorLayout::default(),
            evaluated: false,
            definitions: 0,
        }
    }

    /// Use a custom factory for rule resolution.
    #[must_use]
    pub fn with_factory(mut self, factory: impl Into<Arc<Factory>>) -> Self {
        self.factory = factory.into();
        self
    }

    /// Use a custom source for `post`, `query` and `request`.
    #[must_use]
    pub fn with_source(mut self, source: impl InputSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ChainConfig) -> Self {
        self.layout = config.error_layout;
        self.config = config;
        self
    }

    // ------------------------------------------------------------------------
    // Values
    // ------------------------------------------------------------------------

    /// Add a named value and make it the active check.
    ///
    /// A value with the same name is replaced, keeping its position. The
    /// replacement is a new definition: earlier `all()` steps skip it.
    pub fn check(&mut self, value: Value, name: impl Into<String>) -> &mut Self {
        let name = name.into();
        let mut check = Check::new(name.clone(), value);
        check.defined_at = self.definitions;
        self.definitions += 1;
        self.checks.insert(name.clone(), check);
        self.cursor = Some(Cursor {
            target: Target::Check(name),
            path: Vec::new(),
        });
        self.saved.clear();
        self.invalidate();
        self
    }

    /// Check a posted value (`null` if absent).
    pub fn post(&mut self, name: &str) -> &mut Self {
        self.from_source(SourceKind::Post, name)
    }

    /// Check a query-string value (`null` if absent).
    pub fn query(&mut self, name: &str) -> &mut Self {
        self.from_source(SourceKind::Query, name)
    }

    /// Check a value from posted or query values (`null` if absent).
    pub fn request(&mut self, name: &str) -> &mut Self {
        self.from_source(SourceKind::Request, name)
    }

    fn from_source(&mut self, kind: SourceKind, name: &str) -> &mut Self {
        let value = self.source.get(kind, name).unwrap_or(Value::Null);
        self.check(value, name)
    }

    /// Target every check defined so far with the following steps.
    pub fn all(&mut self) -> &mut Self {
        self.all_passes.push(AllPass {
            upto: self.definitions,
            pipeline: Vec::new(),
        });
        self.cursor = Some(Cursor {
            target: Target::All(self.all_passes.len() - 1),
            path: Vec::new(),
        });
        self.saved.clear();
        self.invalidate();
        self
    }

    // ------------------------------------------------------------------------
    // Steps
    // ------------------------------------------------------------------------

    /// Attach a filter.
    pub fn filter<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Filter>>,
    ) -> InputResult<&mut Self> {
        self.filter_with(rule, &[])
    }

    /// Attach a filter built with parameters.
    pub fn filter_with<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Filter>>,
        params: &[Value],
    ) -> InputResult<&mut Self> {
        let rule = self.factory.filter(rule, params)?;
        self.push_step("filter", Step::Filter(rule))?;
        Ok(self)
    }

    /// Attach a validator.
    pub fn validate<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
    ) -> InputResult<&mut Self> {
        self.validate_with(rule, None, &[])
    }

    /// Attach a validator with a failure message.
    pub fn validate_with_message<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
        message: &str,
    ) -> InputResult<&mut Self> {
        self.validate_with(rule, Some(message), &[])
    }

    /// Attach a validator built with parameters.
    pub fn validate_with<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
        message: Option<&str>,
        params: &[Value],
    ) -> InputResult<&mut Self> {
        let rule = self.factory.validator(rule, params)?;
        self.push_step(
            "validate",
            Step::Validate {
                rule,
                message: message.map(str::to_owned),
            },
        )?;
        Ok(self)
    }

    /// Open a branch that only runs when the rule accepts the value.
    pub fn condition<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
    ) -> InputResult<&mut Self> {
        self.condition_with(rule, &[])
    }

    /// Open a conditional branch with a rule built from parameters.
    pub fn condition_with<'a>(
        &mut self,
        rule: impl Into<RuleRef<'a, dyn Validator>>,
        params: &[Value],
    ) -> InputResult<&mut Self> {
        let rule = self.factory.validator(rule, params)?;
        let index = self.push_step(
            "condition",
            Step::Condition {
                rule,
                branch: Vec::new(),
            },
        )?;
        self.open_branch(index);
        Ok(self)
    }

    /// Open a branch that runs on every element of the value.
    ///
    /// With `continue_on_invalid == false` elements after the first invalid
    /// one are left untouched.
    pub fn walk(&mut self, continue_on_invalid: bool) -> InputResult<&mut Self> {
        let index = self.push_step(
            "walk",
            Step::Walk {
                continue_on_invalid,
                branch: Vec::new(),
            },
        )?;
        self.open_branch(index);
        Ok(self)
    }

    /// [`walk`](Self::walk) with the configured `walk_continue_on_invalid`.
    pub fn walk_all(&mut self) -> InputResult<&mut Self> {
        self.walk(self.config.walk_continue_on_invalid)
    }

    /// Close the innermost open branch.
    pub fn close(&mut self) -> InputResult<&mut Self> {
        let previous = self.saved.pop().ok_or_else(|| InputError::InvalidChainState {
            reason: "`close` called without an open branch".to_owned(),
        })?;
        self.cursor = Some(previous);
        Ok(self)
    }

    /// Value used when the active check fails.
    pub fn default_value(&mut self, value: Value) -> InputResult<&mut Self> {
        let name = match self.cursor.as_ref().map(|c| &c.target) {
            Some(Target::Check(name)) => name,
            Some(Target::All(_)) => {
                return Err(InputError::InvalidChainState {
                    reason: "`default_value` cannot target `all`".to_owned(),
                });
            }
            None => return Err(InputError::no_active_check("default_value")),
        };
        let check = self
            .checks
            .get_mut(name)
            .ok_or_else(|| InputError::no_active_check("default_value"))?;
        check.default = Some(value);
        self.invalidate();
        Ok(self)
    }

    fn push_step(&mut self, operation: &str, step: Step) -> InputResult<usize> {
        let cursor = self
            .cursor
            .as_ref()
            .ok_or_else(|| InputError::no_active_check(operation))?;
        let root = match &cursor.target {
            Target::Check(name) => self.checks.get_mut(name).map(|c| &mut c.pipeline),
            Target::All(index) => self.all_passes.get_mut(*index).map(|p| &mut p.pipeline),
        }
        .ok_or_else(|| InputError::no_active_check(operation))?;
        let steps = descend(root, &cursor.path).ok_or_else(|| InputError::InvalidChainState {
            reason: format!("`{operation}` called while the open branch is missing"),
        })?;

        steps.push(step);
        let index = steps.len() - 1;
        self.invalidate();
        Ok(index)
    }

    fn open_branch(&mut self, index: usize) {
        if let Some(cursor) = self.cursor.as_mut() {
            self.saved.push(cursor.clone());
            cursor.path.push(index);
        }
    }

    fn invalidate(&mut self) {
        if self.evaluated {
            self.checks.values_mut().for_each(Check::reset);
            self.evaluated = false;
        }
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    fn evaluate(&mut self) {
        if self.evaluated {
            return;
        }
        for check in self.checks.values_mut() {
            let defined_at = check.defined_at;
            let tails: Vec<&[Step]> = self
                .all_passes
                .iter()
                .filter(|pass| defined_at < pass.upto)
                .map(|pass| pass.pipeline.as_slice())
                .collect();
            check.evaluate(&tails);
        }
        self.evaluated = true;
        tracing::debug!(
            checks = self.checks.len(),
            invalid = self.checks.values().filter(|c| !c.is_valid()).count(),
            "evaluated chain"
        );
    }

    /// Validate every check using the configured error layout.
    pub fn is_valid(&mut self) -> bool {
        self.is_valid_with(self.config.error_layout)
    }

    /// Validate every check; `layout` decides the shape of [`errors`](Self::errors).
    ///
    /// Checks are evaluated once; later calls reuse the result until the
    /// chain is modified.
    pub fn is_valid_with(&mut self, layout: ErrorLayout) -> bool {
        self.layout = layout;
        self.evaluate();
        self.checks.values().all(Check::is_valid)
    }

    /// Validate every check and fail with the first invalid one.
    pub fn validate_all(&mut self) -> InputResult<()> {
        self.evaluate();
        if let Some(check) = self.checks.values().find(|check| !check.is_valid()) {
            tracing::debug!(check = check.name(), "strict validation failed");
            return Err(InputError::ValidationFailure {
                name: check.name().to_owned(),
                messages: check.errors().to_vec(),
            });
        }
        Ok(())
    }

    /// Error messages of the last validation.
    #[must_use]
    pub fn errors(&self) -> Errors {
        let failing = self.checks.values().filter(|c| !c.errors().is_empty());
        match self.layout {
            ErrorLayout::Flat => Errors::Flat(
                failing
                    .flat_map(|c| c.errors().iter().cloned())
                    .collect(),
            ),
            ErrorLayout::ByName => Errors::ByName(
                failing
                    .map(|c| (c.name().to_owned(), c.errors().to_vec()))
                    .collect(),
            ),
        }
    }

    // ------------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------------

    /// Current value of a check.
    pub fn value(&self, name: &str) -> InputResult<&Value> {
        self.checks
            .get(name)
            .map(Check::value)
            .ok_or_else(|| InputError::UnknownValue {
                name: name.to_owned(),
            })
    }

    /// Current values of all checks, in definition order.
    #[must_use]
    pub fn values(&self) -> IndexMap<String, Value> {
        self.checks
            .iter()
            .map(|(name, check)| (name.clone(), check.value().clone()))
            .collect()
    }

    /// Look up a check by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Check> {
        self.checks.get(name)
    }

    /// Evaluation state of a check.
    #[must_use]
    pub fn state(&self, name: &str) -> Option<CheckState> {
        self.checks.get(name).map(Check::state)
    }

    /// Check names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("checks", &self.checks)
            .field("all_passes", &self.all_passes)
            .field("cursor", &self.cursor)
            .field("open_branches", &self.saved.len())
            .field("evaluated", &self.evaluated)
            .finish_non_exhaustive()
    }
}

impl Index<&str> for Chain {
    type Output = Value;

    /// Current value of a check. Panics if the name was never checked.
    fn index(&self, name: &str) -> &Self::Output {
        self.checks[name].value()
    }
}
