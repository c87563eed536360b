//! A named input value and its pipeline.

use serde::Serialize;
use serde_json::Value;

use crate::step::{Step, run_steps};

/// Evaluation state of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    /// Not evaluated since the last change to the chain.
    #[default]
    Pending,
    Valid,
    Invalid,
}

/// One named value with its steps, default value and errors.
#[derive(Debug, Clone)]
pub struct Check {
    name: String,
    original: Value,
    value: Value,
    pub(crate) pipeline: Vec<Step>,
    pub(crate) default: Option<Value>,
    /// Definition number within the owning chain.
    pub(crate) defined_at: u64,
    errors: Vec<String>,
    state: CheckState,
}

impl Check {
    pub(crate) fn new(name: String, value: Value) -> Self {
        Self {
            name,
            original: value.clone(),
            value,
            pipeline: Vec::new(),
            default: None,
            defined_at: 0,
            errors: Vec::new(),
            state: CheckState::Pending,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current value: the input before evaluation, the filtered (or default)
    /// value after it.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn state(&self) -> CheckState {
        self.state
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.state == CheckState::Valid
    }

    /// Evaluate the own pipeline followed by `tails`, starting from the
    /// original value. A default value rescues a failed check once.
    pub(crate) fn evaluate(&mut self, tails: &[&[Step]]) {
        let mut value = self.original.clone();
        let mut errors = Vec::new();

        let mut valid = run_steps(&self.pipeline, &mut value, &mut errors);
        for tail in tails {
            valid &= run_steps(tail, &mut value, &mut errors);
        }

        match (&self.default, valid) {
            (_, true) => self.state = CheckState::Valid,
            (Some(default), false) => {
                value = default.clone();
                errors.clear();
                self.state = CheckState::Valid;
            }
            (None, false) => self.state = CheckState::Invalid,
        }

        tracing::trace!(
            check = %self.name,
            state = ?self.state,
            errors = errors.len(),
            "evaluated check"
        );
        self.value = value;
        self.errors = errors;
    }

    /// Drop evaluation results so the next run starts fresh.
    pub(crate) fn reset(&mut self) {
        self.value = self.original.clone();
        self.errors.clear();
        self.state = CheckState::Pending;
    }
}
