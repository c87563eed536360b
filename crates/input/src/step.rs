//! Pipeline steps and the routine that evaluates them.

use std::sync::Arc;

use serde_json::Value;

use crate::rule::{Filter, Validator};
use crate::value::value_type_name;

/// One step of a check pipeline.
#[derive(Debug, Clone)]
pub enum Step {
    /// Replace the value with the filtered value.
    Filter(Arc<dyn Filter>),
    /// Reject the value if the rule fails.
    Validate {
        rule: Arc<dyn Validator>,
        message: Option<String>,
    },
    /// Run the branch only when the rule accepts the current value.
    Condition {
        rule: Arc<dyn Validator>,
        branch: Vec<Step>,
    },
    /// Run the branch on every element of the current value.
    Walk {
        continue_on_invalid: bool,
        branch: Vec<Step>,
    },
}

impl Step {
    /// The nested steps of a branch step.
    pub(crate) fn branch_mut(&mut self) -> Option<&mut Vec<Step>> {
        match self {
            Self::Condition { branch, .. } | Self::Walk { branch, .. } => Some(branch),
            Self::Filter(_) | Self::Validate { .. } => None,
        }
    }
}

/// Follow `path` (indices of branch steps) down from `steps`.
pub(crate) fn descend<'a>(
    mut steps: &'a mut Vec<Step>,
    path: &[usize],
) -> Option<&'a mut Vec<Step>> {
    for &index in path {
        steps = steps.get_mut(index)?.branch_mut()?;
    }
    Some(steps)
}

/// Run `steps` against `value`, appending failure messages to `errors`.
///
/// Returns whether every reached validator accepted the value. Filters always
/// run; a failed validator does not stop later steps.
pub(crate) fn run_steps(steps: &[Step], value: &mut Value, errors: &mut Vec<String>) -> bool {
    let mut valid = true;
    for step in steps {
        match step {
            Step::Filter(rule) => {
                *value = rule.apply(std::mem::take(value));
            }
            Step::Validate { rule, message } => {
                if !rule.is_valid(value) {
                    valid = false;
                    if let Some(message) = message.clone().or_else(|| rule.error_message()) {
                        errors.push(message);
                    }
                }
            }
            Step::Condition { rule, branch } => {
                if rule.is_valid(value) {
                    valid &= run_steps(branch, value, errors);
                }
            }
            Step::Walk {
                continue_on_invalid,
                branch,
            } => {
                valid &= walk(branch, *continue_on_invalid, value, errors);
            }
        }
    }
    valid
}

fn walk(
    branch: &[Step],
    continue_on_invalid: bool,
    value: &mut Value,
    errors: &mut Vec<String>,
) -> bool {
    let elements: Vec<&mut Value> = match value {
        Value::Array(items) => items.iter_mut().collect(),
        Value::Object(map) => map.values_mut().collect(),
        other => {
            tracing::warn!(
                value_type = value_type_name(other),
                "walk over a value that is not iterable"
            );
            return false;
        }
    };

    let mut valid = true;
    for element in elements {
        if !run_steps(branch, element, errors) {
            valid = false;
            if !continue_on_invalid {
                break;
            }
        }
    }
    valid
}
