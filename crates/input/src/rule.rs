//! Rule capability traits and rule references.
//!
//! A rule is either a [`Filter`] (transforms a value) or a [`Validator`]
//! (accepts or rejects a value). Rules are usually referenced by a short
//! case-insensitive name such as `"trim"` or `"stringLengthBetween"` and
//! resolved by the [`Factory`](crate::Factory); an already-built instance can
//! be passed anywhere a name is accepted.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A rule that transforms a value.
pub trait Filter: Send + Sync + fmt::Debug {
    /// Returns the filtered value.
    fn apply(&self, value: Value) -> Value;
}

/// A rule that accepts or rejects a value.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Returns `true` if the value passes.
    fn is_valid(&self, value: &Value) -> bool;

    /// Message recorded when the rule fails and the caller gave none.
    fn error_message(&self) -> Option<String> {
        None
    }
}

/// The two kinds of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Filter,
    Validator,
}

impl RuleKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Filter => "filter",
            Self::Validator => "validator",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Either a rule name to resolve or a ready instance.
///
/// ```rust
/// use std::sync::Arc;
///
/// use nebula_input::rules::filters::Trim;
/// use nebula_input::{Chain, Filter};
/// use serde_json::json;
///
/// # fn main() -> nebula_input::InputResult<()> {
/// let mut chain = Chain::new();
/// chain.check(json!(" a "), "a").filter("trim")?;
/// chain.filter(Arc::new(Trim) as Arc<dyn Filter>)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub enum RuleRef<'a, T: ?Sized> {
    Name(Cow<'a, str>),
    Instance(Arc<T>),
}

impl<'a, T: ?Sized> From<&'a str> for RuleRef<'a, T> {
    fn from(name: &'a str) -> Self {
        Self::Name(Cow::Borrowed(name))
    }
}

impl<T: ?Sized> From<String> for RuleRef<'_, T> {
    fn from(name: String) -> Self {
        Self::Name(Cow::Owned(name))
    }
}

impl<T: ?Sized> From<Arc<T>> for RuleRef<'_, T> {
    fn from(rule: Arc<T>) -> Self {
        Self::Instance(rule)
    }
}

/// Lookup form of a rule name: names are matched case-insensitively.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Display form of a rule name, first letter capitalized (`isInt` -> `IsInt`).
#[must_use]
pub fn display_name(name: &str) -> String {
    let name = name.trim();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
