//! # nebula-input
//!
//! Filtering and validation of named input values.
//!
//! Rules come in two kinds: [`Filter`]s transform a value, [`Validator`]s
//! accept or reject it. Rules are referenced by case-insensitive name
//! (`"trim"`, `"stringLengthBetween"`) and resolved through a [`Factory`]
//! that searches its namespaces in registration order.
//!
//! Two surfaces are provided:
//!
//! - [`Chain`]: a fluent builder that attaches filters, validators,
//!   conditional branches and element walks to named values, then validates
//!   them all at once.
//! - [`filter_value`] / [`validate_value`]: one-off application through a
//!   process-wide [`RuleCache`] that reuses built rule instances.
//!
//! ```rust
//! use nebula_input::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> InputResult<()> {
//! let mut input = Chain::new();
//! input
//!     .check(json!(" nebula "), "name")
//!     .filter("trim")?
//!     .validate_with("stringLengthBetween", Some("bad length"), &[json!(2), json!(10)])?;
//! assert!(input.is_valid());
//! assert_eq!(input["name"], json!("nebula"));
//!
//! assert_eq!(filter_value("upperCase", json!("abc"), &[])?, json!("ABC"));
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod chain;
pub mod check;
pub mod config;
pub mod error;
pub mod factory;
pub mod namespace;
pub mod rule;
pub mod rules;
pub mod source;
pub mod step;
pub mod value;

pub use cache::{RuleCache, filter_value, validate_value};
pub use chain::{Chain, Errors};
pub use check::{Check, CheckState};
pub use config::{ChainConfig, ErrorLayout};
pub use error::{InputError, InputResult};
pub use factory::Factory;
pub use namespace::{FilterNamespace, RuleNamespace, ValidatorNamespace};
pub use rule::{Filter, RuleKind, RuleRef, Validator};
pub use source::{InputSource, RequestValues, SourceKind};

pub mod prelude {
    pub use crate::cache::{RuleCache, filter_value, validate_value};
    pub use crate::chain::{Chain, Errors};
    pub use crate::check::CheckState;
    pub use crate::config::{ChainConfig, ErrorLayout};
    pub use crate::error::{InputError, InputResult};
    pub use crate::factory::Factory;
    pub use crate::namespace::{FilterNamespace, ValidatorNamespace};
    pub use crate::rule::{Filter, RuleKind, Validator};
    pub use crate::source::{InputSource, RequestValues, SourceKind};
}
