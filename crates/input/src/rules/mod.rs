//! Built-in rule catalog.
//!
//! The built-in namespaces are always searched first by a [`Factory`](crate::Factory)
//! created with `Factory::new`.

pub mod filters;
pub mod validators;

use crate::namespace::{FilterNamespace, ValidatorNamespace};

/// Prefix of the built-in namespaces.
pub const BUILTIN_PREFIX: &str = "nebula";

/// Namespace with all built-in filters.
#[must_use]
pub fn builtin_filters() -> FilterNamespace {
    FilterNamespace::new(BUILTIN_PREFIX)
        .with("trim", filters::Trim::from_params)
        .with("lowerCase", filters::LowerCase::from_params)
        .with("upperCase", filters::UpperCase::from_params)
        .with("toInt", filters::ToInt::from_params)
        .with("phone", filters::Phone::from_params)
}

/// Namespace with all built-in validators.
#[must_use]
pub fn builtin_validators() -> ValidatorNamespace {
    ValidatorNamespace::new(BUILTIN_PREFIX)
        .with("isInt", validators::IsInt::from_params)
        .with("isArray", validators::IsArray::from_params)
        .with("notEmpty", validators::NotEmpty::from_params)
        .with("isZipCode", validators::IsZipCode::from_params)
        .with("equals", validators::Equals::from_params)
        .with("lessThan", validators::LessThan::from_params)
        .with("greaterThan", validators::GreaterThan::from_params)
        .with(
            "stringLengthGreaterThan",
            validators::StringLengthGreaterThan::from_params,
        )
        .with(
            "stringLengthLessThan",
            validators::StringLengthLessThan::from_params,
        )
        .with(
            "stringLengthBetween",
            validators::StringLengthBetween::from_params,
        )
}
