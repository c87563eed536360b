use std::sync::Arc;

use indexmap::IndexMap;
use nebula_input::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

#[test]
fn test_basic_chain() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!(" 42 "), "answer")
        .filter("trim")?
        .validate("isInt")?;

    assert!(input.is_valid());
    assert_eq!(
        input.values(),
        IndexMap::from([("answer".to_owned(), json!("42"))])
    );
    Ok(())
}

#[test]
fn test_default_value() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!(""), "message")
        .validate("notEmpty")?
        .default_value(json!("default"))?;

    assert!(input.is_valid());
    assert_eq!(input["message"], json!("default"));
    assert!(input.errors().is_empty());

    let err = Chain::new().default_value(json!("default")).unwrap_err();
    assert!(matches!(err, InputError::InvalidChainState { .. }));
    Ok(())
}

#[test]
fn test_walk() -> InputResult<()> {
    let current = json!(["aBcDe", "Jakub", "ŽLUŤOUČKÝ kůň PĚL ďábelské ÓDY"]);
    let expected = json!(["abcde", "jakub", "žluťoučký kůň pěl ďábelské ódy"]);

    let mut whole = Chain::new();
    whole
        .check(current.clone(), "data")
        .filter("lowerCase")?
        .validate("isArray")?;

    let mut walked = Chain::new();
    walked
        .check(current, "data")
        .walk(true)?
        .filter("lowercase")?
        .validate_with("stringLengthGreaterThan", Some(""), &[json!(4)])?;

    assert!(whole.is_valid());
    assert!(walked.is_valid());
    assert_eq!(whole["data"], expected);
    assert_eq!(walked["data"], expected);
    Ok(())
}

#[test]
fn test_request_sources() -> InputResult<()> {
    let source = RequestValues::new()
        .with_post("data", json!("string"))
        .with_query("page", json!("1"));

    let mut input = Chain::new().with_source(source);
    input
        .post("data")
        .validate_with("stringLengthGreaterThan", Some("short"), &[json!(5)])?
        .validate_with("stringLengthLessThan", Some("long"), &[json!(7)])?
        .query("page")
        .validate("isInt")?
        .request("page")
        .validate_with("lessThan", Some("big"), &[json!(100)])?;

    assert!(input.is_valid());
    input.validate_all()?;
    Ok(())
}

#[test]
fn test_missing_source_value_is_null() -> InputResult<()> {
    let mut input = Chain::new();
    input.post("absent").validate_with_message("notEmpty", "required")?;

    assert!(!input.is_valid());
    assert_eq!(input["absent"], Value::Null);
    assert_eq!(input.errors(), Errors::Flat(vec!["required".to_owned()]));
    Ok(())
}

#[test]
fn test_invalid_errors_layout() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("foo"), "foo")
        .validate_with_message("isInt", "not int")?;
    assert!(!input.is_valid());
    assert_eq!(input.errors(), Errors::Flat(vec!["not int".to_owned()]));

    let mut input = Chain::new();
    input
        .check(json!("bar"), "bar")
        .validate_with_message("isInt", "not int")?;
    assert!(!input.is_valid_with(ErrorLayout::ByName));
    assert_eq!(
        input.errors(),
        Errors::ByName(IndexMap::from([(
            "bar".to_owned(),
            vec!["not int".to_owned()]
        )]))
    );
    Ok(())
}

#[test]
fn test_configured_error_layout() -> InputResult<()> {
    let config = ChainConfig::new().with_error_layout(ErrorLayout::ByName);
    let mut input = Chain::new().with_config(config);
    input
        .check(json!(1), "ok")
        .validate("isInt")?
        .check(json!("x"), "bad")
        .validate_with_message("isInt", "not int")?;

    assert!(!input.is_valid());
    assert_eq!(
        serde_json::to_value(input.errors()).unwrap(),
        json!({"bad": ["not int"]})
    );
    Ok(())
}

#[test]
fn test_all_applies_to_earlier_checks() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("foo"), "foo")
        .check(json!(" 7 "), "seven")
        .all()
        .filter("trim")?
        .validate_with_message("isInt", "not int")?;
    input.check(json!("later"), "later");

    assert!(!input.is_valid_with(ErrorLayout::ByName));
    assert_eq!(input["seven"], json!("7"));
    assert_eq!(input["later"], json!("later"));
    assert_eq!(
        input.errors(),
        Errors::ByName(IndexMap::from([(
            "foo".to_owned(),
            vec!["not int".to_owned()]
        )]))
    );
    assert_eq!(input.state("later"), Some(CheckState::Valid));
    Ok(())
}

#[test]
fn test_unknown_value() {
    let mut input = Chain::new();
    input.check(json!("foo"), "foo");

    let err = input.value("bar").unwrap_err();
    assert_eq!(
        err,
        InputError::UnknownValue {
            name: "bar".to_owned()
        }
    );
    assert_eq!(input.value("foo").unwrap(), &json!("foo"));
}

#[test]
fn test_invalid_walk() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!([42, 0, "nulák"]), "data")
        .walk(false)?
        .validate("isInt")?;

    assert!(!input.is_valid());
    let err = input.validate_all().unwrap_err();
    assert!(err.is_validation_failure());
    assert!(matches!(err, InputError::ValidationFailure { ref name, .. } if name == "data"));
    Ok(())
}

#[test]
fn test_walk_all_uses_config() -> InputResult<()> {
    let config = ChainConfig::new().with_walk_continue_on_invalid(false);
    let mut input = Chain::new().with_config(config);
    input
        .check(json!(["a", " b "]), "list")
        .walk_all()?
        .validate_with_message("isInt", "not int")?
        .filter("trim")?;

    assert!(!input.is_valid());
    assert_eq!(input["list"], json!(["a", " b "]));
    assert_eq!(input.errors().len(), 1);
    Ok(())
}

#[test]
fn test_walk_over_scalar_is_invalid() -> InputResult<()> {
    let mut input = Chain::new();
    input.check(json!(5), "scalar").walk(true)?.validate("isInt")?;
    assert!(!input.is_valid());
    assert!(input.errors().is_empty());
    Ok(())
}

#[rstest]
#[case::fulfilled(json!("42"), 43.0, true)]
#[case::not_int_string(json!("42.23"), 20.0, true)]
#[case::text(json!("example"), 20.0, true)]
#[case::array(json!([]), 20.0, true)]
#[case::bool_true(json!(true), 20.0, true)]
#[case::bool_false(json!(false), 20.0, true)]
#[case::too_big(json!("42"), 30.0, false)]
#[case::bound_one(json!("42"), 1.0, false)]
#[case::number(json!(42), 1.0, false)]
fn test_conditional(
    #[case] value: Value,
    #[case] bound: f64,
    #[case] expected: bool,
) -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(value, "answer")
        .condition("isInt")?
        .validate_with("lessThan", Some("error"), &[json!(bound)])?;

    assert_eq!(input.is_valid(), expected);
    Ok(())
}

#[test]
fn test_deep_conditional() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!(42), "answer")
        .validate_with_message("notEmpty", "error")?
        .condition("isInt")?
        .validate_with("lessThan", Some("error"), &[json!(100)])?;
    assert!(input.is_valid());

    let err = Chain::new().condition("isInt").unwrap_err();
    assert_eq!(err.code(), "INPUT_CHAIN_STATE");
    Ok(())
}

#[test]
fn test_close_and_revalidate() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!(42), "answer")
        .validate_with_message("notEmpty", "error")?
        .condition("isInt")?
        .validate_with("lessThan", Some("error"), &[json!(100)])?
        .close()?
        .validate("isInt")?;
    assert!(input.is_valid());

    // 42 is not a zip code
    input.validate("isZipCode")?;
    assert_eq!(input.state("answer"), Some(CheckState::Pending));
    assert!(!input.is_valid());
    Ok(())
}

#[test]
fn test_revalidation_starts_from_input() -> InputResult<()> {
    let mut input = Chain::new();
    input.check(json!("  x  "), "name").filter("trim")?;
    assert!(input.is_valid());
    assert_eq!(input["name"], json!("x"));

    input.filter("upperCase")?;
    assert!(input.is_valid());
    assert_eq!(input["name"], json!("X"));
    Ok(())
}

#[test]
fn test_close_without_branch() {
    let mut input = Chain::new();
    input.check(json!(1), "a");
    assert!(matches!(
        input.close(),
        Err(InputError::InvalidChainState { .. })
    ));
}

#[rstest]
#[case::filter(Chain::new().filter("foo").map(|_| ()))]
#[case::condition(Chain::new().condition("foo").map(|_| ()))]
#[case::validator(Chain::new().validate("foo").map(|_| ()))]
fn test_unknown_rule_wins_over_missing_check(#[case] result: InputResult<()>) {
    assert!(matches!(result, Err(InputError::UnresolvedRule { .. })));
}

#[test]
fn test_rule_names_are_case_insensitive() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("ABC"), "a")
        .filter("LOWERCASE")?
        .validate_with("Equals", None, &[json!("abc")])?;
    assert!(input.is_valid());
    Ok(())
}

#[test]
fn test_rechecked_name_replaces_value() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("x"), "a")
        .validate("isInt")?
        .check(json!("y"), "b")
        .check(json!("5"), "a");

    assert!(input.is_valid());
    assert_eq!(input.names().collect::<Vec<_>>(), vec!["a", "b"]);
    assert_eq!(input.len(), 2);
    Ok(())
}

#[test]
#[should_panic]
fn test_index_unknown_panics() {
    let input = Chain::new();
    let _ = &input["missing"];
}

/// Rejects everything with its own message.
#[derive(Debug)]
struct Never;

impl Validator for Never {
    fn is_valid(&self, _value: &Value) -> bool {
        false
    }

    fn error_message(&self) -> Option<String> {
        Some("rule default".to_owned())
    }
}

#[test]
fn test_redefined_check_skips_earlier_all() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("x"), "a")
        .all()
        .validate_with_message("isInt", "not int")?;
    input.check(json!("y"), "a");

    assert!(input.is_valid());
    assert!(input.errors().is_empty());
    assert_eq!(input["a"], json!("y"));
    Ok(())
}

#[test]
fn test_rule_default_message() -> InputResult<()> {
    let never: Arc<dyn Validator> = Arc::new(Never);

    let mut input = Chain::new();
    input
        .check(json!(1), "implicit")
        .validate(Arc::clone(&never))?
        .check(json!(2), "explicit")
        .validate_with(Arc::clone(&never), Some("custom"), &[])?;

    assert!(!input.is_valid());
    assert_eq!(
        input.errors(),
        Errors::Flat(vec!["rule default".to_owned(), "custom".to_owned()])
    );
    Ok(())
}

#[test]
fn test_builtin_default_messages() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("abc"), "count")
        .validate("isInt")?
        .validate_with("lessThan", None, &[json!(10)])?;

    assert!(!input.is_valid_with(ErrorLayout::ByName));
    assert_eq!(
        input.errors(),
        Errors::ByName(IndexMap::from([(
            "count".to_owned(),
            vec![
                "value is not an integer".to_owned(),
                "value is not less than 10".to_owned(),
            ]
        )]))
    );
    Ok(())
}

#[test]
fn test_flat_errors_follow_check_then_step_order() -> InputResult<()> {
    let mut input = Chain::new();
    input
        .check(json!("x"), "first")
        .validate_with_message("isInt", "first: not int")?
        .validate_with_message("isArray", "first: not array")?
        .check(json!(5), "valid")
        .validate("isInt")?
        .check(json!(""), "second")
        .validate_with_message("notEmpty", "second: empty")?
        .validate_with_message("isZipCode", "second: not zip")?;

    assert!(!input.is_valid());
    assert_eq!(
        input.errors(),
        Errors::Flat(vec![
            "first: not int".to_owned(),
            "first: not array".to_owned(),
            "second: empty".to_owned(),
            "second: not zip".to_owned(),
        ])
    );
    Ok(())
}
