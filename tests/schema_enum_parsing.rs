//! Table-driven schema enum parsing (spec §6.2) and invalid-enum rejection
//! (spec §4.6 reason codes), in the teacher's `rstest` case-table style.

use rstest::rstest;

use blueprint_core::loader::{from_yaml_str, DecodeOptions};
use blueprint_core::schema::FilterOperator;

#[rstest]
#[case("=", FilterOperator::Eq)]
#[case("!=", FilterOperator::NotEq)]
#[case("in", FilterOperator::In)]
#[case("not in", FilterOperator::NotIn)]
#[case("has key", FilterOperator::HasKey)]
#[case("not has key", FilterOperator::NotHasKey)]
#[case("contains", FilterOperator::Contains)]
#[case("not contains", FilterOperator::NotContains)]
#[case("starts with", FilterOperator::StartsWith)]
#[case("not starts with", FilterOperator::NotStartsWith)]
#[case("ends with", FilterOperator::EndsWith)]
#[case("not ends with", FilterOperator::NotEndsWith)]
fn filter_operator_parses_every_enumerated_spelling(#[case] text: &str, #[case] expected: FilterOperator) {
    assert_eq!(FilterOperator::from_str(text), Some(expected));
}

#[rstest]
#[case("==")]
#[case("like")]
#[case("")]
#[case("HAS KEY")]
fn filter_operator_rejects_unknown_spellings(#[case] text: &str) {
    assert_eq!(FilterOperator::from_str(text), None);
}

fn data_source_with_filter_operator(op: &str) -> String {
    format!(
        r#"
version: "1"
datasources:
  coreInfra:
    type: aws/vpc
    metadata: {{}}
    filter:
      field: tag
      operator: "{op}"
      search: prod
    exports: "*"
"#
    )
}

#[rstest]
#[case("=")]
#[case("not in")]
#[case("has key")]
fn valid_filter_operator_decodes_cleanly(#[case] op: &str) {
    let src = data_source_with_filter_operator(op);
    from_yaml_str(&src, &DecodeOptions::default()).unwrap_or_else(|e| panic!("unexpected decode failure: {e}"));
}

#[rstest]
#[case("eq")]
#[case("matches")]
#[case("")]
fn invalid_filter_operator_reports_reason_code(#[case] op: &str) {
    let src = data_source_with_filter_operator(op);
    let err = from_yaml_str(&src, &DecodeOptions::default()).expect_err("expected a schema error");
    match err {
        blueprint_core::BlueprintError::Schema(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].reason.as_str(), "invalid_data_source_filter_operator");
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

fn value_with_type(type_name: &str) -> String {
    format!("version: \"1\"\nvalues:\n  region:\n    type: {type_name}\n    value: us-east-1\n")
}

#[rstest]
#[case("string")]
#[case("integer")]
#[case("float")]
#[case("boolean")]
#[case("array")]
#[case("object")]
fn every_enumerated_value_type_decodes(#[case] type_name: &str) {
    let src = value_with_type(type_name);
    from_yaml_str(&src, &DecodeOptions::default()).unwrap_or_else(|e| panic!("unexpected decode failure: {e}"));
}

#[rstest]
#[case("strings")]
#[case("num")]
#[case("")]
fn unknown_value_type_reports_reason_code(#[case] type_name: &str) {
    let src = value_with_type(type_name);
    let err = from_yaml_str(&src, &DecodeOptions::default()).expect_err("expected a schema error");
    match err {
        blueprint_core::BlueprintError::Schema(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].reason.as_str(), "invalid_value_type");
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[rstest]
#[case("custom-provider-type")]
#[case("string")]
fn variable_type_accepts_provider_defined_extensions(#[case] type_name: &str) {
    let src = format!("version: \"1\"\nvariables:\n  env:\n    type: {type_name}\n");
    let result = from_yaml_str(&src, &DecodeOptions::default()).unwrap_or_else(|e| panic!("unexpected decode failure: {e}"));
    let env = result.blueprint.variables.get("env").unwrap();
    assert_eq!(env.type_name, type_name);
}
