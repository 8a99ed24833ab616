//! End-to-end YAML decode scenarios (spec §8).

use blueprint_core::loader::{from_yaml_str, DecodeOptions};
use blueprint_core::schema::ast::VariableType;
use blueprint_core::value::mapping::StringSegment;

fn decode(src: &str) -> blueprint_core::schema::ast::Blueprint {
    from_yaml_str(src, &DecodeOptions::default())
        .unwrap_or_else(|e| panic!("expected a successful decode, got {e}"))
        .blueprint
}

#[test]
fn variable_type_yaml() {
    let src = "version: 1\nvariables:\n  env:\n    type: string\n    description: The env\n";
    let bp = decode(src);
    let env = bp.variables.get("env").expect("variable 'env' present");
    assert_eq!(env.var_type, VariableType::String);
    assert_eq!(env.type_name, "string");
    let description = env.description.as_ref().expect("description present");
    assert_eq!(description.segments.len(), 1);
    match &description.segments[0] {
        StringSegment::Literal { text, .. } => assert_eq!(text, "The env"),
        other => panic!("expected a single literal segment, got {other:?}"),
    }
    assert!(env.range.start.line >= 3);
}

#[test]
fn resource_each_template_index() {
    let src = r#"
version: 1
resources:
  contentBuckets:
    type: aws/s3-bucket
    each: ${variables.buckets}
    spec:
      arn: ${resources.contentBuckets[2].state.bucketArn}
"#;
    let bp = decode(src);
    let resource = bp.resources.get("contentBuckets").unwrap();
    let spec_fields = resource.spec.as_fields().unwrap();
    let arn = spec_fields.get("arn").unwrap();
    let interp = match arn {
        blueprint_core::value::MappingNode::Interpolated(i) => i,
        other => panic!("expected an interpolated string, got {other:?}"),
    };
    assert_eq!(interp.segments.len(), 1);
    match &interp.segments[0] {
        StringSegment::Expression { subst, .. } => match &subst.kind {
            blueprint_core::subst::SubstitutionKind::Resource(r) => {
                assert_eq!(r.name, "contentBuckets");
                assert_eq!(r.each_index, Some(2));
            }
            other => panic!("expected a resource reference, got {other:?}"),
        },
        other => panic!("expected an expression segment, got {other:?}"),
    }
}

#[test]
fn invalid_condition_mixes_and_and_not() {
    let src = r#"
version: 1
resources:
  bucket:
    type: aws/s3-bucket
    condition:
      and:
        - "${variables.enabled}"
      not:
        - "${variables.disabled}"
    spec: {}
"#;
    let err = from_yaml_str(src, &DecodeOptions::default()).expect_err("expected a schema error");
    match err {
        blueprint_core::BlueprintError::Schema(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].reason.as_str(), "invalid_resource_condition");
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn exports_all_sentinel() {
    let src = r#"
version: 1
datasources:
  coreInfra:
    type: aws/vpc
    metadata: {}
    exports: "*"
"#;
    let bp = decode(src);
    let ds = bp.datasources.get("coreInfra").unwrap();
    assert!(ds.exports.export_all);
    assert!(ds.exports.fields.is_empty());
}

#[test]
fn key_order_is_preserved() {
    let src = "version: 1\nvariables:\n  zebra:\n    type: string\n  apple:\n    type: string\n  mango:\n    type: string\n";
    let bp = decode(src);
    let names: Vec<&str> = bp.variables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["zebra", "apple", "mango"]);
}

#[test]
fn block_literal_description_is_approximate_column() {
    let src = "version: '1'\nresources:\n  bucket:\n    type: x\n    description: |\n      multi\n      line\n    spec: {}\n";
    let bp = decode(src);
    let description = bp.resources.get("bucket").unwrap().description.as_ref().unwrap();
    assert_eq!(description.range.accuracy, blueprint_core::ColumnAccuracy::Approximate);
}

#[test]
fn invalid_substitution_inside_block_literal_is_approximate() {
    let src = "version: '1'\nresources:\n  bucket:\n    type: x\n    description: |\n      bad ${0x1}\n    spec: {}\n";
    let err = from_yaml_str(src, &DecodeOptions::default()).expect_err("unexpected character inside ${ } must fail");
    match err {
        blueprint_core::BlueprintError::Schema(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].reason.as_str(), "invalid_reference_substitution");
            assert!(!errors[0].children.is_empty());
            for child in &errors[0].children {
                assert_eq!(child.accuracy(), blueprint_core::ColumnAccuracy::Approximate);
            }
        }
        other => panic!("expected a schema error, got {other:?}"),
    }
}

#[test]
fn tree_view_children_are_position_sorted() {
    let src = r#"
version: 1
resources:
  second:
    type: x
    spec: {}
  first:
    type: x
    spec: {}
"#;
    let result = from_yaml_str(
        src,
        &DecodeOptions { cancellation: None, tree_view: true },
    )
    .unwrap();
    let tree = result.tree.expect("tree view requested");
    let resources = tree.children.iter().find(|c| c.label == "resources").unwrap();
    let labels: Vec<&str> = resources.children.iter().map(|c| c.label.as_str()).collect();
    assert_eq!(labels, vec!["second", "first"]);
    for pair in resources.children.windows(2) {
        assert!(pair[0].range.start <= pair[1].range.start);
    }
}
