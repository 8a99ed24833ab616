//! End-to-end JWCC decode scenarios (spec §4.8, §8).

use blueprint_core::loader::{from_jwcc_str, DecodeOptions};

fn decode(src: &str) -> blueprint_core::schema::ast::Blueprint {
    from_jwcc_str(src, &DecodeOptions::default())
        .unwrap_or_else(|e| panic!("expected a successful decode, got {e}"))
        .blueprint
}

#[test]
fn strips_comments_and_trailing_commas() {
    let src = r#"{
  "version": "1", // top-level version
  "resources": {
    "bucket": {
      "type": "aws/s3-bucket", /* a bucket */
      "spec": {},
    },
  },
}"#;
    let bp = decode(src);
    assert_eq!(bp.version, "1");
    assert!(bp.resources.contains_key("bucket"));
}

#[test]
fn data_source_bracketed_reference() {
    let src = r#"{
  "version": "1",
  "datasources": {
    "coreInfra": {
      "type": "aws/vpc",
      "metadata": {},
      "exports": "*"
    }
  },
  "resources": {
    "site": {
      "type": "x",
      "spec": {
        "topic": "${datasources[\"coreInfra.v1\"][\"topic.v2\"][0]}"
      }
    }
  }
}"#;
    let bp = decode(src);
    let spec = bp.resources.get("site").unwrap().spec.as_fields().unwrap();
    let topic = spec.get("topic").unwrap();
    let interp = match topic {
        blueprint_core::value::MappingNode::Interpolated(i) => i,
        other => panic!("expected an interpolated string, got {other:?}"),
    };
    match &interp.segments[0] {
        blueprint_core::value::mapping::StringSegment::Expression { subst, .. } => {
            match &subst.kind {
                blueprint_core::subst::SubstitutionKind::DataSource(ds) => {
                    assert_eq!(ds.data_source_name, "coreInfra.v1");
                    assert_eq!(ds.field_name, "topic.v2");
                    assert_eq!(ds.primitive_arr_index, Some(0));
                }
                other => panic!("expected a data source reference, got {other:?}"),
            }
        }
        other => panic!("expected an expression segment, got {other:?}"),
    }
}

#[test]
fn yaml_and_jwcc_decode_structurally_equal() {
    let yaml_src = "version: '1'\nvariables:\n  env:\n    type: string\n";
    let jwcc_src = r#"{"version": "1", "variables": {"env": {"type": "string"}}}"#;
    let yaml_bp = blueprint_core::loader::from_yaml_str(yaml_src, &DecodeOptions::default())
        .unwrap()
        .blueprint;
    let jwcc_bp = decode(jwcc_src);
    assert!(blueprint_core::normalize::blueprints_equal(&yaml_bp, &jwcc_bp));
}

#[test]
fn missing_required_field_is_a_schema_error() {
    let src = r#"{"resources": {}}"#;
    let err = from_jwcc_str(src, &DecodeOptions::default()).expect_err("missing version");
    assert!(matches!(err, blueprint_core::BlueprintError::Schema(_)));
}
