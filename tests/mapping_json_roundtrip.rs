//! `MappingNode::to_json_string` round-trip (spec §8 invariant 4:
//! round-trip normalisation). Re-emitted JSON must both parse as valid JSON
//! (checked via `serde_json::Value`) and carry the exact escape table from
//! §6.3.

use indexmap::IndexMap;

use blueprint_core::base::{Position, Range};
use blueprint_core::subst::ast::{Substitution, SubstitutionKind, VariableRef};
use blueprint_core::value::mapping::{InterpolatedString, StringSegment};
use blueprint_core::value::{MappingNode, Scalar};

fn point() -> Range {
    Range::point(Position::start())
}

#[test]
fn scalar_variants_emit_valid_json_literals() {
    let cases = [
        (MappingNode::Scalar(Scalar::Str("hello".into(), point())), "\"hello\""),
        (MappingNode::Scalar(Scalar::Int(42, point())), "42"),
        (MappingNode::Scalar(Scalar::Bool(true, point())), "true"),
    ];
    for (node, expected) in cases {
        let json = node.to_json_string();
        assert_eq!(json, expected);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.is_string() || parsed.is_number() || parsed.is_boolean());
    }
}

#[test]
fn fields_and_items_nest_and_reparse() {
    let mut entries = IndexMap::new();
    entries.insert("name".to_string(), MappingNode::Scalar(Scalar::Str("web".into(), point())));
    entries.insert(
        "ports".to_string(),
        MappingNode::Items {
            items: vec![
                MappingNode::Scalar(Scalar::Int(80, point())),
                MappingNode::Scalar(Scalar::Int(443, point())),
            ],
            range: point(),
        },
    );
    let mut key_ranges = IndexMap::new();
    key_ranges.insert("name".to_string(), point());
    key_ranges.insert("ports".to_string(), point());
    let node = MappingNode::Fields { entries, key_ranges, range: point() };

    let json = node.to_json_string();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed["name"], serde_json::json!("web"));
    assert_eq!(parsed["ports"], serde_json::json!([80, 443]));
}

#[test]
fn interpolated_segments_reprint_through_substitution_display() {
    let interp = InterpolatedString {
        segments: vec![
            StringSegment::Literal { text: "prefix-".into(), range: point() },
            StringSegment::Expression {
                subst: Substitution::new(
                    SubstitutionKind::Variable(VariableRef { name: "env".into(), path: vec![] }),
                    point(),
                ),
                range: point(),
            },
        ],
        range: point(),
    };
    let node = MappingNode::Interpolated(interp);
    let json = node.to_json_string();
    assert_eq!(json, "\"prefix-${variables.env}\"");
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, serde_json::json!("prefix-${variables.env}"));
}

#[test]
fn slash_and_ampersand_are_escaped_beyond_rfc8259_minimal() {
    let node = MappingNode::Scalar(Scalar::Str("a/b&c".into(), point()));
    let json = node.to_json_string();
    assert_eq!(json, r#""a\/b\&c""#);
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, serde_json::json!("a/b&c"));
}
