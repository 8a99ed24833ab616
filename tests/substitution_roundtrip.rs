//! Substitution idempotence (spec §8 invariant 5): `parse(print(s))`
//! normalised equals `s` normalised, exercised against a representative
//! sample of every `SubstitutionKind` variant.

use blueprint_core::base::Position;
use blueprint_core::subst::ast::{
    Argument, ChildRef, DataSourceRef, ElemRef, FunctionCall, Literal, PathItem, ResourceRef,
    Substitution, SubstitutionKind, ValueRef, VariableRef,
};
use blueprint_core::subst::lexer::Lexer;
use blueprint_core::subst::parser::Parser;

fn point() -> blueprint_core::base::Range {
    blueprint_core::base::Range::point(Position::start())
}

fn reparse(printed: &str) -> Substitution {
    let (tokens, errors) = Lexer::new(printed, Position::start()).tokenize();
    assert!(errors.is_empty(), "printed form '{printed}' failed to lex: {errors:?}");
    Parser::new(tokens)
        .parse()
        .unwrap_or_else(|errs| panic!("printed form '{printed}' failed to parse: {errs:?}"))
}

fn assert_roundtrips(s: Substitution) {
    let printed = s.to_string();
    let reparsed = reparse(&printed);
    assert!(
        s.eq_ignoring_range(&reparsed),
        "roundtrip mismatch: printed '{printed}' reparsed as {reparsed:?}, original was {s:?}"
    );
}

#[test]
fn literal_roundtrips() {
    assert_roundtrips(Substitution::new(SubstitutionKind::Literal(Literal::Str("hi \"there\"".into())), point()));
    assert_roundtrips(Substitution::new(SubstitutionKind::Literal(Literal::Int(-12)), point()));
    assert_roundtrips(Substitution::new(SubstitutionKind::Literal(Literal::Float(3.5)), point()));
    assert_roundtrips(Substitution::new(SubstitutionKind::Literal(Literal::Bool(true)), point()));
}

#[test]
fn variable_and_value_refs_roundtrip() {
    assert_roundtrips(Substitution::new(
        SubstitutionKind::Variable(VariableRef { name: "env".into(), path: vec![] }),
        point(),
    ));
    assert_roundtrips(Substitution::new(
        SubstitutionKind::Value(ValueRef {
            name: "config".into(),
            path: vec![PathItem::Field("region".into()), PathItem::Index(0)],
        }),
        point(),
    ));
}

#[test]
fn resource_ref_with_each_index_roundtrips() {
    assert_roundtrips(Substitution::new(
        SubstitutionKind::Resource(ResourceRef {
            name: "contentBuckets".into(),
            each_index: Some(2),
            path: vec![PathItem::Field("state".into()), PathItem::Field("bucketArn".into())],
        }),
        point(),
    ));
}

#[test]
fn data_source_ref_roundtrips() {
    assert_roundtrips(Substitution::new(
        SubstitutionKind::DataSource(DataSourceRef {
            data_source_name: "coreInfra.v1".into(),
            field_name: "topic.v2".into(),
            primitive_arr_index: Some(0),
        }),
        point(),
    ));
}

#[test]
fn child_and_elem_refs_roundtrip() {
    assert_roundtrips(Substitution::new(
        SubstitutionKind::Child(ChildRef { name: "network".into(), path: vec![PathItem::Field("vpcId".into())] }),
        point(),
    ));
    assert_roundtrips(Substitution::new(
        SubstitutionKind::Elem(ElemRef { path: vec![PathItem::Field("name".into())] }),
        point(),
    ));
    assert_roundtrips(Substitution::new(SubstitutionKind::ElemIndex, point()));
}

#[test]
fn function_call_with_named_and_positional_args_roundtrips() {
    assert_roundtrips(Substitution::new(
        SubstitutionKind::FunctionCall(FunctionCall {
            name: "pad".into(),
            args: vec![
                Argument {
                    name: None,
                    value: Substitution::new(SubstitutionKind::Variable(VariableRef { name: "env".into(), path: vec![] }), point()),
                },
                Argument {
                    name: Some("width".into()),
                    value: Substitution::new(SubstitutionKind::Literal(Literal::Int(10)), point()),
                },
            ],
            path: vec![],
        }),
        point(),
    ));
}

#[test]
fn parse_print_parse_matches_original_text_semantics() {
    let original = r#"substr(trim("abc"), 0, 3)"#;
    let (tokens, _) = Lexer::new(original, Position::start()).tokenize();
    let parsed = Parser::new(tokens).parse().unwrap();
    assert_roundtrips(parsed);
}
