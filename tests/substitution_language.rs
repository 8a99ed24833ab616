//! Direct tests of the substitution lexer/parser/splitter (spec §4.3-§4.5, §8).

use blueprint_core::base::Position;
use blueprint_core::subst::{self, SubstitutionKind};

fn parse_body(body: &str) -> blueprint_core::subst::Substitution {
    let (tokens, lex_errors) = blueprint_core::subst::lexer::Lexer::new(body, Position::start()).tokenize();
    assert!(lex_errors.is_empty(), "unexpected lex errors: {lex_errors:?}");
    blueprint_core::subst::parser::Parser::new(tokens)
        .parse()
        .unwrap_or_else(|errs| panic!("unexpected parse errors: {errs:?}"))
}

#[test]
fn nested_function_call() {
    let subst = parse_body(r#"substr(trim("abc"), 0, 3)"#);
    let call = match subst.kind {
        SubstitutionKind::FunctionCall(c) => c,
        other => panic!("expected a function call, got {other:?}"),
    };
    assert_eq!(call.name, "substr");
    assert_eq!(call.args.len(), 3);
    assert!(call.args[0].name.is_none());
    match &call.args[0].value.kind {
        SubstitutionKind::FunctionCall(inner) => {
            assert_eq!(inner.name, "trim");
            assert_eq!(inner.args.len(), 1);
            match &inner.args[0].value.kind {
                SubstitutionKind::Literal(blueprint_core::subst::ast::Literal::Str(s)) => {
                    assert_eq!(s, "abc");
                }
                other => panic!("expected a string literal, got {other:?}"),
            }
        }
        other => panic!("expected a nested function call, got {other:?}"),
    }
    match &call.args[1].value.kind {
        SubstitutionKind::Literal(blueprint_core::subst::ast::Literal::Int(0)) => {}
        other => panic!("expected integer literal 0, got {other:?}"),
    }
    match &call.args[2].value.kind {
        SubstitutionKind::Literal(blueprint_core::subst::ast::Literal::Int(3)) => {}
        other => panic!("expected integer literal 3, got {other:?}"),
    }
}

#[test]
fn named_function_argument() {
    let subst = parse_body("pad(value = variables.env, width = 10)");
    let call = match subst.kind {
        SubstitutionKind::FunctionCall(c) => c,
        other => panic!("expected a function call, got {other:?}"),
    };
    assert_eq!(call.args[0].name.as_deref(), Some("value"));
    assert_eq!(call.args[1].name.as_deref(), Some("width"));
}

#[test]
fn empty_index_accessor_defaults_to_zero() {
    let subst = parse_body("resources.bucket[].state.arn");
    match subst.kind {
        SubstitutionKind::Resource(r) => assert_eq!(r.each_index, Some(0)),
        other => panic!("expected a resource reference, got {other:?}"),
    }
}

#[test]
fn hex_literal_rejected_at_host_position() {
    let host_start = Position::new(100, 50);
    let (tokens, errors) = blueprint_core::subst::lexer::Lexer::new("format(0x23)", host_start).tokenize();
    assert_eq!(errors.len(), 1);
    // 8 runes precede the 'x' on this line starting at column 50: f,o,r,m,a,t,(,0
    assert_eq!(errors[0].position, Position::new(100, 62));
    assert!(tokens.iter().any(|t| matches!(t.kind, blueprint_core::subst::token::TokenKind::Int(0))));
}

#[test]
fn embedded_quoted_expression_is_one_segment() {
    let (segs, _) = subst::split(
        r#"${ "contains ${embedded}" }"#,
        subst::HostOffset::new(Position::start()),
    )
    .unwrap();
    assert_eq!(segs.len(), 1);
    assert!(matches!(&segs[0], blueprint_core::value::mapping::StringSegment::Expression { .. }));
}

#[test]
fn elem_index_reference() {
    let subst = parse_body("i");
    assert!(matches!(subst.kind, SubstitutionKind::ElemIndex));
}

#[test]
fn elem_reference_with_path() {
    let subst = parse_body("elem.name");
    match subst.kind {
        SubstitutionKind::Elem(e) => {
            assert_eq!(e.path.len(), 1);
        }
        other => panic!("expected an elem reference, got {other:?}"),
    }
}
