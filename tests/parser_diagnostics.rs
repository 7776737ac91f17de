//! Compile-time diagnostics: syntax errors from the tokenizer/parser and
//! semantic errors from the static rules layered on top of it.

use tendril::{compile, CompileError, SemanticError};

fn semantic_error(source: &str) -> SemanticError {
    match compile(source).unwrap_err() {
        CompileError::Semantic(e) => e,
        CompileError::Syntax(e) => panic!("expected a semantic error, got a syntax error: {e}"),
    }
}

#[test]
fn unterminated_string_literal_is_a_syntax_error() {
    let err = compile(r#"{ a: "unterminated }"#).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
}

#[test]
fn unterminated_object_is_a_syntax_error() {
    let err = compile("{ a: 1").unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
}

#[test]
fn invalid_escape_sequence_is_a_syntax_error() {
    let err = compile(r#"{ a: "bad \q escape" }"#).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
}

#[test]
fn rejected_regex_flag_is_a_syntax_error() {
    let err = compile(r#"/abc/g"#).unwrap_err();
    assert!(matches!(err, CompileError::Syntax(_)));
}

#[test]
fn sigil_collision_rejects_a_name_used_as_both_scalar_and_group() {
    let err = semantic_error("{ a:$x b:@x }");
    assert!(matches!(err, SemanticError::SigilCollision { name, .. } if name == "x"));
}

#[test]
fn duplicate_label_is_rejected() {
    let err = semantic_error("[ §a[1] §a[2] ]");
    assert!(matches!(err, SemanticError::DuplicateLabel { label, .. } if label == "a"));
}

#[test]
fn flow_target_referencing_an_undeclared_label_is_rejected() {
    let err = semantic_error("{ $k: 1 -> %bucket<^nope> }");
    assert!(matches!(err, SemanticError::LabelNotAncestor { label, .. } if label == "nope"));
}

#[test]
fn remainder_clause_must_be_the_last_clause_in_an_object_body() {
    let err = semantic_error("{ % a:1 }");
    assert!(matches!(err, SemanticError::MisplacedRemainder { .. }));
}

#[test]
fn mixing_any_of_and_else_without_parens_is_rejected() {
    let err = semantic_error("1 | 2 else 3");
    assert!(matches!(err, SemanticError::MixedAlternation { .. }));
}

#[test]
fn a_slice_pattern_is_rejected_for_anchored_matching() {
    use serde_json::json;
    use tendril::MatchOptions;

    let pattern = tendril::Pattern::compile("@{ a:1 }").unwrap();
    assert!(pattern.is_slice_pattern());
    let err = pattern
        .match_value(&json!({"a": 1}), &MatchOptions::default())
        .unwrap_err();
    assert!(matches!(err, SemanticError::SlicePatternAnchored { .. }));
}
