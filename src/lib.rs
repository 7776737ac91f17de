//! Tendril is a declarative pattern-matching language for JSON-like trees.
//! A compiled [`Pattern`] produces [`Solution`]s — sets of variable
//! bindings — over an input tree, and can be used to locate, validate,
//! extract, transform, or redact substructures.
//!
//! ```
//! use tendril::Pattern;
//! use serde_json::json;
//!
//! let pattern = Pattern::compile(r#"[1 2 $x]"#).unwrap();
//! let input = json!([1, 2, 3]);
//! let outcome = pattern.match_value(&input, &Default::default()).unwrap();
//! assert_eq!(outcome.solutions.len(), 1);
//! assert_eq!(outcome.solutions[0].binding("x"), Some(json!(3)));
//! ```
//!
//! The crate is organized the way the specification splits the core: a
//! tokenizer and [`parser`] that turn pattern source into an [`ast`],
//! and an [`engine`] that backtracks over the AST against a host
//! [`value::Value`], threading [`binding`]s, [`bucket`]s and [`coverage`]
//! and emitting [`solution::Solution`]s. [`guard`] is the small expression
//! language usable inside a binding's `where` clause.
//!
//! This crate covers the core only: the public fluent façade, structural
//! editing of matched trees, and convenience query helpers described in
//! the specification as external collaborators are not implemented here.

pub mod ast;
pub mod binding;
pub mod bucket;
pub mod coverage;
pub mod engine;
pub mod error;
pub mod guard;
pub mod parser;
pub mod path;
pub mod solution;
pub mod span;
mod token;
mod tokenizer;
pub mod value;

pub use engine::{MatchOptions, Outcome, Pattern, ScanHit, ScanOutcome, Signal};
pub use error::{CompileError, SemanticError, SyntaxError};
pub use solution::Solution;
pub use value::Value;

/// Compiles pattern source into a matchable [`Pattern`], installing no
/// parser hooks (spec §6.2 `compile(patternSource) → (AST | ParseError)`).
///
/// Shorthand for [`Pattern::compile`].
pub fn compile(source: &str) -> Result<Pattern, CompileError> {
    Pattern::compile(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn compile_and_match_smoke_test() {
        let pattern = compile("{ name: $n }").unwrap();
        let input = json!({"name": "Ceres"});
        let outcome = pattern.match_value(&input, &MatchOptions::default()).unwrap();
        assert_eq!(outcome.solutions.len(), 1);
        assert_eq!(outcome.solutions[0].binding("n"), Some(json!("Ceres")));
    }

    #[test]
    fn syntax_error_is_fatal_and_reported() {
        let err = compile("{ unterminated").unwrap_err();
        assert!(matches!(err, CompileError::Syntax(_)));
    }
}
