use crate::span::{Position, Span};
use thiserror::Error;

/// A parse-time diagnostic: unrecognized or malformed pattern source.
///
/// Carries the same `{pointer, message}` shape the teacher's `ParseError`
/// does, extended per spec §4.2 with the window of surrounding tokens, the
/// productions the parser attempted, and the rule stack at the point of
/// failure.
#[derive(Debug, Clone, Error)]
#[error("syntax error at {position}: {message}")]
pub struct SyntaxError {
    pub span: Span,
    pub position: Position,
    pub message: String,
    pub expected: Vec<String>,
    pub rule_stack: Vec<&'static str>,
    pub token_window: String,
}

/// A parse-time diagnostic that is well-formed punctuation but violates a
/// static rule of the language (spec §4.2, §7 SemanticError).
#[derive(Debug, Clone, Error)]
pub enum SemanticError {
    #[error("'{name}' is used as both a scalar ($) and a group (%/@) binding")]
    SigilCollision { name: String, span: Span },

    #[error("label '^{label}' is not declared on an ancestor of this flow directive")]
    LabelNotAncestor { label: String, span: Span },

    #[error("label '§{label}' is declared more than once in this pattern")]
    DuplicateLabel { label: String, span: Span },

    #[error("a remainder clause (`%`) may only appear once, as the last clause of an object body")]
    MisplacedRemainder { span: Span },

    #[error("top-level slice patterns (`@{{...}}` / `@[...]`) are only valid for scan, not anchored match")]
    SlicePatternAnchored { span: Span },

    #[error("mixing `|` and `else` at the same precedence level requires parentheses")]
    MixedAlternation { span: Span },
}

impl SemanticError {
    pub fn span(&self) -> Span {
        match self {
            SemanticError::SigilCollision { span, .. }
            | SemanticError::LabelNotAncestor { span, .. }
            | SemanticError::DuplicateLabel { span, .. }
            | SemanticError::MisplacedRemainder { span }
            | SemanticError::SlicePatternAnchored { span }
            | SemanticError::MixedAlternation { span } => *span,
        }
    }
}

/// The fatal result of [`crate::compile`]: either a lexical/syntactic
/// failure or a semantic rule violation. Both are terminal — no partial
/// AST is produced (spec §4.2 Diagnostics, §7 propagation policy).
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Semantic(#[from] SemanticError),
}

/// A branch-local, silent matching failure. Never surfaced to the caller:
/// it causes the current matcher to backtrack and try the next
/// alternative, or the whole branch to yield no solutions. Exists as a
/// distinct type (rather than `Result<_, String>`) to keep the "never
/// raises for data-driven failures" policy (spec §7) visible in signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchFailure;

/// A runtime failure inside the guard expression evaluator: division or
/// modulo by zero, a failed coercion (`number("abc")`), non-finite
/// arithmetic, or a variable that never became bound. Silent and
/// branch-local, same as [`MatchFailure`] (spec §4.3.5, §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuardFailure;

impl From<GuardFailure> for MatchFailure {
    fn from(_: GuardFailure) -> Self {
        MatchFailure
    }
}
