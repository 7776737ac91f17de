//! Diagnostic construction, split out so the productions read as grammar
//! rather than string formatting.

use super::Parser;
use crate::error::SyntaxError;
use crate::span::Span;

pub(super) fn unexpected(parser: &Parser, expected: Vec<String>) -> SyntaxError {
    let span = parser.cursor.span();
    let position = parser.source.position_at(span.start);
    let found = parser.cursor.current().to_string();
    let window_start = span.start.saturating_sub(20);
    let window_end = (span.end + 20).min(parser.source.text.len());
    SyntaxError {
        span,
        position,
        message: format!("unexpected {found}"),
        expected,
        rule_stack: parser.rule_stack.clone(),
        token_window: parser.source.text[window_start..window_end].to_string(),
    }
}
