//! Recursive-descent parser: token stream → [`crate::ast::Node`].
//! Productions hold a single mutable cursor over the token vector and
//! restore it on backtrack via cheap `mark`/`reset` bookmarks rather than
//! any combinator-trait machinery, since this grammar is fixed rather than
//! user-assembled (see `DESIGN.md` "parser" for the full rationale).

mod array_body;
mod guard_expr;
mod hooks;
mod item;
mod object_body;
mod report;

pub use hooks::{NullParserHooks, ParserHooks};

use crate::ast::Node;
use crate::error::SyntaxError;
use crate::span::{Source, Span};
use crate::token::{Token, TokenKind};
use crate::tokenizer;

/// Bookmark produced by [`TokenCursor::mark`]; restoring it is an O(1)
/// cursor reset, never a re-scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark(usize);

pub(crate) struct TokenCursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> TokenCursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn peek(&self) -> &TokenKind {
        &self.tokens[self.pos.min(self.tokens.len() - 1)].kind
    }

    pub fn peek_k(&self, k: usize) -> &TokenKind {
        let idx = (self.pos + k).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    pub fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub fn span(&self) -> Span {
        self.current().span
    }

    pub fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub fn bump(&mut self) -> &Token {
        let tok = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    /// The span of the token most recently consumed by `bump`.
    pub fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1).min(self.tokens.len() - 1)].span
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    pub fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == kind {
            self.bump();
            true
        } else {
            false
        }
    }
}

/// The top-level label table: labels declared via `§IDENT` must be unique
/// within a pattern.
#[derive(Default)]
pub(crate) struct Labels {
    declared: Vec<(String, Span)>,
}

impl Labels {
    fn declare(&mut self, name: String, span: Span) -> Result<(), crate::error::SemanticError> {
        if self.declared.iter().any(|(n, _)| n == &name) {
            return Err(crate::error::SemanticError::DuplicateLabel { label: name, span });
        }
        self.declared.push((name, span));
        Ok(())
    }

    pub(crate) fn is_declared(&self, name: &str) -> bool {
        self.declared.iter().any(|(n, _)| n == name)
    }
}

pub(crate) struct Parser<'t, 's> {
    pub(crate) cursor: TokenCursor<'t>,
    pub(crate) source: &'s Source<'s>,
    pub(crate) labels: Labels,
    /// Labels currently in scope (the labeled nodes we're nested inside),
    /// used to validate that a `<^LABEL>` flow target names an ancestor
    /// rather than merely some label declared elsewhere in the pattern.
    pub(crate) label_stack: Vec<String>,
    pub(crate) hooks: &'t mut dyn ParserHooks,
    pub(crate) rule_stack: Vec<&'static str>,
}

/// The result of a successful [`parse`]: the AST plus whether the pattern
/// was written with a leading `@` top-level slice marker, which restricts
/// it to `scan`/`find` use (anchored `match` rejects it — see
/// `SemanticError::SlicePatternAnchored`).
pub struct CompiledPattern {
    pub ast: Node,
    pub is_slice_pattern: bool,
}

pub fn parse(source_text: &str) -> Result<CompiledPattern, crate::error::CompileError> {
    parse_with_hooks(source_text, &mut NullParserHooks)
}

pub fn parse_with_hooks(
    source_text: &str,
    hooks: &mut dyn ParserHooks,
) -> Result<CompiledPattern, crate::error::CompileError> {
    let source = Source::new(source_text);
    let tokens = tokenizer::tokenize(&source).map_err(crate::error::CompileError::Syntax)?;
    let mut parser = Parser {
        cursor: TokenCursor::new(&tokens),
        source: &source,
        labels: Labels::default(),
        label_stack: Vec::new(),
        hooks,
        rule_stack: Vec::new(),
    };
    let result = parser.parse_root();
    match result {
        Ok(compiled) => Ok(compiled),
        Err(ParseFail::Syntax(e)) => Err(crate::error::CompileError::Syntax(e)),
        Err(ParseFail::Semantic(e)) => Err(crate::error::CompileError::Semantic(e)),
    }
}

/// Internal parse failure, unified so every parsing function can use `?`.
/// Kept crate-private: callers only ever see [`crate::error::CompileError`].
pub(crate) enum ParseFail {
    Syntax(SyntaxError),
    Semantic(crate::error::SemanticError),
}

impl From<SyntaxError> for ParseFail {
    fn from(e: SyntaxError) -> Self {
        ParseFail::Syntax(e)
    }
}
impl From<crate::error::SemanticError> for ParseFail {
    fn from(e: crate::error::SemanticError) -> Self {
        ParseFail::Semantic(e)
    }
}

pub(crate) type PResult<T> = Result<T, ParseFail>;

impl<'t, 's> Parser<'t, 's> {
    fn parse_root(&mut self) -> Result<CompiledPattern, ParseFail> {
        let is_slice_pattern = matches!(self.cursor.peek(), TokenKind::At)
            && matches!(self.cursor.peek_k(1), TokenKind::LBrace | TokenKind::LBracket);
        if is_slice_pattern {
            self.cursor.bump();
        }
        let ast = self.parse_item()?;
        if !self.cursor.at_eof() {
            return Err(self
                .report_unexpected(vec!["end of pattern".to_string()])
                .into());
        }
        Self::check_sigil_collisions(&ast)?;
        Ok(CompiledPattern { ast, is_slice_pattern })
    }

    /// A name is either scalar or group throughout a single pattern;
    /// mixing sigils on the same name is rejected here rather than at
    /// match time, so the diagnostic can point at the source.
    fn check_sigil_collisions(ast: &Node) -> Result<(), ParseFail> {
        let mut names: Vec<(&str, bool)> = Vec::new();
        ast.collect_names(&mut names);
        for i in 0..names.len() {
            for j in (i + 1)..names.len() {
                let (name_a, is_scalar_a) = names[i];
                let (name_b, is_scalar_b) = names[j];
                if name_a == name_b && is_scalar_a != is_scalar_b {
                    return Err(crate::error::SemanticError::SigilCollision {
                        name: name_a.to_string(),
                        span: ast.span,
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    pub(crate) fn enter(&mut self, rule: &'static str) {
        self.rule_stack.push(rule);
        self.hooks.on_enter(rule, self.cursor.mark().0);
    }

    pub(crate) fn exit(&mut self, rule: &'static str, success: bool) {
        self.rule_stack.pop();
        self.hooks.on_exit(rule, self.cursor.mark().0, success);
    }

    pub(crate) fn report_unexpected(&self, expected: Vec<String>) -> SyntaxError {
        report::unexpected(self, expected)
    }
}
