//! The general ITEM grammar: literals, wildcards, bindings, guards,
//! alternation, parenthesized sub-patterns and lookaheads. Shared by array
//! elements, field-clause key/value/breadcrumb positions, and flow arms.
//! A bareword identifier is just a string literal (spec §6.1) — it carries
//! no special meaning of its own.

use super::{PResult, Parser};
use crate::ast::{
    AltKind, BindName, GroupInner, GroupSigil, Kind, Literal, LookaheadSign, Node, TypedWildcard,
};
use crate::error::SemanticError;
use crate::token::TokenKind;

impl<'t, 's> Parser<'t, 's> {
    /// `ITEM ::= OPERAND (('|' | 'else') OPERAND)*` — mixing `|` and
    /// `else` at the same level is rejected (`SemanticError::MixedAlternation`);
    /// each side of a mix must be explicitly parenthesized instead.
    pub(crate) fn parse_item(&mut self) -> PResult<Node> {
        self.enter("item");
        let first = self.parse_bound_atom()?;
        let mut branches = vec![first];
        let mut kind: Option<AltKind> = None;
        loop {
            let this_kind = match self.cursor.peek() {
                TokenKind::Pipe => AltKind::AnyOf,
                // `else !` with no following value is a field clause's
                // strong terminator, not another alternation arm — leave
                // it for `object_body.rs` to consume.
                TokenKind::KwElse if *self.cursor.peek_k(1) != TokenKind::Bang => AltKind::Else,
                _ => break,
            };
            if let Some(prev) = kind {
                if prev != this_kind {
                    let span = self.cursor.span();
                    self.exit("item", false);
                    return Err(SemanticError::MixedAlternation { span }.into());
                }
            }
            kind = Some(this_kind);
            self.cursor.bump();
            branches.push(self.parse_bound_atom()?);
        }
        self.exit("item", true);
        if branches.len() == 1 {
            return Ok(branches.into_iter().next().unwrap());
        }
        let span = branches.first().unwrap().span.join(branches.last().unwrap().span);
        Ok(Node::new(
            Kind::Alt {
                branches,
                kind: kind.unwrap(),
            },
            span,
        ))
    }

    /// `as`-binding and attached `where` guard, applied postfix to a
    /// primary atom.
    fn parse_bound_atom(&mut self) -> PResult<Node> {
        let atom = self.parse_primary()?;
        if !self.cursor.eat(&TokenKind::KwAs) {
            return Ok(atom);
        }
        let bind_span = atom.span;
        let name = self.parse_bind_name()?;
        let guard = if self.cursor.eat(&TokenKind::KwWhere) {
            Some(self.parse_guard_expr()?)
        } else {
            None
        };
        let span = bind_span.join(self.cursor.span());
        Ok(match name {
            BindName::Scalar(n) => Node::new(
                Kind::ScalarBind {
                    name: n,
                    inner: Box::new(atom),
                    guard,
                },
                span,
            ),
            BindName::Group(sigil, n) => {
                if guard.is_some() {
                    return Err(self
                        .report_unexpected(vec!["no 'where' guard on a group binding".to_string()])
                        .into());
                }
                Node::new(
                    Kind::GroupBind {
                        sigil,
                        name: n,
                        inner: Self::wrap_group_inner(sigil, atom),
                    },
                    span,
                )
            }
        })
    }

    pub(crate) fn wrap_group_inner(sigil: GroupSigil, atom: Node) -> GroupInner {
        match sigil {
            GroupSigil::At => GroupInner::Array(Box::new(atom)),
            GroupSigil::Percent => GroupInner::Object(Box::new(atom)),
        }
    }

    /// `'$' IDENT | '%' IDENT | '@' IDENT` — the name following an `as`.
    pub(crate) fn parse_bind_name(&mut self) -> PResult<BindName> {
        let sigil_tok = self.cursor.bump().kind.clone();
        let name = self.expect_ident()?;
        Ok(match sigil_tok {
            TokenKind::Dollar => BindName::Scalar(name),
            TokenKind::Percent => BindName::Group(GroupSigil::Percent, name),
            TokenKind::At => BindName::Group(GroupSigil::At, name),
            _ => {
                return Err(self
                    .report_unexpected(vec!["'$', '%', or '@'".to_string()])
                    .into())
            }
        })
    }

    pub(crate) fn expect_ident(&mut self) -> PResult<String> {
        match self.cursor.peek().clone() {
            TokenKind::Ident(name) => {
                self.cursor.bump();
                Ok(name)
            }
            _ => Err(self.report_unexpected(vec!["an identifier".to_string()]).into()),
        }
    }

    fn parse_primary(&mut self) -> PResult<Node> {
        self.enter("primary");
        let result = self.parse_primary_inner();
        self.exit("primary", result.is_ok());
        result
    }

    fn parse_primary_inner(&mut self) -> PResult<Node> {
        let start = self.cursor.span();
        match self.cursor.peek().clone() {
            TokenKind::Number(n) => {
                self.cursor.bump();
                Ok(Node::literal(Literal::Number(n), start))
            }
            TokenKind::Bool(b) => {
                self.cursor.bump();
                Ok(Node::literal(Literal::Bool(b), start))
            }
            TokenKind::Null => {
                self.cursor.bump();
                Ok(Node::literal(Literal::Null, start))
            }
            TokenKind::String(s) => {
                self.cursor.bump();
                let ci = self.cursor.eat(&TokenKind::CaseInsensitiveSuffix);
                let span = start.join(self.prev_span());
                Ok(Node::literal(
                    Literal::String { exact: s, case_insensitive: ci },
                    span,
                ))
            }
            TokenKind::Regex(pattern, flags) => {
                self.cursor.bump();
                Ok(Node::literal(Literal::Regex { pattern, flags }, start))
            }
            TokenKind::Wildcard => {
                self.cursor.bump();
                Ok(Node::wildcard(TypedWildcard::Any, start))
            }
            TokenKind::StringWildcard => {
                self.cursor.bump();
                Ok(Node::wildcard(TypedWildcard::StringWild, start))
            }
            TokenKind::NumberWildcard => {
                self.cursor.bump();
                Ok(Node::wildcard(TypedWildcard::NumberWild, start))
            }
            TokenKind::BooleanWildcard => {
                self.cursor.bump();
                Ok(Node::wildcard(TypedWildcard::BooleanWild, start))
            }
            TokenKind::DotDot => {
                self.cursor.bump();
                Ok(Self::lazy_any_run(start))
            }
            TokenKind::Dollar => {
                self.cursor.bump();
                let name = self.expect_ident()?;
                let span = start.join(self.prev_span());
                Ok(Node::new(
                    Kind::ScalarBind {
                        name,
                        inner: Box::new(Node::wildcard(TypedWildcard::Any, span)),
                        guard: None,
                    },
                    span,
                ))
            }
            TokenKind::At => {
                self.cursor.bump();
                let name = self.expect_ident()?;
                let span = start.join(self.prev_span());
                Ok(Node::new(
                    Kind::GroupBind {
                        sigil: GroupSigil::At,
                        name,
                        inner: GroupInner::Array(Box::new(Self::lazy_any_run(span))),
                    },
                    span,
                ))
            }
            TokenKind::LParen => self.parse_parenthesized(),
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Section => self.parse_labeled_group(),
            TokenKind::Ident(name) => {
                self.cursor.bump();
                let ci = self.cursor.eat(&TokenKind::CaseInsensitiveSuffix);
                let span = start.join(self.prev_span());
                Ok(Node::literal(
                    Literal::String { exact: name, case_insensitive: ci },
                    span,
                ))
            }
            _ => Err(self
                .report_unexpected(vec!["a pattern".to_string()])
                .into()),
        }
    }

    /// `..` and bare `@name` both desugar to a lazily-quantified run of
    /// `_` elements.
    fn lazy_any_run(span: crate::span::Span) -> Node {
        let wildcard = Node::wildcard(TypedWildcard::Any, span);
        Node::new(
            Kind::Seq(vec![Node::new(
                Kind::Quantified {
                    inner: Box::new(wildcard),
                    range: crate::ast::QuantRange::new(0, None),
                    mode: crate::ast::QuantMode::Lazy,
                },
                span,
            )]),
            span,
        )
    }

    fn parse_parenthesized(&mut self) -> PResult<Node> {
        let start = self.cursor.span();
        self.cursor.bump();
        let sign = match self.cursor.peek() {
            TokenKind::QuestionEq => Some(LookaheadSign::Positive),
            TokenKind::QuestionBang => Some(LookaheadSign::Negative),
            _ => None,
        };
        if let Some(sign) = sign {
            self.cursor.bump();
            let inner = self.parse_array_body()?;
            self.expect(&TokenKind::RParen, "')'")?;
            let span = start.join(self.prev_span());
            return Ok(Node::new(
                Kind::Lookahead {
                    inner: Box::new(inner),
                    sign,
                },
                span,
            ));
        }
        let inner = self.parse_item()?;
        let inner = if self.cursor.eat(&TokenKind::KwWhere) {
            let guard = self.parse_guard_expr()?;
            let span = inner.span.join(self.prev_span());
            Node::new(
                Kind::Guard {
                    inner: Box::new(inner),
                    expr: guard,
                },
                span,
            )
        } else {
            inner
        };
        self.expect(&TokenKind::RParen, "')'")?;
        Ok(inner)
    }

    /// `'§' IDENT ('[' ... | '{' ...)` — a label attached directly to an
    /// array or object literal (as opposed to one declared via a binding).
    fn parse_labeled_group(&mut self) -> PResult<Node> {
        let start = self.cursor.span();
        self.cursor.bump();
        let name = self.expect_ident()?;
        self.labels.declare(name.clone(), start)?;
        match self.cursor.peek() {
            TokenKind::LBracket => self.parse_array_labeled(Some(name)),
            TokenKind::LBrace => self.parse_object_labeled(Some(name)),
            _ => Err(self
                .report_unexpected(vec!["'[' or '{' after a label".to_string()])
                .into()),
        }
    }

    pub(crate) fn expect(&mut self, kind: &TokenKind, what: &str) -> PResult<()> {
        if self.cursor.eat(kind) {
            Ok(())
        } else {
            Err(self.report_unexpected(vec![what.to_string()]).into())
        }
    }

    pub(crate) fn prev_span(&self) -> crate::span::Span {
        self.cursor.prev_span()
    }
}
