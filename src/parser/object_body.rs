//! Object bodies: an unordered set of field clauses plus at most one
//! trailing remainder, each field clause optionally carrying breadcrumbs
//! into nested values, a cardinality bound, and a flow/strong tail.

use super::{PResult, Parser};
use crate::ast::{
    Breadcrumb, BucketRef, FieldClause, FlowSpec, GroupSigil, Kind, Node, QuantRange, Remainder,
};
use crate::error::SemanticError;
use crate::token::TokenKind;

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn parse_object(&mut self) -> PResult<Node> {
        self.parse_object_labeled(None)
    }

    pub(crate) fn parse_object_labeled(&mut self, label: Option<String>) -> PResult<Node> {
        let start = self.cursor.span();
        self.expect(&TokenKind::LBrace, "'{'")?;
        if let Some(l) = &label {
            self.label_stack.push(l.clone());
        }
        self.enter("object_body");
        let mut terms = Vec::new();
        let mut remainder = None;
        loop {
            if matches!(self.cursor.peek(), TokenKind::RBrace | TokenKind::Eof) {
                break;
            }
            if self.at_remainder_start() {
                let span = self.cursor.span();
                if remainder.is_some() {
                    self.exit("object_body", false);
                    return Err(SemanticError::MisplacedRemainder { span }.into());
                }
                remainder = Some(self.parse_remainder()?);
                if !matches!(self.cursor.peek(), TokenKind::RBrace | TokenKind::Eof) {
                    self.exit("object_body", false);
                    return Err(SemanticError::MisplacedRemainder {
                        span: self.cursor.span(),
                    }
                    .into());
                }
                break;
            }
            terms.push(self.parse_field_clause()?);
        }
        self.exit("object_body", true);
        if label.is_some() {
            self.label_stack.pop();
        }
        self.expect(&TokenKind::RBrace, "'}'")?;
        let span = start.join(self.prev_span());
        Ok(Node::new(
            Kind::Object {
                terms,
                remainder,
                label,
            },
            span,
        ))
    }

    fn at_remainder_start(&self) -> bool {
        matches!(self.cursor.peek(), TokenKind::Percent)
            || (matches!(self.cursor.peek(), TokenKind::LParen)
                && matches!(self.cursor.peek_k(1), TokenKind::Bang)
                && matches!(self.cursor.peek_k(2), TokenKind::Percent)
                && matches!(self.cursor.peek_k(3), TokenKind::RParen))
    }

    /// `'(' '!' '%' ')'` (asserts the object is fully covered) or
    /// `'%' ('#{' card '}')? ('as' '%' IDENT)?`.
    fn parse_remainder(&mut self) -> PResult<Remainder> {
        let start = self.cursor.span();
        if self.cursor.eat(&TokenKind::LParen) {
            self.cursor.bump(); // '!'
            self.cursor.bump(); // '%'
            self.expect(&TokenKind::RParen, "')'")?;
            let span = start.join(self.prev_span());
            return Ok(Remainder {
                quant: Some(QuantRange::new(0, Some(0))),
                bind: None,
                closed: true,
                span,
            });
        }
        self.expect(&TokenKind::Percent, "'%'")?;
        let quant = if self.cursor.eat(&TokenKind::HashBrace) {
            Some(self.parse_cardinality_body()?)
        } else {
            None
        };
        let bind = if self.cursor.eat(&TokenKind::KwAs) {
            self.expect(&TokenKind::Percent, "'%'")?;
            Some(self.expect_ident()?)
        } else {
            None
        };
        let closed = matches!(quant, Some(q) if q.min == 0 && q.max == Some(0));
        let span = start.join(self.prev_span());
        Ok(Remainder {
            quant,
            bind,
            closed,
            span,
        })
    }

    fn parse_field_clause(&mut self) -> PResult<FieldClause> {
        self.enter("field_clause");
        let result = self.parse_field_clause_inner();
        self.exit("field_clause", result.is_ok());
        result
    }

    fn parse_field_clause_inner(&mut self) -> PResult<FieldClause> {
        let start = self.cursor.span();
        let key = self.parse_item()?;
        let breadcrumbs = self.parse_breadcrumbs()?;
        let explicit_kv_quant = if self.cursor.eat(&TokenKind::HashBrace) {
            Some(self.parse_cardinality_body()?)
        } else {
            None
        };
        let optional = match self.cursor.peek() {
            TokenKind::Colon => {
                self.cursor.bump();
                false
            }
            TokenKind::QuestionColon => {
                self.cursor.bump();
                true
            }
            _ => {
                return Err(self
                    .report_unexpected(vec!["':' or '?:'".to_string()])
                    .into())
            }
        };
        let value = self.parse_item()?;
        let (flow, strong) = self.parse_field_tail(value.clone())?;
        let kv_quant = explicit_kv_quant.unwrap_or_else(|| {
            if optional {
                QuantRange::new(0, None)
            } else {
                QuantRange::new(1, None)
            }
        });
        let span = start.join(self.prev_span());
        Ok(FieldClause {
            key,
            breadcrumbs,
            value,
            strong,
            optional,
            kv_quant,
            flow,
            span,
        })
    }

    /// `('.' KEY-ITEM | '[' INDEX-ITEM ']' | '**' '?'?)*` — each dot/index
    /// step's item is the full ITEM grammar (bareword/literal, binding,
    /// wildcard, regex, alternation...), not just a literal key/index, so
    /// a breadcrumb can itself carry candidates to branch over (spec §4.4).
    fn parse_breadcrumbs(&mut self) -> PResult<Vec<Breadcrumb>> {
        let mut steps = Vec::new();
        loop {
            match self.cursor.peek() {
                TokenKind::Dot => {
                    self.cursor.bump();
                    let key_pattern = self.parse_item()?;
                    steps.push(Breadcrumb::DotKey(key_pattern));
                }
                TokenKind::LBracket => {
                    self.cursor.bump();
                    let index_pattern = self.parse_item()?;
                    self.expect(&TokenKind::RBracket, "']'")?;
                    steps.push(Breadcrumb::IndexKey(index_pattern));
                }
                TokenKind::StarStar => {
                    self.cursor.bump();
                    let optional_tail = self.cursor.eat(&TokenKind::Question);
                    steps.push(Breadcrumb::SkipAny { optional_tail });
                }
                _ => break,
            }
        }
        Ok(steps)
    }

    /// The optional `-> BUCKET_REF (else VALUE -> BUCKET_REF)* (else !)?`
    /// or bare `else !` suffix following a field clause's value.
    /// `first_value` is the clause's already-parsed value pattern, which
    /// becomes the first flow arm's value when a `->` follows it.
    fn parse_field_tail(&mut self, first_value: Node) -> PResult<(Option<FlowSpec>, bool)> {
        let mut arms = Vec::new();
        let mut strong = false;
        if self.cursor.eat(&TokenKind::Arrow) {
            let br = self.parse_bucket_ref()?;
            arms.push((first_value, br));
            loop {
                if !self.cursor.eat(&TokenKind::KwElse) {
                    break;
                }
                if self.cursor.eat(&TokenKind::Bang) {
                    strong = true;
                    break;
                }
                let arm_value = self.parse_item()?;
                self.expect(&TokenKind::Arrow, "'->'")?;
                let arm_br = self.parse_bucket_ref()?;
                arms.push((arm_value, arm_br));
            }
        } else if self.cursor.eat(&TokenKind::KwElse) {
            self.expect(&TokenKind::Bang, "'!'")?;
            strong = true;
        }
        if arms.is_empty() {
            return Ok((None, strong));
        }
        Ok((
            Some(FlowSpec {
                arms,
                strong_terminator: strong,
            }),
            strong,
        ))
    }

    fn parse_bucket_ref(&mut self) -> PResult<BucketRef> {
        let start = self.cursor.span();
        let sigil = match self.cursor.peek() {
            TokenKind::Percent => GroupSigil::Percent,
            TokenKind::At => GroupSigil::At,
            _ => {
                return Err(self
                    .report_unexpected(vec!["'%' or '@' bucket target".to_string()])
                    .into())
            }
        };
        self.cursor.bump();
        let name = self.expect_ident()?;
        let label = if self.cursor.eat(&TokenKind::LtCaret) {
            let label_name = self.expect_ident()?;
            self.expect(&TokenKind::Gt, "'>'")?;
            if !self.label_stack.iter().any(|l| l == &label_name) {
                let span = start.join(self.prev_span());
                return Err(SemanticError::LabelNotAncestor {
                    label: label_name,
                    span,
                }
                .into());
            }
            Some(label_name)
        } else {
            None
        };
        let span = start.join(self.prev_span());
        Ok(BucketRef {
            sigil,
            name,
            label,
            span,
        })
    }
}
