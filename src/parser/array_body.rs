//! Array bodies: a positional sequence of quantified items, consumed in
//! full (arrays are anchored — there is no subsequence scan within a
//! single `[...]`).

use super::{PResult, Parser};
use crate::ast::{Kind, Node, QuantMode, QuantRange};
use crate::token::TokenKind;

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn parse_array(&mut self) -> PResult<Node> {
        self.parse_array_labeled(None)
    }

    pub(crate) fn parse_array_labeled(&mut self, label: Option<String>) -> PResult<Node> {
        let start = self.cursor.span();
        self.expect(&TokenKind::LBracket, "'['")?;
        if let Some(l) = &label {
            self.label_stack.push(l.clone());
        }
        let body = self.parse_array_body()?;
        if label.is_some() {
            self.label_stack.pop();
        }
        self.expect(&TokenKind::RBracket, "']'")?;
        let span = start.join(self.prev_span());
        Ok(Node::new(
            Kind::Array {
                body: Box::new(body),
                label,
            },
            span,
        ))
    }

    /// Parses the body shared by `[...]` arrays and `(?= ...)` / `(?! ...)`
    /// lookaheads: a sequence of quantified items, stopping at whichever
    /// closing delimiter the caller expects.
    pub(crate) fn parse_array_body(&mut self) -> PResult<Node> {
        self.enter("array_body");
        let start = self.cursor.span();
        let mut items = Vec::new();
        loop {
            match self.cursor.peek() {
                TokenKind::RBracket | TokenKind::RParen | TokenKind::Eof => break,
                _ => {}
            }
            items.push(self.parse_array_element()?);
        }
        self.exit("array_body", true);
        let span = if let (Some(first), Some(last)) = (items.first(), items.last()) {
            first.span.join(last.span)
        } else {
            start
        };
        Ok(Node::new(Kind::Seq(items), span))
    }

    fn parse_array_element(&mut self) -> PResult<Node> {
        let item = self.parse_item()?;
        let quant = self.try_parse_quantifier_suffix();
        Ok(match quant {
            Some((mode, range)) => {
                let span = item.span.join(self.prev_span());
                Node::new(
                    Kind::Quantified {
                        inner: Box::new(item),
                        range,
                        mode,
                    },
                    span,
                )
            }
            None => item,
        })
    }

    fn try_parse_quantifier_suffix(&mut self) -> Option<(QuantMode, QuantRange)> {
        let (mode, range) = match self.cursor.peek() {
            TokenKind::Star => (QuantMode::Greedy, QuantRange::new(0, None)),
            TokenKind::StarQuestion => (QuantMode::Lazy, QuantRange::new(0, None)),
            TokenKind::StarPlus => (QuantMode::Possessive, QuantRange::new(0, None)),
            TokenKind::Plus => (QuantMode::Greedy, QuantRange::new(1, None)),
            TokenKind::PlusQuestion => (QuantMode::Lazy, QuantRange::new(1, None)),
            TokenKind::PlusPlus => (QuantMode::Possessive, QuantRange::new(1, None)),
            TokenKind::Question => (QuantMode::Greedy, QuantRange::new(0, Some(1))),
            TokenKind::QuestionQuestion => (QuantMode::Lazy, QuantRange::new(0, Some(1))),
            TokenKind::QuestionPlus => (QuantMode::Possessive, QuantRange::new(0, Some(1))),
            _ => return None,
        };
        self.cursor.bump();
        Some((mode, range))
    }

    /// `'#{' NUMBER? (',' NUMBER?)? '}'` cardinality body, shared by
    /// `kvQuant` and the remainder clause. The opening `#{` has already
    /// been consumed by the caller.
    pub(crate) fn parse_cardinality_body(&mut self) -> PResult<QuantRange> {
        let min = self.try_parse_number_literal().unwrap_or(0);
        let max = if self.cursor.eat(&TokenKind::Comma) {
            self.try_parse_number_literal()
        } else {
            Some(min)
        };
        self.expect(&TokenKind::RBrace, "'}'")?;
        Ok(QuantRange::new(min, max))
    }

    fn try_parse_number_literal(&mut self) -> Option<usize> {
        match self.cursor.peek().clone() {
            TokenKind::Number(n) if n >= 0.0 && n.fract() == 0.0 => {
                self.cursor.bump();
                Some(n as usize)
            }
            _ => None,
        }
    }
}
