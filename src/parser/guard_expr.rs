//! Operator-precedence parser for the `where` guard language: `||` then
//! `&&` then a single (non-chaining) comparison then `+`/`-` then
//! `*`/`/`/`%` then unary `-`/`!`, bottoming out at literals, `_`, `$name`
//! references, and the `size`/`number`/`string`/`boolean` coercion calls.

use super::{PResult, Parser};
use crate::guard::{BinOp, GuardExpr, GuardExprKind, GuardFn, UnOp};
use crate::token::TokenKind;

impl<'t, 's> Parser<'t, 's> {
    pub(crate) fn parse_guard_expr(&mut self) -> PResult<GuardExpr> {
        self.enter("guard_expr");
        let result = self.parse_or();
        self.exit("guard_expr", result.is_ok());
        result
    }

    fn parse_or(&mut self) -> PResult<GuardExpr> {
        let mut lhs = self.parse_and()?;
        while self.cursor.eat(&TokenKind::PipePipe) {
            let rhs = self.parse_and()?;
            let span = lhs.span.join(rhs.span);
            lhs = GuardExpr::new(GuardExprKind::Binary(BinOp::Or, Box::new(lhs), Box::new(rhs)), span);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult<GuardExpr> {
        let mut lhs = self.parse_comparison()?;
        while self.cursor.eat(&TokenKind::AmpAmp) {
            let rhs = self.parse_comparison()?;
            let span = lhs.span.join(rhs.span);
            lhs = GuardExpr::new(GuardExprKind::Binary(BinOp::And, Box::new(lhs), Box::new(rhs)), span);
        }
        Ok(lhs)
    }

    /// Comparisons do not chain: `a == b == c` is a syntax error, matching
    /// the guard language's arithmetic-expression character rather than a
    /// full boolean sublanguage.
    fn parse_comparison(&mut self) -> PResult<GuardExpr> {
        let lhs = self.parse_additive()?;
        let op = match self.cursor.peek() {
            TokenKind::Lt => BinOp::Lt,
            TokenKind::LtEq => BinOp::Le,
            TokenKind::Gt => BinOp::Gt,
            TokenKind::GtEq => BinOp::Ge,
            TokenKind::EqEq => BinOp::Eq,
            TokenKind::BangEq => BinOp::Ne,
            _ => return Ok(lhs),
        };
        self.cursor.bump();
        let rhs = self.parse_additive()?;
        let span = lhs.span.join(rhs.span);
        Ok(GuardExpr::new(GuardExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span))
    }

    fn parse_additive(&mut self) -> PResult<GuardExpr> {
        let mut lhs = self.parse_multiplicative()?;
        loop {
            let op = match self.cursor.peek() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.cursor.bump();
            let rhs = self.parse_multiplicative()?;
            let span = lhs.span.join(rhs.span);
            lhs = GuardExpr::new(GuardExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult<GuardExpr> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.cursor.peek() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            self.cursor.bump();
            let rhs = self.parse_unary()?;
            let span = lhs.span.join(rhs.span);
            lhs = GuardExpr::new(GuardExprKind::Binary(op, Box::new(lhs), Box::new(rhs)), span);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult<GuardExpr> {
        let start = self.cursor.span();
        let op = match self.cursor.peek() {
            TokenKind::Minus => Some(UnOp::Neg),
            TokenKind::Bang => Some(UnOp::Not),
            _ => None,
        };
        if let Some(op) = op {
            self.cursor.bump();
            let inner = self.parse_unary()?;
            let span = start.join(inner.span);
            return Ok(GuardExpr::new(GuardExprKind::Unary(op, Box::new(inner)), span));
        }
        self.parse_guard_primary()
    }

    fn parse_guard_primary(&mut self) -> PResult<GuardExpr> {
        let start = self.cursor.span();
        match self.cursor.peek().clone() {
            TokenKind::Number(n) => {
                self.cursor.bump();
                Ok(GuardExpr::new(GuardExprKind::Number(n), start))
            }
            TokenKind::String(s) => {
                self.cursor.bump();
                Ok(GuardExpr::new(GuardExprKind::String(s), start))
            }
            TokenKind::Bool(b) => {
                self.cursor.bump();
                Ok(GuardExpr::new(GuardExprKind::Bool(b), start))
            }
            TokenKind::Null => {
                self.cursor.bump();
                Ok(GuardExpr::new(GuardExprKind::Null, start))
            }
            TokenKind::Wildcard => {
                self.cursor.bump();
                Ok(GuardExpr::new(GuardExprKind::Underscore, start))
            }
            TokenKind::Dollar => {
                self.cursor.bump();
                let name = self.expect_ident()?;
                let span = start.join(self.prev_span());
                Ok(GuardExpr::new(GuardExprKind::Var(name), span))
            }
            TokenKind::Ident(name) => {
                let func = match name.as_str() {
                    "size" => GuardFn::Size,
                    "number" => GuardFn::Number,
                    "string" => GuardFn::String,
                    "boolean" => GuardFn::Boolean,
                    _ => {
                        return Err(self
                            .report_unexpected(vec![
                                "'size', 'number', 'string', or 'boolean'".to_string(),
                            ])
                            .into())
                    }
                };
                self.cursor.bump();
                self.expect(&TokenKind::LParen, "'('")?;
                let arg = self.parse_guard_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                let span = start.join(self.prev_span());
                Ok(GuardExpr::new(GuardExprKind::Call(func, Box::new(arg)), span))
            }
            TokenKind::LParen => {
                self.cursor.bump();
                let inner = self.parse_guard_expr()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            _ => Err(self
                .report_unexpected(vec!["a guard expression".to_string()])
                .into()),
        }
    }
}
