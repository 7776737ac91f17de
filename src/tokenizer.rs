//! Hand-written scanner for pattern source, grounded in the teacher's
//! `Tokenizer`/`Code` split: a single pass over the byte slice, skipping
//! whitespace and comments, producing spanned tokens with maximal-munch
//! multi-character operators (spec §4.1).
//!
//! Unlike the teacher's pluggable `Vec<Rc<dyn ILexeme>>` design, this
//! tokenizer is a closed hand-written scan loop — Tendril's lexical grammar
//! is fixed (spec §1 Non-goals: "the pattern language is closed"), so there
//! is no need for runtime-composable lexeme utilities.

use crate::error::SyntaxError;
use crate::span::{Source, Span};
use crate::token::{Token, TokenKind};

pub struct Tokenizer<'s> {
    source: &'s Source<'s>,
    bytes: &'s [u8],
    pos: usize,
    /// Tracks whether the position just scanned could begin a value
    /// (as opposed to following one), which disambiguates `/` as the
    /// start of a regex literal versus a `/i` case-insensitivity suffix,
    /// and `-` as a literal's sign versus subtraction (spec §4.1).
    expects_value: bool,
}

impl<'s> Tokenizer<'s> {
    pub fn new(source: &'s Source<'s>) -> Self {
        Self {
            source,
            bytes: source.text.as_bytes(),
            pos: 0,
            expects_value: true,
        }
    }

    pub fn tokenize(mut self) -> Result<Vec<Token>, SyntaxError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.pos >= self.bytes.len() {
                tokens.push(Token::new(TokenKind::Eof, Span::new(self.pos, self.pos)));
                break;
            }
            let token = self.next_token(&tokens)?;
            self.expects_value = Self::sets_expects_value(&token.kind);
            tokens.push(token);
        }
        Ok(tokens)
    }

    fn sets_expects_value(kind: &TokenKind) -> bool {
        !matches!(
            kind,
            TokenKind::Number(_)
                | TokenKind::Bool(_)
                | TokenKind::Null
                | TokenKind::String(_)
                | TokenKind::Regex(_, _)
                | TokenKind::Ident(_)
                | TokenKind::CaseInsensitiveSuffix
                | TokenKind::Wildcard
                | TokenKind::StringWildcard
                | TokenKind::NumberWildcard
                | TokenKind::BooleanWildcard
                | TokenKind::RBrace
                | TokenKind::RBracket
                | TokenKind::RParen
        )
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.pos += 1;
        Some(b)
    }

    fn err(&self, start: usize, message: impl Into<String>) -> SyntaxError {
        self.err_with_expected(start, message, Vec::new())
    }

    fn err_with_expected(
        &self,
        start: usize,
        message: impl Into<String>,
        expected: Vec<String>,
    ) -> SyntaxError {
        let end = self.pos.max(start + 1).min(self.bytes.len());
        let window_start = start.saturating_sub(16);
        let window_end = (end + 16).min(self.bytes.len());
        SyntaxError {
            span: Span::new(start, end),
            position: self.source.position_at(start),
            message: message.into(),
            expected,
            rule_stack: vec!["tokenizer"],
            token_window: self.source.text[window_start..window_end].to_string(),
        }
    }

    fn skip_trivia(&mut self) -> Result<(), SyntaxError> {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.pos += 1;
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while !matches!(self.peek(), None | Some(b'\n')) {
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                return Err(self.err(start, "unterminated block comment"));
                            }
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn next_token(&mut self, prior: &[Token]) -> Result<Token, SyntaxError> {
        let start = self.pos;
        let b = self.peek().expect("checked by caller");

        // `/i` case-insensitivity suffix immediately following a literal
        // that can carry it: only reachable when the tokenizer does not
        // instead expect a value (i.e. a regex literal could not start
        // here), per spec §4.1.
        if b == b'/' && !self.expects_value {
            if self.peek_at(1) == Some(b'i') && !Self::is_ident_continue(self.peek_at(2)) {
                let _ = prior;
                self.pos += 2;
                return Ok(Token::new(
                    TokenKind::CaseInsensitiveSuffix,
                    Span::new(start, self.pos),
                ));
            }
        }

        if b == b'/' && self.expects_value {
            return self.scan_regex(start);
        }

        if b == b'"' || b == b'\'' {
            return self.scan_string(start, b);
        }

        if b.is_ascii_digit() || (b == b'-' && self.expects_value && self.next_is_digit()) {
            return self.scan_number(start);
        }

        if Self::is_ident_start(b) {
            return self.scan_ident(start);
        }

        if b == 0xC2 && self.peek_at(1) == Some(0xA7) {
            // UTF-8 encoding of '§'
            self.pos += 2;
            return Ok(Token::new(TokenKind::Section, Span::new(start, self.pos)));
        }

        self.scan_operator(start)
    }

    fn next_is_digit(&self) -> bool {
        self.peek_at(1).map_or(false, |b| b.is_ascii_digit())
    }

    fn is_ident_start(b: u8) -> bool {
        b == b'_' || b.is_ascii_alphabetic()
    }

    fn is_ident_continue(b: Option<u8>) -> bool {
        matches!(b, Some(c) if c == b'_' || c.is_ascii_alphanumeric())
    }

    fn scan_number(&mut self, start: usize) -> Result<Token, SyntaxError> {
        if self.peek() == Some(b'-') {
            self.pos += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
        }
        if self.peek() == Some(b'.') && matches!(self.peek_at(1), Some(b) if b.is_ascii_digit()) {
            self.pos += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.pos += 1;
            }
        }
        let text = &self.source.text[start..self.pos];
        let value: f64 = text
            .parse()
            .map_err(|_| self.err(start, format!("invalid numeric literal '{}'", text)))?;
        Ok(Token::new(TokenKind::Number(value), Span::new(start, self.pos)))
    }

    fn scan_string(&mut self, start: usize, quote: u8) -> Result<Token, SyntaxError> {
        self.pos += 1;
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.err(start, "unterminated string literal")),
                Some(b) if b == quote => break,
                Some(b'\n') | Some(b'\r') => {
                    return Err(self.err(start, "unterminated string literal"))
                }
                Some(b'\\') => value.push(self.scan_escape(start)?),
                Some(b) => {
                    // Re-decode any multi-byte UTF-8 sequence as a unit.
                    self.pos -= 1;
                    let ch = self.bump_utf8_char(start)?;
                    value.push(ch);
                    let _ = b;
                }
            }
        }
        Ok(Token::new(TokenKind::String(value), Span::new(start, self.pos)))
    }

    fn bump_utf8_char(&mut self, start: usize) -> Result<char, SyntaxError> {
        let rest = &self.source.text[self.pos..];
        let ch = rest
            .chars()
            .next()
            .ok_or_else(|| self.err(start, "unterminated string literal"))?;
        self.pos += ch.len_utf8();
        Ok(ch)
    }

    fn scan_escape(&mut self, start: usize) -> Result<char, SyntaxError> {
        match self.bump() {
            None => Err(self.err(start, "unterminated escape sequence")),
            Some(b'n') => Ok('\n'),
            Some(b'r') => Ok('\r'),
            Some(b't') => Ok('\t'),
            Some(b'"') => Ok('"'),
            Some(b'\'') => Ok('\''),
            Some(b'\\') => Ok('\\'),
            Some(b'u') => self.scan_unicode_escape(start),
            Some(other) => Err(self.err(
                start,
                format!("invalid escape sequence '\\{}'", other as char),
            )),
        }
    }

    fn scan_unicode_escape(&mut self, start: usize) -> Result<char, SyntaxError> {
        if self.peek() == Some(b'{') {
            self.pos += 1;
            let digits_start = self.pos;
            while matches!(self.peek(), Some(b) if b.is_ascii_hexdigit()) {
                self.pos += 1;
            }
            let digits = &self.source.text[digits_start..self.pos];
            if self.peek() != Some(b'}') {
                return Err(self.err(start, "unterminated \\u{...} escape"));
            }
            self.pos += 1;
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| self.err(start, "invalid \\u{...} escape"))?;
            char::from_u32(code).ok_or_else(|| self.err(start, "invalid unicode scalar value"))
        } else {
            let digits_start = self.pos;
            for _ in 0..4 {
                if !matches!(self.peek(), Some(b) if b.is_ascii_hexdigit()) {
                    return Err(self.err(start, "invalid \\uXXXX escape"));
                }
                self.pos += 1;
            }
            let digits = &self.source.text[digits_start..self.pos];
            let code = u32::from_str_radix(digits, 16)
                .map_err(|_| self.err(start, "invalid \\uXXXX escape"))?;
            char::from_u32(code).ok_or_else(|| self.err(start, "invalid unicode scalar value"))
        }
    }

    fn scan_regex(&mut self, start: usize) -> Result<Token, SyntaxError> {
        self.pos += 1;
        let pattern_start = self.pos;
        loop {
            match self.bump() {
                None => return Err(self.err(start, "unterminated regex literal")),
                Some(b'\\') => {
                    if self.bump().is_none() {
                        return Err(self.err(start, "unterminated regex literal"));
                    }
                }
                Some(b'/') => break,
                Some(b'[') => {
                    // character class: `/` is not a delimiter inside it
                    loop {
                        match self.bump() {
                            None => return Err(self.err(start, "unterminated regex literal")),
                            Some(b'\\') => {
                                if self.bump().is_none() {
                                    return Err(self.err(start, "unterminated regex literal"));
                                }
                            }
                            Some(b']') => break,
                            Some(_) => {}
                        }
                    }
                }
                Some(_) => {}
            }
        }
        let pattern = self.source.text[pattern_start..self.pos - 1].to_string();
        let flags_start = self.pos;
        while matches!(self.peek(), Some(b) if b.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let flags = self.source.text[flags_start..self.pos].to_string();
        if flags.contains('g') || flags.contains('y') {
            return Err(self.err_with_expected(
                start,
                format!("regex flag(s) in '{}' are not supported ('g' and 'y' are rejected)", flags),
                vec!["i".to_string()],
            ));
        }
        for f in flags.chars() {
            if f != 'i' {
                return Err(self.err(start, format!("unknown regex flag '{}'", f)));
            }
        }
        Ok(Token::new(
            TokenKind::Regex(pattern, flags),
            Span::new(start, self.pos),
        ))
    }

    fn scan_ident(&mut self, start: usize) -> Result<Token, SyntaxError> {
        while Self::is_ident_continue(self.peek()) {
            self.pos += 1;
        }
        let text = &self.source.text[start..self.pos];
        let kind = match text {
            "true" => TokenKind::Bool(true),
            "false" => TokenKind::Bool(false),
            "null" => TokenKind::Null,
            "else" => TokenKind::KwElse,
            "as" => TokenKind::KwAs,
            "where" => TokenKind::KwWhere,
            "remainder" => TokenKind::KwRemainder,
            "_" => TokenKind::Wildcard,
            "_string" => TokenKind::StringWildcard,
            "_number" => TokenKind::NumberWildcard,
            "_boolean" => TokenKind::BooleanWildcard,
            other => TokenKind::Ident(other.to_string()),
        };
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn scan_operator(&mut self, start: usize) -> Result<Token, SyntaxError> {
        // Maximal munch: try three-character, then two-character, then
        // single-character operators, in that order (spec §4.1).
        if let Some(kind) = self.match_fixed(b"...", TokenKind::DotDotDot) {
            return Ok(Token::new(kind, Span::new(start, self.pos)));
        }
        let two_char: &[(&[u8], TokenKind)] = &[
            (b"**", TokenKind::StarStar),
            (b"..", TokenKind::DotDot),
            (b"?:", TokenKind::QuestionColon),
            (b"?=", TokenKind::QuestionEq),
            (b"?!", TokenKind::QuestionBang),
            (b"*?", TokenKind::StarQuestion),
            (b"*+", TokenKind::StarPlus),
            (b"+?", TokenKind::PlusQuestion),
            (b"++", TokenKind::PlusPlus),
            (b"??", TokenKind::QuestionQuestion),
            (b"?+", TokenKind::QuestionPlus),
            (b"->", TokenKind::Arrow),
            (b"#{", TokenKind::HashBrace),
            (b"<^", TokenKind::LtCaret),
            (b"<=", TokenKind::LtEq),
            (b">=", TokenKind::GtEq),
            (b"==", TokenKind::EqEq),
            (b"!=", TokenKind::BangEq),
            (b"&&", TokenKind::AmpAmp),
            (b"||", TokenKind::PipePipe),
        ];
        for (pat, kind) in two_char {
            if let Some(kind) = self.match_fixed(pat, kind.clone()) {
                return Ok(Token::new(kind, Span::new(start, self.pos)));
            }
        }

        let b = self.bump().expect("checked by caller");
        let kind = match b {
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b':' => TokenKind::Colon,
            b',' => TokenKind::Comma,
            b'.' => TokenKind::Dot,
            b'!' => TokenKind::Bang,
            b'|' => TokenKind::Pipe,
            b'&' => TokenKind::Amp,
            b'/' => TokenKind::Slash,
            b'-' => TokenKind::Minus,
            b'+' => TokenKind::Plus,
            b'*' => TokenKind::Star,
            b'?' => TokenKind::Question,
            b'=' => TokenKind::Eq,
            b'<' => TokenKind::Lt,
            b'>' => TokenKind::Gt,
            b'$' => TokenKind::Dollar,
            b'%' => TokenKind::Percent,
            b'@' => TokenKind::At,
            b'^' => TokenKind::Caret,
            other => {
                return Err(self.err(
                    start,
                    format!("unexpected character '{}'", other as char),
                ))
            }
        };
        Ok(Token::new(kind, Span::new(start, self.pos)))
    }

    fn match_fixed(&mut self, pat: &[u8], kind: TokenKind) -> Option<TokenKind> {
        if self.bytes[self.pos..].starts_with(pat) {
            self.pos += pat.len();
            Some(kind)
        } else {
            None
        }
    }
}

pub fn tokenize<'s>(source: &'s Source<'s>) -> Result<Vec<Token>, SyntaxError> {
    Tokenizer::new(source).tokenize()
}
