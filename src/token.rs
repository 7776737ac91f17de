use crate::span::Span;
use std::fmt::{Debug, Display, Formatter};

/// One lexical unit of pattern source, with the span it was scanned from.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// Every lexical category the tokenizer can produce. Reserved words and
/// multi-character operators are listed explicitly (spec §4.1) rather than
/// derived, so maximal-munch scanning and parser matching stay obviously
/// exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Number(f64),
    Bool(bool),
    Null,
    String(String),
    /// A regex literal body and its flags (flags already validated to
    /// exclude `g`/`y`, spec §4.1).
    Regex(String, String),
    Ident(String),

    /// A `/i` suffix immediately following an identifier or quoted string,
    /// marking the preceding literal case-insensitive (spec §4.1, §6.1).
    CaseInsensitiveSuffix,

    // Reserved words
    KwElse,
    KwAs,
    KwWhere,
    KwRemainder,
    /// `_`
    Wildcard,
    /// `_string`
    StringWildcard,
    /// `_number`
    NumberWildcard,
    /// `_boolean`
    BooleanWildcard,

    // Sigils
    /// `$`
    Dollar,
    /// `%`
    Percent,
    /// `@`
    At,
    /// `§`
    Section,
    /// `^`
    Caret,

    // Punctuation
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    LParen,
    RParen,
    Colon,
    Comma,
    Dot,
    Bang,
    Pipe,
    Amp,
    Slash,
    Minus,
    Plus,
    Star,
    Question,
    Eq,
    Lt,
    Gt,

    // Multi-character operators (maximal munch, spec §4.1)
    /// `**`
    StarStar,
    /// `..`
    DotDot,
    /// `...`
    DotDotDot,
    /// `?:`
    QuestionColon,
    /// `?=`
    QuestionEq,
    /// `?!`
    QuestionBang,
    /// `*?`
    StarQuestion,
    /// `*+`
    StarPlus,
    /// `+?`
    PlusQuestion,
    /// `++`
    PlusPlus,
    /// `??`
    QuestionQuestion,
    /// `?+`
    QuestionPlus,
    /// `->`
    Arrow,
    /// `#{`
    HashBrace,
    /// `<^`
    LtCaret,
    /// `<=`
    LtEq,
    /// `>=`
    GtEq,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,

    Eof,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "number '{}'", n),
            TokenKind::Bool(b) => write!(f, "'{}'", b),
            TokenKind::Null => write!(f, "'null'"),
            TokenKind::String(s) => write!(f, "string {:?}", s),
            TokenKind::Regex(p, fl) => write!(f, "regex /{}/{}", p, fl),
            TokenKind::Ident(s) => write!(f, "identifier '{}'", s),
            TokenKind::CaseInsensitiveSuffix => write!(f, "'/i'"),
            TokenKind::KwElse => write!(f, "'else'"),
            TokenKind::KwAs => write!(f, "'as'"),
            TokenKind::KwWhere => write!(f, "'where'"),
            TokenKind::KwRemainder => write!(f, "'remainder'"),
            TokenKind::Wildcard => write!(f, "'_'"),
            TokenKind::StringWildcard => write!(f, "'_string'"),
            TokenKind::NumberWildcard => write!(f, "'_number'"),
            TokenKind::BooleanWildcard => write!(f, "'_boolean'"),
            TokenKind::Dollar => write!(f, "'$'"),
            TokenKind::Percent => write!(f, "'%'"),
            TokenKind::At => write!(f, "'@'"),
            TokenKind::Section => write!(f, "'§'"),
            TokenKind::Caret => write!(f, "'^'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::LBracket => write!(f, "'['"),
            TokenKind::RBracket => write!(f, "']'"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::Bang => write!(f, "'!'"),
            TokenKind::Pipe => write!(f, "'|'"),
            TokenKind::Amp => write!(f, "'&'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Question => write!(f, "'?'"),
            TokenKind::Eq => write!(f, "'='"),
            TokenKind::Lt => write!(f, "'<'"),
            TokenKind::Gt => write!(f, "'>'"),
            TokenKind::StarStar => write!(f, "'**'"),
            TokenKind::DotDot => write!(f, "'..'"),
            TokenKind::DotDotDot => write!(f, "'...'"),
            TokenKind::QuestionColon => write!(f, "'?:'"),
            TokenKind::QuestionEq => write!(f, "'?='"),
            TokenKind::QuestionBang => write!(f, "'?!'"),
            TokenKind::StarQuestion => write!(f, "'*?'"),
            TokenKind::StarPlus => write!(f, "'*+'"),
            TokenKind::PlusQuestion => write!(f, "'+?'"),
            TokenKind::PlusPlus => write!(f, "'++'"),
            TokenKind::QuestionQuestion => write!(f, "'??'"),
            TokenKind::QuestionPlus => write!(f, "'?+'"),
            TokenKind::Arrow => write!(f, "'->'"),
            TokenKind::HashBrace => write!(f, "'#{{'"),
            TokenKind::LtCaret => write!(f, "'<^'"),
            TokenKind::LtEq => write!(f, "'<='"),
            TokenKind::GtEq => write!(f, "'>='"),
            TokenKind::EqEq => write!(f, "'=='"),
            TokenKind::BangEq => write!(f, "'!='"),
            TokenKind::AmpAmp => write!(f, "'&&'"),
            TokenKind::PipePipe => write!(f, "'||'"),
            TokenKind::Eof => write!(f, "end of pattern"),
        }
    }
}
