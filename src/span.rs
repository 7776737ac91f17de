use once_cell::unsync::OnceCell;
use std::fmt::{Display, Formatter};

/// A byte-offset range into the original pattern source, carried by every
/// AST node and every token for diagnostics.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn join(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }
}

/// Line and column of a byte offset, one-indexed.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Wraps the pattern source text and lazily computes line-break offsets so
/// repeated `position_at` lookups during error reporting stay cheap.
pub struct Source<'s> {
    pub text: &'s str,
    line_breaks: OnceCell<Vec<usize>>,
}

impl<'s> Source<'s> {
    pub fn new(text: &'s str) -> Self {
        Self {
            text,
            line_breaks: OnceCell::new(),
        }
    }

    fn line_breaks(&self) -> &Vec<usize> {
        self.line_breaks.get_or_init(|| {
            self.text
                .bytes()
                .enumerate()
                .filter_map(|(i, b)| if b == b'\n' { Some(i) } else { None })
                .collect()
        })
    }

    /// Resolve a byte offset into a one-indexed line/column.
    pub fn position_at(&self, offset: usize) -> Position {
        let breaks = self.line_breaks();
        let line_index = match breaks.binary_search(&offset) {
            Ok(i) | Err(i) => i,
        };
        if line_index == 0 {
            Position::new(1, offset + 1)
        } else {
            let line_start = breaks[line_index - 1] + 1;
            Position::new(line_index + 1, offset - line_start + 1)
        }
    }

    pub fn slice(&self, span: Span) -> &'s str {
        &self.text[span.start..span.end]
    }
}
