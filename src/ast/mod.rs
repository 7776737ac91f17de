//! The typed abstract syntax tree produced by [`crate::parser`] and consumed
//! by [`crate::engine`] — spec §3.1. One sum type (`Kind`) carries every
//! production; each node additionally carries the [`Span`] of its first to
//! last consumed token (spec §4.2), used only for diagnostics and AST
//! pretty-printing, never by the engine.

mod display;

use crate::guard::GuardExpr;
use crate::span::Span;

/// A single AST node: its shape plus the source span it was parsed from.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: Kind,
    pub span: Span,
}

impl Node {
    pub fn new(kind: Kind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The sigil distinguishing a scalar binding (`$`) from the two flavors of
/// group binding (`%` for an object subset, `@` for an array subsequence).
/// spec §3.2: "a name is either scalar or group within a single pattern;
/// mixing is rejected at parse time."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupSigil {
    Percent,
    At,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindName {
    Scalar(String),
    Group(GroupSigil, String),
}

impl BindName {
    pub fn identifier(&self) -> &str {
        match self {
            BindName::Scalar(n) => n,
            BindName::Group(_, n) => n,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Bool(bool),
    Null,
    String { exact: String, case_insensitive: bool },
    Regex { pattern: String, flags: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedWildcard {
    Any,
    StringWild,
    NumberWild,
    BooleanWild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AltKind {
    /// `|` — enumerate every branch that matches.
    AnyOf,
    /// `else` — prioritized choice, first successful branch wins.
    Else,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantMode {
    Greedy,
    Lazy,
    Possessive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantRange {
    pub min: usize,
    /// `None` means unbounded (`max = ∞`).
    pub max: Option<usize>,
}

impl QuantRange {
    pub fn new(min: usize, max: Option<usize>) -> Self {
        Self { min, max }
    }

    pub fn exactly_one() -> Self {
        Self::new(1, Some(1))
    }

    pub fn contains(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookaheadSign {
    Positive,
    Negative,
}

/// One breadcrumb navigation step inside a field clause (spec §3.1,
/// §4.3.3 point 2).
#[derive(Debug, Clone)]
pub enum Breadcrumb {
    /// `'.' KEY-ITEM` — a key pattern (bareword/literal, binding, wildcard,
    /// regex, alternation...), matched against every entry of the object
    /// at this step; more than one match fans the navigation out (spec
    /// §4.4 "breadcrumbs that themselves contain key patterns with
    /// candidates").
    DotKey(Node),
    /// `'[' INDEX-ITEM ']'` — likewise, matched against every element of
    /// the array at this step.
    IndexKey(Node),
    /// `**` — descend through any number of intermediate keys/indices.
    /// `optional_tail` mirrors the field clause's own optionality for the
    /// terminal step of the skip.
    SkipAny { optional_tail: bool },
}

/// The `-> BUCKET_REF<^LABEL>` target of a flow directive (spec §4.2,
/// §4.5).
#[derive(Debug, Clone)]
pub struct BucketRef {
    pub sigil: GroupSigil,
    pub name: String,
    pub label: Option<String>,
    pub span: Span,
}

/// One `(value, bucket)` arm of a field clause's flow chain, plus whether
/// the chain ends in a strong terminator (`else !`) that fails the branch
/// if no arm matched (spec §3.1 FieldClause.flow).
#[derive(Debug, Clone)]
pub struct FlowSpec {
    pub arms: Vec<(Node, BucketRef)>,
    pub strong_terminator: bool,
}

/// A `kvQuant` cardinality bound on the number of candidate keys a field
/// clause's match must contribute (spec §3.1, default `{1,∞}`, or
/// `{0,∞}` when `optional`).
pub type KvQuant = QuantRange;

#[derive(Debug, Clone)]
pub struct FieldClause {
    pub key: Node,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub value: Node,
    /// `else !` — every candidate key's value must match.
    pub strong: bool,
    /// disables the "at least one" existence requirement.
    pub optional: bool,
    pub kv_quant: KvQuant,
    pub flow: Option<FlowSpec>,
    pub span: Span,
}

/// The trailing `%` clause of an object body (spec §3.1, §4.3.3
/// "Remainder").
#[derive(Debug, Clone)]
pub struct Remainder {
    pub quant: Option<KvQuant>,
    pub bind: Option<String>,
    /// `(! %)` / `%#{0}` — asserts the remainder is empty ("closed
    /// object").
    pub closed: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum GroupInner {
    /// a contiguous array subsequence — inner is a `Seq`.
    Array(Box<Node>),
    /// a subset of object entries — inner is an `Object`.
    Object(Box<Node>),
}

#[derive(Debug, Clone)]
pub enum Kind {
    Literal(Literal),
    TypedWildcard(TypedWildcard),

    ScalarBind {
        name: String,
        inner: Box<Node>,
        guard: Option<GuardExpr>,
    },
    GroupBind {
        sigil: GroupSigil,
        name: String,
        inner: GroupInner,
    },

    /// A sequence inside an array context.
    Seq(Vec<Node>),

    Alt {
        branches: Vec<Node>,
        kind: AltKind,
    },

    /// Array repetition. Only meaningful as an element of a `Seq`.
    Quantified {
        inner: Box<Node>,
        range: QuantRange,
        mode: QuantMode,
    },

    /// A zero-width assertion over a `Seq` at the current array cursor.
    Lookahead {
        inner: Box<Node>,
        sign: LookaheadSign,
    },

    /// An anchored sequence of array-body items.
    Array {
        body: Box<Node>,
        label: Option<String>,
    },

    /// An unordered set of field clauses plus at most one remainder.
    Object {
        terms: Vec<FieldClause>,
        remainder: Option<Remainder>,
        label: Option<String>,
    },

    /// An anonymous guard wrapping a sub-pattern: `(PATTERN where EXPR)`.
    Guard {
        inner: Box<Node>,
        expr: GuardExpr,
    },
}

impl Node {
    pub fn literal(lit: Literal, span: Span) -> Self {
        Node::new(Kind::Literal(lit), span)
    }

    pub fn wildcard(w: TypedWildcard, span: Span) -> Self {
        Node::new(Kind::TypedWildcard(w), span)
    }

    /// Every name bound anywhere in this subtree, with the sigil it uses.
    /// Used by the parser to detect sigil collisions (spec §3.2) and by
    /// the compiler to validate flow-label ancestry (spec §4.5).
    pub fn collect_names<'a>(&'a self, out: &mut Vec<(&'a str, bool)>) {
        match &self.kind {
            Kind::Literal(_) | Kind::TypedWildcard(_) => {}
            Kind::ScalarBind { name, inner, .. } => {
                out.push((name, true));
                inner.collect_names(out);
            }
            Kind::GroupBind { name, inner, .. } => {
                out.push((name, false));
                match inner {
                    GroupInner::Array(n) | GroupInner::Object(n) => n.collect_names(out),
                }
            }
            Kind::Seq(items) => items.iter().for_each(|i| i.collect_names(out)),
            Kind::Alt { branches, .. } => branches.iter().for_each(|b| b.collect_names(out)),
            Kind::Quantified { inner, .. } => inner.collect_names(out),
            Kind::Lookahead { inner, .. } => inner.collect_names(out),
            Kind::Array { body, .. } => body.collect_names(out),
            Kind::Object { terms, remainder, .. } => {
                for term in terms {
                    term.key.collect_names(out);
                    for crumb in &term.breadcrumbs {
                        match crumb {
                            Breadcrumb::DotKey(n) | Breadcrumb::IndexKey(n) => n.collect_names(out),
                            Breadcrumb::SkipAny { .. } => {}
                        }
                    }
                    term.value.collect_names(out);
                    if let Some(flow) = &term.flow {
                        for (arm, _) in &flow.arms {
                            arm.collect_names(out);
                        }
                    }
                }
                if let Some(Remainder { bind: Some(name), .. }) = remainder {
                    out.push((name, false));
                }
            }
            Kind::Guard { inner, .. } => inner.collect_names(out),
        }
    }
}
