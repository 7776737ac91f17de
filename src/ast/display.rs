//! AST pretty-printing via `ptree`, grounded in the teacher's (`lang-pt`)
//! `ASTNode: TreeItem` implementation. Used by debug tooling and the
//! `tendril-cli` companion binary, never by the engine itself.

use super::{Breadcrumb, GroupInner, Kind, Node};
use ptree::TreeItem;
use std::borrow::Cow;
use std::fmt::{Debug, Formatter};

impl Debug for super::Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            super::Literal::Number(n) => write!(f, "{}", n),
            super::Literal::Bool(b) => write!(f, "{}", b),
            super::Literal::Null => write!(f, "null"),
            super::Literal::String {
                exact,
                case_insensitive,
            } => write!(
                f,
                "{:?}{}",
                exact,
                if *case_insensitive { "/i" } else { "" }
            ),
            super::Literal::Regex { pattern, flags } => write!(f, "/{}/{}", pattern, flags),
        }
    }
}

fn label(node: &Node) -> String {
    match &node.kind {
        Kind::Literal(lit) => format!("{:?}", lit),
        Kind::TypedWildcard(w) => format!("{:?}", w),
        Kind::ScalarBind { name, .. } => format!("${} as", name),
        Kind::GroupBind { sigil, name, .. } => {
            let s = match sigil {
                super::GroupSigil::Percent => '%',
                super::GroupSigil::At => '@',
            };
            format!("{}{} as", s, name)
        }
        Kind::Seq(items) => format!("Seq[{}]", items.len()),
        Kind::Alt { kind, branches } => format!("{:?}({})", kind, branches.len()),
        Kind::Quantified { range, mode, .. } => format!(
            "{{{},{}}} {:?}",
            range.min,
            range.max.map_or("inf".to_string(), |m| m.to_string()),
            mode
        ),
        Kind::Lookahead { sign, .. } => format!("{:?} lookahead", sign),
        Kind::Array { label, .. } => match label {
            Some(l) => format!("Array §{}", l),
            None => "Array".to_string(),
        },
        Kind::Object { terms, label, .. } => match label {
            Some(l) => format!("Object §{} ({} terms)", l, terms.len()),
            None => format!("Object ({} terms)", terms.len()),
        },
        Kind::Guard { .. } => "Guard".to_string(),
    }
}

fn children_of(node: &Node) -> Vec<Node> {
    match &node.kind {
        Kind::Literal(_) | Kind::TypedWildcard(_) => vec![],
        Kind::ScalarBind { inner, .. } => vec![(**inner).clone()],
        Kind::GroupBind { inner, .. } => match inner {
            GroupInner::Array(n) | GroupInner::Object(n) => vec![(**n).clone()],
        },
        Kind::Seq(items) => items.clone(),
        Kind::Alt { branches, .. } => branches.clone(),
        Kind::Quantified { inner, .. } => vec![(**inner).clone()],
        Kind::Lookahead { inner, .. } => vec![(**inner).clone()],
        Kind::Array { body, .. } => vec![(**body).clone()],
        Kind::Object { terms, .. } => terms
            .iter()
            .flat_map(|t| {
                let mut children = vec![t.key.clone()];
                for crumb in &t.breadcrumbs {
                    match crumb {
                        Breadcrumb::DotKey(n) | Breadcrumb::IndexKey(n) => children.push(n.clone()),
                        Breadcrumb::SkipAny { .. } => {}
                    }
                }
                children.push(t.value.clone());
                children
            })
            .collect(),
        Kind::Guard { inner, .. } => vec![(**inner).clone()],
    }
}

impl TreeItem for Node {
    type Child = Node;

    fn write_self<W: std::io::Write>(&self, f: &mut W, _: &ptree::Style) -> std::io::Result<()> {
        write!(f, "{} # {}-{}", label(self), self.span.start, self.span.end)
    }

    fn children(&self) -> Cow<[Self::Child]> {
        Cow::from(children_of(self))
    }
}

impl Node {
    pub fn print(&self) -> Result<(), std::io::Error> {
        ptree::print_tree(self)
    }
}
