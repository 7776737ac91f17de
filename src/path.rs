use std::fmt::{Display, Formatter};

use crate::value::Value;

/// One navigation step from the root of the matched tree to a bound value.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum PathStep {
    Key(String),
    Index(usize),
}

impl Display for PathStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PathStep::Key(k) => write!(f, ".{}", k),
            PathStep::Index(i) => write!(f, "[{}]", i),
        }
    }
}

/// Sequence of steps from the matched root to a bound node.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
pub struct Path(pub Vec<PathStep>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    pub fn pushed(&self, step: PathStep) -> Path {
        let mut steps = self.0.clone();
        steps.push(step);
        Path(steps)
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "$")?;
        for step in &self.0 {
            write!(f, "{}", step)?;
        }
        Ok(())
    }
}

/// Whether a [`Site`] came from a scalar (`$`) or group (`%`/`@`) capture.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum SiteKind {
    Scalar,
    Group,
}

/// Identifies where in the matched tree a binding's value was produced.
/// The core hands these out as immutable descriptors; structural editing
/// (an external collaborator, spec §6.2) consumes them to locate splice
/// points.
#[derive(Debug, Clone)]
pub struct Site {
    pub path: Path,
    pub kind: SiteKind,
    pub value: Value,
}

impl Site {
    pub fn new(path: Path, kind: SiteKind, value: Value) -> Self {
        Self { path, kind, value }
    }
}
