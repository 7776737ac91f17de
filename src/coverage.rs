//! Tracks which keys of an object node have been "touched" by a field
//! clause in the current branch (spec §3.2, §4.3.3 "Remainder"). Coverage
//! is local to the object node currently being matched — each nested
//! `Object` node threads its own `Coverage` — and is branch-local and
//! monotonically growing within a branch (spec §3.2 invariants).

use std::rc::Rc;

use indexmap::IndexSet;

/// Copy-on-write set of covered keys, scoped to one `Object` node's match
/// attempt.
#[derive(Debug, Clone, Default)]
pub struct Coverage(Rc<IndexSet<String>>);

impl Coverage {
    pub fn new() -> Self {
        Self(Rc::new(IndexSet::new()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn touched(&self, key: &str) -> Coverage {
        if self.0.contains(key) {
            return self.clone();
        }
        let mut next = self.clone();
        Rc::make_mut(&mut next.0).insert(key.to_string());
        next
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|s| s.as_str())
    }
}
