//! Scalar and group bindings (spec §3.2), stored as a copy-on-write
//! persistent map so cloning a branch's solution is cheap until the first
//! write diverges it from its parent (spec §9 "mutation, aliasing,
//! branching").

use std::rc::Rc;

use indexmap::IndexMap;

use crate::path::Site;
use crate::value::Value;

#[derive(Debug, Clone)]
pub enum GroupValue {
    Array(Vec<Value>),
    Object(IndexMap<String, Value>),
}

impl GroupValue {
    pub fn as_value(&self) -> Value {
        match self {
            GroupValue::Array(items) => Value::Array(items.clone()),
            GroupValue::Object(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum Binding {
    Scalar { value: Value, sites: Vec<Site> },
    Group { value: GroupValue, sites: Vec<Site> },
}

impl Binding {
    pub fn sites(&self) -> &[Site] {
        match self {
            Binding::Scalar { sites, .. } => sites,
            Binding::Group { sites, .. } => sites,
        }
    }
}

/// Copy-on-write map of bound names for the current branch. Cloning a
/// `Bindings` is `Rc::clone` (O(1)); the first structural write after a
/// clone pays the cost of diverging via `Rc::make_mut`.
#[derive(Debug, Clone, Default)]
pub struct Bindings(Rc<IndexMap<String, Binding>>);

impl Bindings {
    pub fn new() -> Self {
        Self(Rc::new(IndexMap::new()))
    }

    pub fn get(&self, name: &str) -> Option<&Binding> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Insert or overwrite a binding, returning a new `Bindings` that
    /// shares structure with `self` until mutated.
    pub fn inserted(&self, name: String, binding: Binding) -> Bindings {
        let mut next = self.clone();
        Rc::make_mut(&mut next.0).insert(name, binding);
        next
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}
