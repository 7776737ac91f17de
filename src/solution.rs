//! A single emitted solution: bindings, buckets, and (when the matched
//! pattern is rooted at an object) the coverage of that root object
//! (spec §3.2).

use crate::binding::{Binding, Bindings};
use crate::bucket::Buckets;
use crate::coverage::Coverage;
use crate::path::Site;
use crate::value::Value;

#[derive(Debug, Clone, Default)]
pub struct Solution {
    pub(crate) bindings: Bindings,
    pub(crate) buckets: Buckets,
    pub(crate) coverage: Coverage,
}

impl Solution {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The value bound to `name`, if any (spec §6.2 `solution.bindings`).
    pub fn binding(&self, name: &str) -> Option<Value> {
        match self.bindings.get(name)? {
            Binding::Scalar { value, .. } => Some(value.clone()),
            Binding::Group { value, .. } => Some(value.as_value()),
        }
    }

    /// All bound names and their values.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, Value)> {
        self.bindings.iter().map(|(name, binding)| {
            let value = match binding {
                Binding::Scalar { value, .. } => value.clone(),
                Binding::Group { value, .. } => value.as_value(),
            };
            (name, value)
        })
    }

    /// The sites that produced the binding for `name` (spec §6.2
    /// `solution.sites(name)`).
    pub fn sites(&self, name: &str) -> &[Site] {
        self.bindings.get(name).map_or(&[], |b| b.sites())
    }

    /// The read-only bucket map for this solution (spec §6.2
    /// `solution.buckets`).
    pub fn buckets(&self) -> impl Iterator<Item = (&str, Value)> {
        self.buckets.iter().map(|(k, v)| (k, v.as_value()))
    }

    pub fn bucket(&self, name: &str) -> Option<Value> {
        self.buckets.get(name).map(|v| v.as_value())
    }
}
