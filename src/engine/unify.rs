//! Binding unification (spec §4.3.3 "Unification on binding", §4.3.4
//! scalar/group discipline): binding a name that is already bound succeeds
//! only if the new value is SameValueZero-equal to the old one.

use crate::binding::{Binding, GroupValue};
use crate::path::{Site, SiteKind};
use crate::solution::Solution;
use crate::value::{self, Value};

use super::{Engine, EngineHooks};

/// Binds `name` to `value` at `site`, unifying against any existing
/// scalar binding. Returns `None` if `name` is already bound to a
/// different value, or is already a group binding (the parser rejects
/// sigil collisions, so this should not happen for well-formed ASTs).
pub(crate) fn bind_scalar(
    engine: &mut Engine<'_>,
    solution: &Solution,
    name: &str,
    value: Value,
    site: Site,
) -> Option<Solution> {
    let mut next = solution.clone();
    match next.bindings.get(name) {
        None => {
            engine.hooks.on_bind(SiteKind::Scalar, name, &value);
            let binding = Binding::Scalar { value, sites: vec![site] };
            next.bindings = next.bindings.inserted(name.to_string(), binding);
            Some(next)
        }
        Some(Binding::Scalar { value: existing, sites }) => {
            if !value::same_value_zero(existing, &value) {
                return None;
            }
            let mut sites = sites.clone();
            sites.push(site);
            let binding = Binding::Scalar { value, sites };
            next.bindings = next.bindings.inserted(name.to_string(), binding);
            Some(next)
        }
        Some(Binding::Group { .. }) => None,
    }
}

/// Binds group name `name` to `value` (an array subsequence or object
/// subset), unifying structurally against any existing group binding of
/// the same name — used for repeated `@name`/`%name` captures (spec §8
/// scenario 6, `[@x @x]`).
pub(crate) fn bind_group(
    engine: &mut Engine<'_>,
    solution: &Solution,
    name: &str,
    value: GroupValue,
    site: Site,
) -> Option<Solution> {
    let mut next = solution.clone();
    match next.bindings.get(name) {
        None => {
            engine.hooks.on_bind(SiteKind::Group, name, &value.as_value());
            let binding = Binding::Group { value, sites: vec![site] };
            next.bindings = next.bindings.inserted(name.to_string(), binding);
            Some(next)
        }
        Some(Binding::Group { value: existing, sites }) => {
            if !value::same_value_zero(&existing.as_value(), &value.as_value()) {
                return None;
            }
            let mut sites = sites.clone();
            sites.push(site);
            let binding = Binding::Group { value, sites };
            next.bindings = next.bindings.inserted(name.to_string(), binding);
            Some(next)
        }
        Some(Binding::Scalar { .. }) => None,
    }
}
