//! Object-body matching (spec §4.3.3, §4.4): each field clause enumerates
//! the candidate keys its key-pattern matches, navigates any breadcrumbs,
//! then matches (or flow-dispatches) the value at each candidate in turn.
//! A strong clause (`else !`) requires every candidate to succeed; a
//! non-strong clause treats each successful candidate as an independent
//! witness, branching the solution set.
//!
//! Finding candidate keys is a two-pass affair: a cheap existence-only
//! probe decides which keys are eligible at all, then a second, real pass
//! re-matches the key (and, for strong clauses, every other committed
//! key) against the solution accumulated so far — a key pattern that
//! itself binds (`$k: ...`) needs its binding visible to sibling clauses
//! in the same unification chain, which an existence probe alone can't
//! provide.

use indexmap::IndexMap;

use crate::ast::{Breadcrumb, FieldClause, FlowSpec, GroupSigil, Kind, Node, Remainder};
use crate::coverage::Coverage;
use crate::path::{Path, PathStep, Site, SiteKind};
use crate::solution::Solution;
use crate::value::{ObjectMap, Value};
use crate::binding::{Binding, GroupValue};

use super::{unify, Engine, Signal};

pub(crate) fn match_object_entry<'h>(
    engine: &mut Engine<'h>,
    terms: &[FieldClause],
    remainder: Option<&Remainder>,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let map = match value {
        Value::Object(m) => m,
        _ => return Signal::Continue,
    };
    match_terms(engine, terms, 0, map, path, solution, Coverage::new(), &mut |engine, sol, coverage| {
        let mut sol = sol;
        sol.coverage = coverage.clone();
        apply_remainder(engine, remainder, map, path, sol, &coverage, emit)
    })
}

/// `{ ... } as %name`: like [`match_object_entry`], but binds `name` to
/// the subset of entries the field clauses actually covered, rather than
/// the whole object (spec §4.3.4).
pub(crate) fn match_group_bind_object<'h>(
    engine: &mut Engine<'h>,
    name: &str,
    inner: &Node,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let (terms, remainder) = match &inner.kind {
        crate::ast::Kind::Object { terms, remainder, .. } => (terms, remainder.as_ref()),
        _ => return Signal::Continue,
    };
    let map = match value {
        Value::Object(m) => m,
        _ => return Signal::Continue,
    };
    match_terms(engine, terms, 0, map, path, solution, Coverage::new(), &mut |engine, sol, coverage| {
        apply_remainder(engine, remainder, map, path, sol, &coverage, &mut |engine, sol2| {
            let covered: IndexMap<String, Value> = map
                .iter()
                .filter(|(k, _)| coverage.contains(k))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            let site = Site::new(path.clone(), SiteKind::Group, Value::Object(covered.iter().map(|(k, v)| (k.clone(), v.clone())).collect()));
            match unify::bind_group(engine, &sol2, name, GroupValue::Object(covered), site) {
                Some(bound) => emit(engine, bound),
                None => Signal::Continue,
            }
        })
    })
}

/// Recurses through `terms` in source order; each clause threads the
/// solution and the running coverage of this object's keys to the next.
fn match_terms<'h>(
    engine: &mut Engine<'h>,
    terms: &[FieldClause],
    idx: usize,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    coverage: Coverage,
    cont: &mut dyn FnMut(&mut Engine<'h>, Solution, Coverage) -> Signal,
) -> Signal {
    if !engine.tick() {
        return Signal::Stop;
    }
    if idx == terms.len() {
        return cont(engine, solution, coverage);
    }
    let clause = &terms[idx];
    let next = &mut |engine: &mut Engine<'h>, sol: Solution, cov: Coverage| {
        match_terms(engine, terms, idx + 1, map, path, sol, cov, cont)
    };
    if clause.strong {
        match_strong_clause(engine, clause, map, path, solution, coverage, next)
    } else {
        match_nonstrong_clause(engine, clause, map, path, solution, coverage, next)
    }
}

fn match_strong_clause<'h>(
    engine: &mut Engine<'h>,
    clause: &FieldClause,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    coverage: Coverage,
    cont: &mut dyn FnMut(&mut Engine<'h>, Solution, Coverage) -> Signal,
) -> Signal {
    let candidates = candidate_keys(engine, &clause.key, map, path, &solution);
    if !clause.kv_quant.contains(candidates.len()) {
        return Signal::Continue;
    }
    let coverage_after = candidates.iter().fold(coverage, |c, k| c.touched(k));
    strong_commit_all(engine, &candidates, 0, clause, map, path, solution, &mut |engine, sol| {
        cont(engine, sol, coverage_after.clone())
    })
}

/// Every candidate key must contribute at least one success; the
/// recursion simply fails to reach its base case if any key's key/value
/// (or flow) match produces nothing.
fn strong_commit_all<'h>(
    engine: &mut Engine<'h>,
    candidates: &[String],
    idx: usize,
    clause: &FieldClause,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    cont: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    if idx == candidates.len() {
        return cont(engine, solution);
    }
    let key = &candidates[idx];
    match_field_value_for_key(engine, clause, key, map, path, solution, &mut |engine, sol| {
        strong_commit_all(engine, candidates, idx + 1, clause, map, path, sol, cont)
    })
}

/// Each successful candidate key stands on its own as a witness; the
/// kvQuant bound gates the count of candidates with at least one success,
/// checked once up front (spec §4.4 "Non-strong field clauses").
fn match_nonstrong_clause<'h>(
    engine: &mut Engine<'h>,
    clause: &FieldClause,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    coverage: Coverage,
    cont: &mut dyn FnMut(&mut Engine<'h>, Solution, Coverage) -> Signal,
) -> Signal {
    let candidates = candidate_keys(engine, &clause.key, map, path, &solution);
    let successful: Vec<String> = candidates
        .iter()
        .filter(|k| has_value_match(engine, clause, k, map, path, &solution))
        .cloned()
        .collect();
    if !clause.kv_quant.contains(successful.len()) {
        return Signal::Continue;
    }
    let coverage_after = candidates.iter().fold(coverage, |c, k| c.touched(k));
    if successful.is_empty() {
        return cont(engine, solution, coverage_after);
    }
    for key in &successful {
        let sig = match_field_value_for_key(engine, clause, key, map, path, solution.clone(), &mut |engine, sol| {
            cont(engine, sol, coverage_after.clone())
        });
        if sig.is_stop() {
            return Signal::Stop;
        }
    }
    Signal::Continue
}

/// Resolves the value a key-pattern should be matched against for one
/// candidate key. Ordinarily that's just the key itself as a string, but
/// spec §9's resolution of the "`$x` as a non-string object key" open
/// question makes a key pattern that is a bare reference to an
/// already-bound non-string scalar a *direct lookup* of that value
/// stringified, not a scan: only the one candidate key equal to its
/// stringified form can succeed, and it succeeds against the original
/// (non-string) bound value so an attached guard still sees its real type.
fn key_match_input(key_pattern: &Node, key: &str, base: &Solution) -> Option<Value> {
    if let Kind::ScalarBind { name, .. } = &key_pattern.kind {
        if let Some(Binding::Scalar { value: existing, .. }) = base.bindings.get(name) {
            if !matches!(existing, Value::String(_)) {
                return if crate::value::stringify_key(existing).as_deref() == Some(key) {
                    Some(existing.clone())
                } else {
                    None
                };
            }
        }
    }
    Some(Value::String(key.to_string()))
}

/// The subset of `map`'s keys the clause's key-pattern matches, in the
/// object's own iteration order. Existence-only: any bindings the key
/// pattern would make are discarded (spec §4.3.3 point 1).
fn candidate_keys(
    engine: &mut Engine<'_>,
    key_pattern: &Node,
    map: &ObjectMap,
    path: &Path,
    base: &Solution,
) -> Vec<String> {
    let mut out = Vec::new();
    for k in map.keys() {
        if !engine.tick() {
            break;
        }
        let Some(key_value) = key_match_input(key_pattern, k, base) else {
            continue;
        };
        let key_path = path.pushed(PathStep::Key(k.clone()));
        let mut found = false;
        engine.match_item(key_pattern, &key_value, &key_path, base.clone(), &mut |_engine, _sol| {
            found = true;
            Signal::Stop
        });
        if found {
            out.push(k.clone());
        }
    }
    out
}

fn has_value_match(
    engine: &mut Engine<'_>,
    clause: &FieldClause,
    key: &str,
    map: &ObjectMap,
    path: &Path,
    base: &Solution,
) -> bool {
    let mut found = false;
    match_field_value_for_key(engine, clause, key, map, path, base.clone(), &mut |_engine, _sol| {
        found = true;
        Signal::Stop
    });
    found
}

/// Real (binding-preserving) pass for one candidate key: re-matches the
/// key pattern, navigates breadcrumbs to the target value, then either
/// matches the clause's value pattern directly or dispatches through its
/// flow arms.
fn match_field_value_for_key<'h>(
    engine: &mut Engine<'h>,
    clause: &FieldClause,
    key: &str,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let key_path = path.pushed(PathStep::Key(key.to_string()));
    let Some(key_value) = key_match_input(&clause.key, key, &solution) else {
        return Signal::Continue;
    };
    engine.match_item(&clause.key, &key_value, &key_path, solution, &mut |engine, sol| {
        let target = map.get(key).expect("candidate key present in map");
        navigate_breadcrumbs(engine, &clause.breadcrumbs, 0, target, &key_path, sol, &mut |engine, target_value, target_path, sol| {
            match &clause.flow {
                Some(flow) => match_flow_arms(engine, flow, key, target_value, target_path, sol, emit),
                None => engine.match_item(&clause.value, target_value, target_path, sol, emit),
            }
        })
    })
}

/// Tries each flow arm's value pattern in order against `target`; the
/// first to match at all wins (spec §4.5: first-match priority, not full
/// enumeration across arms), recording `(key, target)` into its bucket.
/// A strong terminator's "no arm matched" failure is just the absence of
/// any emission, handled identically to any other clause failure.
#[allow(clippy::too_many_arguments)]
fn match_flow_arms<'h>(
    engine: &mut Engine<'h>,
    flow: &FlowSpec,
    key: &str,
    target: &Value,
    target_path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    for (arm_value, bucket_ref) in &flow.arms {
        let mut matched: Option<Solution> = None;
        engine.match_item(arm_value, target, target_path, solution.clone(), &mut |_engine, sol| {
            matched = Some(sol);
            Signal::Stop
        });
        if engine.limit_hit {
            return Signal::Stop;
        }
        if let Some(sol) = matched {
            let recorded = match bucket_ref.sigil {
                GroupSigil::Percent => sol.buckets.record_object(&bucket_ref.name, key, target.clone()),
                GroupSigil::At => sol.buckets.record_array(&bucket_ref.name, target.clone()),
            };
            return match recorded {
                Ok(buckets) => {
                    let mut sol2 = sol;
                    sol2.buckets = buckets;
                    emit(engine, sol2)
                }
                Err(_) => Signal::Continue,
            };
        }
    }
    Signal::Continue
}

/// Walks `crumbs[idx..]` from `value`, invoking `cont` at every point the
/// remaining breadcrumbs are satisfied. A `DotKey`/`IndexKey` step's
/// pattern is enumerated against every entry/element at this level (not
/// looked up directly), since the pattern may bind, wildcard, or
/// otherwise match more than one candidate — each one fans the navigation
/// out into its own branch (spec §4.4). `**` (`SkipAny`) fans out over
/// every descendant at every depth, including depth zero.
#[allow(clippy::too_many_arguments)]
fn navigate_breadcrumbs<'a, 'h>(
    engine: &mut Engine<'h>,
    crumbs: &[Breadcrumb],
    idx: usize,
    value: &'a Value,
    path: &Path,
    solution: Solution,
    cont: &mut dyn FnMut(&mut Engine<'h>, &'a Value, &Path, Solution) -> Signal,
) -> Signal {
    if idx == crumbs.len() {
        return cont(engine, value, path, solution);
    }
    match &crumbs[idx] {
        Breadcrumb::DotKey(key_pattern) => match value {
            Value::Object(map) => {
                for (k, v) in map.iter() {
                    if !engine.tick() {
                        return Signal::Stop;
                    }
                    let Some(key_value) = key_match_input(key_pattern, k, &solution) else {
                        continue;
                    };
                    let key_path = path.pushed(PathStep::Key(k.clone()));
                    let sig = engine.match_item(key_pattern, &key_value, &key_path, solution.clone(), &mut |engine, sol| {
                        navigate_breadcrumbs(engine, crumbs, idx + 1, v, &key_path, sol, cont)
                    });
                    if sig.is_stop() {
                        return Signal::Stop;
                    }
                }
                Signal::Continue
            }
            _ => Signal::Continue,
        },
        Breadcrumb::IndexKey(index_pattern) => match value {
            Value::Array(items) => {
                for (i, v) in items.iter().enumerate() {
                    if !engine.tick() {
                        return Signal::Stop;
                    }
                    let index_path = path.pushed(PathStep::Index(i));
                    let index_value = Value::from(i as u64);
                    let sig = engine.match_item(index_pattern, &index_value, &index_path, solution.clone(), &mut |engine, sol| {
                        navigate_breadcrumbs(engine, crumbs, idx + 1, v, &index_path, sol, cont)
                    });
                    if sig.is_stop() {
                        return Signal::Stop;
                    }
                }
                Signal::Continue
            }
            _ => Signal::Continue,
        },
        Breadcrumb::SkipAny { .. } => descend_all(engine, crumbs, idx + 1, value, path, solution, cont),
    }
}

fn descend_all<'a, 'h>(
    engine: &mut Engine<'h>,
    crumbs: &[Breadcrumb],
    next_idx: usize,
    value: &'a Value,
    path: &Path,
    solution: Solution,
    cont: &mut dyn FnMut(&mut Engine<'h>, &'a Value, &Path, Solution) -> Signal,
) -> Signal {
    if !engine.tick() {
        return Signal::Stop;
    }
    let sig = navigate_breadcrumbs(engine, crumbs, next_idx, value, path, solution.clone(), cont);
    if sig.is_stop() {
        return Signal::Stop;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter() {
                let child_path = path.pushed(PathStep::Key(k.clone()));
                let sig = descend_all(engine, crumbs, next_idx, v, &child_path, solution.clone(), cont);
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                let child_path = path.pushed(PathStep::Index(i));
                let sig = descend_all(engine, crumbs, next_idx, v, &child_path, solution.clone(), cont);
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
        }
        _ => {}
    }
    Signal::Continue
}

/// The trailing `%` clause: whatever keys the field clauses didn't touch,
/// gated by an optional cardinality bound and optionally bound to a name
/// (spec §4.3.3 "Remainder"). With no explicit bound, a non-empty
/// remainder is required — `%` alone asserts "there is more".
fn apply_remainder<'h>(
    engine: &mut Engine<'h>,
    remainder: Option<&Remainder>,
    map: &ObjectMap,
    path: &Path,
    solution: Solution,
    coverage: &Coverage,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let uncovered: Vec<(String, Value)> = map
        .iter()
        .filter(|(k, _)| !coverage.contains(k.as_str()))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect();
    let Some(r) = remainder else {
        return emit(engine, solution);
    };
    match &r.quant {
        Some(quant) => {
            if !quant.contains(uncovered.len()) {
                return Signal::Continue;
            }
        }
        None => {
            if uncovered.is_empty() {
                return Signal::Continue;
            }
        }
    }
    let mut sol = solution;
    if let Some(name) = &r.bind {
        let group: IndexMap<String, Value> = uncovered.iter().cloned().collect();
        let site = Site::new(path.clone(), SiteKind::Group, Value::Object(group.iter().map(|(k, v)| (k.clone(), v.clone())).collect()));
        match unify::bind_group(engine, &sol, name, GroupValue::Object(group), site) {
            Some(bound) => sol = bound,
            None => return Signal::Continue,
        }
    }
    emit(engine, sol)
}
