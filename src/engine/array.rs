//! Array-body matching (spec §4.3.2): a positional cursor over array
//! elements, advanced by `Seq` with regex-style backtracking through
//! `Quantified` and `Lookahead` items.
//!
//! `@name` group captures are handled uniformly whether they arise from
//! the bare `@name` sugar or an explicit `[...] as @name`: both desugar to
//! a `GroupInner::Array` wrapping a `Seq`, and capturing is just running
//! that inner `Seq` against the surrounding array starting at the current
//! cursor — wherever it stops defines both the captured span and the
//! resuming cursor (see `DESIGN.md` "engine/array").

use crate::ast::{GroupSigil, Kind, LookaheadSign, Node, QuantMode};
use crate::binding::GroupValue;
use crate::path::{Path, PathStep, Site, SiteKind};
use crate::solution::Solution;
use crate::value::Value;

use super::{unify, Engine, Signal};

/// A continuation over array matching that also reports where the cursor
/// ended up, so callers (quantifiers, group captures, the anchored
/// top-level entry points) can decide whether to keep going, retry a
/// different count, or require full consumption.
type SeqCont<'a, 'h> = &'a mut dyn FnMut(&mut Engine<'h>, Solution, usize) -> Signal;

/// Unwraps the `Seq` of array-body items from either a bare `Seq` node or
/// an `Array { body, .. }` node (the two shapes a `GroupInner::Array` can
/// hold, depending on whether it came from `@name` sugar or `[...] as
/// @name`).
pub(crate) fn seq_items(node: &Node) -> &[Node] {
    match &node.kind {
        Kind::Seq(items) => items,
        Kind::Array { body, .. } => seq_items(body),
        _ => std::slice::from_ref(node),
    }
}

/// Generic (non-group) anchored array match: `value` must be an array and
/// `body`'s items must consume it in full.
pub(crate) fn match_array_value<'h>(
    engine: &mut Engine<'h>,
    body: &Node,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let arr = match value {
        Value::Array(items) => items,
        _ => return Signal::Continue,
    };
    let items = seq_items(body);
    match_seq(engine, items, 0, arr, 0, path, solution, &mut |engine, sol, end_idx| {
        if end_idx == arr.len() {
            emit(engine, sol)
        } else {
            Signal::Continue
        }
    })
}

/// Generic (non-Seq-element) `@name` binding: `value` must be an array and
/// the inner pattern must consume it in full; the whole array is captured
/// (spec §4.3.4 "group capture always yields a group").
pub(crate) fn match_group_bind_array<'h>(
    engine: &mut Engine<'h>,
    inner: &Node,
    name: &str,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let arr = match value {
        Value::Array(items) => items,
        _ => return Signal::Continue,
    };
    let items = seq_items(inner);
    match_seq(engine, items, 0, arr, 0, path, solution, &mut |engine, sol, end_idx| {
        if end_idx != arr.len() {
            return Signal::Continue;
        }
        let site = Site::new(path.clone(), SiteKind::Group, value.clone());
        match unify::bind_group(engine, &sol, name, GroupValue::Array(arr.clone()), site) {
            Some(bound) => emit(engine, bound),
            None => Signal::Continue,
        }
    })
}

/// The core backtracking recursion over one array body: `items[ip..]`
/// matched against `arr[iv..]`. `cont` is invoked once the pattern items
/// are exhausted, reporting the value-cursor the recursion stopped at —
/// callers that require full consumption (anchored arrays, whole-array
/// group binds) check `end_idx == arr.len()` themselves.
pub(crate) fn match_seq<'h>(
    engine: &mut Engine<'h>,
    items: &[Node],
    ip: usize,
    arr: &[Value],
    iv: usize,
    path: &Path,
    solution: Solution,
    cont: SeqCont<'_, 'h>,
) -> Signal {
    if !engine.tick() {
        return Signal::Stop;
    }
    if ip == items.len() {
        return cont(engine, solution, iv);
    }
    match &items[ip].kind {
        Kind::Quantified { inner, range, mode } => {
            match_quantified(engine, items, ip, inner, *range, *mode, arr, iv, path, solution, cont)
        }
        Kind::Lookahead { inner, sign } => {
            match_lookahead(engine, items, ip, inner, *sign, arr, iv, path, solution, cont)
        }
        Kind::GroupBind {
            sigil: GroupSigil::At,
            name,
            inner: crate::ast::GroupInner::Array(inner_seq),
        } => match_group_subsequence(engine, items, ip, inner_seq, name, arr, iv, path, solution, cont),
        _ => {
            if iv >= arr.len() {
                return Signal::Continue;
            }
            let elem_path = path.pushed(PathStep::Index(iv));
            engine.match_item(&items[ip], &arr[iv], &elem_path, solution, &mut |engine, sol| {
                match_seq(engine, items, ip + 1, arr, iv + 1, path, sol, cont)
            })
        }
    }
}

/// Matches `inner` against exactly `n` consecutive array elements starting
/// at `start`, threading bindings across all `n` matches, then invokes
/// `cont` with the resulting value-cursor `start + n`.
fn match_exactly_n<'h>(
    engine: &mut Engine<'h>,
    inner: &Node,
    n: usize,
    arr: &[Value],
    start: usize,
    path: &Path,
    solution: Solution,
    cont: SeqCont<'_, 'h>,
) -> Signal {
    if n == 0 {
        return cont(engine, solution, start);
    }
    if start >= arr.len() {
        return Signal::Continue;
    }
    let elem_path = path.pushed(PathStep::Index(start));
    engine.match_item(inner, &arr[start], &elem_path, solution, &mut |engine, sol| {
        match_exactly_n(engine, inner, n - 1, arr, start + 1, path, sol, cont)
    })
}

#[allow(clippy::too_many_arguments)]
fn match_quantified<'h>(
    engine: &mut Engine<'h>,
    items: &[Node],
    ip: usize,
    inner: &Node,
    range: crate::ast::QuantRange,
    mode: QuantMode,
    arr: &[Value],
    iv: usize,
    path: &Path,
    solution: Solution,
    cont: SeqCont<'_, 'h>,
) -> Signal {
    let remaining = arr.len() - iv;
    let max_count = range.max.unwrap_or(remaining).min(remaining);
    if range.min > max_count {
        return Signal::Continue;
    }
    let step = |engine: &mut Engine<'h>, count: usize, solution: Solution| {
        match_exactly_n(engine, inner, count, arr, iv, path, solution, &mut |engine, sol, end_idx| {
            match_seq(engine, items, ip + 1, arr, end_idx, path, sol, cont)
        })
    };
    match mode {
        QuantMode::Greedy => {
            let mut count = max_count;
            loop {
                let sig = step(engine, count, solution.clone());
                if sig.is_stop() {
                    return Signal::Stop;
                }
                if count == range.min {
                    break;
                }
                count -= 1;
            }
            Signal::Continue
        }
        QuantMode::Lazy => {
            for count in range.min..=max_count {
                let sig = step(engine, count, solution.clone());
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
            Signal::Continue
        }
        QuantMode::Possessive => step(engine, max_count, solution),
    }
}

#[allow(clippy::too_many_arguments)]
fn match_lookahead<'h>(
    engine: &mut Engine<'h>,
    items: &[Node],
    ip: usize,
    inner: &Node,
    sign: LookaheadSign,
    arr: &[Value],
    iv: usize,
    path: &Path,
    solution: Solution,
    cont: SeqCont<'_, 'h>,
) -> Signal {
    let inner_items = seq_items(inner);
    match sign {
        LookaheadSign::Positive => {
            // Commits every distinct binding shape the inner pattern can
            // produce at this cursor, without advancing it (spec §4.3.2).
            match_seq(engine, inner_items, 0, arr, iv, path, solution, &mut |engine, sol, _end_idx| {
                match_seq(engine, items, ip + 1, arr, iv, path, sol, cont)
            })
        }
        LookaheadSign::Negative => {
            let mut any = false;
            match_seq(engine, inner_items, 0, arr, iv, path, solution.clone(), &mut |_engine, _sol, _end_idx| {
                any = true;
                Signal::Stop
            });
            if engine.limit_hit {
                return Signal::Stop;
            }
            if any {
                Signal::Continue
            } else {
                match_seq(engine, items, ip + 1, arr, iv, path, solution, cont)
            }
        }
    }
}

/// `@name` (or `[...] as @name`) appearing as a `Seq` element: runs the
/// inner pattern's own sequence matcher against the surrounding array
/// starting at the current cursor; wherever it stops defines the captured
/// span `[iv, end_idx)` and the cursor for the rest of the outer `Seq`.
#[allow(clippy::too_many_arguments)]
fn match_group_subsequence<'h>(
    engine: &mut Engine<'h>,
    items: &[Node],
    ip: usize,
    inner_seq: &Node,
    name: &str,
    arr: &[Value],
    iv: usize,
    path: &Path,
    solution: Solution,
    cont: SeqCont<'_, 'h>,
) -> Signal {
    let inner_items = seq_items(inner_seq);
    let start_path = path.pushed(PathStep::Index(iv));
    match_seq(engine, inner_items, 0, arr, iv, path, solution, &mut |engine, sol, end_idx| {
        let captured: Vec<Value> = arr[iv..end_idx].to_vec();
        let site = Site::new(start_path.clone(), SiteKind::Group, Value::Array(captured.clone()));
        match unify::bind_group(engine, &sol, name, GroupValue::Array(captured), site) {
            Some(bound) => match_seq(engine, items, ip + 1, arr, end_idx, path, bound, cont),
            None => Signal::Continue,
        }
    })
}
