//! The generic single-value dispatcher: given one [`Node`] and one
//! [`Value`], tries every way the node's kind can match that value. Every
//! other engine module bottoms out here for any sub-pattern that isn't
//! itself a `Seq` element (spec §4.3.1, §4.6 node dispatch table).

use crate::ast::{AltKind, GroupInner, GroupSigil, Kind, Literal, Node, TypedWildcard};
use crate::error::GuardFailure;
use crate::guard::{self, GuardExpr};
use crate::path::{Path, Site, SiteKind};
use crate::solution::Solution;
use crate::value::{self, Value};

use super::guard_env::SolutionGuardEnv;
use super::{array, object, unify, Engine, Signal};

impl<'h> Engine<'h> {
    /// Matches `node` against `value`, invoking `emit` once per solution
    /// this node's kind can produce. `Seq`, `Quantified`, and `Lookahead`
    /// only make sense as array-body elements and are dispatched by
    /// [`array::match_seq`] instead — reaching them here means a
    /// malformed AST escaped the parser's own production rules.
    pub(crate) fn match_item(
        &mut self,
        node: &Node,
        value: &Value,
        path: &Path,
        solution: Solution,
        emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
    ) -> Signal {
        if !self.tick() {
            return Signal::Stop;
        }
        let kind_name = node_kind_name(&node.kind);
        self.hooks.on_enter(kind_name, path);
        let mut matched = false;
        let sig = {
            let mut wrapped = |engine: &mut Engine<'h>, sol: Solution| {
                matched = true;
                emit(engine, sol)
            };
            match &node.kind {
                Kind::Literal(lit) => match_literal(self, lit, value, solution, &mut wrapped),
                Kind::TypedWildcard(w) => match_wildcard(self, *w, value, solution, &mut wrapped),
                Kind::ScalarBind { name, inner, guard } => {
                    match_scalar_bind(self, name, inner, guard.as_ref(), value, path, solution, &mut wrapped)
                }
                Kind::GroupBind { sigil, name, inner } => {
                    match_group_bind(self, *sigil, name, inner, value, path, solution, &mut wrapped)
                }
                Kind::Alt { branches, kind } => match_alt(self, branches, *kind, value, path, solution, &mut wrapped),
                Kind::Guard { inner, expr } => match_guard(self, inner, expr, value, path, solution, &mut wrapped),
                Kind::Array { body, .. } => array::match_array_value(self, body, value, path, solution, &mut wrapped),
                Kind::Object { terms, remainder, .. } => {
                    object::match_object_entry(self, terms, remainder.as_ref(), value, path, solution, &mut wrapped)
                }
                Kind::Seq(_) | Kind::Quantified { .. } | Kind::Lookahead { .. } => {
                    unreachable!("Seq/Quantified/Lookahead are only valid as array-body elements")
                }
            }
        };
        self.hooks.on_exit(kind_name, path, matched);
        sig
    }
}

fn node_kind_name(kind: &Kind) -> &'static str {
    match kind {
        Kind::Literal(_) => "literal",
        Kind::TypedWildcard(_) => "typed_wildcard",
        Kind::ScalarBind { .. } => "scalar_bind",
        Kind::GroupBind { .. } => "group_bind",
        Kind::Seq(_) => "seq",
        Kind::Alt { .. } => "alt",
        Kind::Quantified { .. } => "quantified",
        Kind::Lookahead { .. } => "lookahead",
        Kind::Array { .. } => "array",
        Kind::Object { .. } => "object",
        Kind::Guard { .. } => "guard",
    }
}

fn match_literal<'h>(
    engine: &mut Engine<'h>,
    lit: &Literal,
    value: &Value,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let ok = match lit {
        Literal::Number(n) => value::same_value_zero(&Value::from(*n), value),
        Literal::Bool(b) => value::same_value_zero(&Value::Bool(*b), value),
        Literal::Null => value::same_value_zero(&Value::Null, value),
        Literal::String { exact, case_insensitive } => match value {
            Value::String(s) => {
                if *case_insensitive {
                    s.to_lowercase() == exact.to_lowercase()
                } else {
                    s == exact
                }
            }
            _ => false,
        },
        Literal::Regex { pattern, flags } => match value {
            Value::String(s) => engine
                .regex_cache
                .get_or_compile(pattern, flags)
                .is_some_and(|re| re.is_match(s)),
            _ => false,
        },
    };
    if ok {
        emit(engine, solution)
    } else {
        Signal::Continue
    }
}

fn match_wildcard<'h>(
    engine: &mut Engine<'h>,
    w: TypedWildcard,
    value: &Value,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    let ok = match w {
        TypedWildcard::Any => true,
        TypedWildcard::StringWild => matches!(value, Value::String(_)),
        TypedWildcard::NumberWild => matches!(value, Value::Number(_)),
        TypedWildcard::BooleanWild => matches!(value, Value::Bool(_)),
    };
    if ok {
        emit(engine, solution)
    } else {
        Signal::Continue
    }
}

fn match_scalar_bind<'h>(
    engine: &mut Engine<'h>,
    name: &str,
    inner: &Node,
    guard: Option<&GuardExpr>,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    engine.match_item(inner, value, path, solution, &mut |engine, sol| {
        let site = Site::new(path.clone(), SiteKind::Scalar, value.clone());
        match unify::bind_scalar(engine, &sol, name, value.clone(), site) {
            Some(bound) => match guard {
                Some(expr) => match eval_guard(expr, &bound, value) {
                    Ok(true) => emit(engine, bound),
                    Ok(false) | Err(GuardFailure) => Signal::Continue,
                },
                None => emit(engine, bound),
            },
            None => Signal::Continue,
        }
    })
}

fn match_group_bind<'h>(
    engine: &mut Engine<'h>,
    sigil: GroupSigil,
    name: &str,
    inner: &GroupInner,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    match (sigil, inner) {
        (GroupSigil::At, GroupInner::Array(seq_node)) => {
            array::match_group_bind_array(engine, seq_node, name, value, path, solution, emit)
        }
        (GroupSigil::Percent, GroupInner::Object(obj_node)) => {
            object::match_group_bind_object(engine, name, obj_node, value, path, solution, emit)
        }
        _ => unreachable!("the parser only pairs '@' with an array body and '%' with an object body"),
    }
}

fn match_alt<'h>(
    engine: &mut Engine<'h>,
    branches: &[Node],
    kind: AltKind,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    match kind {
        AltKind::AnyOf => {
            for branch in branches {
                let sig = engine.match_item(branch, value, path, solution.clone(), emit);
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
            Signal::Continue
        }
        AltKind::Else => {
            for branch in branches {
                let mut any = false;
                let sig = engine.match_item(branch, value, path, solution.clone(), &mut |engine, sol| {
                    any = true;
                    emit(engine, sol)
                });
                if sig.is_stop() {
                    return Signal::Stop;
                }
                if any {
                    return Signal::Continue;
                }
            }
            Signal::Continue
        }
    }
}

fn match_guard<'h>(
    engine: &mut Engine<'h>,
    inner: &Node,
    expr: &GuardExpr,
    value: &Value,
    path: &Path,
    solution: Solution,
    emit: &mut dyn FnMut(&mut Engine<'h>, Solution) -> Signal,
) -> Signal {
    engine.match_item(inner, value, path, solution, &mut |engine, sol| {
        match eval_guard(expr, &sol, value) {
            Ok(true) => emit(engine, sol),
            Ok(false) | Err(GuardFailure) => Signal::Continue,
        }
    })
}

fn eval_guard(expr: &GuardExpr, solution: &Solution, underscore: &Value) -> Result<bool, GuardFailure> {
    let env = SolutionGuardEnv::new(solution, underscore);
    let v = guard::evaluate(expr, &env)?;
    v.as_bool().ok_or(GuardFailure)
}
