//! The backtracking evaluator over [`crate::ast::Node`] (spec §4.3–§4.6):
//! a single-threaded, cooperative, lazy enumerator of [`Solution`]s.
//!
//! Per `SPEC_FULL.md` §4.3–4.5, the engine is expressed as a family of
//! `fn(&mut self, ...) -> Signal` methods threading an `Emit` callback
//! rather than allocated `Iterator`/generator state machines — any
//! strategy is acceptable as long as the ordering and cancellation
//! contracts of spec §5 hold. [`Pattern::for_each_match`] /
//! [`Pattern::for_each_scan`] are the true lazy, cooperative primitives
//! (the callback can return [`Signal::Stop`] to cancel the search at any
//! point without materializing further solutions); `match_value` / `scan`
//! are convenience adapters built on top that eagerly collect into a
//! `Vec` (see `DESIGN.md` "engine" for why full external laziness was not
//! chosen).

mod array;
mod guard_env;
mod hooks;
mod item;
mod object;
mod regex_cache;
mod unify;

pub use hooks::{EngineHooks, NullEngineHooks};

use crate::ast::Node;
use crate::error::{CompileError, SemanticError};
use crate::parser::{self, ParserHooks};
use crate::path::{Path, PathStep};
use crate::solution::Solution;
use crate::value::Value;
use regex_cache::RegexCache;

/// Whether a cooperative enumeration should keep searching for further
/// solutions or stop immediately (spec §4.6 "cooperative cancellation").
/// `Stop` is also how the engine unwinds once its step budget is spent;
/// [`Engine::limit_hit`] records which of the two actually happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Stop,
}

impl Signal {
    fn stop_if(cond: bool) -> Signal {
        if cond {
            Signal::Stop
        } else {
            Signal::Continue
        }
    }

    fn is_stop(self) -> bool {
        matches!(self, Signal::Stop)
    }
}

/// Tunables for a single `match`/`scan` call (spec §4.6, §6.2).
#[derive(Debug, Clone)]
pub struct MatchOptions {
    /// Aborts runaway backtracking; decremented once per engine node visit
    /// (spec §4.6 "reasonable default ~1e6 steps").
    pub step_budget: u64,
    /// Stop collecting once this many solutions have been emitted, in
    /// addition to (not instead of) the step budget.
    pub max_solutions: Option<usize>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            step_budget: 1_000_000,
            max_solutions: None,
        }
    }
}

/// The result of a non-streaming `match_value`/`scan` call: every solution
/// collected before either the caller's `max_solutions` cap or the step
/// budget was reached, plus whether the latter is what stopped it (spec
/// §7 "`LimitExceeded` ... partial results emitted before the limit remain
/// valid").
#[derive(Debug, Clone, Default)]
pub struct Outcome {
    pub solutions: Vec<Solution>,
    pub limit_exceeded: bool,
}

/// One hit of a [`Pattern::scan`]: the path at which the pattern matched
/// anchored, plus the solution produced there.
#[derive(Debug, Clone)]
pub struct ScanHit {
    pub path: Path,
    pub solution: Solution,
}

#[derive(Debug, Clone, Default)]
pub struct ScanOutcome {
    pub hits: Vec<ScanHit>,
    pub limit_exceeded: bool,
}

/// A compiled, matchable pattern (spec §6.2 `compile(patternSource) →
/// (AST | ParseError)`). Immutable and shared by reference across
/// matching calls — the engine never mutates the AST (spec §5 "the AST is
/// immutable and shared by reference").
pub struct Pattern {
    ast: Node,
    is_slice_pattern: bool,
}

impl Pattern {
    /// Compiles `source` with no parser hooks installed.
    pub fn compile(source: &str) -> Result<Pattern, CompileError> {
        Self::compile_with_hooks(source, &mut parser::NullParserHooks)
    }

    pub fn compile_with_hooks(
        source: &str,
        hooks: &mut dyn ParserHooks,
    ) -> Result<Pattern, CompileError> {
        let compiled = parser::parse_with_hooks(source, hooks)?;
        Ok(Pattern {
            ast: compiled.ast,
            is_slice_pattern: compiled.is_slice_pattern,
        })
    }

    pub fn ast(&self) -> &Node {
        &self.ast
    }

    /// `true` for a pattern written with a leading `@{…}`/`@[…]` — valid
    /// only for [`Pattern::scan`], rejected by [`Pattern::match_value`]
    /// (spec §4.2 "Top-level slice patterns", §9 open question #3).
    pub fn is_slice_pattern(&self) -> bool {
        self.is_slice_pattern
    }

    /// The lazy, cooperative primitive behind `match_value`: matches
    /// `self` anchored at `root`, invoking `emit` for each solution found
    /// in deterministic order (spec §5) until `emit` returns
    /// [`Signal::Stop`] or the step budget is exhausted. Returns whether
    /// the step budget (rather than the caller) is what stopped it.
    pub fn for_each_match(
        &self,
        root: &Value,
        opts: &MatchOptions,
        hooks: &mut dyn EngineHooks,
        emit: &mut dyn FnMut(Solution) -> Signal,
    ) -> Result<bool, SemanticError> {
        if self.is_slice_pattern {
            return Err(SemanticError::SlicePatternAnchored {
                span: self.ast.span,
            });
        }
        let mut engine = Engine::new(hooks, opts.step_budget);
        engine.match_item(&self.ast, root, &Path::root(), Solution::empty(), &mut |_engine, sol| {
            emit(sol)
        });
        Ok(engine.limit_hit)
    }

    /// Eagerly collects every solution of an anchored match, bounded by
    /// `opts.max_solutions` and `opts.step_budget`.
    pub fn match_value(&self, root: &Value, opts: &MatchOptions) -> Result<Outcome, SemanticError> {
        let mut solutions = Vec::new();
        let max = opts.max_solutions;
        let limit_exceeded = self.for_each_match(root, opts, &mut NullEngineHooks, &mut |sol| {
            solutions.push(sol);
            Signal::stop_if(max.is_some_and(|m| solutions.len() >= m))
        })?;
        Ok(Outcome {
            solutions,
            limit_exceeded,
        })
    }

    pub fn first_match(&self, root: &Value, opts: &MatchOptions) -> Result<Option<Solution>, SemanticError> {
        let mut found = None;
        self.for_each_match(root, opts, &mut NullEngineHooks, &mut |sol| {
            found = Some(sol);
            Signal::Stop
        })?;
        Ok(found)
    }

    pub fn has_match(&self, root: &Value, opts: &MatchOptions) -> Result<bool, SemanticError> {
        Ok(self.first_match(root, opts)?.is_some())
    }

    /// The lazy, cooperative primitive behind `scan`: attempts an anchored
    /// match at `root` and at every descendant of `root` (pre-order,
    /// spec §6.2 "any subtree"), invoking `emit` for each `(path,
    /// solution)` hit until it returns `Stop` or the step budget is
    /// exhausted.
    pub fn for_each_scan(
        &self,
        root: &Value,
        opts: &MatchOptions,
        hooks: &mut dyn EngineHooks,
        emit: &mut dyn FnMut(Path, Solution) -> Signal,
    ) -> bool {
        let mut engine = Engine::new(hooks, opts.step_budget);
        scan_subtree(&mut engine, &self.ast, root, &Path::root(), emit);
        engine.limit_hit
    }

    pub fn scan(&self, root: &Value, opts: &MatchOptions) -> ScanOutcome {
        let mut hits = Vec::new();
        let max = opts.max_solutions;
        let limit_exceeded = self.for_each_scan(root, opts, &mut NullEngineHooks, &mut |path, solution| {
            hits.push(ScanHit { path, solution });
            Signal::stop_if(max.is_some_and(|m| hits.len() >= m))
        });
        ScanOutcome { hits, limit_exceeded }
    }

    pub fn first_scan(&self, root: &Value, opts: &MatchOptions) -> Option<ScanHit> {
        let mut found = None;
        self.for_each_scan(root, opts, &mut NullEngineHooks, &mut |path, solution| {
            found = Some(ScanHit { path, solution });
            Signal::Stop
        });
        found
    }

    pub fn has_scan(&self, root: &Value, opts: &MatchOptions) -> bool {
        self.first_scan(root, opts).is_some()
    }
}

fn scan_subtree(
    engine: &mut Engine<'_>,
    ast: &Node,
    value: &Value,
    path: &Path,
    emit: &mut dyn FnMut(Path, Solution) -> Signal,
) -> Signal {
    if engine.limit_hit {
        return Signal::Stop;
    }
    let mut sig = engine.match_item(ast, value, path, Solution::empty(), &mut |_engine, sol| {
        emit(path.clone(), sol)
    });
    if sig.is_stop() {
        return Signal::Stop;
    }
    match value {
        Value::Object(map) => {
            for (k, v) in map.iter() {
                let child_path = path.pushed(PathStep::Key(k.clone()));
                sig = scan_subtree(engine, ast, v, &child_path, emit);
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                let child_path = path.pushed(PathStep::Index(i));
                sig = scan_subtree(engine, ast, v, &child_path, emit);
                if sig.is_stop() {
                    return Signal::Stop;
                }
            }
        }
        _ => {}
    }
    Signal::Continue
}

/// Per-call matching context: the step budget counter and the engine
/// hooks for this call (spec §4.7). Carried by `&mut self` through every
/// matcher method rather than captured by the `Emit` closures, so nested
/// continuations thread it through as an explicit parameter instead of
/// fighting the borrow checker over a captured `&mut`.
pub(crate) struct Engine<'h> {
    hooks: &'h mut dyn EngineHooks,
    steps_remaining: u64,
    pub(crate) limit_hit: bool,
    regex_cache: RegexCache,
}

impl<'h> Engine<'h> {
    fn new(hooks: &'h mut dyn EngineHooks, step_budget: u64) -> Self {
        Self {
            hooks,
            steps_remaining: step_budget,
            limit_hit: false,
            regex_cache: RegexCache::default(),
        }
    }

    /// Charges one step against the budget (spec §4.6 "a global step
    /// budget ... decremented per engine node visit"). Returns `false`
    /// once the budget (or an earlier limit hit) means the caller should
    /// unwind immediately via `Signal::Stop`.
    pub(crate) fn tick(&mut self) -> bool {
        if self.limit_hit {
            return false;
        }
        if self.steps_remaining == 0 {
            self.limit_hit = true;
            return false;
        }
        self.steps_remaining -= 1;
        true
    }
}
