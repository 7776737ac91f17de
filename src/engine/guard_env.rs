//! Adapts a [`Solution`] plus an in-scope "current value" into the
//! [`GuardEnv`] the guard evaluator needs (spec §4.3.5: `$name` looks up a
//! previously bound scalar, `_` is whatever value the enclosing binding or
//! anonymous guard is being asked about).

use crate::binding::Binding;
use crate::guard::GuardEnv;
use crate::solution::Solution;
use crate::value::Value;

pub(crate) struct SolutionGuardEnv<'a> {
    solution: &'a Solution,
    underscore: &'a Value,
}

impl<'a> SolutionGuardEnv<'a> {
    pub(crate) fn new(solution: &'a Solution, underscore: &'a Value) -> Self {
        Self { solution, underscore }
    }
}

impl<'a> GuardEnv for SolutionGuardEnv<'a> {
    fn lookup(&self, name: &str) -> Option<&Value> {
        match self.solution.bindings.get(name)? {
            Binding::Scalar { value, .. } => Some(value),
            Binding::Group { .. } => None,
        }
    }

    fn underscore(&self) -> Option<&Value> {
        Some(self.underscore)
    }
}
