use super::{BinOp, GuardExpr, GuardExprKind, GuardFn, UnOp};
use crate::error::GuardFailure;
use crate::value::{self, Value};

/// The value a guard expression reduces to: any JSON-like scalar or, for
/// intermediate variable lookups, a full [`Value`] (e.g. `size($obj)` on a
/// bound object).
pub type GuardValue = Value;

/// Resolves `$name` references and `_` during guard evaluation. The
/// engine supplies one built from the current solution's scalar bindings
/// plus whatever value is "in scope" for `_` (spec §4.3.5).
pub trait GuardEnv {
    fn lookup(&self, name: &str) -> Option<&Value>;
    fn underscore(&self) -> Option<&Value>;
}

pub fn evaluate(expr: &GuardExpr, env: &dyn GuardEnv) -> Result<GuardValue, GuardFailure> {
    match &expr.kind {
        GuardExprKind::Number(n) => Ok(Value::from(*n)),
        GuardExprKind::String(s) => Ok(Value::String(s.clone())),
        GuardExprKind::Bool(b) => Ok(Value::Bool(*b)),
        GuardExprKind::Null => Ok(Value::Null),
        GuardExprKind::Underscore => env.underscore().cloned().ok_or(GuardFailure),
        GuardExprKind::Var(name) => env.lookup(name).cloned().ok_or(GuardFailure),
        GuardExprKind::Unary(op, inner) => eval_unary(*op, evaluate(inner, env)?),
        GuardExprKind::Binary(op, lhs, rhs) => eval_binary(*op, lhs, rhs, env),
        GuardExprKind::Call(f, arg) => eval_call(*f, evaluate(arg, env)?),
    }
}

fn eval_unary(op: UnOp, v: Value) -> Result<Value, GuardFailure> {
    match op {
        UnOp::Neg => as_f64(&v).map(|n| Value::from(-n)),
        UnOp::Not => as_bool(&v).map(|b| Value::Bool(!b)),
    }
}

fn eval_binary(
    op: BinOp,
    lhs: &GuardExpr,
    rhs: &GuardExpr,
    env: &dyn GuardEnv,
) -> Result<Value, GuardFailure> {
    match op {
        BinOp::And => {
            let l = as_bool(&evaluate(lhs, env)?)?;
            if !l {
                return Ok(Value::Bool(false));
            }
            Ok(Value::Bool(as_bool(&evaluate(rhs, env)?)?))
        }
        BinOp::Or => {
            let l = as_bool(&evaluate(lhs, env)?)?;
            if l {
                return Ok(Value::Bool(true));
            }
            Ok(Value::Bool(as_bool(&evaluate(rhs, env)?)?))
        }
        _ => {
            let l = evaluate(lhs, env)?;
            let r = evaluate(rhs, env)?;
            eval_binary_values(op, l, r)
        }
    }
}

fn eval_binary_values(op: BinOp, l: Value, r: Value) -> Result<Value, GuardFailure> {
    match op {
        BinOp::Add => {
            if matches!(l, Value::String(_)) || matches!(r, Value::String(_)) {
                Ok(Value::String(format!("{}{}", render(&l), render(&r))))
            } else {
                checked_arith(as_f64(&l)?, as_f64(&r)?, |a, b| a + b)
            }
        }
        BinOp::Sub => checked_arith(as_f64(&l)?, as_f64(&r)?, |a, b| a - b),
        BinOp::Mul => checked_arith(as_f64(&l)?, as_f64(&r)?, |a, b| a * b),
        BinOp::Div => {
            let (a, b) = (as_f64(&l)?, as_f64(&r)?);
            if b == 0.0 {
                return Err(GuardFailure);
            }
            checked_arith(a, b, |a, b| a / b)
        }
        BinOp::Mod => {
            let (a, b) = (as_f64(&l)?, as_f64(&r)?);
            if b == 0.0 {
                return Err(GuardFailure);
            }
            checked_arith(a, b, |a, b| a % b)
        }
        BinOp::Lt => Ok(Value::Bool(as_f64(&l)? < as_f64(&r)?)),
        BinOp::Le => Ok(Value::Bool(as_f64(&l)? <= as_f64(&r)?)),
        BinOp::Gt => Ok(Value::Bool(as_f64(&l)? > as_f64(&r)?)),
        BinOp::Ge => Ok(Value::Bool(as_f64(&l)? >= as_f64(&r)?)),
        BinOp::Eq => Ok(Value::Bool(value::same_value_zero(&l, &r))),
        BinOp::Ne => Ok(Value::Bool(!value::same_value_zero(&l, &r))),
        BinOp::And | BinOp::Or => unreachable!("short-circuited above"),
    }
}

fn checked_arith(a: f64, b: f64, f: impl Fn(f64, f64) -> f64) -> Result<Value, GuardFailure> {
    let result = f(a, b);
    if result.is_finite() {
        Ok(Value::from(result))
    } else {
        Err(GuardFailure)
    }
}

fn eval_call(f: GuardFn, arg: Value) -> Result<Value, GuardFailure> {
    match f {
        GuardFn::Size => value::size_of(&arg).map(Value::from).ok_or(GuardFailure),
        GuardFn::Number => match &arg {
            Value::Number(_) => Ok(arg),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .map(Value::from)
                .ok_or(GuardFailure),
            _ => Err(GuardFailure),
        },
        GuardFn::String => Ok(Value::String(render(&arg))),
        GuardFn::Boolean => match &arg {
            Value::Bool(_) => Ok(arg),
            Value::String(s) if s == "true" => Ok(Value::Bool(true)),
            Value::String(s) if s == "false" => Ok(Value::Bool(false)),
            _ => Err(GuardFailure),
        },
    }
}

fn as_f64(v: &Value) -> Result<f64, GuardFailure> {
    v.as_f64().ok_or(GuardFailure)
}

fn as_bool(v: &Value) -> Result<bool, GuardFailure> {
    v.as_bool().ok_or(GuardFailure)
}

fn render(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(_) | Value::Object(_) => v.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::eval::GuardEnv;
    use std::collections::HashMap;

    struct TestEnv {
        vars: HashMap<String, Value>,
        underscore: Option<Value>,
    }

    impl GuardEnv for TestEnv {
        fn lookup(&self, name: &str) -> Option<&Value> {
            self.vars.get(name)
        }
        fn underscore(&self) -> Option<&Value> {
            self.underscore.as_ref()
        }
    }

    fn expr(kind: GuardExprKind) -> GuardExpr {
        GuardExpr::new(kind, crate::span::Span::new(0, 0))
    }

    #[test]
    fn division_by_zero_is_silent_failure() {
        let env = TestEnv {
            vars: HashMap::new(),
            underscore: None,
        };
        let e = expr(GuardExprKind::Binary(
            BinOp::Div,
            Box::new(expr(GuardExprKind::Number(1.0))),
            Box::new(expr(GuardExprKind::Number(0.0))),
        ));
        assert_eq!(evaluate(&e, &env), Err(GuardFailure));
    }

    #[test]
    fn positive_even_guard() {
        let env = TestEnv {
            vars: HashMap::new(),
            underscore: Some(Value::from(4.0)),
        };
        let gt_zero = expr(GuardExprKind::Binary(
            BinOp::Gt,
            Box::new(expr(GuardExprKind::Underscore)),
            Box::new(expr(GuardExprKind::Number(0.0))),
        ));
        let is_even = expr(GuardExprKind::Binary(
            BinOp::Eq,
            Box::new(expr(GuardExprKind::Binary(
                BinOp::Mod,
                Box::new(expr(GuardExprKind::Underscore)),
                Box::new(expr(GuardExprKind::Number(2.0))),
            ))),
            Box::new(expr(GuardExprKind::Number(0.0))),
        ));
        let both = expr(GuardExprKind::Binary(BinOp::And, Box::new(gt_zero), Box::new(is_even)));
        assert_eq!(evaluate(&both, &env), Ok(Value::Bool(true)));
    }

    #[test]
    fn number_coercion_failure_on_non_numeric_string() {
        let env = TestEnv {
            vars: HashMap::new(),
            underscore: None,
        };
        let e = expr(GuardExprKind::Call(
            GuardFn::Number,
            Box::new(expr(GuardExprKind::String("abc".into()))),
        ));
        assert_eq!(evaluate(&e, &env), Err(GuardFailure));
    }
}
