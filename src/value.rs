//! The tagged-union value tree that patterns are matched against.
//!
//! Tendril matches over JSON-like data, so the host value is
//! [`serde_json::Value`] directly (with the `preserve_order` feature so
//! object entries iterate in insertion order — see `SPEC_FULL.md` §9 on the
//! key-enumeration open question). A thin alias and a handful of free
//! functions give the engine the primitives it needs (type name, `size`,
//! `SameValueZero` equality) without re-inventing a tagged union.

pub use serde_json::Map as ObjectMap;
pub use serde_json::Number;
pub use serde_json::Value;

/// SameValueZero equality: like `==` on `Value` except `NaN` equals `NaN`.
/// `serde_json::Number` cannot represent `NaN`/`Infinity`, so in practice
/// this coincides with structural equality; it is named explicitly because
/// guard `==`/`!=` and unification both must document which equality they
/// use (spec §3.3).
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    a == b
}

/// A short, stable name for a value's runtime type, used in guard
/// coercion error messages and in diagnostics.
pub fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// `size(x)` per spec §4.3.5: string length, array length, or number of
/// object keys. Returns `None` for scalar types the function does not
/// accept (booleans, numbers, null) so the guard evaluator can turn the
/// mismatch into a silent branch failure.
pub fn size_of(v: &Value) -> Option<i64> {
    match v {
        Value::String(s) => Some(s.chars().count() as i64),
        Value::Array(a) => Some(a.len() as i64),
        Value::Object(o) => Some(o.len() as i64),
        _ => None,
    }
}

/// Stringify a scalar for use as an object key when a bound variable is
/// used in key position (spec §9 open question, resolved in SPEC_FULL.md).
pub fn stringify_key(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => None,
    }
}
