//! Flow-directive aggregation targets (spec §3.2 Bucket, §4.5 Labels and
//! flow targeting). Buckets accumulate rather than unify: object buckets
//! dedup equal values and reject conflicting ones; array buckets always
//! append (spec §4.5 Collision policy).

use std::rc::Rc;

use indexmap::IndexMap;

use crate::ast::GroupSigil;
use crate::error::MatchFailure;
use crate::value::{self, Value};

#[derive(Debug, Clone)]
pub enum BucketValue {
    Object(IndexMap<String, Value>),
    Array(Vec<Value>),
}

impl BucketValue {
    pub fn as_value(&self) -> Value {
        match self {
            BucketValue::Object(map) => {
                Value::Object(map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            }
            BucketValue::Array(items) => Value::Array(items.clone()),
        }
    }
}

fn empty_for(sigil: GroupSigil) -> BucketValue {
    match sigil {
        GroupSigil::Percent => BucketValue::Object(IndexMap::new()),
        GroupSigil::At => BucketValue::Array(Vec::new()),
    }
}

/// Copy-on-write map of bucket-id to accumulated value, append-only within
/// a branch (spec §5 "transactional state"). Rollback on a failed branch
/// is implicit: the caller simply discards the `Buckets` value produced by
/// that branch and continues with the one it held before attempting it,
/// rather than this type tracking an explicit cursor.
#[derive(Debug, Clone, Default)]
pub struct Buckets(Rc<IndexMap<String, BucketValue>>);

impl Buckets {
    pub fn new() -> Self {
        Self(Rc::new(IndexMap::new()))
    }

    pub fn get(&self, name: &str) -> Option<&BucketValue> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BucketValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Record `(key, value)` into the object bucket `name`. No-op if the
    /// key is already present with an equal value; fails the branch if
    /// present with a different value.
    pub fn record_object(&self, name: &str, key: &str, value: Value) -> Result<Buckets, MatchFailure> {
        let mut next = self.clone();
        let map = Rc::make_mut(&mut next.0);
        let entry = map
            .entry(name.to_string())
            .or_insert_with(|| empty_for(GroupSigil::Percent));
        match entry {
            BucketValue::Object(obj) => match obj.get(key) {
                Some(existing) if value::same_value_zero(existing, &value) => {}
                Some(_) => return Err(MatchFailure),
                None => {
                    obj.insert(key.to_string(), value);
                }
            },
            BucketValue::Array(_) => return Err(MatchFailure),
        }
        Ok(next)
    }

    /// Append `value` to the array bucket `name`.
    pub fn record_array(&self, name: &str, value: Value) -> Result<Buckets, MatchFailure> {
        let mut next = self.clone();
        let map = Rc::make_mut(&mut next.0);
        let entry = map
            .entry(name.to_string())
            .or_insert_with(|| empty_for(GroupSigil::At));
        match entry {
            BucketValue::Array(arr) => arr.push(value),
            BucketValue::Object(_) => return Err(MatchFailure),
        }
        Ok(next)
    }
}
