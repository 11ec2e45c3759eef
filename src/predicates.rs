//! Factory helpers that build common [`SubPattern`] predicates.
//!
//! These are deliberately layered *on top of* [`Pattern`] and [`SubPattern`]'s public
//! constructors rather than reached into from the matcher — per the specification, the
//! matching engine is predicate-agnostic, and this module is the external collaborator that
//! happens to ship in the same crate for convenience. A caller who needs a predicate this module
//! doesn't provide writes one with [`SubPattern::from_fn1`] and friends directly.
//!
//! `value_eq`/`value_neq`/`value_in`/`any` are generic over any value type (see the `impl
//! Pattern<T>` blocks in `pattern.rs`). `value_of`/`present`/`absent`/`match_regexp` only make
//! sense for a value type that can actually be "a string" or "of a given kind" at runtime, so
//! they are implemented against [`Value`], a small JSON-like enum — the same way the original
//! system's host sequences mixed integers, strings, and floats in one pattern (see scenario 3 in
//! the specification).

use std::ops::Range;

use crate::context::PredicateFn;
use crate::error::Error;
use crate::sub_pattern::SubPattern;

pub fn any<T>() -> PredicateFn<T>
where
    T: Send + Sync + 'static,
{
    SubPattern::from_fn1(|_: &T| true)
}

pub fn value_eq<T>(target: T) -> PredicateFn<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    SubPattern::from_fn1(move |v: &T| *v == target)
}

pub fn value_neq<T>(target: T) -> PredicateFn<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    SubPattern::from_fn1(move |v: &T| *v != target)
}

/// Rejects an empty or inverted range up front rather than building a predicate that can never
/// match anything.
pub fn value_in<T>(range: Range<T>) -> Result<PredicateFn<T>, Error>
where
    T: Clone + PartialOrd + Send + Sync + 'static,
{
    if !(range.start < range.end) {
        return Err(Error::InvalidArgument(
            "value_in requires a non-empty range (start < end)".to_string(),
        ));
    }
    Ok(SubPattern::from_fn1(move |v: &T| range.contains(v)))
}

/// A small heterogeneous value type, so that a single [`Pattern<Value>`] can do what scenario 3
/// of the specification needs: matching a mix of integers, strings, and floats in one sequence.
/// The core engine itself never requires this type — any `T` works with the core builder
/// methods above.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Value {
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Str(_) => ValueKind::Str,
        }
    }

    /// "Present" is defined strictly as *not null and not equal to the empty string* — this
    /// reimplementation does not extend it to "any empty collection" for richer value types, a
    /// choice the specification calls out explicitly as one prior revisions of the original
    /// disagreed on.
    pub fn is_present(&self) -> bool {
        !matches!(self, Value::Null) && !matches!(self, Value::Str(s) if s.is_empty())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

pub fn value_of(kind: ValueKind) -> PredicateFn<Value> {
    SubPattern::from_fn1(move |v: &Value| v.kind() == kind)
}

pub fn present() -> PredicateFn<Value> {
    SubPattern::from_fn1(Value::is_present)
}

pub fn absent() -> PredicateFn<Value> {
    SubPattern::from_fn1(|v: &Value| !v.is_present())
}

/// Compiles `pattern` and surfaces a compile failure as `Error::InvalidArgument` rather than
/// panicking; a non-string value never matches.
#[cfg(feature = "regex")]
pub fn match_regexp(pattern: &str) -> Result<PredicateFn<Value>, Error> {
    let rx = regex::Regex::new(pattern)
        .map_err(|e| Error::InvalidArgument(format!("invalid regex {pattern:?}: {e}")))?;
    Ok(SubPattern::from_fn1(move |v: &Value| match v {
        Value::Str(s) => rx.is_match(s),
        _ => false,
    }))
}
