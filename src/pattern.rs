use std::collections::HashMap;
use std::ops::Range;
use std::sync::Arc;

use crate::context::PredicateFn;
use crate::error::Error;
use crate::match_result::Match;
use crate::matcher;
use crate::sub_pattern::{OptionValue, SubPattern, SubPatternOptions};

/// Addresses one or more sub-patterns for [`Pattern::set_options_for`]: by position, by name, or
/// by a contiguous index range.
pub enum SubPatternId {
    Index(usize),
    Name(String),
    Range(Range<usize>),
}

impl From<usize> for SubPatternId {
    fn from(index: usize) -> Self {
        SubPatternId::Index(index)
    }
}

impl From<&str> for SubPatternId {
    fn from(name: &str) -> Self {
        SubPatternId::Name(name.to_string())
    }
}

impl From<Range<usize>> for SubPatternId {
    fn from(range: Range<usize>) -> Self {
        SubPatternId::Range(range)
    }
}

/// An ordered list of [`SubPattern`]s plus the builder scaffolding used to assemble one.
///
/// Every fluent builder method returns `Result<&mut Self, Error>` and aborts on the first
/// construction failure (a duplicate name) instead of deferring it: there is no path from
/// `Pattern::new()` plus the fluent methods to a pattern carrying a swallowed error, so matching
/// never has an error state to report. [`Pattern::build`] is the convenient wrapper for the
/// common case of assembling a pattern in one closure and propagating the first `?` out of it.
///
/// Once built, a `Pattern` is immutable for matching purposes: `match_seq`/`match_with_position`
/// take `&self`, so the same compiled pattern can be matched concurrently from multiple threads
/// (whenever `T: Sync`) or driven by several independent [`crate::Scanner`]s.
pub struct Pattern<T> {
    subpatterns: Vec<SubPattern<T>>,
    name_index: HashMap<String, usize>,
    allow_gaps_stack: Vec<bool>,
    last_mandatory_index: Option<usize>,
}

impl<T> Default for Pattern<T> {
    fn default() -> Self {
        Pattern {
            subpatterns: Vec::new(),
            name_index: HashMap::new(),
            allow_gaps_stack: vec![false],
            last_mandatory_index: None,
        }
    }
}

impl<T> Pattern<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a pattern through a callback, propagating the first construction error (a
    /// duplicate name, or a malformed argument to a fallible factory like `value_in`) out of
    /// the closure with `?`.
    pub fn build(f: impl FnOnce(&mut Self) -> Result<(), Error>) -> Result<Self, Error> {
        let mut pattern = Self::new();
        f(&mut pattern)?;
        Ok(pattern)
    }

    pub fn len(&self) -> usize {
        self.subpatterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subpatterns.is_empty()
    }

    pub fn subpatterns(&self) -> &[SubPattern<T>] {
        &self.subpatterns
    }

    /// Pushes a scope of default `allow_gaps`, runs `f`, then restores the previous default.
    /// Each sub-pattern added during `f` snapshots whichever default is on top of the stack at
    /// the moment it is added — later changes to the scope do not retroactively affect it.
    pub fn with_options(
        &mut self,
        default_allow_gaps: bool,
        f: impl FnOnce(&mut Self) -> Result<(), Error>,
    ) -> Result<&mut Self, Error> {
        self.allow_gaps_stack.push(default_allow_gaps);
        let result = f(self);
        self.allow_gaps_stack.pop();
        result?;
        Ok(self)
    }

    /// Resolves a set of [`SubPatternId`]s to concrete indices and applies `edit` to each
    /// matching sub-pattern's options via [`SubPattern::set_option`].
    pub fn set_options_for(
        &mut self,
        ids: impl IntoIterator<Item = impl Into<SubPatternId>>,
        edits: &[(&str, OptionValue<T>)],
    ) -> Result<(), Error> {
        let mut indices = Vec::new();
        for id in ids {
            match id.into() {
                SubPatternId::Index(i) => indices.push(i),
                SubPatternId::Range(r) => indices.extend(r),
                SubPatternId::Name(name) => {
                    let idx = *self
                        .name_index
                        .get(&name)
                        .ok_or_else(|| Error::UnknownOption(name.clone()))?;
                    indices.push(idx);
                }
            }
        }
        for idx in indices {
            let sub = self
                .subpatterns
                .get_mut(idx)
                .ok_or_else(|| Error::InvalidArgument(format!("no sub-pattern at index {idx}")))?;
            for (key, value) in edits {
                sub.set_option(key, value.clone())?;
            }
        }
        self.recompute_last_mandatory_index();
        Ok(())
    }

    /// Keeps the `last_mandatory_index` cache consistent after a dynamic option edit may have
    /// flipped some sub-pattern's `optional` flag (the static builder methods keep it in sync
    /// incrementally in [`Pattern::push_predicate`]; this is the dynamic surface's counterpart).
    fn recompute_last_mandatory_index(&mut self) {
        self.last_mandatory_index = self
            .subpatterns
            .iter()
            .enumerate()
            .filter(|(_, sub)| !sub.is_optional())
            .map(|(idx, _)| idx)
            .max();
    }

    pub(crate) fn push_predicate(
        &mut self,
        evaluator: PredicateFn<T>,
        opts: SubPatternOptions<T>,
    ) -> Result<&mut Self, Error> {
        if let Some(name) = &opts.name {
            if self.name_index.contains_key(name) {
                return Err(Error::DuplicateName(name.clone()));
            }
        }
        let default_allow_gaps = *self
            .allow_gaps_stack
            .last()
            .expect("allow_gaps scope stack is never empty");
        let optional = opts.optional;
        let name = opts.name.clone();
        let sub = SubPattern::new(evaluator, opts, default_allow_gaps);
        let index = self.subpatterns.len();
        if !optional {
            self.last_mandatory_index = Some(index);
        }
        if let Some(name) = name {
            self.name_index.insert(name, index);
        }
        self.subpatterns.push(sub);
        Ok(self)
    }

    /// Runs the search and returns the captured groups and next position, or `None` if there is
    /// no match (including the case where every sub-pattern is optional: per the specification,
    /// that degenerates to an all-empty match at position 0, which this method returns as
    /// `Some`, not `None` — see the invariant spelled out on [`Pattern::match_with_position`]).
    pub fn match_with_position(&self, values: &[T]) -> Option<(Match<T>, usize)>
    where
        T: Clone,
    {
        let (groups, next_pos) = match matcher::run(&self.subpatterns, self.last_mandatory_index, values) {
            Some(result) => result,
            None if self.subpatterns.iter().all(SubPattern::is_optional) => {
                (vec![Vec::new(); self.subpatterns.len()], 0)
            }
            None => return None,
        };

        let captured: Vec<Vec<T>> = groups
            .into_iter()
            .zip(self.subpatterns.iter())
            .filter_map(|(g, sub)| sub.is_capture().then_some(g))
            .collect();

        let name_index: HashMap<String, usize> = self
            .name_index
            .iter()
            .filter_map(|(name, &idx)| {
                let capture_idx = self
                    .subpatterns
                    .iter()
                    .take(idx + 1)
                    .filter(|sub| sub.is_capture())
                    .count()
                    .checked_sub(1)?;
                self.subpatterns[idx]
                    .is_capture()
                    .then_some((name.clone(), capture_idx))
            })
            .collect();

        Some((Match::new(captured, Arc::new(name_index), next_pos), next_pos))
    }

    /// Convenience wrapper over [`Pattern::match_with_position`] that discards the next
    /// position.
    pub fn match_seq(&self, values: &[T]) -> Option<Match<T>>
    where
        T: Clone,
    {
        self.match_with_position(values).map(|(m, _)| m)
    }

    pub fn is_match(&self, values: &[T]) -> bool
    where
        T: Clone,
    {
        self.match_seq(values).is_some()
    }
}

macro_rules! zero_arg_family {
    ($base:ident, $opt:ident, $least_one:ident, $zero_or_more:ident, $ctor:path) => {
        pub fn $base(&mut self, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(), opts)
        }
        pub fn $opt(&mut self, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(), opts.with_optional(true))
        }
        pub fn $least_one(&mut self, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(), opts.with_repeat(true).with_optional(false))
        }
        pub fn $zero_or_more(&mut self, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(), opts.with_repeat(true).with_optional(true))
        }
    };
}

macro_rules! one_arg_family {
    ($base:ident, $opt:ident, $least_one:ident, $zero_or_more:ident, $ctor:path, $arg_ty:ty) => {
        pub fn $base(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(arg), opts)
        }
        pub fn $opt(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(arg), opts.with_optional(true))
        }
        pub fn $least_one(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(arg), opts.with_repeat(true).with_optional(false))
        }
        pub fn $zero_or_more(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            self.push_predicate($ctor(arg), opts.with_repeat(true).with_optional(true))
        }
    };
}

/// Like [`one_arg_family`], but for a constructor that validates its argument and returns
/// `Result<PredicateFn<T>, Error>` (`value_in`, `match_regexp`) rather than a bare `PredicateFn`.
macro_rules! one_arg_family_fallible {
    ($base:ident, $opt:ident, $least_one:ident, $zero_or_more:ident, $ctor:path, $arg_ty:ty) => {
        pub fn $base(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            let predicate = $ctor(arg)?;
            self.push_predicate(predicate, opts)
        }
        pub fn $opt(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            let predicate = $ctor(arg)?;
            self.push_predicate(predicate, opts.with_optional(true))
        }
        pub fn $least_one(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            let predicate = $ctor(arg)?;
            self.push_predicate(predicate, opts.with_repeat(true).with_optional(false))
        }
        pub fn $zero_or_more(&mut self, arg: $arg_ty, opts: SubPatternOptions<T>) -> Result<&mut Self, Error> {
            let predicate = $ctor(arg)?;
            self.push_predicate(predicate, opts.with_repeat(true).with_optional(true))
        }
    };
}

/// Generic factory-backed builder methods, available for any `T` usable as a sub-pattern value.
impl<T> Pattern<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    zero_arg_family!(any, any_opt, least_one_any, zero_or_more_any, crate::predicates::any);
    one_arg_family!(
        value_eq,
        value_eq_opt,
        least_one_value_eq,
        zero_or_more_value_eq,
        crate::predicates::value_eq,
        T
    );
    one_arg_family!(
        value_neq,
        value_neq_opt,
        least_one_value_neq,
        zero_or_more_value_neq,
        crate::predicates::value_neq,
        T
    );
}

impl<T> Pattern<T>
where
    T: Clone + PartialOrd + Send + Sync + 'static,
{
    one_arg_family_fallible!(
        value_in,
        value_in_opt,
        least_one_value_in,
        zero_or_more_value_in,
        crate::predicates::value_in,
        Range<T>
    );
}

/// Builder methods specific to [`crate::predicates::Value`]: `value_of`/`present`/`absent` only
/// make sense for a value type that can answer "what kind am I" and "am I the empty string" at
/// runtime, so unlike `value_eq`/`value_in`/`any` above these are not generic over `T`.
impl Pattern<crate::predicates::Value> {
    one_arg_family!(
        value_of,
        value_of_opt,
        least_one_value_of,
        zero_or_more_value_of,
        crate::predicates::value_of,
        crate::predicates::ValueKind
    );
    zero_arg_family!(
        present,
        present_opt,
        least_one_present,
        zero_or_more_present,
        crate::predicates::present
    );
    zero_arg_family!(
        absent,
        absent_opt,
        least_one_absent,
        zero_or_more_absent,
        crate::predicates::absent
    );

    #[cfg(feature = "regex")]
    one_arg_family_fallible!(
        match_regexp,
        match_regexp_opt,
        least_one_match_regexp,
        zero_or_more_match_regexp,
        crate::predicates::match_regexp,
        &str
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_1_optional_and_repeat_combination() {
        let p = Pattern::build(|p| {
            p.value_eq(1, Default::default())?;
            p.value_eq_opt(2, Default::default())?;
            p.zero_or_more_value_eq(3, Default::default())?;
            p.least_one_value_eq(4, Default::default())?;
            Ok(())
        })
        .unwrap();

        let (m, next_pos) = p.match_with_position(&[1, 2, 3, 4, 4, 4, 4, 5]).unwrap();
        assert_eq!(
            m.groups(),
            &[vec![1], vec![2], vec![3], vec![4, 4, 4, 4]]
        );
        assert_eq!(next_pos, 7);

        let (m, next_pos) = p.match_with_position(&[1, 3, 4, 4, 4, 4]).unwrap();
        assert_eq!(m.groups(), &[vec![1], vec![], vec![3], vec![4, 4, 4, 4]]);
        assert_eq!(next_pos, 6);

        assert!(p.match_seq(&[1, 2, 2, 3, 4, 4, 4, 4]).is_none());

        let (m, next_pos) = p.match_with_position(&[1, 4]).unwrap();
        assert_eq!(m.groups(), &[vec![1], vec![], vec![], vec![4]]);
        assert_eq!(next_pos, 2);
    }

    #[test]
    fn scenario_2_any_is_greedy() {
        let p = Pattern::build(|p| {
            p.value_eq('a', Default::default())?;
            p.least_one_any(Default::default())?;
            p.value_eq('d', Default::default())?;
            Ok(())
        })
        .unwrap();

        let (m, next_pos) = p
            .match_with_position(&['a', 'b', 'c', 'd', 'e', 'd'])
            .unwrap();
        assert_eq!(
            m.groups(),
            &[vec!['a'], vec!['b', 'c', 'd', 'e'], vec!['d']]
        );
        assert_eq!(next_pos, 6);
    }

    #[test]
    fn scenario_4_non_captured_group_is_dropped() {
        let p = Pattern::build(|p| {
            p.value_eq(1, Default::default())?;
            p.least_one_value_eq(2, SubPatternOptions::default().capture(false))?;
            p.value_eq(3, Default::default())?;
            Ok(())
        })
        .unwrap();

        let (m, next_pos) = p.match_with_position(&[1, 2, 2, 3]).unwrap();
        assert_eq!(m.groups(), &[vec![1], vec![3]]);
        assert_eq!(next_pos, 4);

        assert!(p.match_seq(&[1, 4, 3]).is_none());
    }

    #[test]
    fn scenario_6_any_swallows_trailing_optional() {
        let p = Pattern::build(|p| {
            p.zero_or_more_value_eq(1, Default::default())?;
            p.least_one_any(Default::default())?;
            p.value_eq_opt(3, Default::default())?;
            Ok(())
        })
        .unwrap();

        let (m, next_pos) = p.match_with_position(&[1, 1, 2, 3]).unwrap();
        assert_eq!(m.groups(), &[vec![1, 1], vec![2, 3], vec![]]);
        assert_eq!(next_pos, 4);
    }

    #[test]
    fn all_optional_pattern_degenerates_to_empty_match() {
        let p = Pattern::build(|p| {
            p.value_eq_opt(1, Default::default())?;
            Ok(())
        })
        .unwrap();

        let (m, next_pos) = p.match_with_position(&[9, 9, 9]).unwrap();
        assert!(m.is_empty());
        assert_eq!(next_pos, 0);
    }

    #[test]
    fn scenario_3_heterogeneous_value_kinds() {
        use crate::predicates::{Value, ValueKind};

        let p = Pattern::build(|p| {
            p.value_of(ValueKind::Int, Default::default())?;
            p.zero_or_more_value_of(ValueKind::Str, Default::default())?;
            p.value_of(ValueKind::Float, Default::default())?;
            Ok(())
        })
        .unwrap();

        let values = vec![
            Value::from(1i64),
            Value::from("a"),
            Value::from("b"),
            Value::from("c"),
            Value::from(1.1f64),
        ];
        let (m, next_pos) = p.match_with_position(&values).unwrap();
        assert_eq!(
            m.groups(),
            &[
                vec![Value::Int(1)],
                vec![
                    Value::Str("a".into()),
                    Value::Str("b".into()),
                    Value::Str("c".into())
                ],
                vec![Value::Float(1.1)],
            ]
        );
        assert_eq!(next_pos, 5);

        let mismatched = vec![
            Value::from("a"),
            Value::from(1i64),
            Value::from("b"),
            Value::from("c"),
            Value::from(1.1f64),
        ];
        assert!(p.match_seq(&mismatched).is_none());
    }

    #[test]
    fn scenario_5_gap_break_condition_stops_skipping() {
        #[derive(Clone, Copy, Debug, PartialEq)]
        enum Event {
            SetFlag,
            X,
            MoveInput,
            Perform,
        }

        let p = Pattern::build(|p| {
            p.zero_or_more_value_eq(
                Event::SetFlag,
                SubPatternOptions::default()
                    .allow_gaps(true)
                    .gap_break_condition(SubPattern::from_fn1(|v: &Event| {
                        matches!(v, Event::MoveInput | Event::Perform)
                    })),
            )?;
            p.value_eq(Event::MoveInput, Default::default())?;
            p.zero_or_more_value_eq(Event::SetFlag, Default::default())?;
            Ok(())
        })
        .unwrap();

        let values = vec![
            Event::SetFlag,
            Event::X,
            Event::SetFlag,
            Event::MoveInput,
            Event::SetFlag,
        ];
        let m = p.match_seq(&values).unwrap();
        assert_eq!(
            m.groups(),
            &[
                vec![Event::SetFlag, Event::SetFlag],
                vec![Event::MoveInput],
                vec![Event::SetFlag],
            ]
        );
    }

    #[test]
    fn duplicate_name_is_rejected_at_build_time() {
        let err = Pattern::build(|p| {
            p.value_eq(1, SubPatternOptions::default().name("x"))?;
            p.value_eq(2, SubPatternOptions::default().name("x"))?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(_)));
    }

    #[test]
    fn named_group_lookup_accounts_for_dropped_captures() {
        let p = Pattern::build(|p| {
            p.value_eq(1, SubPatternOptions::default().capture(false))?;
            p.value_eq(2, SubPatternOptions::default().name("second"))?;
            Ok(())
        })
        .unwrap();

        let m = p.match_seq(&[1, 2]).unwrap();
        assert_eq!(m.at("second"), Some(&[2][..]));
    }

    #[test]
    fn with_options_snapshots_the_default_at_add_time() {
        let mut p: Pattern<i32> = Pattern::new();
        p.value_eq(1, Default::default()).unwrap();
        p.with_options(true, |p| {
            p.value_eq(2, Default::default())?;
            Ok(())
        })
        .unwrap();
        p.value_eq(3, Default::default()).unwrap();

        assert!(!p.subpatterns()[0].allows_gaps());
        assert!(p.subpatterns()[1].allows_gaps());
        assert!(
            !p.subpatterns()[2].allows_gaps(),
            "scope exit must restore the prior default"
        );
    }

    #[test]
    fn set_options_for_edits_by_index_name_and_range() {
        let mut p: Pattern<i32> = Pattern::new();
        p.value_eq(1, SubPatternOptions::default().name("head"))
            .unwrap();
        p.value_eq(2, Default::default()).unwrap();
        p.value_eq(3, Default::default()).unwrap();

        p.set_options_for([0usize], &[("capture", OptionValue::Bool(false))])
            .unwrap();
        p.set_options_for(["head"], &[("capture", OptionValue::Bool(true))])
            .unwrap();
        p.set_options_for([1usize..3], &[("optional", OptionValue::Bool(true))])
            .unwrap();

        assert!(p.subpatterns()[0].is_capture());
        assert!(p.subpatterns()[1].is_optional());
        assert!(p.subpatterns()[2].is_optional());

        let err = p
            .set_options_for([0usize], &[("nonsense", OptionValue::Bool(true))])
            .unwrap_err();
        assert!(matches!(err, Error::UnknownOption(_)));
    }

    #[test]
    fn direct_construction_path_rejects_a_duplicate_name_immediately_instead_of_at_match_time() {
        let mut p: Pattern<i32> = Pattern::new();
        p.value_eq(1, SubPatternOptions::default().name("x"))
            .unwrap();
        let err = p
            .value_eq(2, SubPatternOptions::default().name("x"))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateName(_)));

        // the failed push left the pattern exactly as it was before the call, so matching with
        // what was successfully built so far works fine — there is no pending error to panic on.
        assert_eq!(p.len(), 1);
        assert!(p.match_seq(&[1]).is_some());
    }

    #[test]
    fn value_in_rejects_an_empty_range_at_build_time() {
        let err = Pattern::<i32>::build(|p| {
            p.value_in(5..5, Default::default())?;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }
}
