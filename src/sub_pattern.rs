use std::sync::Arc;

use crate::context::{MatchContext, PredicateFn};
use crate::error::Error;

/// Options accumulated on a [`SubPattern`] as it is built.
///
/// `allow_gaps` is the one tri-state field: `None` means "inherit whatever the enclosing
/// [`crate::Pattern`]'s default was at the moment this sub-pattern was added" (see
/// `Pattern::with_options`); `Some(_)` is an explicit override.
#[derive(Clone)]
pub struct SubPatternOptions<T> {
    pub(crate) optional: bool,
    pub(crate) repeat: bool,
    pub(crate) capture: bool,
    pub(crate) allow_gaps: Option<bool>,
    pub(crate) gap_break_condition: Option<PredicateFn<T>>,
    pub(crate) name: Option<String>,
}

impl<T> Default for SubPatternOptions<T> {
    fn default() -> Self {
        SubPatternOptions {
            optional: false,
            repeat: false,
            capture: true,
            allow_gaps: None,
            gap_break_condition: None,
            name: None,
        }
    }
}

impl<T> SubPatternOptions<T> {
    pub fn optional(mut self, v: bool) -> Self {
        self.optional = v;
        self
    }

    pub fn repeat(mut self, v: bool) -> Self {
        self.repeat = v;
        self
    }

    pub fn capture(mut self, v: bool) -> Self {
        self.capture = v;
        self
    }

    pub fn allow_gaps(mut self, v: bool) -> Self {
        self.allow_gaps = Some(v);
        self
    }

    pub fn gap_break_condition(mut self, f: PredicateFn<T>) -> Self {
        self.gap_break_condition = Some(f);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub(crate) fn with_optional(self, v: bool) -> Self {
        self.optional(v)
    }

    pub(crate) fn with_repeat(self, v: bool) -> Self {
        self.repeat(v)
    }
}

/// A dynamically-keyed option value, for the `set_option`/`set_options_for` surface that
/// addresses sub-patterns by name/index after the fact rather than through the static builder.
#[derive(Clone)]
pub enum OptionValue<T> {
    Bool(bool),
    Name(String),
    GapBreak(PredicateFn<T>),
}

/// One atom of a [`crate::Pattern`]: a predicate plus match-modifier flags.
///
/// Built only through [`crate::Pattern`]'s fluent methods or the `predicates` factory helpers;
/// there is no public constructor that takes a raw `SubPatternOptions` directly; because of that
/// a `SubPattern` can only be observed, never mutated, outside its owning `Pattern` (options are
/// resolved to their final flags at construction time and fixed from then on, matching the
/// "sub-patterns are created once" lifecycle).
#[derive(Clone)]
pub struct SubPattern<T> {
    pub(crate) evaluator: PredicateFn<T>,
    pub(crate) optional: bool,
    pub(crate) repeat: bool,
    pub(crate) capture: bool,
    pub(crate) allow_gaps: bool,
    pub(crate) gap_break_condition: Option<PredicateFn<T>>,
    pub(crate) name: Option<String>,
}

impl<T> SubPattern<T> {
    /// Adapts a 1-ary predicate (`value -> bool`) into the full context contract.
    pub fn from_fn1(f: impl Fn(&T) -> bool + Send + Sync + 'static) -> PredicateFn<T> {
        Arc::new(move |value, _ctx| f(value))
    }

    /// Adapts a 2-ary predicate (`value, matched_so_far -> bool`).
    pub fn from_fn2(f: impl Fn(&T, &[T]) -> bool + Send + Sync + 'static) -> PredicateFn<T> {
        Arc::new(move |value, ctx| f(value, ctx.matched))
    }

    /// Adapts a 3-ary predicate (`value, matched_so_far, all_values -> bool`).
    pub fn from_fn3(f: impl Fn(&T, &[T], &[T]) -> bool + Send + Sync + 'static) -> PredicateFn<T> {
        Arc::new(move |value, ctx| f(value, ctx.matched, ctx.values))
    }

    /// Adapts a 4-ary predicate (`value, matched_so_far, all_values, position -> bool`), the
    /// full contract with nothing elided.
    pub fn from_fn4(
        f: impl Fn(&T, &[T], &[T], usize) -> bool + Send + Sync + 'static,
    ) -> PredicateFn<T> {
        Arc::new(move |value, ctx| f(value, ctx.matched, ctx.values, ctx.position))
    }

    pub(crate) fn new(
        evaluator: PredicateFn<T>,
        opts: SubPatternOptions<T>,
        default_allow_gaps: bool,
    ) -> Self {
        SubPattern {
            evaluator,
            optional: opts.optional,
            repeat: opts.repeat,
            capture: opts.capture,
            allow_gaps: opts.allow_gaps.unwrap_or(default_allow_gaps),
            gap_break_condition: opts.gap_break_condition,
            name: opts.name,
        }
    }

    #[inline]
    pub(crate) fn match_evaluator(&self, value: &T, ctx: &MatchContext<'_, T>) -> bool {
        (self.evaluator)(value, ctx)
    }

    /// Returns whether gap-skipping must stop at `value`. `true` means "stop here"; absent a
    /// configured break condition, a gap never has a reason to stop, so this returns `false`.
    #[inline]
    pub(crate) fn match_break_condition(&self, value: &T, ctx: &MatchContext<'_, T>) -> bool {
        match &self.gap_break_condition {
            None => false,
            Some(predicate) => predicate(value, ctx),
        }
    }

    /// Mutates a single flag after construction, addressed by string key. Used by
    /// `Pattern::set_options_for`, which resolves named/ranged ids down to a set of indices and
    /// then calls this per sub-pattern.
    pub fn set_option(&mut self, key: &str, value: OptionValue<T>) -> Result<(), Error> {
        match (key, value) {
            ("optional", OptionValue::Bool(v)) => self.optional = v,
            ("repeat", OptionValue::Bool(v)) => self.repeat = v,
            ("capture", OptionValue::Bool(v)) => self.capture = v,
            ("allow_gaps", OptionValue::Bool(v)) => self.allow_gaps = v,
            ("name", OptionValue::Name(v)) => self.name = Some(v),
            ("gap_break_condition", OptionValue::GapBreak(f)) => {
                self.gap_break_condition = Some(f)
            }
            (key, _) => return Err(Error::UnknownOption(key.to_string())),
        }
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn is_repeat(&self) -> bool {
        self.repeat
    }

    pub fn is_capture(&self) -> bool {
        self.capture
    }

    pub fn allows_gaps(&self) -> bool {
        self.allow_gaps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn break_condition_defaults_to_never_stopping_a_gap() {
        let sp: SubPattern<i32> = SubPattern::new(
            SubPattern::from_fn1(|v: &i32| *v == 1),
            SubPatternOptions::default(),
            true,
        );
        let ctx = MatchContext {
            matched: &[],
            values: &[1, 2, 3],
            position: 1,
        };
        assert!(!sp.match_break_condition(&2, &ctx));
    }

    #[test]
    fn unknown_option_key_is_rejected() {
        let mut sp: SubPattern<i32> = SubPattern::new(
            SubPattern::from_fn1(|v: &i32| *v == 1),
            SubPatternOptions::default(),
            false,
        );
        let err = sp.set_option("nonsense", OptionValue::Bool(true)).unwrap_err();
        assert!(matches!(err, Error::UnknownOption(_)));
    }
}
