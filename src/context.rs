use std::sync::Arc;

/// Read-only view of the in-progress match handed to every predicate.
///
/// This stands in for the original engine's variable-arity calling convention (a predicate
/// could declare 1 to 4 parameters and only the declared prefix of `(value, matched_so_far,
/// all_values, position)` was ever passed). Rust closures carry their arity in the type system,
/// so instead of inspecting arity at runtime, a predicate is built through one of
/// [`crate::sub_pattern::SubPattern::from_fn1`]..`from_fn4`, each of which simply ignores the
/// context fields the wrapped closure didn't ask for.
#[derive(Clone, Copy)]
pub struct MatchContext<'a, T> {
    /// Every value matched so far, flattened across sub-patterns, in input order.
    pub matched: &'a [T],
    /// The full input sequence currently being matched against.
    pub values: &'a [T],
    /// The index of the value under consideration right now.
    pub position: usize,
}

/// A predicate over one value plus its matching context.
///
/// `Arc` rather than `Box` because a [`crate::SubPattern`] must be cheaply cloneable: the
/// `with_options` builder scope and sharing one compiled [`crate::Pattern`] across several
/// [`crate::Scanner`]s both rely on it.
pub type PredicateFn<T> = Arc<dyn Fn(&T, &MatchContext<'_, T>) -> bool + Send + Sync>;
