//! The core backtracking search.
//!
//! Conceptually this explores a non-deterministic state machine breadth-first: a state is
//! `(sp, vp, groups, flat, prev_sp, prev_matched)` as described in the module-level docs of
//! [`crate::Pattern`]. Four transition rules fire off of each dequeued state (stay-and-repeat,
//! stay-and-gap, advance-both, skip-optional), and a state that has just matched its sub-pattern
//! at-or-past the pattern's last mandatory sub-pattern is a candidate final match, scored by
//! how much input it consumed and, as a tie-break, how many elements it captured.
//!
//! Rather than growing a `groups` list in lockstep with `sp` (and tracking whether the previous
//! step landed on the same sub-pattern to decide whether to start a new slot), this
//! implementation pre-allocates one `Vec<T>` per sub-pattern, indexed directly by sub-pattern
//! index. Since `sp` only ever increases, a sub-pattern's slot is only ever written to during one
//! contiguous run of visits, which is exactly the slot the dynamic scheme would have kept
//! "current" — so the externally observable result is identical, without the bookkeeping.
//!
//! The search space is finite because every transition increases `sp` or `vp` and states are
//! deduplicated on `(sp, vp, prev_sp, prev_matched)`, keeping only the best-scoring groups shape
//! seen for each key (ties broken the same way the final answer is: total captured count). This
//! collapses the search to `O(|subpatterns| * |values|)` for patterns without ambiguous nested
//! repetition, per the termination argument in the pattern specification.

use std::collections::{HashMap, VecDeque};

use crate::context::MatchContext;
use crate::sub_pattern::SubPattern;

#[derive(Clone)]
struct State<T> {
    sp: usize,
    vp: usize,
    groups: Vec<Vec<T>>,
    flat: Vec<T>,
    prev_sp: Option<usize>,
    prev_matched: bool,
}

type MemoKey = (usize, usize, Option<usize>, bool);

/// Runs the search described above and returns the winning `(groups, next_pos)`, or `None` if
/// no sub-pattern sequence could be satisfied (including the "every sub-pattern optional, no
/// normal match" case, which the caller distinguishes and turns into the all-empty-groups
/// degenerate result — see [`crate::Pattern::match_with_position`]).
pub(crate) fn run<T: Clone>(
    subpatterns: &[SubPattern<T>],
    last_mandatory_index: Option<usize>,
    values: &[T],
) -> Option<(Vec<Vec<T>>, usize)> {
    let n = subpatterns.len();
    if n == 0 {
        return None;
    }

    let mut queue: VecDeque<State<T>> = VecDeque::new();
    let mut seen: HashMap<MemoKey, usize> = HashMap::new();
    let mut best: Option<(Vec<Vec<T>>, usize)> = None;
    let mut best_total = 0usize;

    let initial = State {
        sp: 0,
        vp: 0,
        groups: vec![Vec::new(); n],
        flat: Vec::new(),
        prev_sp: None,
        prev_matched: false,
    };
    seen.insert((0, 0, None, false), 0);
    queue.push_back(initial);

    #[cfg(feature = "tracing")]
    let _span = tracing::trace_span!("seqmatch::matcher::run", inputs = values.len()).entered();

    while let Some(state) = queue.pop_front() {
        if state.vp >= values.len() {
            continue;
        }
        let v = &values[state.vp];
        let sp = state.sp;
        let sub = &subpatterns[sp];
        let ctx = MatchContext {
            matched: &state.flat,
            values,
            position: state.vp,
        };

        let matched = sub.match_evaluator(v, &ctx);
        let broke = sub.match_break_condition(v, &ctx);
        let gaps = sub.allows_gaps() && !broke;
        let prev_self = state.prev_sp.map_or(true, |p| p == sp);

        #[cfg(feature = "tracing")]
        tracing::trace!(sp, vp = state.vp, matched, gaps, "dequeued state");

        if matched && last_mandatory_index.map_or(true, |lm| sp >= lm) {
            let mut candidate_groups = state.groups.clone();
            candidate_groups[sp].push(v.clone());
            let next_pos = state.vp + 1;
            let total: usize = candidate_groups.iter().map(Vec::len).sum();
            let better = match &best {
                None => true,
                Some((_, best_next_pos)) => {
                    next_pos > *best_next_pos || (next_pos == *best_next_pos && total > best_total)
                }
            };
            if better {
                #[cfg(feature = "tracing")]
                tracing::debug!(next_pos, total, "new best match");
                best = Some((candidate_groups, next_pos));
                best_total = total;
            }
        }

        // Rule 1: stay on this sub-pattern, advance value (repeat).
        if matched && sub.is_repeat() {
            let mut groups = state.groups.clone();
            groups[sp].push(v.clone());
            let mut flat = state.flat.clone();
            flat.push(v.clone());
            try_enqueue(
                &mut queue,
                &mut seen,
                State {
                    sp,
                    vp: state.vp + 1,
                    groups,
                    flat,
                    prev_sp: Some(sp),
                    prev_matched: true,
                },
            );
        }

        // Rule 2: stay on this sub-pattern, skip value (gap).
        if !matched && gaps {
            try_enqueue(
                &mut queue,
                &mut seen,
                State {
                    sp,
                    vp: state.vp + 1,
                    groups: state.groups.clone(),
                    flat: state.flat.clone(),
                    prev_sp: state.prev_sp,
                    prev_matched: true,
                },
            );
        }

        if sp + 1 < n {
            // Rule 3: advance both sub-pattern and value.
            if (matched || gaps) && !(sub.is_optional() && !matched) {
                let mut groups = state.groups.clone();
                if matched {
                    groups[sp].push(v.clone());
                }
                let mut flat = state.flat.clone();
                flat.push(v.clone());
                try_enqueue(
                    &mut queue,
                    &mut seen,
                    State {
                        sp: sp + 1,
                        vp: state.vp + 1,
                        groups,
                        flat,
                        prev_sp: Some(sp),
                        prev_matched: true,
                    },
                );
            }

            // Rule 4: skip this optional sub-pattern, keep the value pending.
            if sub.is_optional() && !(prev_self && state.prev_matched) {
                try_enqueue(
                    &mut queue,
                    &mut seen,
                    State {
                        sp: sp + 1,
                        vp: state.vp,
                        groups: state.groups.clone(),
                        flat: state.flat.clone(),
                        prev_sp: Some(sp),
                        prev_matched: false,
                    },
                );
            }
        }
    }

    best
}

fn try_enqueue<T>(
    queue: &mut VecDeque<State<T>>,
    seen: &mut HashMap<MemoKey, usize>,
    state: State<T>,
) {
    let key: MemoKey = (state.sp, state.vp, state.prev_sp, state.prev_matched);
    let total: usize = state.groups.iter().map(Vec::len).sum();
    match seen.get(&key) {
        Some(&best) if best >= total => return,
        _ => {
            seen.insert(key, total);
            queue.push_back(state);
        }
    }
}
