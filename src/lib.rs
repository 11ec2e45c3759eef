//! A backtracking pattern matcher for sequences of arbitrary values, scored like a greedy regex
//! engine.
//!
//! Where a regular expression matches runs of characters, a [`Pattern`] here matches runs of
//! `T`: each [`SubPattern`] is an arbitrary predicate over one value (plus read-only context —
//! what's matched so far, the whole input, the current position) rather than a fixed character
//! class, and a successful match returns the captured *groups* of elements rather than byte
//! ranges.
//!
//! ```
//! use seqmatch::Pattern;
//!
//! let p = Pattern::build(|p| {
//!     p.value_eq(1, Default::default())?;
//!     p.least_one_any(Default::default())?;
//!     p.value_eq(4, Default::default())?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let m = p.match_seq(&[1, 2, 3, 4]).unwrap();
//! assert_eq!(m.groups(), &[vec![1], vec![2, 3], vec![4]]);
//! ```
//!
//! Matching one [`Pattern`] against one slice is [`Pattern::match_seq`]/
//! [`Pattern::match_with_position`]; walking repeatedly across a longer sequence, yielding one
//! non-overlapping match at a time, is [`Scanner`].

mod context;
mod error;
mod match_result;
mod matcher;
mod pattern;
pub mod predicates;
mod scanner;
mod sub_pattern;

pub use context::{MatchContext, PredicateFn};
pub use error::Error;
pub use match_result::{GroupId, Match};
pub use pattern::{Pattern, SubPatternId};
#[cfg(feature = "regex")]
pub use predicates::match_regexp;
pub use predicates::{absent, any, present, value_eq, value_in, value_neq, value_of};
pub use predicates::{Value, ValueKind};
pub use scanner::{ScanIter, Scanner, StreamScanner};
pub use sub_pattern::{OptionValue, SubPattern, SubPatternOptions};
