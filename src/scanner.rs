//! Walks an input sequence applying a [`Pattern`] at successive positions.
//!
//! [`Scanner`] borrows a slice and owns nothing but an integer cursor, mirroring the
//! "owns mutable cursor state, not thread-safe" contract in the pattern specification: callers
//! wanting to scan the same input from multiple threads construct one `Scanner` per thread.
//! [`StreamScanner`] is the lazy counterpart for callers who only have a restartable iterator
//! rather than a borrowed slice (see its own docs for the restart-cost contract).

use crate::match_result::Match;
use crate::pattern::Pattern;

/// Scans a borrowed slice with a [`Pattern`], yielding non-overlapping matches.
pub struct Scanner<'v, T> {
    values: &'v [T],
    pos: usize,
}

impl<'v, T> Scanner<'v, T> {
    pub fn new(values: &'v [T]) -> Self {
        Scanner { values, pos: 0 }
    }

    /// True once the cursor has reached or passed the end of the input.
    pub fn eov(&self) -> bool {
        self.pos >= self.values.len()
    }

    /// Rewinds the cursor to the start. Idempotent: `reset(); reset()` equals one `reset()`.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Attempts a match anchored exactly at the cursor. On success advances the cursor by the
    /// match's `next_pos` and returns it; on failure the cursor is left untouched.
    pub fn scan(&mut self, pattern: &Pattern<T>) -> Option<Match<T>>
    where
        T: Clone,
    {
        let (m, next_pos) = pattern.match_with_position(&self.values[self.pos..])?;
        self.pos += next_pos;
        Some(m)
    }

    /// Tries successively later start positions until the pattern matches or the input is
    /// exhausted. On success the cursor lands just past the match; on failure it is untouched.
    pub fn scan_until(&mut self, pattern: &Pattern<T>) -> Option<Match<T>>
    where
        T: Clone,
    {
        for start in self.pos..=self.values.len() {
            if let Some((m, next_pos)) = pattern.match_with_position(&self.values[start..]) {
                self.pos = start + next_pos;
                return Some(m);
            }
        }
        None
    }

    /// Iterator adapter over repeated [`Scanner::scan_until`] calls: yields every non-overlapping
    /// match until the scanner is exhausted. Pure convenience; adds no new search semantics.
    pub fn scan_iter<'s, 'p>(&'s mut self, pattern: &'p Pattern<T>) -> ScanIter<'s, 'v, 'p, T>
    where
        T: Clone,
    {
        ScanIter {
            scanner: self,
            pattern,
        }
    }
}

pub struct ScanIter<'s, 'v, 'p, T> {
    scanner: &'s mut Scanner<'v, T>,
    pattern: &'p Pattern<T>,
}

impl<'s, 'v, 'p, T> Iterator for ScanIter<'s, 'v, 'p, T>
where
    T: Clone,
{
    type Item = Match<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.scanner.eov() {
            return None;
        }
        self.scanner.scan_until(self.pattern)
    }
}

/// Lazy counterpart to [`Scanner`] for callers who only have a restartable iterator rather than
/// a borrowed slice. `I` must be cheaply `Clone`: each trial start position re-derives its view
/// of the remaining input by cloning the iterator and skipping ahead, so cloning must be O(1)
/// (true of `std::slice::Iter`/`std::iter::Peekable` over one, false of e.g. a `BufRead` adapter
/// that owns unbuffered I/O state).
pub struct StreamScanner<I> {
    source: I,
    pos: usize,
}

impl<I, T> StreamScanner<I>
where
    I: Iterator<Item = T> + Clone,
    T: Clone,
{
    pub fn new(source: I) -> Self {
        StreamScanner { source, pos: 0 }
    }

    /// Peeks one element ahead to detect exhaustion without consuming the underlying iterator.
    pub fn eov(&self) -> bool {
        self.source.clone().next().is_none()
    }

    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn buffer_from(&self, skip: usize) -> Vec<T> {
        self.source.clone().skip(skip).collect()
    }

    pub fn scan(&mut self, pattern: &Pattern<T>) -> Option<Match<T>> {
        let buf = self.buffer_from(0);
        let (m, next_pos) = pattern.match_with_position(&buf)?;
        self.pos += next_pos;
        self.source = {
            let mut s = self.source.clone();
            for _ in 0..next_pos {
                s.next();
            }
            s
        };
        Some(m)
    }

    pub fn scan_until(&mut self, pattern: &Pattern<T>) -> Option<Match<T>> {
        let mut skipped = 0usize;
        loop {
            let buf = self.buffer_from(skipped);
            if buf.is_empty() {
                return None;
            }
            if let Some((m, next_pos)) = pattern.match_with_position(&buf) {
                self.pos += skipped + next_pos;
                let mut s = self.source.clone();
                for _ in 0..(skipped + next_pos) {
                    s.next();
                }
                self.source = s;
                return Some(m);
            }
            skipped += 1;
        }
    }
}
