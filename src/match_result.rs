use std::collections::HashMap;
use std::ops::Index;
use std::sync::Arc;

/// Either a positional index or a sub-pattern name, accepted by [`Match::at`].
pub enum GroupId<'a> {
    Index(usize),
    Name(&'a str),
}

impl From<usize> for GroupId<'_> {
    fn from(index: usize) -> Self {
        GroupId::Index(index)
    }
}

impl<'a> From<&'a str> for GroupId<'a> {
    fn from(name: &'a str) -> Self {
        GroupId::Name(name)
    }
}

/// The outcome of a successful [`crate::Pattern::match_seq`] call: one group of captured values
/// per capturing sub-pattern, in the sub-patterns' original order.
#[derive(Clone, Debug)]
pub struct Match<T> {
    groups: Vec<Vec<T>>,
    name_index: Arc<HashMap<String, usize>>,
    next_pos: usize,
}

impl<T> Match<T> {
    pub(crate) fn new(
        groups: Vec<Vec<T>>,
        name_index: Arc<HashMap<String, usize>>,
        next_pos: usize,
    ) -> Self {
        Match {
            groups,
            name_index,
            next_pos,
        }
    }

    /// All captured groups, in the order their sub-patterns were added.
    pub fn groups(&self) -> &[Vec<T>] {
        &self.groups
    }

    /// The index into the original input immediately after the last consumed element.
    pub fn next_pos(&self) -> usize {
        self.next_pos
    }

    /// Alias for [`Match::next_pos`], named to match the [`crate::Scanner`]'s vocabulary of
    /// "where does this match end".
    pub fn end(&self) -> usize {
        self.next_pos
    }

    /// Looks a group up by position or by name.
    pub fn at<'a>(&self, id: impl Into<GroupId<'a>>) -> Option<&[T]> {
        let index = match id.into() {
            GroupId::Index(i) => i,
            GroupId::Name(name) => *self.name_index.get(name)?,
        };
        self.groups.get(index).map(Vec::as_slice)
    }

    /// Every matched value across every group, in input order.
    pub fn flatten(&self) -> impl Iterator<Item = &T> {
        self.groups.iter().flat_map(|g| g.iter())
    }

    pub fn first(&self) -> Option<&T> {
        self.flatten().next()
    }

    pub fn last(&self) -> Option<&T> {
        self.groups.iter().rev().find_map(|g| g.last())
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(Vec::is_empty)
    }
}

/// Positional indexing, `m[0]`, panicking like `Vec`'s own `Index` on an out-of-range position.
impl<T> Index<usize> for Match<T> {
    type Output = [T];

    fn index(&self, index: usize) -> &Self::Output {
        &self.groups[index]
    }
}

/// Named indexing, `m["field"]`, panicking if the name is unknown (use [`Match::at`] for a
/// fallible lookup).
impl<T> Index<&str> for Match<T> {
    type Output = [T];

    fn index(&self, name: &str) -> &Self::Output {
        self.at(name)
            .unwrap_or_else(|| panic!("no such named group: {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_match() -> Match<i32> {
        let mut name_index = HashMap::new();
        name_index.insert("second".to_string(), 1);
        Match::new(
            vec![vec![1], vec![2, 3], vec![]],
            Arc::new(name_index),
            3,
        )
    }

    #[test]
    fn looks_up_by_index_and_name() {
        let m = sample_match();
        assert_eq!(m.at(0), Some(&[1][..]));
        assert_eq!(m.at("second"), Some(&[2, 3][..]));
        assert_eq!(m.at("missing"), None);
    }

    #[test]
    fn flattens_in_input_order() {
        let m = sample_match();
        let flat: Vec<i32> = m.flatten().copied().collect();
        assert_eq!(flat, vec![1, 2, 3]);
        assert_eq!(m.first(), Some(&1));
        assert_eq!(m.last(), Some(&3));
    }

    #[test]
    fn index_operator_mirrors_at() {
        let m = sample_match();
        assert_eq!(&m[0], &[1][..]);
        assert_eq!(&m["second"], &[2, 3][..]);
    }

    #[test]
    fn end_is_an_alias_for_next_pos() {
        let m = sample_match();
        assert_eq!(m.end(), m.next_pos());
    }
}
