use thiserror::Error;

/// Builder-time failures. Matching itself never produces one of these: a failed match is
/// `None`, not an `Err` (see [`crate::Pattern::match_seq`]).
#[derive(Debug, Error)]
pub enum Error {
    /// A predicate, range, or regular expression supplied to a factory helper was malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Two sub-patterns in the same [`crate::Pattern`] were given the same name.
    #[error("duplicate sub-pattern name: {0}")]
    DuplicateName(String),

    /// `set_option`/`set_options_for` was given a key outside the recognized option set.
    #[error("unknown option: {0}")]
    UnknownOption(String),
}
