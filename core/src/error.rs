use thiserror::Error;

use crate::DocId;

/// Errors raised by index construction and query resolution.
///
/// An absent term is not an error; lookups return an empty result for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("invalid wildcard pattern {pattern:?}: {reason}")]
    InvalidWildcardPattern { pattern: String, reason: &'static str },

    #[error("document not found: {0}")]
    DocumentNotFound(DocId),

    #[error("term {term:?} contains reserved character {ch:?}")]
    ReservedCharacter { term: String, ch: char },
}

pub type Result<T> = std::result::Result<T, SearchError>;
