//! Prefix tries mapping terms to posting-list ids.
//!
//! Two layouts share one contract: [`CompactTrie`] collapses single-child
//! chains into multi-character edge labels, [`SimpleTrie`] keeps one
//! character per edge. Both store nodes in an arena addressed by index and
//! walk it iteratively.

mod compact;
mod simple;

pub use compact::CompactTrie;
pub use simple::SimpleTrie;

use crate::dictionary::PostingListId;

/// A stored term found under a searched prefix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PrefixMatch {
    pub term: String,
    pub posting_list_id: PostingListId,
}

pub trait PrefixTrie: Default {
    /// Store `term`, overwriting the id of an equal term inserted earlier.
    fn insert(&mut self, term: &str, posting_list_id: PostingListId);

    /// Id of the term equal to `term`, if one was inserted.
    fn find_exact(&self, term: &str) -> Option<PostingListId>;

    /// Every stored term starting with `prefix`, ordered by posting-list id,
    /// without duplicates.
    fn find_with_prefix(&self, prefix: &str) -> Vec<PrefixMatch>;

    /// Number of stored terms.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Order by posting-list id and drop repeated entries.
pub(crate) fn sort_matches(mut matches: Vec<PrefixMatch>) -> Vec<PrefixMatch> {
    matches.sort_by(|a, b| a.posting_list_id.cmp(&b.posting_list_id).then_with(|| a.term.cmp(&b.term)));
    matches.dedup();
    matches
}
