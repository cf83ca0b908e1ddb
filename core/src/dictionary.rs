use std::collections::HashMap;

use crate::DocId;

pub type PostingListId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub posting_list_id: PostingListId,
    /// Length of the referenced posting list.
    pub posting_list_size: usize,
}

/// Term dictionary plus the posting lists it points to.
///
/// Posting-list ids are allocated from 1 upwards and never reused. Every
/// stored list is strictly ascending.
#[derive(Debug)]
pub struct TermDictionary {
    terms: HashMap<String, DictionaryEntry>,
    postings: HashMap<PostingListId, Vec<DocId>>,
    next_posting_list_id: PostingListId,
}

impl Default for TermDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl TermDictionary {
    pub fn new() -> Self {
        Self { terms: HashMap::new(), postings: HashMap::new(), next_posting_list_id: 1 }
    }

    /// Register `term` with `doc_ids`, or merge the ids into the list the
    /// term already points to. Returns the term's posting-list id.
    pub fn add_or_merge(&mut self, term: &str, doc_ids: &[DocId]) -> PostingListId {
        if let Some(entry) = self.terms.get_mut(term) {
            let list = self.postings.entry(entry.posting_list_id).or_default();
            list.extend_from_slice(doc_ids);
            list.sort_unstable();
            list.dedup();
            entry.posting_list_size = list.len();
            return entry.posting_list_id;
        }

        let posting_list_id = self.next_posting_list_id;
        self.next_posting_list_id += 1;
        let mut list = doc_ids.to_vec();
        list.sort_unstable();
        list.dedup();
        self.terms.insert(
            term.to_string(),
            DictionaryEntry { posting_list_id, posting_list_size: list.len() },
        );
        self.postings.insert(posting_list_id, list);
        posting_list_id
    }

    /// Point another key at an existing posting list.
    pub fn link(&mut self, alias: &str, posting_list_id: PostingListId) {
        let posting_list_size = self.postings.get(&posting_list_id).map_or(0, Vec::len);
        self.terms.insert(alias.to_string(), DictionaryEntry { posting_list_id, posting_list_size });
    }

    pub fn entry(&self, term: &str) -> Option<&DictionaryEntry> {
        self.terms.get(term)
    }

    pub fn postings(&self, posting_list_id: PostingListId) -> Option<&[DocId]> {
        self.postings.get(&posting_list_id).map(Vec::as_slice)
    }

    pub fn postings_for(&self, term: &str) -> Option<&[DocId]> {
        self.entry(term).and_then(|entry| self.postings(entry.posting_list_id))
    }

    /// Number of dictionary keys.
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn posting_list_count(&self) -> usize {
        self.postings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DictionaryEntry)> {
        self.terms.iter().map(|(term, entry)| (term.as_str(), entry))
    }
}
