use std::collections::HashMap;

use crate::dictionary::TermDictionary;
use crate::document::{DocId, Document, DocumentStore};
use crate::error::Result;
use crate::tokenizer::Analyzer;

/// A dictionary entry matched by a lookup, with its posting list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch<'a> {
    pub term: String,
    pub postings: &'a [DocId],
}

/// Read side shared by every index variant.
pub trait Index {
    /// Normalize `raw_term` and return the matching dictionary entries.
    /// An unknown term yields an empty list.
    fn lookup(&self, raw_term: &str) -> Result<Vec<TermMatch<'_>>>;

    fn document(&self, id: DocId) -> Result<&Document>;
}

/// Group the distinct terms of every document by term. Groups come out in
/// order of first appearance across the corpus, and that order decides
/// posting-list id allocation.
pub fn group_terms<'a, I>(documents: I, analyzer: &Analyzer) -> Vec<(String, Vec<DocId>)>
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut groups: Vec<(String, Vec<DocId>)> = Vec::new();
    let mut slot: HashMap<String, usize> = HashMap::new();
    for doc in documents {
        for term in analyzer.analyze(&doc.text) {
            match slot.get(&term) {
                Some(&pos) => groups[pos].1.push(doc.id),
                None => {
                    slot.insert(term.clone(), groups.len());
                    groups.push((term, vec![doc.id]));
                }
            }
        }
    }
    groups
}

/// Non-positional inverted index: exact term lookups only.
#[derive(Debug)]
pub struct InvertedIndex {
    dictionary: TermDictionary,
    docs: DocumentStore,
    analyzer: Analyzer,
}

impl InvertedIndex {
    pub fn build(documents: Vec<Document>, analyzer: Analyzer) -> Self {
        let docs = DocumentStore::new(documents);
        let mut dictionary = TermDictionary::new();
        for (term, doc_ids) in group_terms(docs.iter(), &analyzer) {
            dictionary.add_or_merge(&term, &doc_ids);
        }
        tracing::info!(
            num_docs = docs.len(),
            num_terms = dictionary.len(),
            "built inverted index"
        );
        Self { dictionary, docs, analyzer }
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    pub fn num_docs(&self) -> usize {
        self.docs.len()
    }
}

impl Index for InvertedIndex {
    fn lookup(&self, raw_term: &str) -> Result<Vec<TermMatch<'_>>> {
        let Some(term) = self.analyzer.normalizer().normalize_term(raw_term) else {
            return Ok(Vec::new());
        };
        let matches: Vec<TermMatch<'_>> = self
            .dictionary
            .postings_for(&term)
            .map(|postings| TermMatch { term: term.clone(), postings })
            .into_iter()
            .collect();
        tracing::debug!(%term, matches = matches.len(), "inverted lookup");
        Ok(matches)
    }

    fn document(&self, id: DocId) -> Result<&Document> {
        self.docs.get(id)
    }
}
