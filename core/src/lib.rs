//! Boolean and wildcard term retrieval over an in-memory document set.
//!
//! Documents are tokenized and normalized into terms, grouped into posting
//! lists, and served by one of two indexes: [`InvertedIndex`] for exact
//! terms, [`PermutermIndex`] for `*` wildcard queries. [`QueryRunner`]
//! answers single-term and two-term AND queries over either.

pub mod config;
pub mod dictionary;
pub mod document;
pub mod error;
pub mod index;
pub mod ingest;
pub mod normalizer;
pub mod permuterm;
pub mod query;
pub mod tokenizer;
pub mod trie;

pub use config::{AnalyzerConfig, IndexVariant, SearchConfig, TrieKind};
pub use dictionary::{DictionaryEntry, PostingListId, TermDictionary};
pub use document::{DocId, Document, DocumentStore};
pub use error::{Result, SearchError};
pub use index::{group_terms, Index, InvertedIndex, TermMatch};
pub use normalizer::Normalizer;
pub use permuterm::PermutermIndex;
pub use query::{intersect, union, QueryRunner};
pub use tokenizer::{Analyzer, Tokenizer};
pub use trie::{CompactTrie, PrefixMatch, PrefixTrie, SimpleTrie};

/// Build the index selected by `config` from `documents`.
pub fn build_index(documents: Vec<Document>, config: &SearchConfig) -> Result<Box<dyn Index>> {
    let analyzer = Analyzer::from_config(&config.analyzer);
    let index: Box<dyn Index> = match (config.variant, config.trie) {
        (IndexVariant::Inverted, _) => Box::new(InvertedIndex::build(documents, analyzer)),
        (IndexVariant::Permuterm, TrieKind::Compact) => {
            Box::new(PermutermIndex::<CompactTrie>::build(documents, analyzer)?)
        }
        (IndexVariant::Permuterm, TrieKind::Simple) => {
            Box::new(PermutermIndex::<SimpleTrie>::build(documents, analyzer)?)
        }
    };
    Ok(index)
}
