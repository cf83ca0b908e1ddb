use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Result, SearchError};

pub type DocId = u32;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocId,
    /// Where the document came from, usually a URL.
    pub source: Option<String>,
    pub date: Option<String>,
    pub title: String,
    pub text: String,
}

impl Document {
    pub fn new(id: DocId, text: impl Into<String>) -> Self {
        Self { id, text: text.into(), ..Default::default() }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// Owns the ingested documents for the lifetime of an index.
#[derive(Debug, Default)]
pub struct DocumentStore {
    docs: Vec<Document>,
    by_id: HashMap<DocId, usize>,
}

impl DocumentStore {
    pub fn new(docs: Vec<Document>) -> Self {
        let mut by_id = HashMap::with_capacity(docs.len());
        for (pos, doc) in docs.iter().enumerate() {
            // first document wins on duplicate ids
            by_id.entry(doc.id).or_insert(pos);
        }
        Self { docs, by_id }
    }

    pub fn get(&self, id: DocId) -> Result<&Document> {
        self.by_id
            .get(&id)
            .map(|&pos| &self.docs[pos])
            .ok_or(SearchError::DocumentNotFound(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.docs.iter()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}
