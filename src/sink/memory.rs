//! In-memory sink

use super::traits::{DocumentSink, SinkResult};
use crate::document::Document;
use dashmap::DashMap;

/// Keeps stored documents in memory, keyed by name
#[derive(Debug, Default)]
pub struct MemorySink {
    documents: DashMap<String, Document>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self {
            documents: DashMap::new(),
        }
    }

    /// Get a stored document by name
    pub fn get(&self, name: &str) -> Option<Document> {
        self.documents.get(name).map(|r| r.clone())
    }

    /// Names of all stored documents, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.documents.iter().map(|r| r.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl DocumentSink for MemorySink {
    fn store(&self, document: &Document) -> SinkResult<String> {
        self.documents
            .insert(document.name().to_string(), document.clone());
        Ok(format!("memory:{}", document.name()))
    }
}
