//! Document source abstraction

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use shared_types::{DocumentMetadata, RawDocument};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// Content that can never be read as text, e.g. invalid UTF-8
    #[error("Unreadable document: {0}")]
    Unreadable(String),

    #[error("Transient source failure: {0}")]
    Transient(String),
}

/// Where document text comes from (document store, file system, ...)
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch_document_text(&self, id: &str) -> Result<RawDocument, SourceError>;

    /// Cheap metadata lookup; defaults to a full fetch
    async fn fetch_metadata(&self, id: &str) -> Result<DocumentMetadata, SourceError> {
        Ok(self.fetch_document_text(id).await?.metadata())
    }
}

/// Documents held in memory, for tests and embedding
#[derive(Default)]
pub struct InMemoryDocumentSource {
    documents: RwLock<HashMap<String, RawDocument>>,
}

impl InMemoryDocumentSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: impl IntoIterator<Item = RawDocument>) -> Self {
        Self {
            documents: RwLock::new(documents.into_iter().map(|d| (d.id.clone(), d)).collect()),
        }
    }

    /// Insert or replace; returns the previous version
    pub async fn insert(&self, document: RawDocument) -> Option<RawDocument> {
        self.documents.write().await.insert(document.id.clone(), document)
    }

    pub async fn remove(&self, id: &str) -> Option<RawDocument> {
        self.documents.write().await.remove(id)
    }
}

#[async_trait]
impl DocumentSource for InMemoryDocumentSource {
    async fn fetch_document_text(&self, id: &str) -> Result<RawDocument, SourceError> {
        self.documents
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }

    async fn fetch_metadata(&self, id: &str) -> Result<DocumentMetadata, SourceError> {
        self.documents
            .read()
            .await
            .get(id)
            .map(RawDocument::metadata)
            .ok_or_else(|| SourceError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_source() {
        let source = InMemoryDocumentSource::with_documents([RawDocument::from_text("1", "a.txt", "one two")]);
        assert_eq!(source.fetch_metadata("1").await.unwrap().word_count, 2);
        assert_eq!(
            source.fetch_document_text("2").await.unwrap_err(),
            SourceError::NotFound("2".to_string())
        );

        source.remove("1").await;
        assert!(source.fetch_document_text("1").await.is_err());
    }
}
