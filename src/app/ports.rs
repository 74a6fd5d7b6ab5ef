use crate::types::MovieRecord;
use async_trait::async_trait;

/// Outcome of a metadata lookup by title.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataLookup {
    /// The provider recognized the title. The record carries the canonical
    /// title, which may differ from the query.
    Found(MovieRecord),
    NotFound,
    /// Transport or availability failure.
    ConnectionError(String),
}

// Enrichment-side port
#[async_trait]
pub trait MetadataProvider: Send + Sync {
    async fn fetch(&self, title: &str) -> MetadataLookup;
}
