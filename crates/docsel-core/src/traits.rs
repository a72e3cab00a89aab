use crate::raw::RawCitation;
use crate::types::GenerationRequest;

/// Retrieval back-end: one request, one complete response, no partial results.
pub trait RetrievalService: Send + Sync {
    fn search(&self, term: &str) -> anyhow::Result<Vec<RawCitation>>;
}

/// Generation back-end answering over the selected documents.
pub trait GenerationService: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> anyhow::Result<String>;
}
