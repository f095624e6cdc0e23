use std::sync::Arc;
use tracing::instrument;

use crate::application::RetrievalService;
use crate::domain::{ports::LlmService, DomainError, SearchResult};

const PREAMBLE: &str = "You are a helpful AI Assistant who answers questions based on the available context extracted from a PDF file.

Instructions:
- Answer questions ONLY based on the provided context
- If the answer is not in the context, say \"I don't have enough information to answer that\"
- Reference the page number when providing information
- Be concise and accurate";

/// Answers a query with retrieval-augmented generation: fetch similar
/// chunks, fold them into a system prompt, ask the LLM.
pub struct QueryProcessor {
    retrieval: Arc<RetrievalService>,
    llm: Arc<dyn LlmService>,
}

impl QueryProcessor {
    pub fn new(retrieval: Arc<RetrievalService>, llm: Arc<dyn LlmService>) -> Self {
        Self { retrieval, llm }
    }

    #[instrument(skip(self))]
    pub async fn answer(&self, query: &str) -> Result<String, DomainError> {
        let results = self.retrieval.retrieve(query).await?;
        tracing::debug!(chunks = results.len(), "retrieved context");

        let system = build_system_prompt(&results);
        self.llm.complete_with_system(&system, query).await
    }
}

fn build_system_prompt(results: &[SearchResult]) -> String {
    format!("{}\n\nContext:\n{}", PREAMBLE, build_context(results))
}

/// Joins chunk text and position metadata into the context block the LLM is
/// told to answer from. Missing metadata renders as "N/A".
fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| {
            let page = r
                .chunk
                .metadata
                .page
                .map(|p| p.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let source = r.chunk.metadata.source.as_deref().unwrap_or("N/A");
            format!(
                "Page Content: {}\nPage Number: {}\nFile Location: {}",
                r.chunk.content, page, source
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}
