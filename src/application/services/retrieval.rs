use std::sync::Arc;
use tracing::instrument;

use crate::domain::{
    ports::{EmbeddingService, VectorStore},
    DomainError, RetrievedChunk, SearchResult,
};

/// Embeds a query and fetches the most similar chunks from the vector store.
pub struct RetrievalService {
    embedding: Arc<dyn EmbeddingService>,
    vector_store: Arc<dyn VectorStore>,
    default_top_k: usize,
}

impl RetrievalService {
    pub fn new(
        embedding: Arc<dyn EmbeddingService>,
        vector_store: Arc<dyn VectorStore>,
        default_top_k: usize,
    ) -> Self {
        Self {
            embedding,
            vector_store,
            default_top_k,
        }
    }

    #[instrument(skip(self))]
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>, DomainError> {
        self.retrieve_top_k(query, self.default_top_k).await
    }

    #[instrument(skip(self))]
    pub async fn retrieve_top_k(
        &self,
        query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchResult>, DomainError> {
        let embedding = self.embedding.embed(query).await?;
        self.vector_store.search(&embedding, top_k).await
    }

    #[instrument(skip(self, chunk), fields(chunk_id = %chunk.id))]
    pub async fn index_chunk(&self, chunk: &RetrievedChunk) -> Result<(), DomainError> {
        let embedding = self.embedding.embed(&chunk.content).await?;
        self.vector_store.upsert(chunk, &embedding).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::InMemoryVectorStore;
    use async_trait::async_trait;
    use crate::domain::Embedding;

    /// Maps known words onto fixed axes so similarity is deterministic.
    struct KeywordEmbedding;

    #[async_trait]
    impl EmbeddingService for KeywordEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            let axes = ["alpha", "beta", "gamma"];
            let vec = axes
                .iter()
                .map(|w| if text.contains(w) { 1.0 } else { 0.0 })
                .collect();
            Ok(Embedding::new(vec))
        }

        fn dimension(&self) -> usize {
            3
        }
    }

    fn service(top_k: usize) -> RetrievalService {
        RetrievalService::new(
            Arc::new(KeywordEmbedding),
            Arc::new(InMemoryVectorStore::new()),
            top_k,
        )
    }

    #[tokio::test]
    async fn test_index_then_retrieve() {
        let svc = service(2);

        svc.index_chunk(&RetrievedChunk::new("all about alpha"))
            .await
            .unwrap();
        svc.index_chunk(&RetrievedChunk::new("all about beta"))
            .await
            .unwrap();

        let results = svc.retrieve("tell me about alpha").await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.content, "all about alpha");
    }

    #[tokio::test]
    async fn test_retrieve_respects_top_k() {
        let svc = service(1);

        svc.index_chunk(&RetrievedChunk::new("alpha one"))
            .await
            .unwrap();
        svc.index_chunk(&RetrievedChunk::new("alpha two"))
            .await
            .unwrap();

        let results = svc.retrieve("alpha").await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
