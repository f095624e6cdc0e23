use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A span of extracted document text returned by the vector store,
/// carrying enough position metadata to cite it back to the source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedChunk {
    pub id: Uuid,
    pub content: String,
    pub metadata: ChunkMetadata,
}

impl RetrievedChunk {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            metadata: ChunkMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: ChunkMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub page: Option<u32>,
    pub source: Option<String>,
}

impl ChunkMetadata {
    pub fn new(page: Option<u32>, source: Option<impl Into<String>>) -> Self {
        Self {
            page,
            source: source.map(Into::into),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: RetrievedChunk,
    pub score: f32,
}
