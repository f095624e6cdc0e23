mod chunk;
mod embedding;

pub use chunk::{ChunkMetadata, RetrievedChunk, SearchResult};
pub use embedding::Embedding;
