pub mod config;
pub mod embedding;
pub mod llm;
pub mod queue;
pub mod vector_store;

pub use config::AppConfig;
pub use embedding::TextEmbedding;
pub use llm::OpenAiLlm;
pub use queue::{keys, queues, JobRecord, JobState, ProcessQueryJob};
pub use vector_store::{InMemoryVectorStore, QdrantVectorStore};
