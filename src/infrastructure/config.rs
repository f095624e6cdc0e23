use serde::Deserialize;

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub redis_url: String,
    pub qdrant_url: String,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub dimension: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    pub collection: String,
    pub top_k: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    pub concurrency: usize,
    pub result_ttl_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            redis_url: "redis://localhost:6379".to_string(),
            qdrant_url: "http://localhost:6334".to_string(),
            llm: LlmConfig {
                model: "gpt-4".to_string(),
            },
            embedding: EmbeddingConfig {
                model: "text-embedding-3-small".to_string(),
                dimension: 1536,
            },
            retrieval: RetrievalConfig {
                collection: "learning_rag".to_string(),
                top_k: 4,
            },
            worker: WorkerConfig {
                concurrency: 4,
                result_ttl_seconds: 3600,
            },
        }
    }
}

impl AppConfig {
    /// Reads configuration from the environment, falling back to defaults
    /// for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server: ServerConfig {
                host: env_or("SERVER_HOST", &defaults.server.host),
                port: env_parse("SERVER_PORT", defaults.server.port),
            },
            redis_url: env_or("REDIS_URL", &defaults.redis_url),
            qdrant_url: env_or("QDRANT_URL", &defaults.qdrant_url),
            llm: LlmConfig {
                model: env_or("LLM_MODEL", &defaults.llm.model),
            },
            embedding: EmbeddingConfig {
                model: env_or("EMBEDDING_MODEL", &defaults.embedding.model),
                dimension: env_parse("EMBEDDING_DIMENSION", defaults.embedding.dimension),
            },
            retrieval: RetrievalConfig {
                collection: env_or("QDRANT_COLLECTION", &defaults.retrieval.collection),
                top_k: env_parse("RETRIEVAL_TOP_K", defaults.retrieval.top_k),
            },
            worker: WorkerConfig {
                concurrency: env_parse("WORKER_CONCURRENCY", defaults.worker.concurrency),
                result_ttl_seconds: env_parse(
                    "RESULT_TTL_SECONDS",
                    defaults.worker.result_ttl_seconds,
                ),
            },
        }
    }
}
