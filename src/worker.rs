use deadpool_redis::{redis::AsyncCommands, Config, Connection, Pool, Runtime};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rag_query_api::application::{QueryProcessor, RetrievalService};
use rag_query_api::infrastructure::{
    keys, queues, AppConfig, JobRecord, OpenAiLlm, ProcessQueryJob, QdrantVectorStore,
    TextEmbedding,
};

pub type RedisPool = Pool;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Redis pool error: {0}")]
    Pool(String),
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, WorkerError>;

pub fn create_pool(redis_url: &str) -> Result<RedisPool> {
    let cfg = Config::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| WorkerError::Pool(e.to_string()))
}

pub struct WorkerState {
    pub redis_pool: RedisPool,
    pub processor: Arc<QueryProcessor>,
    pub result_ttl_seconds: u64,
}

impl WorkerState {
    pub async fn new(redis_pool: RedisPool, config: &AppConfig) -> anyhow::Result<Self> {
        let embedding = Arc::new(TextEmbedding::from_config(&config.embedding));
        let vector_store = Arc::new(
            QdrantVectorStore::new(
                &config.qdrant_url,
                &config.retrieval.collection,
                config.embedding.dimension,
            )
            .await?,
        );
        let retrieval = Arc::new(RetrievalService::new(
            embedding,
            vector_store,
            config.retrieval.top_k,
        ));
        let llm = Arc::new(OpenAiLlm::new(&config.llm.model));
        let processor = Arc::new(QueryProcessor::new(retrieval, llm));

        Ok(Self {
            redis_pool,
            processor,
            result_ttl_seconds: config.worker.result_ttl_seconds,
        })
    }
}

pub struct JobConsumer {
    state: Arc<WorkerState>,
    concurrency: usize,
}

impl JobConsumer {
    pub fn new(state: WorkerState, concurrency: usize) -> Self {
        Self {
            state: Arc::new(state),
            concurrency,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        tracing::info!(concurrency = self.concurrency, "consumer started");

        loop {
            let permit = semaphore.clone().acquire_owned().await.unwrap();
            let state = self.state.clone();

            tokio::spawn(async move {
                let _permit = permit;
                if let Err(e) = process_next_job(&state).await {
                    tracing::error!(error = %e, "job failed");
                }
            });

            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;
        }
    }
}

async fn conn(state: &WorkerState) -> Result<Connection> {
    state
        .redis_pool
        .get()
        .await
        .map_err(|e| WorkerError::Pool(e.to_string()))
}

async fn set_status(conn: &mut Connection, state: &WorkerState, record: &JobRecord) -> Result<()> {
    let json = serde_json::to_string(record)?;
    conn.set_ex::<_, _, ()>(
        keys::job_status(&record.job_id),
        &json,
        state.result_ttl_seconds,
    )
    .await
    .map_err(|e| WorkerError::Redis(e.to_string()))
}

async fn process_next_job(state: &WorkerState) -> Result<()> {
    let mut c = conn(state).await?;

    let result: Option<(String, String)> = c
        .brpop(queues::QUERY_QUEUE, 1.0)
        .await
        .map_err(|e| WorkerError::Redis(e.to_string()))?;

    if let Some((_queue, job_json)) = result {
        process_query_job(state, serde_json::from_str(&job_json)?).await?;
    }
    Ok(())
}

async fn process_query_job(state: &WorkerState, job: ProcessQueryJob) -> Result<()> {
    tracing::info!(job_id = %job.job_id, "processing query");
    let mut c = conn(state).await?;

    let record = fetch_record(&mut c, &job).await?;
    let record = record.started();
    set_status(&mut c, state, &record).await?;

    let record = match state.processor.answer(&job.query).await {
        Ok(answer) => record.finished(answer),
        Err(e) => {
            tracing::error!(job_id = %job.job_id, error = %e, "query failed");
            record.failed(e.to_string())
        }
    };
    set_status(&mut c, state, &record).await?;

    tracing::info!(job_id = %job.job_id, status = record.state.as_str(), "query done");
    Ok(())
}

/// The queued record written at enqueue time carries the original creation
/// timestamp; fall back to a fresh one if the status key already expired.
async fn fetch_record(conn: &mut Connection, job: &ProcessQueryJob) -> Result<JobRecord> {
    let existing: Option<String> = conn
        .get(keys::job_status(&job.job_id))
        .await
        .map_err(|e| WorkerError::Redis(e.to_string()))?;

    Ok(existing
        .and_then(|json| serde_json::from_str(&json).ok())
        .unwrap_or_else(|| JobRecord::queued(job.job_id)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "worker=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();

    let redis_pool = create_pool(&config.redis_url)?;
    info!("Redis connected");

    let state = WorkerState::new(redis_pool, &config).await?;
    info!("Qdrant connected");

    let concurrency = config.worker.concurrency;
    let consumer = JobConsumer::new(state, concurrency);

    info!(concurrency, "worker started");
    consumer.start().await?;

    Ok(())
}
