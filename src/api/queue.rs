use deadpool_redis::{redis::AsyncCommands, Config, Pool, Runtime};
use uuid::Uuid;

use crate::infrastructure::{keys, queues, JobRecord, ProcessQueryJob};

pub type RedisPool = Pool;

#[derive(Debug, thiserror::Error)]
pub enum QueueError {
    #[error("Redis pool error: {0}")]
    Pool(String),
    #[error("Redis error: {0}")]
    Redis(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, QueueError>;

pub fn create_pool(redis_url: &str) -> Result<RedisPool> {
    let cfg = Config::from_url(redis_url);
    cfg.create_pool(Some(Runtime::Tokio1))
        .map_err(|e| QueueError::Pool(e.to_string()))
}

/// Pass-through adapter over the Redis work queue: enqueue a query job and
/// fetch job handles by id. Retry and eviction policy belong to the store.
#[derive(Clone)]
pub struct JobProducer {
    pool: RedisPool,
    result_ttl_seconds: u64,
}

impl JobProducer {
    pub fn new(pool: RedisPool, result_ttl_seconds: u64) -> Self {
        Self {
            pool,
            result_ttl_seconds,
        }
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection> {
        self.pool
            .get()
            .await
            .map_err(|e| QueueError::Pool(e.to_string()))
    }

    pub async fn enqueue_query(&self, job: &ProcessQueryJob) -> Result<Uuid> {
        let mut conn = self.conn().await?;

        // The status record must be visible before the job is poppable:
        // both pollers and the worker resolve the id through it.
        let record = serde_json::to_string(&JobRecord::queued(job.job_id))?;
        conn.set_ex::<_, _, ()>(keys::job_status(&job.job_id), &record, self.result_ttl_seconds)
            .await
            .map_err(|e| QueueError::Redis(e.to_string()))?;

        conn.lpush::<_, _, ()>(queues::QUERY_QUEUE, serde_json::to_string(job)?)
            .await
            .map_err(|e| QueueError::Redis(e.to_string()))?;

        tracing::info!(job_id = %job.job_id, queue = queues::QUERY_QUEUE, "job queued");
        Ok(job.job_id)
    }

    pub async fn fetch_job(&self, job_id: &Uuid) -> Result<Option<JobRecord>> {
        let mut conn = self.conn().await?;
        let record: Option<String> = conn
            .get(keys::job_status(job_id))
            .await
            .map_err(|e| QueueError::Redis(e.to_string()))?;

        record
            .map(|json| serde_json::from_str(&json).map_err(Into::into))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::JobState;

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_enqueued_job_is_immediately_fetchable() {
        let pool = create_pool("redis://localhost:6379").unwrap();
        let producer = JobProducer::new(pool, 60);

        let job = ProcessQueryJob::new("What is this document about?");
        let job_id = producer.enqueue_query(&job).await.unwrap();

        // The queued record is written before the job hits the queue, so
        // the id must resolve without waiting for the worker.
        let record = producer.fetch_job(&job_id).await.unwrap().unwrap();
        assert_eq!(record.job_id, job_id);
        assert_eq!(record.state, JobState::Queued);
    }
}
