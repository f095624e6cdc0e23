use crate::api::queue::{JobProducer, RedisPool};

#[derive(Clone)]
pub struct AppState {
    pub job_producer: JobProducer,
}

impl AppState {
    pub fn new(redis_pool: RedisPool, result_ttl_seconds: u64) -> Self {
        Self {
            job_producer: JobProducer::new(redis_pool, result_ttl_seconds),
        }
    }
}
