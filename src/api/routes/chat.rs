use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::infrastructure::{JobRecord, JobState, ProcessQueryJob};

#[derive(Debug, Deserialize)]
pub struct ChatParams {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub status: String,
    pub job_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResultResponse {
    Ready {
        job_id: Uuid,
        status: String,
        result: String,
    },
    Pending {
        status: String,
        message: String,
    },
}

/// Accepts a query as the `query` parameter, enqueues it, and hands back a
/// job id for polling. Empty or whitespace-only queries are rejected.
pub async fn submit_query(
    State(state): State<AppState>,
    Query(params): Query<ChatParams>,
) -> Result<Json<ChatResponse>, ApiError> {
    let query = params.query.trim();
    if query.is_empty() {
        return Err(ApiError::bad_request("Query cannot be empty"));
    }

    let job = ProcessQueryJob::new(query);
    let job_id = state.job_producer.enqueue_query(&job).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to enqueue query");
        ApiError::internal(format!("Error queueing job: {e}"))
    })?;

    Ok(Json(ChatResponse {
        status: "queued".to_string(),
        job_id,
        message: "Your query has been queued for processing".to_string(),
    }))
}

pub async fn job_status(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<JobRecord>, ApiError> {
    let record = fetch_job(&state, &job_id).await?;
    Ok(Json(record))
}

pub async fn job_result(
    State(state): State<AppState>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ResultResponse>, ApiError> {
    let record = fetch_job(&state, &job_id).await?;

    let response = match record.state {
        JobState::Finished { result, .. } => ResultResponse::Ready {
            job_id: record.job_id,
            status: "completed".to_string(),
            result,
        },
        state => ResultResponse::Pending {
            status: state.as_str().to_string(),
            message: "Job is not yet completed. Check /job-status for updates.".to_string(),
        },
    };

    Ok(Json(response))
}

async fn fetch_job(state: &AppState, job_id: &Uuid) -> Result<JobRecord, ApiError> {
    let record = state.job_producer.fetch_job(job_id).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch job");
        ApiError::internal(format!("Error fetching job: {e}"))
    })?;
    require_job(record)
}

fn require_job(record: Option<JobRecord>) -> Result<JobRecord, ApiError> {
    record.ok_or_else(|| ApiError::not_found("Job not found"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::queue::create_pool;

    // Pool connections are created lazily, so Redis is never touched on
    // the rejection paths these tests exercise.
    fn test_state() -> AppState {
        let pool = create_pool("redis://localhost:6379").unwrap();
        AppState::new(pool, 60)
    }

    #[tokio::test]
    async fn test_submit_query_rejects_empty() {
        let params = ChatParams {
            query: String::new(),
        };
        let result = submit_query(State(test_state()), Query(params)).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_submit_query_rejects_whitespace_only() {
        let params = ChatParams {
            query: "  \t  ".to_string(),
        };
        let result = submit_query(State(test_state()), Query(params)).await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_unknown_job_maps_to_not_found() {
        assert!(matches!(require_job(None), Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_known_job_passes_through() {
        let record = JobRecord::queued(Uuid::new_v4());
        let got = require_job(Some(record.clone())).unwrap();
        assert_eq!(got.job_id, record.job_id);
    }

    #[test]
    fn test_result_response_ready_shape() {
        let response = ResultResponse::Ready {
            job_id: Uuid::new_v4(),
            status: "completed".to_string(),
            result: "answer".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "completed");
        assert_eq!(json["result"], "answer");
        assert!(json.get("message").is_none());
    }

    #[test]
    fn test_result_response_pending_shape() {
        let response = ResultResponse::Pending {
            status: "started".to_string(),
            message: "Job is not yet completed. Check /job-status for updates.".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["status"], "started");
        assert!(json.get("result").is_none());
    }
}
