use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub mod queues {
    pub const QUERY_QUEUE: &str = "jobs:query";
}

pub mod keys {
    use uuid::Uuid;

    pub fn job_status(job_id: &Uuid) -> String {
        format!("job:status:{}", job_id)
    }
}

/// Lifecycle of a queued query. A job only ever moves
/// queued -> started -> (finished | failed), and a terminal state carries
/// either a result or an error, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobState {
    Queued,
    Started,
    Finished {
        result: String,
        ended_at: DateTime<Utc>,
    },
    Failed {
        error: String,
        ended_at: DateTime<Utc>,
    },
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Started => "started",
            Self::Finished { .. } => "finished",
            Self::Failed { .. } => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished { .. } | Self::Failed { .. })
    }
}

/// The job handle stored under `job:status:{id}`. Serialized flat, so the
/// wire shape is `{job_id, created_at, status, [result|error], [ended_at]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: JobState,
}

impl JobRecord {
    pub fn queued(job_id: Uuid) -> Self {
        Self {
            job_id,
            created_at: Utc::now(),
            state: JobState::Queued,
        }
    }

    pub fn started(mut self) -> Self {
        self.state = JobState::Started;
        self
    }

    pub fn finished(mut self, result: impl Into<String>) -> Self {
        self.state = JobState::Finished {
            result: result.into(),
            ended_at: Utc::now(),
        };
        self
    }

    pub fn failed(mut self, error: impl Into<String>) -> Self {
        self.state = JobState::Failed {
            error: error.into(),
            ended_at: Utc::now(),
        };
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessQueryJob {
    pub job_id: Uuid,
    pub query: String,
}

impl ProcessQueryJob {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            job_id: Uuid::new_v4(),
            query: query.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_record_wire_shape() {
        let record = JobRecord::queued(Uuid::new_v4());
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "queued");
        assert_eq!(json["job_id"], record.job_id.to_string());
        assert!(json.get("result").is_none());
        assert!(json.get("error").is_none());
        assert!(json.get("ended_at").is_none());
    }

    #[test]
    fn test_finished_record_carries_result_only() {
        let record = JobRecord::queued(Uuid::new_v4())
            .started()
            .finished("the answer");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "finished");
        assert_eq!(json["result"], "the answer");
        assert!(json.get("error").is_none());
        assert!(json.get("ended_at").is_some());
    }

    #[test]
    fn test_failed_record_carries_error_only() {
        let record = JobRecord::queued(Uuid::new_v4()).started().failed("boom");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["status"], "failed");
        assert_eq!(json["error"], "boom");
        assert!(json.get("result").is_none());
    }

    #[test]
    fn test_record_round_trip() {
        let record = JobRecord::queued(Uuid::new_v4()).started().finished("ok");
        let json = serde_json::to_string(&record).unwrap();
        let parsed: JobRecord = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.job_id, record.job_id);
        assert_eq!(parsed.state, record.state);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobState::Queued.is_terminal());
        assert!(!JobState::Started.is_terminal());
        assert!(JobRecord::queued(Uuid::new_v4())
            .finished("r")
            .state
            .is_terminal());
        assert!(JobRecord::queued(Uuid::new_v4())
            .failed("e")
            .state
            .is_terminal());
    }
}
