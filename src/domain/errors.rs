use thiserror::Error;

/// Failures the query pipeline can actually produce: a broken local
/// invariant, or an upstream service (Qdrant, OpenAI) reporting an error.
/// Client-input and unknown-id errors live at the API layer.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn external(msg: impl Into<String>) -> Self {
        Self::ExternalService(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_keeps_upstream_detail() {
        assert_eq!(
            DomainError::external("rate limited").to_string(),
            "External service error: rate limited"
        );
        assert_eq!(
            DomainError::internal("lock poisoned").to_string(),
            "Internal error: lock poisoned"
        );
    }
}
