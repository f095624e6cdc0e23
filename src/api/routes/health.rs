use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

pub async fn root() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "Server is up and running".into(),
        service: "RAG Query API".into(),
    })
}
