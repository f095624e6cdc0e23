pub mod chat;
pub mod health;

use axum::http::{header, Method};
use axum::{routing::get, routing::post, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(health::root))
        .route("/chat", post(chat::submit_query))
        .route("/job-status/{job_id}", get(chat::job_status))
        .route("/result/{job_id}", get(chat::job_result))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
