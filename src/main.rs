use rag_query_api::api::{create_router, queue, AppState};
use rag_query_api::infrastructure::AppConfig;
use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let config = AppConfig::from_env();
    let redis_pool = queue::create_pool(&config.redis_url)?;
    info!("Redis pool initialized");

    let state = AppState::new(redis_pool, config.worker.result_ttl_seconds);
    let app = create_router(state);

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);

    info!("API server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
