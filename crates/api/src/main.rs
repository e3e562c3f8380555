use std::sync::Arc;

use ambience_api::{build_router, state::AppState};
use ambience_config::Settings;
use ambience_services::{
    FfmpegMerger, HttpBlobStorage, OpenAiClient, WorkflowEngine, WorkflowPolicy,
};
use ambience_store::{RedisKv, RunStore};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (silently ignore if missing)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "ambience_api=debug,ambience_services=debug,ambience_store=debug,tower_http=debug"
                .into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load config
    let settings = Settings::load()?;
    info!(
        "Starting Ambience API on {}:{}",
        settings.app.host, settings.app.port
    );

    // Connect to the status store
    let kv = RedisKv::connect(&settings.redis.url).await?;
    let runs = RunStore::new(Arc::new(kv));

    // SaaS clients and the workflow engine, all explicitly constructed
    let storage = Arc::new(HttpBlobStorage::new(
        settings.storage.endpoint.clone(),
        settings.storage.api_key.clone(),
    ));
    let openai = Arc::new(OpenAiClient::new(&settings.openai));
    let engine = Arc::new(WorkflowEngine::new(
        runs.clone(),
        storage.clone(),
        Arc::new(FfmpegMerger::new()),
        openai.clone(),
        openai,
        WorkflowPolicy::from(&settings.workflow),
    ));

    let app_state = AppState::new(settings.clone(), runs, storage, engine);
    let app = build_router(app_state);

    // Start server
    let addr = format!("{}:{}", settings.app.host, settings.app.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
