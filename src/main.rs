mod app;
mod config;
mod db;
mod error;
mod meals;
mod nutrition;
mod recommendations;
mod state;
mod users;

use crate::config::AppConfig;
use crate::state::AppState;

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "chundiet=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    tracing::info!(
        workers = config.worker_threads,
        model = %config.gemini.model,
        fallback_key = config.gemini.api_key.is_some(),
        "starting chundiet"
    );

    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .enable_all()
        .build()?
        .block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    let state = AppState::init(config).await?;
    let config = state.config.clone();
    let app = app::build_app(state);
    app::serve(app, &config).await
}
