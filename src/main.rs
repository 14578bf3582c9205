use std::sync::Arc;

mod app;
mod auth;
mod config;
mod db;
mod ecg;
mod error;
mod extractors;
#[cfg(test)]
mod memory;
mod state;

use crate::{config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "ecgstore=debug,axum=info,tower_http=info,sqlx=warn".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    tracing::info!(
        db_host = %config.database.host,
        db_name = %config.database.name,
        window_secs = config.signal_window.as_secs(),
        "configuration loaded"
    );

    let db = db::connect(&config).await?;
    db::bootstrap_schema(&db).await?;

    let app = app::build_app(AppState::from_pool(config.clone(), db.clone()))?;
    app::serve(app, &config).await?;

    db.close().await;
    tracing::info!("shutdown complete");
    Ok(())
}
