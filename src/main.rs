use env_logger::{Builder, Env};
use gamehub_api::config::AppConfig;
use log::LevelFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Info by default, sqlx kept quiet; RUST_LOG overrides both
    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_env(Env::default())
        .init();

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{} backend={:?}",
        config.server.host,
        config.server.port,
        config.database.backend
    );
    if config.auth.static_token.is_none() {
        log::warn!("No static token configured; API routes are unauthenticated");
    }

    gamehub_api::run_server(config).await
}
