pub mod api;
pub mod config;
pub mod error;
pub mod logic;
pub mod model;
pub mod schema;
pub mod seed;
pub mod store;

// Export API types
pub use api::{create_router, ApiError, ApiResponse, AppState, Envelope};

pub use config::{AppConfig, StoreBackend};
pub use error::{DomainError, DomainResult};

pub use logic::{
    EventOperations, FeedbackOperations, NoteOperations, PetOperations, StatusOperations,
    UserOperations,
};

// Export all model types
pub use model::*;

pub use seed::load_seed_data;

// Export store types
pub use store::{MemoryStore, PostgresStore, Store};

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builds the configured store, optionally seeds it, and serves until the
/// listener fails.
pub async fn run_server(config: AppConfig) -> anyhow::Result<()> {
    let app = match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store = PostgresStore::new(&config.database_url(), config.max_connections()).await?;
            log::info!("Running database migrations...");
            store.migrate().await?;
            build_app(store, config.clone()).await?
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data is lost on shutdown");
            build_app(MemoryStore::new(), config.clone()).await?
        }
    };

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!(
        "GameHub API listening on http://{}{}",
        bind_address,
        config.base_path()
    );

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

async fn build_app<S: Store + 'static>(store: S, config: AppConfig) -> anyhow::Result<Router> {
    if config.load_seed_data {
        log::info!("Loading seed data...");
        load_seed_data(&store).await?;
    }
    Ok(create_router(AppState::new(Arc::new(store), config)))
}
