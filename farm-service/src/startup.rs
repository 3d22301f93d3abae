use crate::config::{FarmConfig, StorageBackend};
use crate::handlers;
use crate::services::{Database, FarmStore, InMemoryStore};
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: FarmConfig,
    pub store: Arc<dyn FarmStore>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        .route("/api/v1/land/:land_code/add-plant", post(handlers::land::add_plant))
        .route("/api/v1/land/:land_code/plant-list", get(handlers::land::plant_list))
        .route("/api/v1/plant/:plant_code/user-delete", post(handlers::plant::user_delete))
        .route("/api/v1/tac/:tac_code/register", post(handlers::tac::register))
        .route("/api/v1/tac/:tac_code/login", post(handlers::tac::login))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Open the configured store, running migrations for Postgres.
pub async fn connect_store(config: &FarmConfig) -> Result<Arc<dyn FarmStore>, AppError> {
    match config.storage {
        StorageBackend::Memory => {
            tracing::info!("Using in-memory store");
            Ok(Arc::new(InMemoryStore::new()))
        }
        StorageBackend::Postgres => {
            let db_config = config.database.as_ref().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!("Postgres storage needs database settings"))
            })?;
            let db = Database::new(
                &db_config.url,
                db_config.max_connections,
                db_config.min_connections,
            )
            .await?;
            db.run_migrations().await?;
            Ok(Arc::new(db))
        }
    }
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: FarmConfig) -> Result<Self, AppError> {
        let store = connect_store(&config).await.map_err(|e| {
            tracing::error!("Failed to open store: {}", e);
            e
        })?;
        Self::build_with_store(config, store).await
    }

    pub async fn build_with_store(
        config: FarmConfig,
        store: Arc<dyn FarmStore>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            config: config.clone(),
            store,
        };

        let app = build_router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn store(&self) -> Arc<dyn FarmStore> {
        self.state.store.clone()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
