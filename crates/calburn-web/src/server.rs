//! Startup sequence
//!
//! Loads the model and initializes the store before accepting connections.
//! Either failure aborts startup.

use std::sync::Arc;

use calburn_core::errors::{ExError, ExErrorKind, Result};
use calburn_core::{ModelAdapter, PredictionLog};
use calburn_store::SqlitePredictionStore;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::ServerConfig;
use crate::handler::RequestHandler;
use crate::routes::{build_router, AppState};

/// Load the model artifact and prepare the database
///
/// # Errors
///
/// `ModelArtifact` if the artifact is missing or invalid, `Storage` if the
/// database cannot be opened or the table cannot be created.
pub fn bootstrap(config: &ServerConfig) -> Result<AppState> {
    let model = ModelAdapter::load(&config.model_path)?;

    let store = SqlitePredictionStore::new(&config.database_path);
    store.initialize()?;

    Ok(AppState::new(RequestHandler::new(model, Arc::new(store))))
}

/// Bootstrap, bind, and serve until ctrl-c
///
/// # Errors
///
/// Any bootstrap error, a `Config` error if the address cannot be bound,
/// or an `Internal` error if the server stops abnormally.
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = bootstrap(&config)?;

    let listener = TcpListener::bind(config.bind).await.map_err(|e| {
        ExError::new(ExErrorKind::Config)
            .with_op("bind")
            .with_message(format!("cannot listen on {}: {}", config.bind, e))
    })?;
    let local_addr = listener.local_addr().unwrap_or(config.bind);
    info!(
        component = module_path!(),
        addr = %local_addr,
        model = %config.model_path.display(),
        database = %config.database_path.display(),
        "listening"
    );

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            ExError::new(ExErrorKind::Internal)
                .with_op("serve")
                .with_message(e.to_string())
        })?;

    info!(component = module_path!(), "server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(component = module_path!(), "shutdown requested");
    }
}
