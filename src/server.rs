//!
//! tasknest HTTP server
//! --------------------
//! This module defines the Axum-based HTTP API for tasknest.
//!
//! Responsibilities:
//! - Register/login endpoints backed by the credential issuer.
//! - Task CRUD endpoints gated by the access guard and ownership contract.
//! - Shared state wiring: the document store, the issuer and the guard,
//!   all constructed once at startup from the injected configuration.
//! - Startup folder logging.

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use crate::config::ServerConfig;
use crate::identity::{AccessGuard, CredentialIssuer, TokenSigner};
use crate::storage::SharedStore;

pub mod auth;
pub mod tasks;

/// Shared server state injected into all handlers.
///
/// Holds the global `SharedStore` handle plus the credential issuer and
/// access guard, both bound to the process-wide signing secret at startup.
#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub issuer: CredentialIssuer,
    pub guard: AccessGuard,
}

impl AppState {
    /// Wire up store, issuer and guard from a config value.
    pub fn new(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let store = SharedStore::new(&cfg.db_root)?;
        let signer = TokenSigner::new(&cfg.token_secret);
        let issuer = CredentialIssuer::new(store.clone(), signer.clone());
        let guard = AccessGuard::new(store.clone(), signer);
        Ok(Self { store, issuer, guard })
    }
}

fn log_startup_folders(db_root: &str) {
    let cwd = std::env::current_dir().ok();
    let exe = std::env::current_exe().ok();
    let db_exists = std::path::Path::new(db_root).exists();
    info!(
        target: "startup",
        "tasknest starting. Folder configuration: cwd={:?}, exe={:?}, db_root={:?}, db_root_exists={}",
        cwd, exe, db_root, db_exists
    );
}

/// Build the full route table over the given state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "tasknest ok" }))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task).put(tasks::update_task).delete(tasks::delete_task),
        )
        .with_state(state)
}

/// Start the tasknest HTTP server with the given configuration.
pub async fn run_with_config(cfg: &ServerConfig) -> anyhow::Result<()> {
    log_startup_folders(&cfg.db_root);

    let state = AppState::new(cfg)?;
    let app = router(state);

    let addr: SocketAddr = format!("0.0.0.0:{}", cfg.http_port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// Backward-compatible entry that uses defaults
/// Convenience entry point using the default port (7878) and db root "dbs".
pub async fn run() -> anyhow::Result<()> {
    run_with_config(&ServerConfig::default()).await
}
