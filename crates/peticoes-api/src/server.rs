// crates/peticoes-api/src/server.rs
// ============================================================================
// Module: API Server
// Description: Router assembly, shared state, and the serve loop.
// Purpose: Wire the ledger, catalog, audit sink, and uploads into axum.
// Dependencies: axum, peticoes-core, peticoes-store-sqlite, serde_json,
//               thiserror, tokio
// ============================================================================

//! ## Overview
//! The server owns one shared state value: the signature ledger, the petition
//! catalog, the audit sink, and the uploads section. The router applies the
//! configured body limit to the JSON surface and a wider one to the upload
//! route. Peer addresses flow in through `ConnectInfo`, so signatures always
//! carry the caller's network address.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::routing::post;
use peticoes_core::PetitionCatalog;
use peticoes_core::SharedPetitionStore;
use peticoes_core::SignatureLedger;
use peticoes_store_sqlite::SqlitePetitionStore;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::RequestAuditSink;
use crate::audit::StderrAuditSink;
use crate::config::ApiConfig;
use crate::config::UploadsConfig;
use crate::petitions;
use crate::signatures;
use crate::uploads;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Multipart framing overhead allowed on top of the upload size cap.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server construction and serve-loop failures.
#[derive(Debug, Error, Clone)]
pub enum ApiServerError {
    /// Configuration prevented startup.
    #[error("server config error: {0}")]
    Config(String),
    /// The store could not be opened.
    #[error("server store error: {0}")]
    Store(String),
    /// The listener or serve loop failed.
    #[error("server transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: State
// ============================================================================

/// Shared state injected into every handler.
#[derive(Clone)]
pub struct AppState {
    /// Signature orchestration.
    pub ledger: SignatureLedger,
    /// Petition CRUD orchestration.
    pub catalog: PetitionCatalog,
    /// Audit sink for signature-write requests.
    pub audit: Arc<dyn RequestAuditSink>,
    /// Uploads section of the configuration.
    pub uploads: UploadsConfig,
}

impl AppState {
    /// Builds state over a shared store.
    #[must_use]
    pub fn new(
        store: SharedPetitionStore,
        audit: Arc<dyn RequestAuditSink>,
        uploads: UploadsConfig,
    ) -> Self {
        Self {
            ledger: SignatureLedger::new(store.clone()),
            catalog: PetitionCatalog::new(store),
            audit,
            uploads,
        }
    }
}

// ============================================================================
// SECTION: Router
// ============================================================================

/// Assembles the full route table over the shared state.
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let upload_limit = state.uploads.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES);
    let api = Router::new()
        .route("/", get(health))
        .route(
            "/signatures/by-petition/{key}",
            get(signatures::list).post(signatures::create),
        )
        .route("/signatures/stats/{key}", get(signatures::stats))
        .route("/petitions", get(petitions::list).post(petitions::create))
        .route("/petitions/{key}", get(petitions::get).patch(petitions::update))
        .layer(DefaultBodyLimit::max(max_body_bytes));
    let upload = Router::new()
        .route("/upload", post(uploads::upload))
        .layer(DefaultBodyLimit::max(upload_limit));
    api.merge(upload).with_state(state)
}

/// `GET /` — liveness probe.
async fn health() -> Json<Value> {
    Json(json!({ "ok": true, "service": "peticoes-api" }))
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// HTTP server bound to a configured address.
pub struct ApiServer {
    /// Bind address.
    bind: SocketAddr,
    /// Shared handler state.
    state: AppState,
    /// Request body limit for the JSON surface.
    max_body_bytes: usize,
}

impl ApiServer {
    /// Builds a server from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError`] when the bind address is invalid or the
    /// store cannot be opened.
    pub fn from_config(config: &ApiConfig) -> Result<Self, ApiServerError> {
        let bind: SocketAddr = config
            .server
            .bind
            .parse()
            .map_err(|_| ApiServerError::Config("invalid bind address".to_string()))?;
        let store = SqlitePetitionStore::new(&config.database.store_config())
            .map_err(|err| ApiServerError::Store(err.to_string()))?;
        let state = AppState::new(
            SharedPetitionStore::from_store(store),
            Arc::new(StderrAuditSink),
            config.uploads.clone(),
        );
        Ok(Self {
            bind,
            state,
            max_body_bytes: config.server.max_body_bytes,
        })
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ApiServerError::Transport`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ApiServerError> {
        let app = build_router(self.state, self.max_body_bytes);
        let listener = tokio::net::TcpListener::bind(self.bind)
            .await
            .map_err(|_| ApiServerError::Transport("http bind failed".to_string()))?;
        axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
            .await
            .map_err(|_| ApiServerError::Transport("http server failed".to_string()))
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
