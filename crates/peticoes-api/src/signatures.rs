// crates/peticoes-api/src/signatures.rs
// ============================================================================
// Module: Signature Handlers
// Description: HTTP handlers for signature create, list, and stats.
// Purpose: Parse requests, cross into the blocking ledger, map outcomes.
// Dependencies: axum, peticoes-core, serde, tokio, uuid
// ============================================================================

//! ## Overview
//! The signature surface is three routes over one petition key. Handlers only
//! parse and map; all semantics live in the ledger. The rusqlite store is
//! synchronous, so every ledger call runs under `spawn_blocking`. Creation
//! emits one audit event per request, whatever the outcome.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::SocketAddr;

use axum::Json;
use axum::extract::ConnectInfo;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use axum::http::header::USER_AGENT;
use peticoes_core::LedgerError;
use peticoes_core::RequestMeta;
use peticoes_core::SignatureListQuery;
use peticoes_core::SignaturePage;
use peticoes_core::SignatureRecord;
use peticoes_core::SignatureStats;
use peticoes_core::SignatureSubmission;
use peticoes_core::parse_day;
use serde::Deserialize;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::audit::SignatureAuditEvent;
use crate::error::ApiError;
use crate::server::AppState;

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Query parameters accepted by the list route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Inclusive start day, `YYYY-MM-DD`.
    #[serde(default)]
    pub since: Option<String>,
    /// Inclusive end day, `YYYY-MM-DD`.
    #[serde(default)]
    pub until: Option<String>,
    /// Requested page, 1-based.
    #[serde(default)]
    pub page: Option<i64>,
    /// Requested page size.
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Creation response: acknowledgement flag plus the stored record.
#[derive(Debug, Clone, Serialize)]
pub struct CreateResponse {
    /// Always true on success.
    pub ok: bool,
    /// The stored signature.
    #[serde(flatten)]
    pub signature: SignatureRecord,
}

/// Parses an optional `YYYY-MM-DD` query value, rejecting malformed input.
fn parse_day_param(raw: Option<&str>, name: &str) -> Result<Option<Date>, ApiError> {
    match raw {
        None | Some("") => Ok(None),
        Some(value) => parse_day(value).map(Some).ok_or_else(|| {
            ApiError::Validation(format!("{name} must be formatted as YYYY-MM-DD"))
        }),
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /signatures/by-petition/{key}` — one page of signatures plus total.
pub async fn list(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<SignaturePage>, ApiError> {
    let defaults = SignatureListQuery::default();
    let query = SignatureListQuery {
        since: parse_day_param(params.since.as_deref(), "since")?,
        until: parse_day_param(params.until.as_deref(), "until")?,
        page: params.page.unwrap_or(defaults.page),
        page_size: params.page_size.unwrap_or(defaults.page_size),
    };
    let ledger = state.ledger.clone();
    let page = tokio::task::spawn_blocking(move || ledger.list(&key, &query))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(page))
}

/// `POST /signatures/by-petition/{key}` — create one signature.
pub async fn create(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    Path(key): Path<String>,
    headers: HeaderMap,
    Json(submission): Json<SignatureSubmission>,
) -> Result<(StatusCode, Json<CreateResponse>), ApiError> {
    let meta = RequestMeta {
        ip_address: Some(peer.ip().to_string()),
        user_agent: headers
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    };
    let ledger = state.ledger.clone();
    let petition_key = key.clone();
    let result = tokio::task::spawn_blocking(move || ledger.create(&key, &submission, &meta))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))?;
    state.audit.record(&SignatureAuditEvent {
        route: "signatures.create",
        outcome: outcome_label(&result),
        petition_key,
        request_id: Uuid::new_v4().to_string(),
        peer: Some(peer.ip().to_string()),
    });
    let signature = result?;
    Ok((
        StatusCode::CREATED,
        Json(CreateResponse {
            ok: true,
            signature,
        }),
    ))
}

/// `GET /signatures/stats/{key}` — lifetime, today, and 30-day series.
pub async fn stats(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SignatureStats>, ApiError> {
    let ledger = state.ledger.clone();
    let stats = tokio::task::spawn_blocking(move || ledger.stats(&key))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(stats))
}

/// Maps a creation result onto its audit outcome label.
fn outcome_label(result: &Result<SignatureRecord, LedgerError>) -> &'static str {
    match result {
        Ok(_) => "created",
        Err(LedgerError::NotFound) => "not_found",
        Err(LedgerError::Validation(_)) => "rejected",
        Err(LedgerError::Conflict(_)) => "conflict",
        Err(LedgerError::Store(_)) => "error",
    }
}
