// crates/peticoes-api/src/petitions.rs
// ============================================================================
// Module: Petition Handlers
// Description: HTTP handlers for petition list, get, create, and update.
// Purpose: Parse requests and cross into the blocking catalog.
// Dependencies: axum, peticoes-core, serde, tokio
// ============================================================================

//! ## Overview
//! Peripheral CRUD over petitions. Lookup keys are UUID-or-slug for reads;
//! updates address a petition strictly by identifier. Ordering goes through
//! the fixed allow-list, so caller sort keys never reach a query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use peticoes_core::Petition;
use peticoes_core::PetitionId;
use peticoes_core::PetitionInput;
use peticoes_core::PetitionListQuery;
use peticoes_core::PetitionOrder;
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::AppState;

// ============================================================================
// SECTION: Wire Shapes
// ============================================================================

/// Query parameters accepted by the petition list route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Optional exact status match.
    #[serde(default)]
    pub status: Option<String>,
    /// Optional case-insensitive substring over title and slug.
    #[serde(default)]
    pub q: Option<String>,
    /// Sort key resolved through the allow-list.
    #[serde(default)]
    pub order: Option<String>,
    /// Requested page, 1-based.
    #[serde(default)]
    pub page: Option<i64>,
    /// Requested page size.
    #[serde(default)]
    pub page_size: Option<i64>,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// `GET /petitions` — list petitions.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Petition>>, ApiError> {
    let defaults = PetitionListQuery::default();
    let query = PetitionListQuery {
        status: params.status,
        q: params.q,
        order: params.order.as_deref().map_or(defaults.order, PetitionOrder::from_key),
        page: params.page.unwrap_or(defaults.page),
        page_size: params.page_size.unwrap_or(defaults.page_size),
    };
    let catalog = state.catalog.clone();
    let petitions = tokio::task::spawn_blocking(move || catalog.list(&query))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(petitions))
}

/// `GET /petitions/{key}` — load one petition by identifier or slug.
pub async fn get(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<Petition>, ApiError> {
    let catalog = state.catalog.clone();
    let petition = tokio::task::spawn_blocking(move || catalog.get(&key))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(petition))
}

/// `POST /petitions` — create a petition, or update the one with its slug.
pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<PetitionInput>,
) -> Result<(StatusCode, Json<Petition>), ApiError> {
    let catalog = state.catalog.clone();
    let petition = tokio::task::spawn_blocking(move || catalog.save(&input))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok((StatusCode::CREATED, Json(petition)))
}

/// `PATCH /petitions/{id}` — full-row update by identifier.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<PetitionInput>,
) -> Result<Json<Petition>, ApiError> {
    let catalog = state.catalog.clone();
    let id = PetitionId::new(id);
    let petition = tokio::task::spawn_blocking(move || catalog.update(&id, &input))
        .await
        .map_err(|err| ApiError::Internal(err.to_string()))??;
    Ok(Json(petition))
}
