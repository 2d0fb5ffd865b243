// crates/peticoes-core/src/runtime/catalog.rs
// ============================================================================
// Module: Peticoes Petition Catalog
// Description: Petition CRUD orchestration.
// Purpose: Validate petition payloads and clamp list pagination.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The catalog is the peripheral CRUD companion to the signature ledger.
//! Create is an upsert keyed on slug; update addresses a petition by
//! identifier. List pagination clamps to a wider bound than signature
//! listing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::Petition;
use crate::core::PetitionId;
use crate::core::PetitionInput;
use crate::core::PetitionOrder;
use crate::core::Timestamp;
use crate::core::validate_petition_input;
use crate::interfaces::PetitionFilter;
use crate::interfaces::PetitionStore;
use crate::interfaces::SharedPetitionStore;
use crate::runtime::ledger::LedgerError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Largest accepted petition page size after clamping.
const MAX_PETITION_PAGE_SIZE: i64 = 500;

// ============================================================================
// SECTION: Query Shapes
// ============================================================================

/// Petition list query after HTTP-layer parsing, before clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionListQuery {
    /// Optional exact status match.
    pub status: Option<String>,
    /// Optional case-insensitive substring over title and slug.
    pub q: Option<String>,
    /// Resolved ordering.
    pub order: PetitionOrder,
    /// Requested page, 1-based; values below 1 clamp to 1.
    pub page: i64,
    /// Requested page size; clamped to `[1, 500]`.
    pub page_size: i64,
}

impl Default for PetitionListQuery {
    fn default() -> Self {
        Self {
            status: None,
            q: None,
            order: PetitionOrder::CreatedDateDesc,
            page: 1,
            page_size: 100,
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Petition CRUD over an injected store.
#[derive(Clone)]
pub struct PetitionCatalog {
    /// Store backend.
    store: SharedPetitionStore,
}

impl PetitionCatalog {
    /// Creates a catalog over a shared store.
    #[must_use]
    pub const fn new(store: SharedPetitionStore) -> Self {
        Self {
            store,
        }
    }

    /// Loads a petition by UUID-shaped identifier or slug.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when nothing matches and
    /// [`LedgerError::Store`] on backend failure.
    pub fn get(&self, key: &str) -> Result<Petition, LedgerError> {
        self.store.get_petition(key)?.ok_or(LedgerError::NotFound)
    }

    /// Lists petitions matching a query.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] on backend failure.
    pub fn list(&self, query: &PetitionListQuery) -> Result<Vec<Petition>, LedgerError> {
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(1, MAX_PETITION_PAGE_SIZE);
        let filter = PetitionFilter {
            status: query.status.clone().filter(|status| !status.is_empty()),
            q: query.q.clone().filter(|needle| !needle.is_empty()),
            order: query.order,
            limit: page_size,
            offset: (page - 1).saturating_mul(page_size),
        };
        Ok(self.store.list_petitions(&filter)?)
    }

    /// Creates a petition, or updates the existing one with the same slug.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when the payload is invalid and
    /// [`LedgerError::Store`] on backend failure.
    pub fn save(&self, input: &PetitionInput) -> Result<Petition, LedgerError> {
        validate_petition_input(input).map_err(|err| LedgerError::Validation(err.to_string()))?;
        let candidate = PetitionId::generate();
        Ok(self.store.upsert_petition(input, &candidate, Timestamp::now())?)
    }

    /// Updates a petition by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Validation`] when the payload is invalid,
    /// [`LedgerError::NotFound`] when no petition has that identifier, and
    /// [`LedgerError::Store`] on backend failure.
    pub fn update(&self, id: &PetitionId, input: &PetitionInput) -> Result<Petition, LedgerError> {
        validate_petition_input(input).map_err(|err| LedgerError::Validation(err.to_string()))?;
        self.store.update_petition(id, input, Timestamp::now())?.ok_or(LedgerError::NotFound)
    }
}
