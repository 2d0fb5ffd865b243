// crates/peticoes-core/src/interfaces/mod.rs
// ============================================================================
// Module: Peticoes Store Interfaces
// Description: Store traits and error types backends implement.
// Purpose: Decouple ledger semantics from any concrete datastore.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The ledger talks to storage through [`PetitionStore`]. Implementations run
//! each method inside one transaction scope: commit on success, roll back on
//! failure. The `(petition_id, email)` uniqueness constraint is enforced by
//! the backend and reported through [`SignatureInsert`] rather than an error,
//! so duplicate handling stays an ordinary outcome. Stores are passed
//! explicitly (see [`SharedPetitionStore`]); nothing resolves storage from
//! process-wide state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use thiserror::Error;

use crate::core::Petition;
use crate::core::PetitionId;
use crate::core::PetitionInput;
use crate::core::PetitionOrder;
use crate::core::PetitionRef;
use crate::core::SignatureRecord;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Store-level failures surfaced to the ledger.
///
/// # Invariants
/// - Messages avoid embedding raw submission payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Backend I/O failure.
    #[error("store io error: {0}")]
    Io(String),
    /// Backend engine failure.
    #[error("store error: {0}")]
    Store(String),
    /// Invalid stored data.
    #[error("store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Query Shapes
// ============================================================================

/// Half-open time filter over signature creation instants.
///
/// # Invariants
/// - `since` is inclusive; `until` is exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub since: Option<Timestamp>,
    /// Exclusive upper bound.
    pub until: Option<Timestamp>,
}

impl TimeWindow {
    /// Unbounded window matching every instant.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            since: None,
            until: None,
        }
    }

    /// Returns true when the instant falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: Timestamp) -> bool {
        self.since.is_none_or(|since| instant >= since)
            && self.until.is_none_or(|until| instant < until)
    }
}

/// Petition list filter with pagination already clamped by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionFilter {
    /// Optional exact status match.
    pub status: Option<String>,
    /// Optional case-insensitive substring over title and slug.
    pub q: Option<String>,
    /// Resolved ordering.
    pub order: PetitionOrder,
    /// Page size.
    pub limit: i64,
    /// Row offset.
    pub offset: i64,
}

/// Outcome of an insert-or-ignore signature write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureInsert {
    /// The row was persisted.
    Inserted,
    /// A row with the same `(petition_id, email)` already exists; nothing was
    /// written.
    DuplicateEmail,
}

// ============================================================================
// SECTION: Store Trait
// ============================================================================

/// Storage backend for petitions and signatures.
///
/// # Invariants
/// - Each method is one transaction scope; partial writes never survive.
/// - `list_signatures` orders newest first.
pub trait PetitionStore: Send + Sync {
    /// Resolves a petition by UUID-shaped identifier or slug.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn resolve_petition(&self, key: &str) -> Result<Option<PetitionRef>, StoreError>;

    /// Loads a full petition by UUID-shaped identifier or slug.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn get_petition(&self, key: &str) -> Result<Option<Petition>, StoreError>;

    /// Lists petitions matching a filter.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn list_petitions(&self, filter: &PetitionFilter) -> Result<Vec<Petition>, StoreError>;

    /// Inserts a petition, or updates the existing row with the same slug.
    ///
    /// The stored identifier and creation instant win over `candidate_id` and
    /// `now` when the slug already exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn upsert_petition(
        &self,
        input: &PetitionInput,
        candidate_id: &PetitionId,
        now: Timestamp,
    ) -> Result<Petition, StoreError>;

    /// Updates a petition by identifier, bumping its update instant.
    ///
    /// Returns `None` when no petition has that identifier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn update_petition(
        &self,
        id: &PetitionId,
        input: &PetitionInput,
        now: Timestamp,
    ) -> Result<Option<Petition>, StoreError>;

    /// Persists a signature unless its `(petition_id, email)` pair exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails for any reason other
    /// than the anticipated uniqueness conflict.
    fn insert_signature(&self, record: &SignatureRecord) -> Result<SignatureInsert, StoreError>;

    /// Lists signatures for a petition, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn list_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SignatureRecord>, StoreError>;

    /// Counts signatures for a petition inside a window.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn count_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<u64, StoreError>;

    /// Returns the creation instants of signatures inside a window.
    ///
    /// Used by the stats rollup; day bucketing stays in the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the backend fails.
    fn signature_times(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<Vec<Timestamp>, StoreError>;
}

// ============================================================================
// SECTION: Shared Store Wrapper
// ============================================================================

/// Shared petition store backed by an `Arc` trait object.
#[derive(Clone)]
pub struct SharedPetitionStore {
    /// Inner store implementation.
    inner: Arc<dyn PetitionStore + Send + Sync>,
}

impl SharedPetitionStore {
    /// Wraps a petition store in a shared, clonable wrapper.
    #[must_use]
    pub fn from_store(store: impl PetitionStore + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(store),
        }
    }

    /// Wraps an existing shared store.
    #[must_use]
    pub const fn new(store: Arc<dyn PetitionStore + Send + Sync>) -> Self {
        Self {
            inner: store,
        }
    }
}

impl PetitionStore for SharedPetitionStore {
    fn resolve_petition(&self, key: &str) -> Result<Option<PetitionRef>, StoreError> {
        self.inner.resolve_petition(key)
    }

    fn get_petition(&self, key: &str) -> Result<Option<Petition>, StoreError> {
        self.inner.get_petition(key)
    }

    fn list_petitions(&self, filter: &PetitionFilter) -> Result<Vec<Petition>, StoreError> {
        self.inner.list_petitions(filter)
    }

    fn upsert_petition(
        &self,
        input: &PetitionInput,
        candidate_id: &PetitionId,
        now: Timestamp,
    ) -> Result<Petition, StoreError> {
        self.inner.upsert_petition(input, candidate_id, now)
    }

    fn update_petition(
        &self,
        id: &PetitionId,
        input: &PetitionInput,
        now: Timestamp,
    ) -> Result<Option<Petition>, StoreError> {
        self.inner.update_petition(id, input, now)
    }

    fn insert_signature(&self, record: &SignatureRecord) -> Result<SignatureInsert, StoreError> {
        self.inner.insert_signature(record)
    }

    fn list_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SignatureRecord>, StoreError> {
        self.inner.list_signatures(petition_id, window, limit, offset)
    }

    fn count_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<u64, StoreError> {
        self.inner.count_signatures(petition_id, window)
    }

    fn signature_times(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<Vec<Timestamp>, StoreError> {
        self.inner.signature_times(petition_id, window)
    }
}
