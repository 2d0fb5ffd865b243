// crates/peticoes-store-sqlite/src/lib.rs
// ============================================================================
// Module: Peticoes SQLite Store Library
// Description: Public API surface for the SQLite petition store.
// Purpose: Expose the durable store and its configuration types.
// Dependencies: crate::store
// ============================================================================

//! ## Overview
//! Durable [`peticoes_core::PetitionStore`] implementation backed by
//! `SQLite`. The `(petition_id, email)` uniqueness constraint lives here as a
//! unique index with native NULL-distinct semantics, so duplicate handling
//! matches the relational contract the ledger depends on.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqlitePetitionStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;
