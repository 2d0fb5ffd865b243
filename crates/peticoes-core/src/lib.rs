// crates/peticoes-core/src/lib.rs
// ============================================================================
// Module: Peticoes Core Library
// Description: Public API surface for the Peticoes core.
// Purpose: Expose domain types, store interfaces, and ledger runtime helpers.
// Dependencies: crate::{core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Peticoes core models petitions and the signatures collected against them.
//! It owns validation, the signature ledger semantics (idempotent create,
//! paginated listing, rollup statistics), and the store interfaces that
//! backends implement. It performs no I/O itself; stores are injected through
//! explicit interfaces rather than resolved from process-wide state.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use interfaces::PetitionFilter;
pub use interfaces::PetitionStore;
pub use interfaces::SharedPetitionStore;
pub use interfaces::SignatureInsert;
pub use interfaces::StoreError;
pub use interfaces::TimeWindow;
pub use runtime::DayCount;
pub use runtime::InMemoryPetitionStore;
pub use runtime::LedgerError;
pub use runtime::PetitionCatalog;
pub use runtime::PetitionListQuery;
pub use runtime::SignatureLedger;
pub use runtime::SignatureListQuery;
pub use runtime::SignaturePage;
pub use runtime::SignatureStats;
pub use runtime::generate_protocol;
