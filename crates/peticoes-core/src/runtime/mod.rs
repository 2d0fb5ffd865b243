// crates/peticoes-core/src/runtime/mod.rs
// ============================================================================
// Module: Peticoes Runtime
// Description: Ledger orchestration, petition catalog, and test store.
// Purpose: Implement signature-collection semantics over store interfaces.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime helpers sit between the HTTP surface and a store backend. The
//! [`SignatureLedger`] owns create/list/stats semantics; the
//! [`PetitionCatalog`] owns the peripheral petition CRUD. Both are clonable
//! handles over a [`crate::interfaces::SharedPetitionStore`].

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod catalog;
pub mod ledger;
pub mod protocol;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use catalog::PetitionCatalog;
pub use catalog::PetitionListQuery;
pub use ledger::DayCount;
pub use ledger::LedgerError;
pub use ledger::SignatureLedger;
pub use ledger::SignatureListQuery;
pub use ledger::SignaturePage;
pub use ledger::SignatureStats;
pub use protocol::generate_protocol;
pub use store::InMemoryPetitionStore;
