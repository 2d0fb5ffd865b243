// crates/peticoes-core/src/core/mod.rs
// ============================================================================
// Module: Peticoes Core Types
// Description: Canonical petition and signature structures.
// Purpose: Provide stable, serializable types for the petition service.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Core types define petitions, signatures, submissions, and the request
//! metadata captured alongside a signature. These types are the canonical
//! source of truth for the HTTP surface and for store backends.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod identifiers;
pub mod petition;
pub mod signature;
pub mod time;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use identifiers::PetitionId;
pub use identifiers::Protocol;
pub use identifiers::SignatureId;
pub use identifiers::is_uuid_shaped;
pub use petition::Petition;
pub use petition::PetitionInput;
pub use petition::PetitionOrder;
pub use petition::PetitionRef;
pub use signature::RequestMeta;
pub use signature::SignatureRecord;
pub use signature::SignatureSubmission;
pub use time::Timestamp;
pub use time::day_start;
pub use time::format_day;
pub use time::parse_day;
pub use validation::SubmissionError;
pub use validation::validate_petition_input;
pub use validation::validate_submission;
