// crates/peticoes-core/src/core/signature.rs
// ============================================================================
// Module: Peticoes Signature Types
// Description: Signature submissions, stored records, and request metadata.
// Purpose: Provide stable, serializable signature structures.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A signature represents one person's endorsement of exactly one petition.
//! [`SignatureSubmission`] is the untrusted wire payload; the ledger stamps
//! it into a [`SignatureRecord`], which stores persist verbatim. Records are
//! create-only; this subsystem never updates or deletes them.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::PetitionId;
use crate::core::identifiers::Protocol;
use crate::core::identifiers::SignatureId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Submission
// ============================================================================

/// Caller-supplied signature payload.
///
/// # Invariants
/// - Untrusted; validated by the ledger before any write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureSubmission {
    /// Signer's full name.
    pub full_name: String,
    /// Optional contact email; binds the per-petition uniqueness constraint
    /// when present.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional CPF (numeric-id string); required when the petition demands it.
    #[serde(default)]
    pub cpf: Option<String>,
    /// Optional phone number; required when the petition demands it.
    #[serde(default)]
    pub phone: Option<String>,
    /// Optional city.
    #[serde(default)]
    pub city: Option<String>,
    /// Optional state or region.
    #[serde(default)]
    pub state: Option<String>,
    /// Terms acceptance flag; must be affirmatively set.
    pub terms_accepted: bool,
    /// Optional attribution source.
    #[serde(default)]
    pub utm_source: Option<String>,
    /// Optional attribution medium.
    #[serde(default)]
    pub utm_medium: Option<String>,
    /// Optional attribution campaign.
    #[serde(default)]
    pub utm_campaign: Option<String>,
}

/// Ambient request metadata captured at signature creation.
///
/// # Invariants
/// - Stored as supplied; never validated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestMeta {
    /// Caller network address.
    pub ip_address: Option<String>,
    /// Caller user-agent header.
    pub user_agent: Option<String>,
}

// ============================================================================
// SECTION: Stored Record
// ============================================================================

/// Persisted signature row.
///
/// # Invariants
/// - At most one record per `(petition_id, email)` pair when `email` is
///   present; absent emails never conflict with each other.
/// - `created_date`, `terms_accepted_at`, `protocol`, and `verified` are
///   server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureRecord {
    /// Server-generated identifier.
    pub id: SignatureId,
    /// Owning petition.
    pub petition_id: PetitionId,
    /// Signer's full name.
    pub full_name: String,
    /// Optional contact email.
    pub email: Option<String>,
    /// Optional CPF.
    pub cpf: Option<String>,
    /// Optional phone number.
    pub phone: Option<String>,
    /// Optional city.
    pub city: Option<String>,
    /// Optional state or region.
    pub state: Option<String>,
    /// Terms acceptance flag.
    pub terms_accepted: bool,
    /// Instant the terms were accepted (creation instant).
    pub terms_accepted_at: Timestamp,
    /// Optional attribution source.
    pub utm_source: Option<String>,
    /// Optional attribution medium.
    pub utm_medium: Option<String>,
    /// Optional attribution campaign.
    pub utm_campaign: Option<String>,
    /// Assigned tracking token.
    pub protocol: Protocol,
    /// Verification flag; always true at creation.
    pub verified: bool,
    /// Creation instant.
    pub created_date: Timestamp,
    /// Caller network address, when known.
    pub ip_address: Option<String>,
    /// Caller user-agent header, when known.
    pub user_agent: Option<String>,
}
