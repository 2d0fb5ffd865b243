// crates/peticoes-core/src/core/petition.rs
// ============================================================================
// Module: Peticoes Petition Types
// Description: Petition records, write inputs, and list ordering.
// Purpose: Provide stable, serializable petition structures.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Petitions are the campaign entities signatures are collected against. The
//! signature subsystem reads them through [`PetitionRef`] only; the full
//! [`Petition`] record belongs to the CRUD surface. List ordering is an
//! enumerated mapping so caller-controlled sort keys are never interpolated
//! into a query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;

use crate::core::identifiers::PetitionId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Petition Records
// ============================================================================

/// Full petition record as stored.
///
/// # Invariants
/// - `slug` is unique across petitions.
/// - `created_date` and `updated_date` are server-assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Petition {
    /// Server-generated identifier.
    pub id: PetitionId,
    /// Display title.
    pub title: String,
    /// Unique human-chosen slug.
    pub slug: String,
    /// Optional short summary.
    pub summary: Option<String>,
    /// Long-form description.
    pub description: String,
    /// Optional hero image URL.
    pub image_url: Option<String>,
    /// Signature goal.
    pub goal: i64,
    /// Optional campaign deadline (calendar day).
    pub deadline: Option<Date>,
    /// Publication status label.
    pub status: String,
    /// Whether signatures must carry a CPF.
    pub require_cpf: bool,
    /// Whether signatures must carry a phone number.
    pub require_phone: bool,
    /// Theme color for the public page.
    pub primary_color: String,
    /// Optional terms text shown at signing.
    pub terms_text: Option<String>,
    /// Creation instant.
    pub created_date: Timestamp,
    /// Last update instant.
    pub updated_date: Timestamp,
}

/// Petition fields read by the signature subsystem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetitionRef {
    /// Petition identifier.
    pub id: PetitionId,
    /// Whether signatures must carry a CPF.
    pub require_cpf: bool,
    /// Whether signatures must carry a phone number.
    pub require_phone: bool,
}

/// Caller-supplied petition payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetitionInput {
    /// Display title.
    pub title: String,
    /// Unique human-chosen slug.
    pub slug: String,
    /// Optional short summary.
    #[serde(default)]
    pub summary: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: String,
    /// Optional hero image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Signature goal.
    #[serde(default = "default_goal")]
    pub goal: i64,
    /// Optional campaign deadline (calendar day).
    #[serde(default)]
    pub deadline: Option<Date>,
    /// Publication status label.
    #[serde(default = "default_status")]
    pub status: String,
    /// Whether signatures must carry a CPF.
    #[serde(default)]
    pub require_cpf: bool,
    /// Whether signatures must carry a phone number.
    #[serde(default)]
    pub require_phone: bool,
    /// Theme color for the public page.
    #[serde(default = "default_primary_color")]
    pub primary_color: String,
    /// Optional terms text shown at signing.
    #[serde(default)]
    pub terms_text: Option<String>,
}

/// Returns the default signature goal for new petitions.
const fn default_goal() -> i64 {
    1_000
}

/// Returns the default publication status for new petitions.
fn default_status() -> String {
    "draft".to_string()
}

/// Returns the default theme color for new petitions.
fn default_primary_color() -> String {
    "#3B82F6".to_string()
}

// ============================================================================
// SECTION: List Ordering
// ============================================================================

/// Allowed petition list orderings.
///
/// # Invariants
/// - Variants map 1:1 to fixed column/direction pairs; unknown sort keys fall
///   back to [`PetitionOrder::CreatedDateDesc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PetitionOrder {
    /// Oldest first.
    CreatedDateAsc,
    /// Newest first.
    #[default]
    CreatedDateDesc,
    /// Ascending identifier.
    IdAsc,
    /// Descending identifier.
    IdDesc,
}

impl PetitionOrder {
    /// Resolves a caller-supplied sort key through the fixed allow-list.
    #[must_use]
    pub fn from_key(key: &str) -> Self {
        match key {
            "created_date" => Self::CreatedDateAsc,
            "id" => Self::IdAsc,
            "-id" => Self::IdDesc,
            _ => Self::CreatedDateDesc,
        }
    }
}
