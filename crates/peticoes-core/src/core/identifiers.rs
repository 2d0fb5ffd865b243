// crates/peticoes-core/src/core/identifiers.rs
// ============================================================================
// Module: Peticoes Identifiers
// Description: Canonical opaque identifiers for petitions and signatures.
// Purpose: Provide strongly typed, serializable identifiers with stable wire forms.
// Dependencies: serde, uuid
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout the petition service.
//! Identifiers are opaque strings and serialize transparently on the wire.
//! Petition identifiers are server-generated UUIDs; lookup keys supplied by
//! callers are classified by [`is_uuid_shaped`] before resolution.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Petition identifier.
///
/// # Invariants
/// - Server-generated values are canonical lowercase UUID strings.
/// - The type itself applies no normalization or validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetitionId(String);

impl PetitionId {
    /// Creates a petition identifier from an existing value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random petition identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PetitionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for PetitionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PetitionId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Signature identifier.
///
/// # Invariants
/// - Server-generated values are canonical lowercase UUID strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignatureId(String);

impl SignatureId {
    /// Creates a signature identifier from an existing value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random signature identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Caller-facing tracking token assigned to a signature at creation.
///
/// # Invariants
/// - Opaque UTF-8 string; uniqueness is statistical, not enforced by storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Protocol(String);

impl Protocol {
    /// Creates a protocol token from an existing value.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Key Classification
// ============================================================================

/// Returns true when a lookup key has the 8-4-4-4-12 UUID shape.
///
/// Only length and dash positions are fixed; groups admit hex digits and
/// hyphens. A key that fails this check is treated as a slug.
#[must_use]
pub fn is_uuid_shaped(key: &str) -> bool {
    let bytes = key.as_bytes();
    if bytes.len() != 36 {
        return false;
    }
    bytes.iter().enumerate().all(|(index, byte)| match index {
        8 | 13 | 18 | 23 => *byte == b'-',
        _ => byte.is_ascii_hexdigit() || *byte == b'-',
    })
}
