// crates/peticoes-core/src/runtime/protocol.rs
// ============================================================================
// Module: Peticoes Protocol Tokens
// Description: Human-shareable tracking token generation.
// Purpose: Assign each signature a caller-facing protocol code at creation.
// Dependencies: rand, crate::core
// ============================================================================

//! ## Overview
//! Protocol tokens are the tracking codes handed back to signers. They use a
//! reduced uppercase alphabet (no `0`, `O`, `1`, `I`) so the code survives
//! being read aloud or retyped. Uniqueness is statistical; the storage layer
//! carries no constraint on the column.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;

use crate::core::Protocol;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix carried by every protocol token.
const PROTOCOL_PREFIX: &str = "P-";
/// Alphabet for the random suffix; ambiguous glyphs removed.
const PROTOCOL_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
/// Length of the random suffix.
const PROTOCOL_SUFFIX_LEN: usize = 10;

// ============================================================================
// SECTION: Generation
// ============================================================================

/// Generates a fresh protocol token.
#[must_use]
pub fn generate_protocol() -> Protocol {
    let mut rng = rand::thread_rng();
    let mut token = String::with_capacity(PROTOCOL_PREFIX.len() + PROTOCOL_SUFFIX_LEN);
    token.push_str(PROTOCOL_PREFIX);
    for _ in 0..PROTOCOL_SUFFIX_LEN {
        let index = rng.gen_range(0..PROTOCOL_ALPHABET.len());
        token.push(char::from(PROTOCOL_ALPHABET[index]));
    }
    Protocol::new(token)
}
