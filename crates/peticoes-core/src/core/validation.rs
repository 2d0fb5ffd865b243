// crates/peticoes-core/src/core/validation.rs
// ============================================================================
// Module: Peticoes Validation
// Description: Submission and petition-input validation rules.
// Purpose: Enforce conditional-required fields before any write occurs.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Validation runs entirely in memory, ahead of store access. The conditional
//! rules come from the owning petition: `require_cpf` and `require_phone`
//! gate the corresponding submission fields. Email checking is shape-only
//! (one `@`, non-empty local part, dotted host); stored request metadata is
//! deliberately never validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::petition::PetitionInput;
use crate::core::petition::PetitionRef;
use crate::core::signature::SignatureSubmission;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Submission validation failures.
///
/// # Invariants
/// - Messages are caller-facing and name the offending field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// The petition requires a CPF and the submission lacks one.
    #[error("cpf required")]
    MissingCpf,
    /// The petition requires a phone number and the submission lacks one.
    #[error("phone required")]
    MissingPhone,
    /// The signer's name is empty.
    #[error("full_name required")]
    MissingFullName,
    /// The terms flag is not affirmatively set.
    #[error("terms_accepted must be true")]
    TermsNotAccepted,
    /// The email is present but not address-shaped.
    #[error("email is not a valid address")]
    InvalidEmail,
    /// A petition payload field is empty or malformed.
    #[error("{0}")]
    InvalidPetition(String),
}

// ============================================================================
// SECTION: Submission Validation
// ============================================================================

/// Validates a signature submission against its owning petition.
///
/// Conditional-required checks run first so they fire regardless of other
/// fields.
///
/// # Errors
///
/// Returns [`SubmissionError`] naming the first failing rule.
pub fn validate_submission(
    petition: &PetitionRef,
    submission: &SignatureSubmission,
) -> Result<(), SubmissionError> {
    if petition.require_cpf && is_blank(submission.cpf.as_deref()) {
        return Err(SubmissionError::MissingCpf);
    }
    if petition.require_phone && is_blank(submission.phone.as_deref()) {
        return Err(SubmissionError::MissingPhone);
    }
    if submission.full_name.trim().is_empty() {
        return Err(SubmissionError::MissingFullName);
    }
    if !submission.terms_accepted {
        return Err(SubmissionError::TermsNotAccepted);
    }
    if let Some(email) = submission.email.as_deref()
        && !email_shape_ok(email)
    {
        return Err(SubmissionError::InvalidEmail);
    }
    Ok(())
}

/// Validates a petition create/update payload.
///
/// # Errors
///
/// Returns [`SubmissionError::InvalidPetition`] when a required field is
/// empty.
pub fn validate_petition_input(input: &PetitionInput) -> Result<(), SubmissionError> {
    if input.title.trim().is_empty() {
        return Err(SubmissionError::InvalidPetition("title required".to_string()));
    }
    if input.slug.trim().is_empty() {
        return Err(SubmissionError::InvalidPetition("slug required".to_string()));
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns true when an optional field is absent or whitespace-only.
fn is_blank(value: Option<&str>) -> bool {
    !value.is_some_and(|inner| !inner.trim().is_empty())
}

/// Shape-only email check standing in for full address validation.
fn email_shape_ok(email: &str) -> bool {
    let Some((local, host)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !host.is_empty()
        && host.contains('.')
        && !host.starts_with('.')
        && !host.ends_with('.')
        && !email.contains(char::is_whitespace)
        && !host.contains('@')
}
