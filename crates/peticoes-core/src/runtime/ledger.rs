// crates/peticoes-core/src/runtime/ledger.rs
// ============================================================================
// Module: Peticoes Signature Ledger
// Description: Signature create, list, and stats orchestration.
// Purpose: Enforce validation, idempotent insert, and rollup semantics.
// Dependencies: crate::{core, interfaces}, thiserror, time
// ============================================================================

//! ## Overview
//! The ledger is the core of the signature subsystem. Creation resolves the
//! petition, validates conditional-required fields before any write, stamps
//! the record, and performs an insert-or-ignore against the
//! `(petition_id, email)` uniqueness constraint; a skipped insert surfaces as
//! [`LedgerError::Conflict`]. Listing clamps pagination and computes a
//! separate total over the same filter. Stats assemble a fixed 30-day
//! zero-filled series; the store only reports raw instants, the ledger owns
//! the calendar window.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use time::Date;
use time::Duration;

use crate::core::RequestMeta;
use crate::core::SignatureId;
use crate::core::SignatureRecord;
use crate::core::SignatureSubmission;
use crate::core::Timestamp;
use crate::core::day_start;
use crate::core::format_day;
use crate::core::validate_submission;
use crate::interfaces::PetitionStore;
use crate::interfaces::SharedPetitionStore;
use crate::interfaces::SignatureInsert;
use crate::interfaces::StoreError;
use crate::interfaces::TimeWindow;
use crate::runtime::protocol::generate_protocol;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Smallest accepted page size after clamping.
const MIN_PAGE_SIZE: i64 = 1;
/// Largest accepted page size after clamping.
const MAX_PAGE_SIZE: i64 = 200;
/// Number of days in the stats series, including today.
const STATS_WINDOW_DAYS: i64 = 30;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Terminal, caller-visible ledger failures.
///
/// # Invariants
/// - `NotFound`, `Validation`, and `Conflict` are non-retryable outcomes.
/// - `Store` wraps backend failures surfaced as generic server errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// No petition matches the lookup key.
    #[error("petition not found")]
    NotFound,
    /// The submission failed a validation rule.
    #[error("{0}")]
    Validation(String),
    /// A duplicate signature was silently skipped by the store.
    #[error("{0}")]
    Conflict(String),
    /// The store backend failed.
    #[error("store failure: {0}")]
    Store(String),
}

impl From<StoreError> for LedgerError {
    fn from(error: StoreError) -> Self {
        Self::Store(error.to_string())
    }
}

// ============================================================================
// SECTION: Query and Response Shapes
// ============================================================================

/// List query after HTTP-layer parsing, before clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureListQuery {
    /// Inclusive start day.
    pub since: Option<Date>,
    /// Inclusive end day.
    pub until: Option<Date>,
    /// Requested page, 1-based; values below 1 clamp to 1.
    pub page: i64,
    /// Requested page size; clamped to `[1, 200]`.
    pub page_size: i64,
}

impl Default for SignatureListQuery {
    fn default() -> Self {
        Self {
            since: None,
            until: None,
            page: 1,
            page_size: 50,
        }
    }
}

/// One page of signatures plus a separately computed total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignaturePage {
    /// Matching signatures, newest first.
    pub items: Vec<SignatureRecord>,
    /// Page echoed after clamping.
    pub page: i64,
    /// Page size echoed after clamping.
    pub page_size: i64,
    /// Total matching rows ignoring pagination.
    pub total: u64,
}

/// One day of the stats series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCount {
    /// Calendar day as `YYYY-MM-DD`.
    pub date: String,
    /// Signatures created on that day.
    pub count: u64,
}

/// Signature rollup for one petition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureStats {
    /// Lifetime signature count.
    pub total: u64,
    /// Signatures created on the current calendar day.
    pub today: u64,
    /// Fixed 30-entry daily series, ascending, zero-filled.
    pub by_day: Vec<DayCount>,
}

// ============================================================================
// SECTION: Ledger
// ============================================================================

/// Signature-collection orchestration over an injected store.
#[derive(Clone)]
pub struct SignatureLedger {
    /// Store backend.
    store: SharedPetitionStore,
}

impl SignatureLedger {
    /// Creates a ledger over a shared store.
    #[must_use]
    pub const fn new(store: SharedPetitionStore) -> Self {
        Self {
            store,
        }
    }

    /// Creates a signature for the petition matching `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when the key resolves no petition,
    /// [`LedgerError::Validation`] when a conditional-required field is
    /// missing, [`LedgerError::Conflict`] when the `(petition, email)` pair
    /// already exists, and [`LedgerError::Store`] on backend failure.
    pub fn create(
        &self,
        key: &str,
        submission: &SignatureSubmission,
        meta: &RequestMeta,
    ) -> Result<SignatureRecord, LedgerError> {
        let petition = self.store.resolve_petition(key)?.ok_or(LedgerError::NotFound)?;
        validate_submission(&petition, submission)
            .map_err(|err| LedgerError::Validation(err.to_string()))?;
        let now = Timestamp::now();
        let record = SignatureRecord {
            id: SignatureId::generate(),
            petition_id: petition.id,
            full_name: submission.full_name.clone(),
            email: submission.email.clone(),
            cpf: submission.cpf.clone(),
            phone: submission.phone.clone(),
            city: submission.city.clone(),
            state: submission.state.clone(),
            terms_accepted: submission.terms_accepted,
            terms_accepted_at: now,
            utm_source: submission.utm_source.clone(),
            utm_medium: submission.utm_medium.clone(),
            utm_campaign: submission.utm_campaign.clone(),
            protocol: generate_protocol(),
            verified: true,
            created_date: now,
            ip_address: meta.ip_address.clone(),
            user_agent: meta.user_agent.clone(),
        };
        match self.store.insert_signature(&record)? {
            SignatureInsert::Inserted => Ok(record),
            SignatureInsert::DuplicateEmail => Err(LedgerError::Conflict(
                "signature already exists for this petition".to_string(),
            )),
        }
    }

    /// Lists signatures for the petition matching `key`.
    ///
    /// The page and its total are computed by two statements issued
    /// back-to-back in the same store scope; skew from concurrent writers
    /// between them is an accepted approximation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when the key resolves no petition
    /// and [`LedgerError::Store`] on backend failure.
    pub fn list(&self, key: &str, query: &SignatureListQuery) -> Result<SignaturePage, LedgerError> {
        let petition = self.store.resolve_petition(key)?.ok_or(LedgerError::NotFound)?;
        let page = query.page.max(1);
        let page_size = query.page_size.clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);
        let offset = (page - 1).saturating_mul(page_size);
        let window = TimeWindow {
            since: query.since.map(day_start),
            until: query.until.and_then(Date::next_day).map(day_start),
        };
        let items = self.store.list_signatures(&petition.id, &window, page_size, offset)?;
        let total = self.store.count_signatures(&petition.id, &window)?;
        Ok(SignaturePage {
            items,
            page,
            page_size,
            total,
        })
    }

    /// Computes the rollup for the petition matching `key`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when the key resolves no petition
    /// and [`LedgerError::Store`] on backend failure.
    pub fn stats(&self, key: &str) -> Result<SignatureStats, LedgerError> {
        let today = Timestamp::now()
            .date_utc()
            .ok_or_else(|| LedgerError::Store("current date out of range".to_string()))?;
        self.stats_on(key, today)
    }

    /// Computes the rollup with an explicit "today", for deterministic tests.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] when the key resolves no petition
    /// and [`LedgerError::Store`] on backend failure.
    pub fn stats_on(&self, key: &str, today: Date) -> Result<SignatureStats, LedgerError> {
        let petition = self.store.resolve_petition(key)?.ok_or(LedgerError::NotFound)?;
        let total = self.store.count_signatures(&petition.id, &TimeWindow::unbounded())?;
        let tomorrow_start = today.next_day().map(day_start);
        let today_window = TimeWindow {
            since: Some(day_start(today)),
            until: tomorrow_start,
        };
        let today_count = self.store.count_signatures(&petition.id, &today_window)?;
        let window_start = today
            .checked_sub(Duration::days(STATS_WINDOW_DAYS - 1))
            .ok_or_else(|| LedgerError::Store("stats window out of range".to_string()))?;
        let series_window = TimeWindow {
            since: Some(day_start(window_start)),
            until: tomorrow_start,
        };
        let times = self.store.signature_times(&petition.id, &series_window)?;
        let mut buckets: BTreeMap<Date, u64> = BTreeMap::new();
        for instant in times {
            if let Some(date) = instant.date_utc() {
                *buckets.entry(date).or_insert(0) += 1;
            }
        }
        let mut by_day = Vec::with_capacity(usize::try_from(STATS_WINDOW_DAYS).unwrap_or(30));
        let mut day = window_start;
        loop {
            by_day.push(DayCount {
                date: format_day(day),
                count: buckets.get(&day).copied().unwrap_or(0),
            });
            if day == today {
                break;
            }
            match day.next_day() {
                Some(next) => day = next,
                None => break,
            }
        }
        Ok(SignatureStats {
            total,
            today: today_count,
            by_day,
        })
    }
}
