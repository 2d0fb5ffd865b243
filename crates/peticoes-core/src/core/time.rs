// crates/peticoes-core/src/core/time.rs
// ============================================================================
// Module: Peticoes Time Model
// Description: Canonical timestamp representation and UTC day-bucket helpers.
// Purpose: Keep stored instants and calendar-day boundaries on one clock.
// Dependencies: serde, time
// ============================================================================

//! ## Overview
//! Signatures carry server-assigned creation instants stored as unix epoch
//! milliseconds (UTC). Statistics bucket those instants into UTC calendar
//! days, so the day helpers here must be the only source of day boundaries;
//! a store backend never derives its own.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use time::Date;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Wire format for calendar days (`YYYY-MM-DD`).
const DAY_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

// ============================================================================
// SECTION: Timestamp
// ============================================================================

/// Unix epoch milliseconds, UTC.
///
/// # Invariants
/// - Serializes transparently as a signed integer.
/// - Ordering follows chronological order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Returns the current wall-clock instant.
    #[must_use]
    pub fn now() -> Self {
        let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
        Self(i64::try_from(nanos / 1_000_000).unwrap_or(i64::MAX))
    }

    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Returns the value as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns the UTC calendar day of this instant.
    ///
    /// `None` when the value is outside the range representable by [`Date`].
    #[must_use]
    pub fn date_utc(self) -> Option<Date> {
        OffsetDateTime::from_unix_timestamp(self.0.div_euclid(1_000))
            .ok()
            .map(|instant| instant.date())
    }
}

// ============================================================================
// SECTION: Day Helpers
// ============================================================================

/// Returns the instant at UTC midnight starting the given day.
#[must_use]
pub fn day_start(date: Date) -> Timestamp {
    Timestamp(date.midnight().assume_utc().unix_timestamp().saturating_mul(1_000))
}

/// Formats a calendar day as `YYYY-MM-DD`.
#[must_use]
pub fn format_day(date: Date) -> String {
    date.format(DAY_FORMAT).unwrap_or_default()
}

/// Parses a `YYYY-MM-DD` day string.
#[must_use]
pub fn parse_day(value: &str) -> Option<Date> {
    Date::parse(value, DAY_FORMAT).ok()
}
