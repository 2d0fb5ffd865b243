// crates/peticoes-core/tests/ledger_unit.rs
// ============================================================================
// Module: Signature Ledger Unit Tests
// Description: Ledger semantics over the in-memory store.
// Purpose: Validate idempotent create, NULL-email behavior, pagination
//          clamping, date-window filtering, and the 30-day stats series.
// ============================================================================

//! ## Overview
//! Unit-level tests for ledger invariants:
//! - Duplicate `(petition, email)` creation conflicts; absent emails do not
//! - Conditional validation runs before any write
//! - Pagination clamping (`page_size` to `[1, 200]`, `page` to `>= 1`)
//! - Inclusive-day `since`/`until` filtering
//! - Fixed 30-entry zero-filled stats series

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use peticoes_core::InMemoryPetitionStore;
use peticoes_core::LedgerError;
use peticoes_core::PetitionCatalog;
use peticoes_core::PetitionInput;
use peticoes_core::PetitionStore;
use peticoes_core::Protocol;
use peticoes_core::RequestMeta;
use peticoes_core::SharedPetitionStore;
use peticoes_core::SignatureId;
use peticoes_core::SignatureLedger;
use peticoes_core::SignatureListQuery;
use peticoes_core::SignatureRecord;
use peticoes_core::SignatureSubmission;
use peticoes_core::Timestamp;
use peticoes_core::day_start;
use time::Date;
use time::Duration;
use time::Month;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn petition_input(slug: &str, require_cpf: bool, require_phone: bool) -> PetitionInput {
    PetitionInput {
        title: "Save the Park".to_string(),
        slug: slug.to_string(),
        summary: None,
        description: "Keep the park public.".to_string(),
        image_url: None,
        goal: 1_000,
        deadline: None,
        status: "published".to_string(),
        require_cpf,
        require_phone,
        primary_color: "#3B82F6".to_string(),
        terms_text: None,
    }
}

fn submission(email: Option<&str>) -> SignatureSubmission {
    SignatureSubmission {
        full_name: "Maria Silva".to_string(),
        email: email.map(str::to_string),
        cpf: Some("12345678901".to_string()),
        phone: Some("+55 11 91234-5678".to_string()),
        city: None,
        state: None,
        terms_accepted: true,
        utm_source: Some("newsletter".to_string()),
        utm_medium: None,
        utm_campaign: None,
    }
}

struct Harness {
    store: SharedPetitionStore,
    ledger: SignatureLedger,
    catalog: PetitionCatalog,
}

fn harness() -> Harness {
    let store = SharedPetitionStore::from_store(InMemoryPetitionStore::new());
    Harness {
        store: store.clone(),
        ledger: SignatureLedger::new(store.clone()),
        catalog: PetitionCatalog::new(store),
    }
}

/// Inserts a backdated signature directly through the store interface.
fn backdated_signature(
    store: &SharedPetitionStore,
    petition_id: &peticoes_core::PetitionId,
    email: Option<&str>,
    created: Timestamp,
) {
    let record = SignatureRecord {
        id: SignatureId::generate(),
        petition_id: petition_id.clone(),
        full_name: "Backdated Signer".to_string(),
        email: email.map(str::to_string),
        cpf: None,
        phone: None,
        city: None,
        state: None,
        terms_accepted: true,
        terms_accepted_at: created,
        utm_source: None,
        utm_medium: None,
        utm_campaign: None,
        protocol: Protocol::new("P-TESTTESTTT"),
        verified: true,
        created_date: created,
        ip_address: None,
        user_agent: None,
    };
    let outcome = store.insert_signature(&record).expect("insert");
    assert_eq!(outcome, peticoes_core::SignatureInsert::Inserted);
}

fn day(year: i32, month: Month, day: u8) -> Date {
    Date::from_calendar_date(year, month, day).expect("valid date")
}

// ============================================================================
// SECTION: Create
// ============================================================================

#[test]
fn create_assigns_protocol_verified_and_timestamps() {
    let h = harness();
    h.catalog.save(&petition_input("save-the-park", false, false)).expect("save petition");
    let record = h
        .ledger
        .create(
            "save-the-park",
            &submission(Some("maria@example.com")),
            &RequestMeta {
                ip_address: Some("203.0.113.9".to_string()),
                user_agent: Some("test-agent/1.0".to_string()),
            },
        )
        .expect("create");
    assert!(record.verified);
    assert!(record.protocol.as_str().starts_with("P-"));
    assert_eq!(record.protocol.as_str().len(), 12);
    assert_eq!(record.terms_accepted_at, record.created_date);
    assert_eq!(record.ip_address.as_deref(), Some("203.0.113.9"));
    assert_eq!(record.user_agent.as_deref(), Some("test-agent/1.0"));
}

#[test]
fn create_against_unknown_key_is_not_found() {
    let h = harness();
    let result = h.ledger.create("missing", &submission(None), &RequestMeta::default());
    assert_eq!(result, Err(LedgerError::NotFound));
}

#[test]
fn duplicate_email_conflicts_and_persists_no_second_row() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let body = submission(Some("maria@example.com"));
    h.ledger.create("save-the-park", &body, &RequestMeta::default()).expect("first create");
    let second = h.ledger.create("save-the-park", &body, &RequestMeta::default());
    assert_eq!(
        second,
        Err(LedgerError::Conflict("signature already exists for this petition".to_string()))
    );
    let total = h
        .store
        .count_signatures(&petition.id, &peticoes_core::TimeWindow::unbounded())
        .expect("count");
    assert_eq!(total, 1);
}

#[test]
fn absent_emails_never_conflict() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    h.ledger.create("save-the-park", &submission(None), &RequestMeta::default()).expect("first");
    h.ledger.create("save-the-park", &submission(None), &RequestMeta::default()).expect("second");
    let total = h
        .store
        .count_signatures(&petition.id, &peticoes_core::TimeWindow::unbounded())
        .expect("count");
    assert_eq!(total, 2);
}

#[test]
fn same_email_on_different_petitions_does_not_conflict() {
    let h = harness();
    h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    h.catalog.save(&petition_input("fix-the-bridge", false, false)).expect("save");
    let body = submission(Some("maria@example.com"));
    h.ledger.create("save-the-park", &body, &RequestMeta::default()).expect("first");
    h.ledger.create("fix-the-bridge", &body, &RequestMeta::default()).expect("second");
}

#[test]
fn required_cpf_enforced_before_write() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", true, false)).expect("save");
    let mut body = submission(Some("maria@example.com"));
    body.cpf = None;
    let result = h.ledger.create("save-the-park", &body, &RequestMeta::default());
    assert_eq!(result, Err(LedgerError::Validation("cpf required".to_string())));
    let total = h
        .store
        .count_signatures(&petition.id, &peticoes_core::TimeWindow::unbounded())
        .expect("count");
    assert_eq!(total, 0);
}

#[test]
fn required_phone_enforced_before_write() {
    let h = harness();
    h.catalog.save(&petition_input("save-the-park", false, true)).expect("save");
    let mut body = submission(Some("maria@example.com"));
    body.phone = Some(String::new());
    let result = h.ledger.create("save-the-park", &body, &RequestMeta::default());
    assert_eq!(result, Err(LedgerError::Validation("phone required".to_string())));
}

// ============================================================================
// SECTION: Lookup
// ============================================================================

#[test]
fn slug_and_uuid_resolve_to_the_same_petition() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let by_slug = h.store.resolve_petition("save-the-park").expect("resolve").expect("slug hit");
    let by_id = h.store.resolve_petition(petition.id.as_str()).expect("resolve").expect("id hit");
    assert_eq!(by_slug.id, by_id.id);
    assert_eq!(by_slug.id, petition.id);
}

// ============================================================================
// SECTION: List
// ============================================================================

#[test]
fn page_size_clamps_to_two_hundred_and_page_to_one() {
    let h = harness();
    h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let query = SignatureListQuery {
        page: 0,
        page_size: 500,
        ..SignatureListQuery::default()
    };
    let page = h.ledger.list("save-the-park", &query).expect("list");
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 200);

    let query = SignatureListQuery {
        page: -3,
        page_size: -10,
        ..SignatureListQuery::default()
    };
    let page = h.ledger.list("save-the-park", &query).expect("list");
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 1);
}

#[test]
fn list_orders_newest_first_and_reports_total() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let base = day_start(day(2024, Month::January, 10));
    for offset in 0..5_i64 {
        backdated_signature(
            &h.store,
            &petition.id,
            None,
            Timestamp::from_unix_millis(base.as_unix_millis() + offset * 3_600_000),
        );
    }
    let query = SignatureListQuery {
        page: 1,
        page_size: 3,
        ..SignatureListQuery::default()
    };
    let page = h.ledger.list("save-the-park", &query).expect("list");
    assert_eq!(page.total, 5);
    assert_eq!(page.items.len(), 3);
    let times: Vec<i64> =
        page.items.iter().map(|item| item.created_date.as_unix_millis()).collect();
    let mut sorted = times.clone();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    assert_eq!(times, sorted);

    let query = SignatureListQuery {
        page: 2,
        page_size: 3,
        ..SignatureListQuery::default()
    };
    let page = h.ledger.list("save-the-park", &query).expect("list");
    assert_eq!(page.items.len(), 2);
    assert_eq!(page.total, 5);
}

#[test]
fn since_until_same_day_is_one_inclusive_day() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let jan1 = day(2024, Month::January, 1);
    let dec31 = day(2023, Month::December, 31);
    let jan2 = day(2024, Month::January, 2);
    backdated_signature(&h.store, &petition.id, None, day_start(dec31));
    // Just after midnight and just before the next midnight, both on Jan 1.
    backdated_signature(
        &h.store,
        &petition.id,
        None,
        Timestamp::from_unix_millis(day_start(jan1).as_unix_millis() + 1_000),
    );
    backdated_signature(
        &h.store,
        &petition.id,
        None,
        Timestamp::from_unix_millis(day_start(jan2).as_unix_millis() - 1_000),
    );
    backdated_signature(&h.store, &petition.id, None, day_start(jan2));
    let query = SignatureListQuery {
        since: Some(jan1),
        until: Some(jan1),
        ..SignatureListQuery::default()
    };
    let page = h.ledger.list("save-the-park", &query).expect("list");
    assert_eq!(page.total, 2);
    for item in &page.items {
        assert_eq!(item.created_date.date_utc(), Some(jan1));
    }
}

// ============================================================================
// SECTION: Stats
// ============================================================================

#[test]
fn stats_series_is_thirty_zero_filled_ascending_entries() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let today = day(2024, Month::March, 15);
    let ten_days_ago = today.checked_sub(Duration::days(10)).expect("window");
    backdated_signature(&h.store, &petition.id, None, day_start(ten_days_ago));
    let stats = h.ledger.stats_on("save-the-park", today).expect("stats");
    assert_eq!(stats.total, 1);
    assert_eq!(stats.today, 0);
    assert_eq!(stats.by_day.len(), 30);
    assert_eq!(stats.by_day.first().map(|entry| entry.date.as_str()), Some("2024-02-15"));
    assert_eq!(stats.by_day.last().map(|entry| entry.date.as_str()), Some("2024-03-15"));
    let mut dates: Vec<&str> = stats.by_day.iter().map(|entry| entry.date.as_str()).collect();
    let sorted = dates.clone();
    dates.sort_unstable();
    assert_eq!(dates, sorted);
    let nonzero: Vec<&peticoes_core::DayCount> =
        stats.by_day.iter().filter(|entry| entry.count > 0).collect();
    assert_eq!(nonzero.len(), 1);
    assert_eq!(nonzero[0].date, "2024-03-05");
    assert_eq!(nonzero[0].count, 1);
}

#[test]
fn stats_counts_today_and_excludes_out_of_window_rows() {
    let h = harness();
    let petition = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let today = day(2024, Month::March, 15);
    backdated_signature(&h.store, &petition.id, None, day_start(today));
    backdated_signature(
        &h.store,
        &petition.id,
        None,
        Timestamp::from_unix_millis(day_start(today).as_unix_millis() + 5_000),
    );
    // Outside the 30-day window; still part of the lifetime total.
    let old = today.checked_sub(Duration::days(45)).expect("window");
    backdated_signature(&h.store, &petition.id, None, day_start(old));
    let stats = h.ledger.stats_on("save-the-park", today).expect("stats");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 2);
    let window_sum: u64 = stats.by_day.iter().map(|entry| entry.count).sum();
    assert_eq!(window_sum, 2);
}

#[test]
fn stats_for_unknown_key_is_not_found() {
    let h = harness();
    let result = h.ledger.stats_on("missing", day(2024, Month::March, 15));
    assert_eq!(result, Err(LedgerError::NotFound));
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

#[test]
fn save_upserts_by_slug_preserving_identifier() {
    let h = harness();
    let first = h.catalog.save(&petition_input("save-the-park", false, false)).expect("save");
    let mut changed = petition_input("save-the-park", true, false);
    changed.title = "Save the Park Now".to_string();
    let second = h.catalog.save(&changed).expect("resave");
    assert_eq!(first.id, second.id);
    assert_eq!(first.created_date, second.created_date);
    assert_eq!(second.title, "Save the Park Now");
    assert!(second.require_cpf);
}

#[test]
fn update_by_unknown_id_is_not_found() {
    let h = harness();
    let result = h.catalog.update(
        &peticoes_core::PetitionId::new("9f3c2a10-1111-2222-3333-444455556666"),
        &petition_input("save-the-park", false, false),
    );
    assert_eq!(result, Err(LedgerError::NotFound));
}

#[test]
fn empty_slug_rejected() {
    let h = harness();
    let result = h.catalog.save(&petition_input("", false, false));
    assert_eq!(result, Err(LedgerError::Validation("slug required".to_string())));
}
