// crates/peticoes-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Petition Store Tests
// Description: Integration tests for the durable petition store.
// Purpose: Validate uniqueness, resolution, windows, and persistence across
//          reopen against a real database file.
// ============================================================================

//! ## Overview
//! Exercises the `SQLite` store through the [`PetitionStore`] trait:
//! - Insert-or-ignore duplicate handling and NULL-email semantics
//! - Key resolution by identifier and slug
//! - Half-open time windows for lists, counts, and stats inputs
//! - Slug upsert identity preservation and reopen persistence

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

use peticoes_core::PetitionId;
use peticoes_core::PetitionInput;
use peticoes_core::PetitionStore;
use peticoes_core::Protocol;
use peticoes_core::SignatureId;
use peticoes_core::SignatureInsert;
use peticoes_core::SignatureRecord;
use peticoes_core::TimeWindow;
use peticoes_core::Timestamp;
use peticoes_store_sqlite::SqlitePetitionStore;
use peticoes_store_sqlite::SqliteStoreConfig;
use peticoes_store_sqlite::SqliteStoreMode;
use peticoes_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;
use time::Date;
use time::Month;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn store_config(dir: &TempDir) -> SqliteStoreConfig {
    SqliteStoreConfig {
        path: dir.path().join("peticoes.db"),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Wal,
        sync_mode: SqliteSyncMode::Normal,
    }
}

fn open_store(dir: &TempDir) -> SqlitePetitionStore {
    SqlitePetitionStore::new(&store_config(dir)).expect("open store")
}

fn petition_input(slug: &str) -> PetitionInput {
    PetitionInput {
        title: format!("Campaign {slug}"),
        slug: slug.to_string(),
        summary: Some("Short summary".to_string()),
        description: "Long description".to_string(),
        image_url: None,
        goal: 5_000,
        deadline: None,
        status: "published".to_string(),
        require_cpf: false,
        require_phone: false,
        primary_color: "#3B82F6".to_string(),
        terms_text: None,
    }
}

fn signature(petition_id: &PetitionId, email: Option<&str>, millis: i64) -> SignatureRecord {
    SignatureRecord {
        id: SignatureId::generate(),
        petition_id: petition_id.clone(),
        full_name: "Maria Silva".to_string(),
        email: email.map(str::to_string),
        cpf: None,
        phone: None,
        city: Some("Sao Paulo".to_string()),
        state: Some("SP".to_string()),
        terms_accepted: true,
        terms_accepted_at: Timestamp::from_unix_millis(millis),
        utm_source: None,
        utm_medium: None,
        utm_campaign: None,
        protocol: Protocol::new("P-TESTTOKEN1"),
        verified: true,
        created_date: Timestamp::from_unix_millis(millis),
        ip_address: Some("203.0.113.9".to_string()),
        user_agent: Some("tests/1.0".to_string()),
    }
}

// ============================================================================
// SECTION: Resolution
// ============================================================================

#[test]
fn resolves_petition_by_id_and_slug() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let created = store
        .upsert_petition(&petition_input("save-the-park"), &PetitionId::generate(), Timestamp::now())
        .expect("upsert");

    let by_slug = store.resolve_petition("save-the-park").expect("resolve").expect("found");
    let by_id = store.resolve_petition(created.id.as_str()).expect("resolve").expect("found");
    assert_eq!(by_slug.id, created.id);
    assert_eq!(by_id.id, created.id);
}

#[test]
fn unknown_key_resolves_to_none() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    assert!(store.resolve_petition("no-such-campaign").expect("resolve").is_none());
    assert!(store.get_petition("no-such-campaign").expect("get").is_none());
}

// ============================================================================
// SECTION: Duplicate Handling
// ============================================================================

#[test]
fn duplicate_email_is_ignored_not_written() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let petition = store
        .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), Timestamp::now())
        .expect("upsert");

    let first = signature(&petition.id, Some("maria@example.com"), 1_000);
    let second = signature(&petition.id, Some("maria@example.com"), 2_000);
    assert_eq!(store.insert_signature(&first).expect("insert"), SignatureInsert::Inserted);
    assert_eq!(
        store.insert_signature(&second).expect("insert"),
        SignatureInsert::DuplicateEmail
    );

    let total = store.count_signatures(&petition.id, &TimeWindow::unbounded()).expect("count");
    assert_eq!(total, 1);
}

#[test]
fn absent_emails_never_conflict() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let petition = store
        .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), Timestamp::now())
        .expect("upsert");

    for millis in [1_000, 2_000] {
        let record = signature(&petition.id, None, millis);
        assert_eq!(store.insert_signature(&record).expect("insert"), SignatureInsert::Inserted);
    }
    let total = store.count_signatures(&petition.id, &TimeWindow::unbounded()).expect("count");
    assert_eq!(total, 2);
}

#[test]
fn same_email_signs_different_petitions() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let now = Timestamp::now();
    let first = store
        .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), now)
        .expect("upsert");
    let second = store
        .upsert_petition(&petition_input("save-the-park"), &PetitionId::generate(), now)
        .expect("upsert");

    let one = signature(&first.id, Some("maria@example.com"), 1_000);
    let two = signature(&second.id, Some("maria@example.com"), 2_000);
    assert_eq!(store.insert_signature(&one).expect("insert"), SignatureInsert::Inserted);
    assert_eq!(store.insert_signature(&two).expect("insert"), SignatureInsert::Inserted);
}

// ============================================================================
// SECTION: Windows and Ordering
// ============================================================================

#[test]
fn signature_list_is_newest_first_and_window_is_half_open() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let petition = store
        .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), Timestamp::now())
        .expect("upsert");

    for (millis, email) in [(1_000, "a@example.com"), (2_000, "b@example.com"), (3_000, "c@example.com")] {
        let record = signature(&petition.id, Some(email), millis);
        store.insert_signature(&record).expect("insert");
    }

    let all = store
        .list_signatures(&petition.id, &TimeWindow::unbounded(), 10, 0)
        .expect("list");
    let instants: Vec<i64> = all.iter().map(|row| row.created_date.as_unix_millis()).collect();
    assert_eq!(instants, vec![3_000, 2_000, 1_000]);

    // since inclusive, until exclusive.
    let window = TimeWindow {
        since: Some(Timestamp::from_unix_millis(2_000)),
        until: Some(Timestamp::from_unix_millis(3_000)),
    };
    let inside = store.list_signatures(&petition.id, &window, 10, 0).expect("list");
    assert_eq!(inside.len(), 1);
    assert_eq!(inside[0].created_date.as_unix_millis(), 2_000);
    assert_eq!(store.count_signatures(&petition.id, &window).expect("count"), 1);

    let times = store.signature_times(&petition.id, &window).expect("times");
    assert_eq!(times, vec![Timestamp::from_unix_millis(2_000)]);
}

#[test]
fn signature_list_honors_limit_and_offset() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let petition = store
        .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), Timestamp::now())
        .expect("upsert");

    for millis in 0 .. 5_i64 {
        let email = format!("signer{millis}@example.com");
        let record = signature(&petition.id, Some(&email), millis * 1_000);
        store.insert_signature(&record).expect("insert");
    }

    let page = store
        .list_signatures(&petition.id, &TimeWindow::unbounded(), 2, 2)
        .expect("list");
    let instants: Vec<i64> = page.iter().map(|row| row.created_date.as_unix_millis()).collect();
    assert_eq!(instants, vec![2_000, 1_000]);
}

// ============================================================================
// SECTION: Petition Writes
// ============================================================================

#[test]
fn slug_upsert_preserves_identity_and_creation_instant() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let created = store
        .upsert_petition(
            &petition_input("clean-rivers"),
            &PetitionId::generate(),
            Timestamp::from_unix_millis(1_000),
        )
        .expect("upsert");

    let mut revised = petition_input("clean-rivers");
    revised.title = "Clean Rivers Now".to_string();
    let updated = store
        .upsert_petition(&revised, &PetitionId::generate(), Timestamp::from_unix_millis(9_000))
        .expect("upsert");

    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_date.as_unix_millis(), 1_000);
    assert_eq!(updated.updated_date.as_unix_millis(), 9_000);
    assert_eq!(updated.title, "Clean Rivers Now");
}

#[test]
fn update_unknown_petition_returns_none() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let missing = PetitionId::new("9f3c2a10-1111-2222-3333-444455556666");
    let result = store
        .update_petition(&missing, &petition_input("ghost"), Timestamp::now())
        .expect("update");
    assert!(result.is_none());
}

#[test]
fn deadline_round_trips_as_calendar_day() {
    let dir = TempDir::new().expect("tempdir");
    let store = open_store(&dir);
    let mut input = petition_input("clean-rivers");
    input.deadline = Date::from_calendar_date(2026, Month::December, 31).ok();
    let created = store
        .upsert_petition(&input, &PetitionId::generate(), Timestamp::now())
        .expect("upsert");
    assert_eq!(created.deadline, input.deadline);

    let loaded = store.get_petition("clean-rivers").expect("get").expect("found");
    assert_eq!(loaded.deadline, input.deadline);
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

#[test]
fn data_survives_store_reopen() {
    let dir = TempDir::new().expect("tempdir");
    let petition_id = {
        let store = open_store(&dir);
        let petition = store
            .upsert_petition(&petition_input("clean-rivers"), &PetitionId::generate(), Timestamp::now())
            .expect("upsert");
        let record = signature(&petition.id, Some("maria@example.com"), 1_000);
        store.insert_signature(&record).expect("insert");
        petition.id
    };

    let reopened = open_store(&dir);
    let resolved = reopened.resolve_petition("clean-rivers").expect("resolve").expect("found");
    assert_eq!(resolved.id, petition_id);
    let total = reopened.count_signatures(&petition_id, &TimeWindow::unbounded()).expect("count");
    assert_eq!(total, 1);
}
