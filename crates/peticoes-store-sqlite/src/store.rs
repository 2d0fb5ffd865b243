// crates/peticoes-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Petition Store
// Description: Durable PetitionStore backed by SQLite WAL.
// Purpose: Persist petitions and signatures with relational uniqueness.
// Dependencies: peticoes-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`PetitionStore`] using `SQLite`. The
//! per-petition email uniqueness constraint is a unique index over
//! `(petition_id, email)`; because `SQLite` treats NULLs as distinct in unique
//! indexes, rows without an email never conflict with each other. Duplicate
//! inserts are absorbed with `ON CONFLICT DO NOTHING` and reported through
//! [`SignatureInsert::DuplicateEmail`], not as errors.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use peticoes_core::Petition;
use peticoes_core::PetitionFilter;
use peticoes_core::PetitionId;
use peticoes_core::PetitionInput;
use peticoes_core::PetitionOrder;
use peticoes_core::PetitionRef;
use peticoes_core::PetitionStore;
use peticoes_core::Protocol;
use peticoes_core::SignatureId;
use peticoes_core::SignatureInsert;
use peticoes_core::SignatureRecord;
use peticoes_core::StoreError;
use peticoes_core::TimeWindow;
use peticoes_core::Timestamp;
use peticoes_core::format_day;
use peticoes_core::is_uuid_shaped;
use peticoes_core::parse_day;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Petition column list shared by every petition query.
const PETITION_COLUMNS: &str = "id, title, slug, summary, description, image_url, goal, deadline, \
                                status, require_cpf, require_phone, primary_color, terms_text, \
                                created_date, updated_date";
/// Signature column list shared by every signature query.
const SIGNATURE_COLUMNS: &str = "id, petition_id, full_name, email, cpf, phone, city, state, \
                                 terms_accepted, terms_accepted_at, utm_source, utm_medium, \
                                 utm_campaign, protocol, verified, created_date, ip_address, \
                                 user_agent";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` petition store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding raw signature payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) | SqliteStoreError::VersionMismatch(message) => {
                Self::Store(message)
            }
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
        }
    }
}

/// Maps a `rusqlite` error into the store error type.
fn db_err(err: &rusqlite::Error) -> SqliteStoreError {
    SqliteStoreError::Db(err.to_string())
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed petition store with WAL support.
///
/// # Invariants
/// - `SQLite` connection access is serialized through a mutex.
/// - Writes run inside a transaction; partial writes never survive.
#[derive(Clone)]
pub struct SqlitePetitionStore {
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqlitePetitionStore {
    /// Opens an `SQLite`-backed petition store.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Acquires the connection, converting mutex poisoning into an error.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }
}

// ============================================================================
// SECTION: Open + Schema
// ============================================================================

/// Rejects paths that cannot hold a database file.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path is empty".to_string()));
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(format!(
            "store path is a directory: {}",
            path.display()
        )));
    }
    Ok(())
}

/// Creates the parent directory of the database file when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection =
        Connection::open_with_flags(&config.path, flags).map_err(|err| db_err(&err))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON;")
        .map_err(|err| db_err(&err))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| db_err(&err))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| db_err(&err))?;
    connection
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| db_err(&err))?;
    Ok(())
}

/// Initializes the `SQLite` schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| db_err(&err))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| db_err(&err))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| db_err(&err))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| db_err(&err))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS petitions (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    slug TEXT NOT NULL UNIQUE,
                    summary TEXT,
                    description TEXT NOT NULL,
                    image_url TEXT,
                    goal INTEGER NOT NULL,
                    deadline TEXT,
                    status TEXT NOT NULL,
                    require_cpf INTEGER NOT NULL,
                    require_phone INTEGER NOT NULL,
                    primary_color TEXT NOT NULL,
                    terms_text TEXT,
                    created_date INTEGER NOT NULL,
                    updated_date INTEGER NOT NULL
                );
                CREATE TABLE IF NOT EXISTS signatures (
                    id TEXT PRIMARY KEY,
                    petition_id TEXT NOT NULL REFERENCES petitions(id),
                    full_name TEXT NOT NULL,
                    email TEXT,
                    cpf TEXT,
                    phone TEXT,
                    city TEXT,
                    state TEXT,
                    terms_accepted INTEGER NOT NULL,
                    terms_accepted_at INTEGER NOT NULL,
                    utm_source TEXT,
                    utm_medium TEXT,
                    utm_campaign TEXT,
                    protocol TEXT NOT NULL,
                    verified INTEGER NOT NULL,
                    created_date INTEGER NOT NULL,
                    ip_address TEXT,
                    user_agent TEXT
                );
                CREATE UNIQUE INDEX IF NOT EXISTS idx_signatures_petition_email
                    ON signatures (petition_id, email);
                CREATE INDEX IF NOT EXISTS idx_signatures_petition_created
                    ON signatures (petition_id, created_date);",
            )
            .map_err(|err| db_err(&err))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| db_err(&err))?;
    Ok(())
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Maps a petition row in [`PETITION_COLUMNS`] order.
fn petition_from_row(row: &Row<'_>) -> rusqlite::Result<Petition> {
    let deadline: Option<String> = row.get(7)?;
    Ok(Petition {
        id: PetitionId::new(row.get::<_, String>(0)?),
        title: row.get(1)?,
        slug: row.get(2)?,
        summary: row.get(3)?,
        description: row.get(4)?,
        image_url: row.get(5)?,
        goal: row.get(6)?,
        deadline: deadline.as_deref().and_then(parse_day),
        status: row.get(8)?,
        require_cpf: row.get(9)?,
        require_phone: row.get(10)?,
        primary_color: row.get(11)?,
        terms_text: row.get(12)?,
        created_date: Timestamp::from_unix_millis(row.get(13)?),
        updated_date: Timestamp::from_unix_millis(row.get(14)?),
    })
}

/// Maps a signature row in [`SIGNATURE_COLUMNS`] order.
fn signature_from_row(row: &Row<'_>) -> rusqlite::Result<SignatureRecord> {
    Ok(SignatureRecord {
        id: SignatureId::new(row.get::<_, String>(0)?),
        petition_id: PetitionId::new(row.get::<_, String>(1)?),
        full_name: row.get(2)?,
        email: row.get(3)?,
        cpf: row.get(4)?,
        phone: row.get(5)?,
        city: row.get(6)?,
        state: row.get(7)?,
        terms_accepted: row.get(8)?,
        terms_accepted_at: Timestamp::from_unix_millis(row.get(9)?),
        utm_source: row.get(10)?,
        utm_medium: row.get(11)?,
        utm_campaign: row.get(12)?,
        protocol: Protocol::new(row.get::<_, String>(13)?),
        verified: row.get(14)?,
        created_date: Timestamp::from_unix_millis(row.get(15)?),
        ip_address: row.get(16)?,
        user_agent: row.get(17)?,
    })
}

/// Returns the fixed ORDER BY clause for a petition ordering.
const fn order_clause(order: PetitionOrder) -> &'static str {
    match order {
        PetitionOrder::CreatedDateAsc => "created_date ASC",
        PetitionOrder::CreatedDateDesc => "created_date DESC",
        PetitionOrder::IdAsc => "id ASC",
        PetitionOrder::IdDesc => "id DESC",
    }
}

/// Converts the optional window bounds into NULL-able millisecond binds.
const fn window_binds(window: &TimeWindow) -> (Option<i64>, Option<i64>) {
    let since = match window.since {
        Some(instant) => Some(instant.as_unix_millis()),
        None => None,
    };
    let until = match window.until {
        Some(instant) => Some(instant.as_unix_millis()),
        None => None,
    };
    (since, until)
}

// ============================================================================
// SECTION: Store Trait Implementation
// ============================================================================

impl PetitionStore for SqlitePetitionStore {
    fn resolve_petition(&self, key: &str) -> Result<Option<PetitionRef>, StoreError> {
        let connection = self.lock()?;
        let sql = "SELECT id, require_cpf, require_phone FROM petitions \
                   WHERE (?2 AND id = ?1) OR slug = ?1 LIMIT 1";
        connection
            .query_row(sql, params![key, is_uuid_shaped(key)], |row| {
                Ok(PetitionRef {
                    id: PetitionId::new(row.get::<_, String>(0)?),
                    require_cpf: row.get(1)?,
                    require_phone: row.get(2)?,
                })
            })
            .optional()
            .map_err(|err| db_err(&err).into())
    }

    fn get_petition(&self, key: &str) -> Result<Option<Petition>, StoreError> {
        let connection = self.lock()?;
        let sql = format!(
            "SELECT {PETITION_COLUMNS} FROM petitions \
             WHERE (?2 AND id = ?1) OR slug = ?1 LIMIT 1"
        );
        connection
            .query_row(&sql, params![key, is_uuid_shaped(key)], petition_from_row)
            .optional()
            .map_err(|err| db_err(&err).into())
    }

    fn list_petitions(&self, filter: &PetitionFilter) -> Result<Vec<Petition>, StoreError> {
        let connection = self.lock()?;
        let sql = format!(
            "SELECT {PETITION_COLUMNS} FROM petitions \
             WHERE (?1 IS NULL OR status = ?1) \
               AND (?2 IS NULL OR instr(lower(title), ?2) > 0 OR instr(lower(slug), ?2) > 0) \
             ORDER BY {} LIMIT ?3 OFFSET ?4",
            order_clause(filter.order)
        );
        let needle = filter.q.as_ref().map(|q| q.to_lowercase());
        let mut statement = connection.prepare(&sql).map_err(|err| db_err(&err))?;
        let rows = statement
            .query_map(params![filter.status, needle, filter.limit, filter.offset], |row| {
                petition_from_row(row)
            })
            .map_err(|err| db_err(&err))?;
        let mut petitions = Vec::new();
        for row in rows {
            petitions.push(row.map_err(|err| db_err(&err))?);
        }
        Ok(petitions)
    }

    fn upsert_petition(
        &self,
        input: &PetitionInput,
        candidate_id: &PetitionId,
        now: Timestamp,
    ) -> Result<Petition, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(|err| db_err(&err))?;
        let sql = format!(
            "INSERT INTO petitions ({PETITION_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15) \
             ON CONFLICT(slug) DO UPDATE SET \
                 title = excluded.title, \
                 summary = excluded.summary, \
                 description = excluded.description, \
                 image_url = excluded.image_url, \
                 goal = excluded.goal, \
                 deadline = excluded.deadline, \
                 status = excluded.status, \
                 require_cpf = excluded.require_cpf, \
                 require_phone = excluded.require_phone, \
                 primary_color = excluded.primary_color, \
                 terms_text = excluded.terms_text, \
                 updated_date = excluded.updated_date"
        );
        tx.execute(
            &sql,
            params![
                candidate_id.as_str(),
                input.title,
                input.slug,
                input.summary,
                input.description,
                input.image_url,
                input.goal,
                input.deadline.map(format_day),
                input.status,
                input.require_cpf,
                input.require_phone,
                input.primary_color,
                input.terms_text,
                now.as_unix_millis(),
                now.as_unix_millis(),
            ],
        )
        .map_err(|err| db_err(&err))?;
        let select = format!("SELECT {PETITION_COLUMNS} FROM petitions WHERE slug = ?1");
        let petition = tx
            .query_row(&select, params![input.slug], petition_from_row)
            .optional()
            .map_err(|err| db_err(&err))?
            .ok_or_else(|| {
                SqliteStoreError::Invalid("upserted petition row is missing".to_string())
            })?;
        tx.commit().map_err(|err| db_err(&err))?;
        Ok(petition)
    }

    fn update_petition(
        &self,
        id: &PetitionId,
        input: &PetitionInput,
        now: Timestamp,
    ) -> Result<Option<Petition>, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(|err| db_err(&err))?;
        let changed = tx
            .execute(
                "UPDATE petitions SET \
                     title = ?2, slug = ?3, summary = ?4, description = ?5, image_url = ?6, \
                     goal = ?7, deadline = ?8, status = ?9, require_cpf = ?10, \
                     require_phone = ?11, primary_color = ?12, terms_text = ?13, \
                     updated_date = ?14 \
                 WHERE id = ?1",
                params![
                    id.as_str(),
                    input.title,
                    input.slug,
                    input.summary,
                    input.description,
                    input.image_url,
                    input.goal,
                    input.deadline.map(format_day),
                    input.status,
                    input.require_cpf,
                    input.require_phone,
                    input.primary_color,
                    input.terms_text,
                    now.as_unix_millis(),
                ],
            )
            .map_err(|err| db_err(&err))?;
        if changed == 0 {
            tx.commit().map_err(|err| db_err(&err))?;
            return Ok(None);
        }
        let select = format!("SELECT {PETITION_COLUMNS} FROM petitions WHERE id = ?1");
        let petition = tx
            .query_row(&select, params![id.as_str()], petition_from_row)
            .optional()
            .map_err(|err| db_err(&err))?;
        tx.commit().map_err(|err| db_err(&err))?;
        Ok(petition)
    }

    fn insert_signature(&self, record: &SignatureRecord) -> Result<SignatureInsert, StoreError> {
        let mut connection = self.lock()?;
        let tx = connection.transaction().map_err(|err| db_err(&err))?;
        let sql = format!(
            "INSERT INTO signatures ({SIGNATURE_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, \
                     ?17, ?18) \
             ON CONFLICT(petition_id, email) DO NOTHING"
        );
        let inserted = tx
            .execute(
                &sql,
                params![
                    record.id.as_str(),
                    record.petition_id.as_str(),
                    record.full_name,
                    record.email,
                    record.cpf,
                    record.phone,
                    record.city,
                    record.state,
                    record.terms_accepted,
                    record.terms_accepted_at.as_unix_millis(),
                    record.utm_source,
                    record.utm_medium,
                    record.utm_campaign,
                    record.protocol.as_str(),
                    record.verified,
                    record.created_date.as_unix_millis(),
                    record.ip_address,
                    record.user_agent,
                ],
            )
            .map_err(|err| db_err(&err))?;
        tx.commit().map_err(|err| db_err(&err))?;
        if inserted == 0 {
            return Ok(SignatureInsert::DuplicateEmail);
        }
        Ok(SignatureInsert::Inserted)
    }

    fn list_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SignatureRecord>, StoreError> {
        let connection = self.lock()?;
        let (since, until) = window_binds(window);
        let sql = format!(
            "SELECT {SIGNATURE_COLUMNS} FROM signatures \
             WHERE petition_id = ?1 \
               AND (?2 IS NULL OR created_date >= ?2) \
               AND (?3 IS NULL OR created_date < ?3) \
             ORDER BY created_date DESC, id DESC LIMIT ?4 OFFSET ?5"
        );
        let mut statement = connection.prepare(&sql).map_err(|err| db_err(&err))?;
        let rows = statement
            .query_map(params![petition_id.as_str(), since, until, limit, offset], |row| {
                signature_from_row(row)
            })
            .map_err(|err| db_err(&err))?;
        let mut signatures = Vec::new();
        for row in rows {
            signatures.push(row.map_err(|err| db_err(&err))?);
        }
        Ok(signatures)
    }

    fn count_signatures(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<u64, StoreError> {
        let connection = self.lock()?;
        let (since, until) = window_binds(window);
        let count: i64 = connection
            .query_row(
                "SELECT COUNT(1) FROM signatures \
                 WHERE petition_id = ?1 \
                   AND (?2 IS NULL OR created_date >= ?2) \
                   AND (?3 IS NULL OR created_date < ?3)",
                params![petition_id.as_str(), since, until],
                |row| row.get(0),
            )
            .map_err(|err| db_err(&err))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }

    fn signature_times(
        &self,
        petition_id: &PetitionId,
        window: &TimeWindow,
    ) -> Result<Vec<Timestamp>, StoreError> {
        let connection = self.lock()?;
        let (since, until) = window_binds(window);
        let mut statement = connection
            .prepare(
                "SELECT created_date FROM signatures \
                 WHERE petition_id = ?1 \
                   AND (?2 IS NULL OR created_date >= ?2) \
                   AND (?3 IS NULL OR created_date < ?3) \
                 ORDER BY created_date ASC",
            )
            .map_err(|err| db_err(&err))?;
        let rows = statement
            .query_map(params![petition_id.as_str(), since, until], |row| {
                row.get::<_, i64>(0).map(Timestamp::from_unix_millis)
            })
            .map_err(|err| db_err(&err))?;
        let mut instants = Vec::new();
        for row in rows {
            instants.push(row.map_err(|err| db_err(&err))?);
        }
        Ok(instants)
    }
}
