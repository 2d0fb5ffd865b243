// crates/peticoes-api/src/config.rs
// ============================================================================
// Module: API Configuration
// Description: TOML configuration with fail-closed validation.
// Purpose: Resolve, bound, and validate the server runtime configuration.
// Dependencies: peticoes-store-sqlite, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Configuration is a TOML file resolved from `PETICOES_CONFIG` or the
//! default path. Reads are size-capped before parsing and every limit is
//! validated up front; a config that fails any check never produces a running
//! server.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::path::PathBuf;

use peticoes_store_sqlite::SqliteStoreConfig;
use peticoes_store_sqlite::SqliteStoreMode;
use peticoes_store_sqlite::SqliteSyncMode;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Environment variable overriding the config path.
pub const CONFIG_ENV: &str = "PETICOES_CONFIG";
/// Default config path when no override is present.
const DEFAULT_CONFIG_PATH: &str = "peticoes.toml";
/// Hard cap on config file size.
const MAX_CONFIG_BYTES: u64 = 1024 * 1024;
/// Default maximum request body size.
const DEFAULT_MAX_BODY_BYTES: usize = 256 * 1024;
/// Upper bound for the configurable request body size.
const MAX_BODY_BYTES_LIMIT: usize = 16 * 1024 * 1024;
/// Default maximum upload size.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 8 * 1024 * 1024;
/// Upper bound for the configurable upload size.
const MAX_UPLOAD_BYTES_LIMIT: usize = 64 * 1024 * 1024;
/// Default busy timeout for the database connection (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default public URL prefix for uploaded files.
const DEFAULT_URL_PREFIX: &str = "/peticoes/uploads";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading and validation failures.
#[derive(Debug, Error, Clone)]
pub enum ConfigError {
    /// Config file I/O failure.
    #[error("config io error: {0}")]
    Io(String),
    /// Config file exceeds the size cap.
    #[error("config file too large: {size} bytes (max {max})")]
    TooLarge {
        /// Actual file size in bytes.
        size: u64,
        /// Allowed limit in bytes.
        max: u64,
    },
    /// Config file failed TOML parsing.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Config value failed validation.
    #[error("config invalid: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Sections
// ============================================================================

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to bind.
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// `[database]` section; mirrors the store's own knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
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

impl DatabaseConfig {
    /// Returns the store configuration for this section.
    #[must_use]
    pub fn store_config(&self) -> SqliteStoreConfig {
        SqliteStoreConfig {
            path: self.path.clone(),
            busy_timeout_ms: self.busy_timeout_ms,
            journal_mode: self.journal_mode,
            sync_mode: self.sync_mode,
        }
    }
}

/// `[uploads]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadsConfig {
    /// Directory receiving uploaded files.
    pub dir: PathBuf,
    /// Public URL prefix mapped onto `dir`.
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Top-level API configuration.
///
/// # Invariants
/// - A loaded value has passed [`ApiConfig::validate`].
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// HTTP server section.
    pub server: ServerConfig,
    /// Database section.
    pub database: DatabaseConfig,
    /// Uploads section.
    pub uploads: UploadsConfig,
}

/// Returns the default maximum request body size.
const fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Returns the default busy timeout in milliseconds.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default public URL prefix for uploads.
fn default_url_prefix() -> String {
    DEFAULT_URL_PREFIX.to_string()
}

/// Returns the default maximum upload size.
const fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Resolves the config path from the environment or the default.
#[must_use]
pub fn resolve_config_path() -> PathBuf {
    std::env::var(CONFIG_ENV).map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

impl ApiConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized, fails to
    /// parse, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let size = fs::metadata(path).map_err(|err| ConfigError::Io(err.to_string()))?.len();
        if size > MAX_CONFIG_BYTES {
            return Err(ConfigError::TooLarge {
                size,
                max: MAX_CONFIG_BYTES,
            });
        }
        let content = fs::read_to_string(path).map_err(|err| ConfigError::Io(err.to_string()))?;
        let config: Self =
            toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every configured limit and address.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] on the first failed check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.bind.parse::<SocketAddr>().map_err(|_| {
            ConfigError::Invalid(format!("server.bind is not a socket address: {}", self.server.bind))
        })?;
        if self.server.max_body_bytes == 0 || self.server.max_body_bytes > MAX_BODY_BYTES_LIMIT {
            return Err(ConfigError::Invalid(format!(
                "server.max_body_bytes out of range: {} (max {MAX_BODY_BYTES_LIMIT})",
                self.server.max_body_bytes
            )));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database.path is empty".to_string()));
        }
        if self.uploads.dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("uploads.dir is empty".to_string()));
        }
        if self.uploads.max_upload_bytes == 0
            || self.uploads.max_upload_bytes > MAX_UPLOAD_BYTES_LIMIT
        {
            return Err(ConfigError::Invalid(format!(
                "uploads.max_upload_bytes out of range: {} (max {MAX_UPLOAD_BYTES_LIMIT})",
                self.uploads.max_upload_bytes
            )));
        }
        if !self.uploads.url_prefix.starts_with('/') {
            return Err(ConfigError::Invalid(format!(
                "uploads.url_prefix must start with '/': {}",
                self.uploads.url_prefix
            )));
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic_in_result_fn,
        clippy::unwrap_in_result,
        reason = "Test-only assertions and helpers are permitted."
    )]

    use super::ApiConfig;
    use super::ConfigError;

    fn parse(content: &str) -> Result<ApiConfig, ConfigError> {
        let config: ApiConfig =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_applies_defaults() {
        let config = parse(
            r#"
            [server]
            bind = "127.0.0.1:8080"

            [database]
            path = "peticoes.db"

            [uploads]
            dir = "uploads"
            "#,
        )
        .expect("valid config");
        assert_eq!(config.server.max_body_bytes, 256 * 1024);
        assert_eq!(config.uploads.url_prefix, "/peticoes/uploads");
        assert_eq!(config.uploads.max_upload_bytes, 8 * 1024 * 1024);
        assert_eq!(config.database.busy_timeout_ms, 5_000);
    }

    #[test]
    fn invalid_bind_is_rejected() {
        let result = parse(
            r#"
            [server]
            bind = "not-an-address"

            [database]
            path = "peticoes.db"

            [uploads]
            dir = "uploads"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn zero_body_limit_is_rejected() {
        let result = parse(
            r#"
            [server]
            bind = "127.0.0.1:8080"
            max_body_bytes = 0

            [database]
            path = "peticoes.db"

            [uploads]
            dir = "uploads"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn relative_url_prefix_is_rejected() {
        let result = parse(
            r#"
            [server]
            bind = "127.0.0.1:8080"

            [database]
            path = "peticoes.db"

            [uploads]
            dir = "uploads"
            url_prefix = "files"
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
