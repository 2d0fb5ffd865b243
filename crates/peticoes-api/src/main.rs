// crates/peticoes-api/src/main.rs
// ============================================================================
// Module: Peticoes API Binary
// Description: Entry point wiring config, store, and the HTTP server.
// Purpose: Load configuration, open the store, and serve until shutdown.
// Dependencies: peticoes-store-sqlite, tokio
// ============================================================================

//! ## Overview
//! Binary entry point for the petition service. The config path comes from
//! `PETICOES_CONFIG` or `peticoes.toml`; any startup failure is reported on
//! stderr and exits non-zero before a listener is bound.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod audit;
mod config;
mod error;
mod petitions;
mod server;
mod signatures;
mod uploads;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::ExitCode;

use crate::config::ApiConfig;
use crate::server::ApiServer;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// Loads configuration and runs the server.
#[tokio::main(flavor = "multi_thread")]
async fn main() -> ExitCode {
    let path = config::resolve_config_path();
    let config = match ApiConfig::load(&path) {
        Ok(config) => config,
        Err(err) => {
            report_startup_failure(&format!("failed to load {}: {err}", path.display()));
            return ExitCode::FAILURE;
        }
    };
    let server = match ApiServer::from_config(&config) {
        Ok(server) => server,
        Err(err) => {
            report_startup_failure(&err.to_string());
            return ExitCode::FAILURE;
        }
    };
    match server.serve().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_startup_failure(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Reports a startup failure on stderr.
#[allow(clippy::print_stderr, reason = "Startup failures are reported before any sink exists.")]
fn report_startup_failure(message: &str) {
    eprintln!("peticoes-api: {message}");
}
