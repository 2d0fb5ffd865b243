// crates/peticoes-api/src/audit.rs
// ============================================================================
// Module: Request Audit Sink
// Description: JSON-lines audit events for signature-write requests.
// Purpose: Record each signature creation attempt with its outcome.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every signature-write request emits one audit event regardless of outcome.
//! Events are serialized as single JSON lines on stderr; tests substitute
//! [`NoopAuditSink`]. The sink is a trait so deployments can redirect events
//! without touching handlers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Event
// ============================================================================

/// One signature-write request, with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct SignatureAuditEvent {
    /// Route label, for example `signatures.create`.
    pub route: &'static str,
    /// Outcome label: `created`, `conflict`, `rejected`, `not_found`, `error`.
    pub outcome: &'static str,
    /// Petition lookup key as supplied by the caller.
    pub petition_key: String,
    /// Server-assigned request identifier.
    pub request_id: String,
    /// Caller network address, when known.
    pub peer: Option<String>,
}

// ============================================================================
// SECTION: Sink
// ============================================================================

/// Destination for audit events.
pub trait RequestAuditSink: Send + Sync {
    /// Records one event.
    fn record(&self, event: &SignatureAuditEvent);
}

/// Audit sink writing JSON lines to stderr.
pub struct StderrAuditSink;

impl RequestAuditSink for StderrAuditSink {
    #[allow(clippy::print_stderr, reason = "Audit events are emitted as JSON lines on stderr.")]
    fn record(&self, event: &SignatureAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            eprintln!("{payload}");
        }
    }
}

/// No-op audit sink for tests.
#[cfg(test)]
pub struct NoopAuditSink;

#[cfg(test)]
impl RequestAuditSink for NoopAuditSink {
    fn record(&self, _event: &SignatureAuditEvent) {}
}
