// crates/errand-validation-core/src/audit.rs
// ============================================================================
// Module: Validation Audit Logging
// Description: Structured audit events for validation outcomes.
// Purpose: Emit redacted JSON-line audit logs without hard dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! One [`ValidationAuditEvent`] is recorded per validated object. Events
//! carry the request scope, the outcome, and the property paths that failed;
//! submitted values and violation messages are never logged. Sinks are
//! lightweight so deployments can route events to their preferred pipeline.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Validation outcome classification.
///
/// # Invariants
/// - Variants are stable for audit labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// No violations were reported.
    Valid,
    /// At least one violation was reported.
    Invalid,
    /// Validation aborted with an error.
    Error,
}

/// Validation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Namespace of the request when readable.
    pub namespace: Option<String>,
    /// Municipality of the request when readable.
    pub municipality_id: Option<String>,
    /// Name of the validated object.
    pub object: &'static str,
    /// Validation outcome.
    pub outcome: ValidationOutcome,
    /// Number of violations reported.
    pub violation_count: usize,
    /// Property paths that failed validation.
    pub fields: Vec<String>,
    /// Normalized error kind label when validation aborted.
    pub error_kind: Option<&'static str>,
}

/// Inputs required to construct a validation audit event.
pub struct ValidationAuditEventParams {
    /// Namespace of the request when readable.
    pub namespace: Option<String>,
    /// Municipality of the request when readable.
    pub municipality_id: Option<String>,
    /// Name of the validated object.
    pub object: &'static str,
    /// Validation outcome.
    pub outcome: ValidationOutcome,
    /// Property paths that failed validation.
    pub fields: Vec<String>,
    /// Normalized error kind label when validation aborted.
    pub error_kind: Option<&'static str>,
}

impl ValidationAuditEvent {
    /// Creates a new audit event with a consistent timestamp.
    #[must_use]
    pub fn new(params: ValidationAuditEventParams) -> Self {
        let timestamp_ms =
            SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Self {
            event: "errand_validation",
            timestamp_ms,
            namespace: params.namespace,
            municipality_id: params.municipality_id,
            object: params.object,
            outcome: params.outcome,
            violation_count: params.fields.len(),
            fields: params.fields,
            error_kind: params.error_kind,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for validation events.
pub trait ValidationAuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &ValidationAuditEvent);
}

/// Audit sink that discards events.
pub struct NoopValidationAuditSink;

impl ValidationAuditSink for NoopValidationAuditSink {
    fn record(&self, _event: &ValidationAuditEvent) {}
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrValidationAuditSink;

impl ValidationAuditSink for StderrValidationAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileValidationAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileValidationAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

impl ValidationAuditSink for FileValidationAuditSink {
    fn record(&self, event: &ValidationAuditEvent) {
        let Ok(payload) = serde_json::to_string(event) else {
            return;
        };
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{payload}");
        }
    }
}
