// ── Core error types ──
//
// Failures of the environment around a scan, not scan results. A scan
// that ran but reported a non-zero status is a `ScanReport` with an
// `err_code`, never a `CoreError`.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Process errors ───────────────────────────────────────────────
    #[error("Failed to run `{program}`: {reason}")]
    Spawn { program: String, reason: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
