// ── Core error types ──
//
// Errors raised by the alert engine. Provider and send failures are scoped
// to a single subscriber and never escape a cycle; configuration errors are
// fatal at startup. The `From<stormwatch_api::Error>` impl folds every
// transport-layer failure into a provider error.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Per-subscriber errors ────────────────────────────────────────
    /// Weather or air-quality provider failed: network, non-2xx status,
    /// or a missing/malformed field.
    #[error("Provider error: {message}")]
    Provider {
        message: String,
        /// HTTP status code (if the provider answered at all).
        status: Option<u16>,
    },

    /// Notification dispatch failed.
    #[error("Failed to notify {to}: {message}")]
    Send { to: String, message: String },

    // ── Startup errors ───────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Store errors ─────────────────────────────────────────────────
    #[error("Subscriber store error: {message}")]
    Store { message: String },

    #[error("Invalid subscriber: {message}")]
    Validation { message: String },

    // ── Scheduling ───────────────────────────────────────────────────
    #[error("An alert cycle is already running")]
    CycleInProgress,
}

impl CoreError {
    /// Returns `true` for failures scoped to a single subscriber.
    pub fn is_subscriber_scoped(&self) -> bool {
        matches!(self, Self::Provider { .. } | Self::Send { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<stormwatch_api::Error> for CoreError {
    fn from(err: stormwatch_api::Error) -> Self {
        let status = err.status();
        let message = match err {
            stormwatch_api::Error::Deserialization { message, body: _ } => {
                format!("malformed response: {message}")
            }
            other => other.to_string(),
        };
        CoreError::Provider { message, status }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Store {
            message: err.to_string(),
        }
    }
}
