use thiserror::Error;

/// Top-level error type for the `stormwatch-api` crate.
///
/// Covers every failure mode of the provider and relay clients:
/// transport, HTTP status, and response decoding.
/// `stormwatch-core` folds these into per-subscriber failures.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Building the underlying HTTP client failed (bad CA file, TLS backend).
    #[error("HTTP client error: {0}")]
    Client(String),

    // ── Response ────────────────────────────────────────────────────
    /// The remote answered with a non-success status.
    #[error("HTTP {status} from {url}: {body}")]
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    /// The body decoded but an element the caller depends on is absent
    /// (e.g. an empty `weather` array).
    #[error("Response is missing required field `{0}`")]
    MissingField(&'static str),
}

impl Error {
    /// Returns `true` if this is a transient error worth retrying on a
    /// later cycle.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if the remote answered 404 (OpenWeather uses it for
    /// unknown city names).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Http { status: 404, .. })
    }

    /// HTTP status code, if the failure carried one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}
