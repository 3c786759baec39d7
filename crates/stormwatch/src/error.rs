//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use stormwatch_config::ConfigError;
use stormwatch_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    /// Invalid configuration or input.
    pub const USAGE: i32 = 2;
    /// `check --strict` saw at least one subscriber failure.
    pub const CYCLE_FAILURES: i32 = 3;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("No credentials configured for {what}")]
    #[diagnostic(
        code(stormwatch::no_credentials),
        help(
            "Set the environment variable named by api_key_env (WEATHER_API_KEY / MAIL_API_KEY by default),\n\
             store the key in the system keyring (service 'stormwatch', account '{what}'),\n\
             or set api_key in the config file."
        )
    )]
    NoCredentials { what: String },

    #[error("Missing required setting '{field}'")]
    #[diagnostic(
        code(stormwatch::missing_setting),
        help("Add it to the config file or set the matching STORMWATCH_ variable.")
    )]
    MissingSetting { field: String },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(stormwatch::validation))]
    Validation { field: String, reason: String },

    #[error("Configuration could not be loaded")]
    #[diagnostic(
        code(stormwatch::config),
        help("Check the config file at {path}\nCreate a fresh one with: stormwatch config init")
    )]
    Config {
        path: String,
        #[source]
        source: Box<ConfigError>,
    },

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(stormwatch::config_exists),
        help("Pass --force to overwrite it.")
    )]
    ConfigExists { path: String },

    // ── Runtime ──────────────────────────────────────────────────────
    #[error("Weather provider request failed: {message}")]
    #[diagnostic(
        code(stormwatch::provider),
        help("Check the city name, the provider URLs and the weather API key.")
    )]
    Provider { message: String },

    #[error("Subscriber store error: {message}")]
    #[diagnostic(code(stormwatch::store))]
    Store { message: String },

    #[error("Invalid subscriber: {message}")]
    #[diagnostic(code(stormwatch::invalid_subscriber))]
    InvalidSubscriber { message: String },

    #[error("An alert cycle is already running")]
    #[diagnostic(code(stormwatch::cycle_in_progress))]
    CycleInProgress,

    #[error("{failed} subscriber(s) failed during the alert cycle")]
    #[diagnostic(
        code(stormwatch::cycle_failures),
        help("Run with -v to see the per-subscriber warnings.")
    )]
    CycleFailures { failed: usize },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(stormwatch::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(stormwatch::json))]
    Json(#[from] serde_json::Error),

    #[error("Failed to render YAML: {0}")]
    #[diagnostic(code(stormwatch::yaml))]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoCredentials { .. }
            | Self::MissingSetting { .. }
            | Self::Validation { .. }
            | Self::Config { .. }
            | Self::ConfigExists { .. }
            | Self::InvalidSubscriber { .. } => exit_code::USAGE,
            Self::CycleFailures { .. } => exit_code::CYCLE_FAILURES,
            _ => exit_code::GENERAL,
        }
    }

    /// Wrap a `ConfigError`, keeping the config path for the help text.
    pub fn from_config(err: ConfigError, path: &std::path::Path) -> Self {
        match err {
            ConfigError::NoCredentials { what } => Self::NoCredentials { what },
            ConfigError::MissingSetting { field } => Self::MissingSetting { field },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            other => Self::Config {
                path: path.display().to_string(),
                source: Box::new(other),
            },
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Provider { message, .. } => CliError::Provider { message },
            CoreError::Send { to, message } => CliError::Provider {
                message: format!("notification to {to} failed: {message}"),
            },
            CoreError::Configuration { message } => CliError::Validation {
                field: "config".into(),
                reason: message,
            },
            CoreError::Store { message } => CliError::Store { message },
            CoreError::Validation { message } => CliError::InvalidSubscriber { message },
            CoreError::CycleInProgress => CliError::CycleInProgress,
        }
    }
}
