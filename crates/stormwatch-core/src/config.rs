// ── Runtime engine configuration ──
//
// These types describe how the engine talks to its providers and where it
// sends notifications. They carry credentials and tuning but never touch
// disk; the binary builds an `EngineConfig` and hands it in.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::cycle::CycleOptions;
use crate::error::CoreError;
use crate::scheduler::Cadence;

pub const DEFAULT_OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Weather and air-quality provider access.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    /// Root for `/weather`.
    pub weather_url: Url,
    /// Root for `/air_pollution`.
    pub air_quality_url: Url,
    pub api_key: SecretString,
    pub units: String,
}

/// Where notifications go. There is no default: a dry-run `Log` sender
/// must be asked for explicitly.
#[derive(Debug, Clone)]
pub enum NotifierSettings {
    /// Log instead of sending.
    Log,
    Relay {
        api_url: Url,
        api_key: SecretString,
        from: String,
    },
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Custom CA certificate file (PEM).
    CustomCa(PathBuf),
}

/// Everything needed to build a runner and scheduler.
///
/// Built by the binary, passed to [`crate::engine`]; core never reads
/// config files.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub providers: ProviderSettings,
    pub notifier: NotifierSettings,
    pub tls: TlsVerification,
    /// Per-request timeout for every outbound call.
    pub timeout: Duration,
    pub cadence: Cadence,
    pub run_on_start: bool,
    pub cycle: CycleOptions,
}

impl EngineConfig {
    /// Config with default endpoints and an hourly cadence.
    pub fn new(api_key: SecretString, notifier: NotifierSettings) -> Result<Self, CoreError> {
        let root = Url::parse(DEFAULT_OPENWEATHER_URL).map_err(|e| CoreError::Configuration {
            message: format!("invalid default provider URL: {e}"),
        })?;
        Ok(Self {
            providers: ProviderSettings {
                weather_url: root.clone(),
                air_quality_url: root,
                api_key,
                units: "metric".into(),
            },
            notifier,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            cadence: Cadence::Hourly,
            run_on_start: false,
            cycle: CycleOptions::default(),
        })
    }

    /// Reject configurations the engine cannot start with.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.providers.api_key.expose_secret().trim().is_empty() {
            return Err(config_error("weather provider API key is empty"));
        }
        if let NotifierSettings::Relay { api_key, from, .. } = &self.notifier {
            if api_key.expose_secret().trim().is_empty() {
                return Err(config_error("mail relay API key is empty"));
            }
            if from.trim().is_empty() {
                return Err(config_error("mail relay sender address is empty"));
            }
        }
        if self.timeout.is_zero() {
            return Err(config_error("request timeout must be greater than zero"));
        }
        if self.cadence == Cadence::Every(Duration::ZERO) {
            return Err(config_error("schedule interval must be greater than zero"));
        }
        if self.cycle.concurrency == 0 {
            return Err(config_error("engine concurrency must be at least 1"));
        }
        Ok(())
    }
}

fn config_error(message: &str) -> CoreError {
    CoreError::Configuration {
        message: message.to_owned(),
    }
}
