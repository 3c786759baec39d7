//! Configuration for the stormwatch daemon.
//!
//! TOML file + environment layering, credential resolution (env var,
//! keyring, plaintext), and translation to `stormwatch_core::EngineConfig`.
//! The core crate never reads configuration itself.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use stormwatch_core::{
    Cadence, CycleOptions, DEFAULT_OPENWEATHER_URL, EngineConfig, NotifierSettings, ProviderSettings,
    TlsVerification,
};

/// Keyring service name for stored secrets.
pub const KEYRING_SERVICE: &str = "stormwatch";

const REDACTED: &str = "********";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("missing required setting '{field}'")]
    MissingSetting { field: String },

    #[error("no credentials configured for {what}")]
    NoCredentials { what: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub engine: EngineSection,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Weather and air-quality providers.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default = "default_provider_url")]
    pub weather_url: String,

    #[serde(default = "default_provider_url")]
    pub air_quality_url: String,

    /// API key (plaintext; prefer keyring or env var).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Environment variable name containing the API key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_units")]
    pub units: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Path to a custom CA certificate (PEM).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            weather_url: default_provider_url(),
            air_quality_url: default_provider_url(),
            api_key: None,
            api_key_env: Some("WEATHER_API_KEY".into()),
            units: default_units(),
            timeout: default_timeout(),
            ca_cert: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MailMode {
    /// Send through the HTTP mail relay; needs `from` and an API key.
    #[default]
    Relay,
    /// Dry run: log notifications instead of sending them.
    Log,
}

/// Notification delivery.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MailConfig {
    #[serde(default)]
    pub mode: MailMode,

    #[serde(default = "default_mail_url")]
    pub api_url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Sender address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            mode: MailMode::Relay,
            api_url: default_mail_url(),
            api_key: None,
            api_key_env: Some("MAIL_API_KEY".into()),
            from: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CadenceKind {
    #[default]
    Hourly,
    Every,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub cadence: CadenceKind,

    /// Period for `cadence = "every"`.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,

    #[serde(default)]
    pub run_on_start: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cadence: CadenceKind::Hourly,
            interval_secs: default_interval(),
            run_on_start: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineSection {
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub share_city_conditions: bool,
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            share_city_conditions: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Subscriber JSON file; defaults to the platform data directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

fn default_provider_url() -> String {
    DEFAULT_OPENWEATHER_URL.into()
}
fn default_units() -> String {
    "metric".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_mail_url() -> String {
    "https://api.resend.com".into()
}
fn default_interval() -> u64 {
    3600
}
fn default_concurrency() -> usize {
    1
}

impl Config {
    /// Copy with every plaintext secret masked, for display.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.providers.api_key.is_some() {
            copy.providers.api_key = Some(REDACTED.into());
        }
        if copy.mail.api_key.is_some() {
            copy.mail.api_key = Some(REDACTED.into());
        }
        copy
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "stormwatch", "stormwatch")
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("stormwatch");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Default location of the subscriber file.
pub fn default_store_path() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback().join("subscribers.json"),
        |dirs| dirs.data_dir().join("subscribers.json"),
    )
}

/// The subscriber file this config points at.
pub fn store_path(cfg: &Config) -> PathBuf {
    cfg.store.path.clone().unwrap_or_else(default_store_path)
}

// ── Loading and saving ──────────────────────────────────────────────

/// Layered sources: defaults, then the TOML file (if present), then
/// `STORMWATCH_`-prefixed environment variables with `__` as the section
/// separator (`STORMWATCH_ENGINE__CONCURRENCY=4`).
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("STORMWATCH_").split("__"))
}

/// Load the full config from `path` (or the default path) plus environment.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);
    let config: Config = figment(&path).extract()?;
    Ok(config)
}

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, to_toml(cfg)?)?;
    Ok(())
}

pub fn to_toml(cfg: &Config) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(cfg)?)
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve a secret: named env var, then the system keyring entry
/// `stormwatch/{account}`, then the plaintext value.
pub fn resolve_secret(
    env_name: Option<&str>,
    account: &str,
    plaintext: Option<&str>,
) -> Result<SecretString, ConfigError> {
    // 1. Env var
    if let Some(name) = env_name {
        if let Ok(val) = std::env::var(name) {
            if !val.trim().is_empty() {
                return Ok(SecretString::from(val));
            }
        }
    }

    // 2. System keyring
    if let Ok(entry) = keyring::Entry::new(KEYRING_SERVICE, account) {
        if let Ok(secret) = entry.get_password() {
            return Ok(SecretString::from(secret));
        }
    }

    // 3. Plaintext in config
    if let Some(key) = plaintext.filter(|k| !k.trim().is_empty()) {
        return Ok(SecretString::from(key.to_owned()));
    }

    Err(ConfigError::NoCredentials {
        what: account.into(),
    })
}

pub fn resolve_weather_key(cfg: &Config) -> Result<SecretString, ConfigError> {
    resolve_secret(
        cfg.providers.api_key_env.as_deref(),
        "providers/api-key",
        cfg.providers.api_key.as_deref(),
    )
}

pub fn resolve_mail_key(cfg: &Config) -> Result<SecretString, ConfigError> {
    resolve_secret(
        cfg.mail.api_key_env.as_deref(),
        "mail/api-key",
        cfg.mail.api_key.as_deref(),
    )
}

// ── Translation to EngineConfig ─────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

fn notifier_settings(cfg: &Config) -> Result<NotifierSettings, ConfigError> {
    match cfg.mail.mode {
        MailMode::Log => Ok(NotifierSettings::Log),
        MailMode::Relay => {
            let from = cfg
                .mail
                .from
                .clone()
                .filter(|f| !f.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingSetting {
                    field: "mail.from".into(),
                })?;
            Ok(NotifierSettings::Relay {
                api_url: parse_url("mail.api_url", &cfg.mail.api_url)?,
                api_key: resolve_mail_key(cfg)?,
                from,
            })
        }
    }
}

fn cadence(schedule: &ScheduleConfig) -> Result<Cadence, ConfigError> {
    match schedule.cadence {
        CadenceKind::Hourly => Ok(Cadence::Hourly),
        CadenceKind::Every if schedule.interval_secs == 0 => Err(ConfigError::Validation {
            field: "schedule.interval_secs".into(),
            reason: "must be greater than zero".into(),
        }),
        CadenceKind::Every => Ok(Cadence::Every(Duration::from_secs(schedule.interval_secs))),
    }
}

/// Build the engine's runtime config, resolving every credential.
pub fn to_engine_config(cfg: &Config) -> Result<EngineConfig, ConfigError> {
    let providers = ProviderSettings {
        weather_url: parse_url("providers.weather_url", &cfg.providers.weather_url)?,
        air_quality_url: parse_url("providers.air_quality_url", &cfg.providers.air_quality_url)?,
        api_key: resolve_weather_key(cfg)?,
        units: cfg.providers.units.clone(),
    };

    let tls = cfg
        .providers
        .ca_cert
        .clone()
        .map_or(TlsVerification::SystemDefaults, TlsVerification::CustomCa);

    let engine = EngineConfig {
        providers,
        notifier: notifier_settings(cfg)?,
        tls,
        timeout: Duration::from_secs(cfg.providers.timeout),
        cadence: cadence(&cfg.schedule)?,
        run_on_start: cfg.schedule.run_on_start,
        cycle: CycleOptions {
            concurrency: cfg.engine.concurrency,
            share_city_conditions: cfg.engine.share_city_conditions,
        },
    };

    engine.validate().map_err(|e| ConfigError::Validation {
        field: "config".into(),
        reason: e.to_string(),
    })?;
    Ok(engine)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.providers.weather_url, DEFAULT_OPENWEATHER_URL);
        assert_eq!(cfg.providers.api_key_env.as_deref(), Some("WEATHER_API_KEY"));
        assert_eq!(cfg.mail.mode, MailMode::Relay);
        assert_eq!(cfg.schedule.cadence, CadenceKind::Hourly);
        assert_eq!(cfg.engine.concurrency, 1);
        assert!(!cfg.engine.share_city_conditions);
    }

    #[test]
    fn redacted_masks_plaintext_keys() {
        let mut cfg = Config::default();
        cfg.providers.api_key = Some("weather-secret".into());
        let shown = to_toml(&cfg.redacted()).expect("toml");
        assert!(!shown.contains("weather-secret"));
        assert!(shown.contains(REDACTED));
        assert!(!shown.contains("[mail]\napi_key"));
    }

    #[test]
    fn every_cadence_requires_positive_interval() {
        let schedule = ScheduleConfig {
            cadence: CadenceKind::Every,
            interval_secs: 0,
            run_on_start: false,
        };
        assert!(matches!(cadence(&schedule), Err(ConfigError::Validation { .. })));
    }
}
