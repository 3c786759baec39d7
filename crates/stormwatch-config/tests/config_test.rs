#![allow(clippy::unwrap_used)]
// Config layering and translation, isolated with `figment::Jail` so
// environment changes never leak between tests.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;
use secrecy::ExposeSecret;

use stormwatch_config::{
    CadenceKind, Config, ConfigError, MailMode, load_config, resolve_secret, save_config, store_path,
    to_engine_config,
};
use stormwatch_core::{Cadence, NotifierSettings, TlsVerification};

const FULL: &str = r#"
[providers]
weather_url = "http://weather.test/data/2.5"
air_quality_url = "http://air.test/data/2.5"
api_key_env = "SW_TEST_WEATHER_KEY"
timeout = 10

[mail]
mode = "relay"
api_url = "http://relay.test"
api_key_env = "SW_TEST_MAIL_KEY"
from = "alerts@stormwatch.test"

[schedule]
cadence = "every"
interval_secs = 120
run_on_start = true

[engine]
concurrency = 4
share_city_conditions = true

[store]
path = "/tmp/stormwatch/subscribers.json"
"#;

fn load(path: &str) -> Result<Config, String> {
    load_config(Some(Path::new(path))).map_err(|e| e.to_string())
}

#[test]
fn test_missing_file_yields_defaults() {
    Jail::expect_with(|_jail| {
        let cfg = load("absent.toml")?;
        assert_eq!(cfg.mail.mode, MailMode::Relay);
        assert_eq!(cfg.schedule.cadence, CadenceKind::Hourly);
        assert_eq!(cfg.providers.timeout, 30);
        Ok(())
    });
}

#[test]
fn test_file_values_are_read() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FULL)?;
        let cfg = load("config.toml")?;

        assert_eq!(cfg.providers.weather_url, "http://weather.test/data/2.5");
        assert_eq!(cfg.mail.mode, MailMode::Relay);
        assert_eq!(cfg.schedule.interval_secs, 120);
        assert_eq!(cfg.engine.concurrency, 4);
        assert_eq!(
            store_path(&cfg),
            Path::new("/tmp/stormwatch/subscribers.json")
        );
        Ok(())
    });
}

#[test]
fn test_environment_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FULL)?;
        jail.set_env("STORMWATCH_ENGINE__CONCURRENCY", "8");
        jail.set_env("STORMWATCH_MAIL__MODE", "log");

        let cfg = load("config.toml")?;
        assert_eq!(cfg.engine.concurrency, 8);
        assert_eq!(cfg.mail.mode, MailMode::Log);
        Ok(())
    });
}

#[test]
fn test_translates_to_engine_config() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FULL)?;
        jail.set_env("SW_TEST_WEATHER_KEY", "weather-secret");
        jail.set_env("SW_TEST_MAIL_KEY", "mail-secret");

        let cfg = load("config.toml")?;
        let engine = to_engine_config(&cfg).map_err(|e| e.to_string())?;

        assert_eq!(engine.providers.api_key.expose_secret(), "weather-secret");
        assert_eq!(engine.providers.air_quality_url.as_str(), "http://air.test/data/2.5");
        assert_eq!(engine.timeout, Duration::from_secs(10));
        assert_eq!(engine.cadence, Cadence::Every(Duration::from_secs(120)));
        assert!(engine.run_on_start);
        assert_eq!(engine.cycle.concurrency, 4);
        assert!(engine.cycle.share_city_conditions);
        assert_eq!(engine.tls, TlsVerification::SystemDefaults);
        match engine.notifier {
            NotifierSettings::Relay { api_key, from, .. } => {
                assert_eq!(api_key.expose_secret(), "mail-secret");
                assert_eq!(from, "alerts@stormwatch.test");
            }
            NotifierSettings::Log => panic!("expected relay notifier"),
        }
        Ok(())
    });
}

#[test]
fn test_plaintext_key_is_last_resort() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            api_key_env = "SW_TEST_UNSET_KEY"
            api_key = "from-file"

            [mail]
            mode = "log"
            "#,
        )?;
        let cfg = load("config.toml")?;
        let engine = to_engine_config(&cfg).map_err(|e| e.to_string())?;
        assert_eq!(engine.providers.api_key.expose_secret(), "from-file");
        assert!(matches!(engine.notifier, NotifierSettings::Log));

        jail.set_env("SW_TEST_UNSET_KEY", "from-env");
        let engine = to_engine_config(&cfg).map_err(|e| e.to_string())?;
        assert_eq!(engine.providers.api_key.expose_secret(), "from-env");
        Ok(())
    });
}

#[test]
fn test_missing_weather_key_is_no_credentials() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            api_key_env = "SW_TEST_UNSET_KEY"
            "#,
        )?;
        let cfg = load("config.toml")?;
        let err = to_engine_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
        Ok(())
    });
}

#[test]
fn test_relay_without_sender_is_missing_setting() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            api_key = "k"
            api_key_env = "SW_TEST_UNSET_KEY"

            [mail]
            mode = "relay"
            api_key = "m"
            api_key_env = "SW_TEST_UNSET_MAIL"
            "#,
        )?;
        let cfg = load("config.toml")?;
        let err = to_engine_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref field } if field == "mail.from"));
        Ok(())
    });
}

#[test]
fn test_absent_mail_section_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            api_key = "k"
            api_key_env = "SW_TEST_UNSET_KEY"
            "#,
        )?;
        let cfg = load("config.toml")?;
        assert_eq!(cfg.mail.mode, MailMode::Relay);

        let err = to_engine_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSetting { ref field } if field == "mail.from"));
        Ok(())
    });
}

#[test]
fn test_relay_without_mail_key_is_no_credentials() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            api_key = "k"
            api_key_env = "SW_TEST_UNSET_KEY"

            [mail]
            from = "alerts@stormwatch.test"
            api_key_env = "SW_TEST_UNSET_MAIL"
            "#,
        )?;
        let cfg = load("config.toml")?;
        let err = to_engine_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { ref what } if what == "mail/api-key"));
        Ok(())
    });
}

#[test]
fn test_invalid_url_is_validation_error() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            [providers]
            weather_url = "not a url"
            api_key = "k"
            api_key_env = "SW_TEST_UNSET_KEY"
            "#,
        )?;
        let cfg = load("config.toml")?;
        let err = to_engine_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("providers.weather_url"));
        Ok(())
    });
}

#[test]
fn test_resolve_secret_prefers_env() {
    Jail::expect_with(|jail| {
        jail.set_env("SW_TEST_SECRET", "env-value");
        let secret = resolve_secret(Some("SW_TEST_SECRET"), "test/none", Some("plain"))
            .map_err(|e| e.to_string())?;
        assert_eq!(secret.expose_secret(), "env-value");
        Ok(())
    });
}

#[test]
fn test_save_then_load_round_trips_sections() {
    Jail::expect_with(|_jail| {
        let path = Path::new("nested/config.toml");

        let mut cfg = Config::default();
        cfg.schedule.cadence = CadenceKind::Every;
        cfg.schedule.interval_secs = 300;
        cfg.mail.from = Some("alerts@stormwatch.test".into());
        save_config(&cfg, path).map_err(|e| e.to_string())?;

        let loaded = load("nested/config.toml")?;
        assert_eq!(loaded.schedule.cadence, CadenceKind::Every);
        assert_eq!(loaded.schedule.interval_secs, 300);
        assert_eq!(loaded.mail.from.as_deref(), Some("alerts@stormwatch.test"));
        Ok(())
    });
}
