// ── Engine wiring ──
//
// Turns an `EngineConfig` into concrete collaborators. Everything is
// constructed explicitly and handed to the runner; nothing is global.

use std::sync::Arc;

use stormwatch_api::{MailClient, OpenWeatherClient, TlsMode, TransportConfig};

use crate::config::{EngineConfig, NotifierSettings, TlsVerification};
use crate::cycle::AlertCycleRunner;
use crate::error::CoreError;
use crate::fetcher::OpenWeatherFetcher;
use crate::notify::Notifier;
use crate::scheduler::Scheduler;
use crate::store::SubscriberStore;

/// The runner type the binary drives.
pub type Engine<S> = AlertCycleRunner<S, OpenWeatherFetcher, Notifier>;

fn transport(config: &EngineConfig) -> TransportConfig {
    let tls = match &config.tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
    };
    TransportConfig {
        tls,
        timeout: config.timeout,
    }
}

// Client construction failures happen before any request, so they are
// configuration problems rather than provider failures.
fn setup_error(err: &stormwatch_api::Error) -> CoreError {
    CoreError::Configuration {
        message: err.to_string(),
    }
}

pub fn build_fetcher(config: &EngineConfig) -> Result<OpenWeatherFetcher, CoreError> {
    let providers = &config.providers;
    let client = OpenWeatherClient::new(
        providers.weather_url.as_str(),
        providers.air_quality_url.as_str(),
        providers.api_key.clone(),
        &transport(config),
    )
    .map_err(|e| setup_error(&e))?
    .with_units(providers.units.clone());
    Ok(OpenWeatherFetcher::new(client))
}

pub fn build_notifier(config: &EngineConfig) -> Result<Notifier, CoreError> {
    match &config.notifier {
        NotifierSettings::Log => Ok(Notifier::Log),
        NotifierSettings::Relay {
            api_url,
            api_key,
            from,
        } => MailClient::new(api_url.as_str(), api_key.clone(), from.clone(), &transport(config))
            .map(Notifier::Relay)
            .map_err(|e| setup_error(&e)),
    }
}

/// Validate `config` and assemble a runner over `store`.
pub fn build_runner<S: SubscriberStore>(config: &EngineConfig, store: S) -> Result<Engine<S>, CoreError> {
    config.validate()?;
    let runner = AlertCycleRunner::new(store, build_fetcher(config)?, build_notifier(config)?)
        .with_options(config.cycle);
    Ok(runner)
}

/// A scheduler over `runner` using the configured cadence.
pub fn build_scheduler<S: SubscriberStore + 'static>(
    config: &EngineConfig,
    runner: Arc<Engine<S>>,
) -> Scheduler<S, OpenWeatherFetcher, Notifier> {
    Scheduler::new(runner, config.cadence).run_on_start(config.run_on_start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use secrecy::SecretString;

    #[test]
    fn invalid_config_does_not_build() {
        let config = EngineConfig::new(SecretString::from(String::new()), NotifierSettings::Log)
            .expect("config");
        assert!(matches!(
            build_runner(&config, MemoryStore::new()),
            Err(CoreError::Configuration { .. })
        ));
    }

    #[test]
    fn missing_ca_file_is_configuration_error() {
        let mut config =
            EngineConfig::new(SecretString::from("key".to_string()), NotifierSettings::Log)
                .expect("config");
        config.tls = TlsVerification::CustomCa("/nonexistent/ca.pem".into());
        assert!(matches!(
            build_fetcher(&config),
            Err(CoreError::Configuration { .. })
        ));
    }

    #[test]
    fn log_notifier_when_requested() {
        let config = EngineConfig::new(SecretString::from("key".to_string()), NotifierSettings::Log)
            .expect("config");
        assert!(matches!(build_notifier(&config), Ok(Notifier::Log)));
    }
}
