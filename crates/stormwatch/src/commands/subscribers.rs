//! Subscriber management against the configured subscriber file.

use serde::Serialize;
use tabled::Tabled;

use stormwatch_core::{
    AlertPreferences, FileStore, RuleKind, Subscriber, SubscriberStore, UpsertOutcome,
};

use crate::cli::{AddSubscriberArgs, GlobalOpts, SubscribersArgs, SubscribersCommand};
use crate::config;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct SubscriberRow {
    #[tabled(rename = "Address")]
    address: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Alerts")]
    alerts: String,
}

fn alerts_label(prefs: &AlertPreferences) -> String {
    let enabled = prefs.enabled();
    if enabled.is_empty() {
        return "-".into();
    }
    enabled
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<&Subscriber> for SubscriberRow {
    fn from(s: &Subscriber) -> Self {
        Self {
            address: s.address.clone(),
            city: s.city.clone(),
            alerts: alerts_label(&s.preferences),
        }
    }
}

#[derive(Serialize)]
struct Upserted {
    outcome: UpsertOutcome,
    subscriber: Subscriber,
}

fn preferences(args: &AddSubscriberArgs) -> AlertPreferences {
    let mut prefs = AlertPreferences::default();
    for (kind, on) in [
        (RuleKind::Rain, args.rain),
        (RuleKind::TempBelow10, args.cold),
        (RuleKind::TempAbove30, args.hot),
        (RuleKind::HumidityAbove80, args.humid),
        (RuleKind::PoorAirQuality, args.aqi),
        (RuleKind::SevereWeather, args.severe),
    ] {
        prefs.set(kind, on);
    }
    prefs
}

pub async fn handle(args: SubscribersArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let store = FileStore::new(config::store_path(global, &cfg));

    match args.command {
        SubscribersCommand::List => {
            let subscribers = store.list_all().await?;
            let out = output::render_list(
                global.output,
                &subscribers,
                |s| SubscriberRow::from(s),
                |s| s.address.clone(),
            )?;
            output::print_output(&out, global.quiet);
        }
        SubscribersCommand::Add(add) => {
            let subscriber = Subscriber::new(add.address.clone(), add.city.clone())
                .with_preferences(preferences(&add));
            let outcome = store.upsert(subscriber.clone()).await?;
            tracing::info!(address = %subscriber.address.trim(), %outcome, "subscriber saved");

            let result = Upserted { outcome, subscriber };
            let out = output::render_single(
                global.output,
                &result,
                |r| {
                    format!(
                        "{} {} ({}): {}",
                        r.outcome,
                        r.subscriber.address.trim(),
                        r.subscriber.city.trim(),
                        alerts_label(&r.subscriber.preferences)
                    )
                },
                |r| r.outcome.to_string(),
            )?;
            output::print_output(&out, global.quiet);
        }
    }
    Ok(())
}
