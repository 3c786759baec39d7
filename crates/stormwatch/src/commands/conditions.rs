//! `stormwatch conditions <CITY>`: what the engine would see right now.

use stormwatch_core::{ConditionFetcher, ObservedConditions, build_fetcher};

use crate::cli::{ConditionsArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

fn detail(c: &ObservedConditions) -> String {
    output::detail_block(&[
        ("Condition", c.weather_category.clone()),
        ("Raining", if c.is_raining { "yes" } else { "no" }.into()),
        ("Temperature", format!("{:.1}°C", c.temperature_celsius)),
        ("Humidity", format!("{:.0}%", c.humidity_percent)),
        ("Air quality", format!("{} ({})", c.air_quality_index, c.aqi_level())),
        ("Location", format!("{:.4}, {:.4}", c.latitude, c.longitude)),
    ])
}

pub async fn handle(args: ConditionsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load(global)?;
    let engine = config::engine_config(global, &cfg)?;
    let fetcher = build_fetcher(&engine)?;

    let observed = fetcher.fetch(&args.city).await?;

    let out = output::render_single(global.output, &observed, detail, |c| {
        c.weather_category.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
