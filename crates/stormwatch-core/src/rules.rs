// ── Rule evaluation ──
//
// Pure and total: no I/O, no errors. Every enabled rule is checked against
// the observation and fired rules are collected in `RuleKind::ALL` order.

use crate::model::{AlertResult, AqiLevel, ObservedConditions, RuleKind, Subscriber, TriggeredRule};

const COLD_THRESHOLD_CELSIUS: f64 = 10.0;
const HOT_THRESHOLD_CELSIUS: f64 = 30.0;
const HUMIDITY_THRESHOLD_PERCENT: f64 = 80.0;
/// Provider ordinal for "Poor"; anything at or above it alerts.
const POOR_AQI_ORDINAL: u32 = 4;

/// Evaluate `subscriber`'s enabled rules against `conditions`.
pub fn evaluate(subscriber: &Subscriber, conditions: &ObservedConditions) -> AlertResult {
    let triggered = RuleKind::ALL
        .into_iter()
        .filter(|kind| subscriber.preferences.is_enabled(*kind))
        .filter_map(|kind| {
            fired_message(kind, conditions).map(|message| TriggeredRule { kind, message })
        })
        .collect();

    AlertResult::new(&subscriber.city, triggered)
}

/// Message fragment for `kind` if its condition holds.
fn fired_message(kind: RuleKind, conditions: &ObservedConditions) -> Option<String> {
    match kind {
        RuleKind::Rain => conditions
            .is_raining
            .then(|| "It's currently raining or drizzling.".to_owned()),
        RuleKind::TempBelow10 => (conditions.temperature_celsius < COLD_THRESHOLD_CELSIUS)
            .then(|| "Temperature is below 10°C.".to_owned()),
        RuleKind::TempAbove30 => (conditions.temperature_celsius > HOT_THRESHOLD_CELSIUS)
            .then(|| "Temperature is above 30°C.".to_owned()),
        RuleKind::HumidityAbove80 => (conditions.humidity_percent > HUMIDITY_THRESHOLD_PERCENT)
            .then(|| "Humidity is above 80%.".to_owned()),
        RuleKind::PoorAirQuality => (conditions.air_quality_index >= POOR_AQI_ORDINAL)
            .then(|| aqi_message(conditions)),
        // Recognised and stored, never evaluated.
        RuleKind::SevereWeather => None,
    }
}

fn aqi_message(conditions: &ObservedConditions) -> String {
    let aqi = conditions.air_quality_index;
    match conditions.aqi_level() {
        AqiLevel::Unknown => {
            format!("Air Quality Index (AQI) is Poor or worse (Current AQI: {aqi}).")
        }
        level => format!("Air Quality Index (AQI) is Poor or worse (Current AQI: {aqi}, {level})."),
    }
}
