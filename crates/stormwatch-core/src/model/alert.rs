// ── Alert results ──

use serde::{Deserialize, Serialize};

/// The six rule kinds a subscriber can opt into, in evaluation order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RuleKind {
    Rain,
    #[strum(to_string = "temp_below_10", serialize = "cold")]
    #[serde(rename = "temp_below_10")]
    TempBelow10,
    #[strum(to_string = "temp_above_30", serialize = "hot")]
    #[serde(rename = "temp_above_30")]
    TempAbove30,
    #[strum(to_string = "humidity_above_80", serialize = "humid")]
    #[serde(rename = "humidity_above_80")]
    HumidityAbove80,
    #[strum(to_string = "poor_air_quality", serialize = "aqi")]
    PoorAirQuality,
    #[strum(to_string = "severe_weather", serialize = "severe")]
    SevereWeather,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::Rain,
        RuleKind::TempBelow10,
        RuleKind::TempAbove30,
        RuleKind::HumidityAbove80,
        RuleKind::PoorAirQuality,
        RuleKind::SevereWeather,
    ];
}

/// One rule that fired, with its rendered message line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TriggeredRule {
    pub kind: RuleKind,
    pub message: String,
}

/// Outcome of evaluating one subscriber's rules against one observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertResult {
    pub city: String,
    /// Fired rules in evaluation order.
    pub triggered: Vec<TriggeredRule>,
    pub any_triggered: bool,
}

impl AlertResult {
    pub(crate) fn new(city: &str, triggered: Vec<TriggeredRule>) -> Self {
        Self {
            city: city.to_owned(),
            any_triggered: !triggered.is_empty(),
            triggered,
        }
    }

    pub fn subject(&self) -> String {
        format!("Weather Alert for {}", self.city)
    }

    /// Header line followed by one fragment per fired rule.
    pub fn message(&self) -> String {
        let mut text = format!("Weather Alert for {}:\n", self.city);
        for rule in &self.triggered {
            text.push_str(&rule.message);
            text.push('\n');
        }
        text
    }

    pub fn kinds(&self) -> Vec<RuleKind> {
        self.triggered.iter().map(|rule| rule.kind).collect()
    }
}
