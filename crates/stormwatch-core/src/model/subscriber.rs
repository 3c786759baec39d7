// ── Subscriber ──

use serde::{Deserialize, Serialize};

use super::alert::RuleKind;

/// A registered alert recipient: one notification address, one city,
/// and the rules they opted into.
///
/// Serialized with the same camelCase keys the subscription form uses
/// (`userEmail`, `alertRain`, ...), so store files stay interchangeable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscriber {
    /// Notification address; the subscriber's identity.
    #[serde(rename = "userEmail", default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(flatten)]
    pub preferences: AlertPreferences,
}

impl Subscriber {
    pub fn new(address: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            preferences: AlertPreferences::default(),
        }
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: AlertPreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Why this subscriber must be left out of a cycle, if at all.
    /// Whitespace-only values count as empty.
    pub fn skip_reason(&self) -> Option<SkipReason> {
        if self.address.trim().is_empty() {
            Some(SkipReason::MissingAddress)
        } else if self.city.trim().is_empty() {
            Some(SkipReason::MissingCity)
        } else {
            None
        }
    }
}

/// Why a subscriber was excluded from evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    #[strum(to_string = "missing address")]
    MissingAddress,
    #[strum(to_string = "missing city")]
    MissingCity,
}

/// One opt-in flag per rule kind. Unset flags are `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertPreferences {
    #[serde(rename = "alertRain")]
    pub rain: bool,
    #[serde(rename = "alertTempBelow10")]
    pub temp_below_10: bool,
    #[serde(rename = "alertTempAbove30")]
    pub temp_above_30: bool,
    #[serde(rename = "alertHumidityAbove80")]
    pub humidity_above_80: bool,
    #[serde(rename = "alertAqiAbove100")]
    pub poor_air_quality: bool,
    #[serde(rename = "alertSevereWeather")]
    pub severe_weather: bool,
}

impl AlertPreferences {
    /// Whether the subscriber opted into `kind`.
    pub fn is_enabled(&self, kind: RuleKind) -> bool {
        match kind {
            RuleKind::Rain => self.rain,
            RuleKind::TempBelow10 => self.temp_below_10,
            RuleKind::TempAbove30 => self.temp_above_30,
            RuleKind::HumidityAbove80 => self.humidity_above_80,
            RuleKind::PoorAirQuality => self.poor_air_quality,
            RuleKind::SevereWeather => self.severe_weather,
        }
    }

    /// Opt into (or out of) a single rule.
    pub fn set(&mut self, kind: RuleKind, enabled: bool) {
        let flag = match kind {
            RuleKind::Rain => &mut self.rain,
            RuleKind::TempBelow10 => &mut self.temp_below_10,
            RuleKind::TempAbove30 => &mut self.temp_above_30,
            RuleKind::HumidityAbove80 => &mut self.humidity_above_80,
            RuleKind::PoorAirQuality => &mut self.poor_air_quality,
            RuleKind::SevereWeather => &mut self.severe_weather,
        };
        *flag = enabled;
    }

    /// Enabled rule kinds, in evaluation order.
    pub fn enabled(&self) -> Vec<RuleKind> {
        RuleKind::ALL
            .into_iter()
            .filter(|kind| self.is_enabled(*kind))
            .collect()
    }
}
