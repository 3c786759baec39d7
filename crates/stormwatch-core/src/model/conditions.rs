// ── Observed conditions ──

use serde::{Deserialize, Serialize};

/// Current conditions for one city, normalised from the weather and
/// air-quality provider responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObservedConditions {
    pub temperature_celsius: f64,
    /// Relative humidity, 0–100 (trusted as reported).
    pub humidity_percent: f64,
    pub is_raining: bool,
    /// Provider's category text for the primary condition ("Rain", "Clear", ...).
    pub weather_category: String,
    /// Provider AQI ordinal, 1 = Good … 5 = Very Poor.
    pub air_quality_index: u32,
    pub latitude: f64,
    pub longitude: f64,
}

impl ObservedConditions {
    pub fn aqi_level(&self) -> AqiLevel {
        AqiLevel::from(self.air_quality_index)
    }
}

/// Case-insensitive "rain" test over a weather category text.
pub fn is_rain_category(category: &str) -> bool {
    category.to_lowercase().contains("rain")
}

/// Named bands of the provider's 1–5 AQI scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    #[strum(to_string = "Very Poor")]
    VeryPoor,
    Unknown,
}

impl From<u32> for AqiLevel {
    fn from(ordinal: u32) -> Self {
        match ordinal {
            1 => Self::Good,
            2 => Self::Fair,
            3 => Self::Moderate,
            4 => Self::Poor,
            5 => Self::VeryPoor,
            _ => Self::Unknown,
        }
    }
}
