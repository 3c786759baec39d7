// OpenWeather response types
//
// Only the fields the alert engine reads are modelled, and those are
// required: a body missing `main.temp` or `coord.lat` fails to decode
// instead of yielding a zero. Everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ── Current weather ──────────────────────────────────────────────────

/// Body of `GET /weather?q={city}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeatherResponse {
    pub coord: Coordinates,
    pub weather: Vec<WeatherCondition>,
    pub main: MainReadings,
    /// Resolved city name as the provider knows it.
    #[serde(default)]
    pub name: Option<String>,
}

impl CurrentWeatherResponse {
    /// The first (primary) entry of the `weather` array.
    pub fn primary_condition(&self) -> Result<&WeatherCondition, Error> {
        self.weather.first().ok_or(Error::MissingField("weather[0]"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One entry of the `weather` array, e.g. `{"main": "Rain", "description": "light rain"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherCondition {
    /// Category group: "Rain", "Drizzle", "Clear", "Thunderstorm", ...
    pub main: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    /// Temperature in the requested unit system (Celsius for `metric`).
    pub temp: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub pressure: Option<f64>,
}

// ── Air pollution ────────────────────────────────────────────────────

/// Body of `GET /air_pollution?lat={lat}&lon={lon}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionResponse {
    #[serde(default)]
    pub coord: Option<Coordinates>,
    pub list: Vec<AirPollutionEntry>,
}

impl AirPollutionResponse {
    /// AQI ordinal (1 = Good … 5 = Very Poor) of the first list entry.
    pub fn current_aqi(&self) -> Result<u32, Error> {
        self.list
            .first()
            .map(|entry| entry.main.aqi)
            .ok_or(Error::MissingField("list[0]"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AirPollutionEntry {
    pub main: AqiReading,
    /// Unix timestamp of the reading.
    #[serde(default)]
    pub dt: Option<i64>,
    /// Pollutant concentrations (μg/m³), passed through untyped.
    #[serde(default)]
    pub components: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AqiReading {
    pub aqi: u32,
}
