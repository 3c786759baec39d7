// OpenWeather API client modules
//
// Hand-written client for the two read-only endpoints the alert engine
// consumes: current weather by city name, and air pollution by coordinates.
// Both authenticate with an `appid` query parameter.

pub mod air;
pub mod client;
pub mod models;
pub mod weather;

pub use client::OpenWeatherClient;
