// stormwatch-api: Async Rust clients for the weather, air-quality and mail relay APIs

pub mod error;
pub mod mail;
pub mod openweather;
pub mod transport;

pub use error::Error;
pub use mail::{MailClient, OutgoingEmail};
pub use openweather::OpenWeatherClient;
pub use openweather::models::{AirPollutionResponse, CurrentWeatherResponse};
pub use transport::{TlsMode, TransportConfig};
