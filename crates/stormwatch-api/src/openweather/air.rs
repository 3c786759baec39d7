// Air-pollution endpoint
//
// `GET {air_quality_url}/air_pollution?lat={lat}&lon={lon}&appid={key}`

use tracing::debug;

use crate::error::Error;
use crate::openweather::client::OpenWeatherClient;
use crate::openweather::models::AirPollutionResponse;

impl OpenWeatherClient {
    /// Current air pollution readings at a coordinate pair.
    pub async fn air_pollution(&self, lat: f64, lon: f64) -> Result<AirPollutionResponse, Error> {
        let url = self.air_quality_endpoint("air_pollution");
        let (lat, lon) = (lat.to_string(), lon.to_string());
        debug!(%lat, %lon, "fetching air pollution");
        self.get(url, &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await
    }
}
