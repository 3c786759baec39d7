// Current-weather endpoint
//
// `GET {weather_url}/weather?q={city}&units={units}&appid={key}`

use tracing::debug;

use crate::error::Error;
use crate::openweather::client::OpenWeatherClient;
use crate::openweather::models::CurrentWeatherResponse;

impl OpenWeatherClient {
    /// Current conditions for a city, looked up by name.
    ///
    /// OpenWeather answers 404 for city names it cannot resolve; that
    /// surfaces as [`Error::Http`].
    pub async fn current_weather(&self, city: &str) -> Result<CurrentWeatherResponse, Error> {
        let url = self.weather_endpoint("weather");
        debug!(city, "fetching current weather");
        self.get(url, &[("q", city), ("units", self.units())]).await
    }
}
