// ── Condition fetching ──
//
// Two provider calls per city: current weather by name, then air quality by
// the coordinates the first call returned. Both responses are decoded into
// typed structs and folded into one `ObservedConditions`.

use std::future::Future;

use stormwatch_api::OpenWeatherClient;
use tracing::debug;

use crate::error::CoreError;
use crate::model::ObservedConditions;
use crate::model::conditions::is_rain_category;

/// Source of current conditions for a city.
pub trait ConditionFetcher: Send + Sync {
    fn fetch<'a>(
        &'a self,
        city: &'a str,
    ) -> impl Future<Output = Result<ObservedConditions, CoreError>> + Send + 'a;
}

/// [`ConditionFetcher`] backed by OpenWeather-compatible endpoints.
#[derive(Debug, Clone)]
pub struct OpenWeatherFetcher {
    client: OpenWeatherClient,
}

impl OpenWeatherFetcher {
    pub fn new(client: OpenWeatherClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &OpenWeatherClient {
        &self.client
    }
}

impl ConditionFetcher for OpenWeatherFetcher {
    async fn fetch(&self, city: &str) -> Result<ObservedConditions, CoreError> {
        let weather = self.client.current_weather(city).await?;
        let category = weather.primary_condition()?.main.clone();
        let (latitude, longitude) = (weather.coord.lat, weather.coord.lon);

        let air = self.client.air_pollution(latitude, longitude).await?;
        let air_quality_index = air.current_aqi()?;

        debug!(
            city,
            category = %category,
            temperature = weather.main.temp,
            aqi = air_quality_index,
            "observed conditions"
        );

        Ok(ObservedConditions {
            temperature_celsius: weather.main.temp,
            humidity_percent: weather.main.humidity,
            is_raining: is_rain_category(&category),
            weather_category: category,
            air_quality_index,
            latitude,
            longitude,
        })
    }
}
