// OpenWeather HTTP client
//
// Wraps `reqwest::Client` with endpoint URL construction and API key
// injection. The endpoint methods live in `weather.rs` and `air.rs` as
// inherent impls, keeping this module focused on transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::transport::{self, TransportConfig};

/// Raw HTTP client for the OpenWeather current-weather and air-pollution
/// APIs.
///
/// The two endpoints may live behind different base URLs (a proxy or a
/// compatible provider for one of them), so each has its own root.
/// Cloning is cheap: the inner `reqwest::Client` is reference counted.
#[derive(Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    weather_url: Url,
    air_quality_url: Url,
    api_key: SecretString,
    units: String,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("weather_url", &self.weather_url.as_str())
            .field("air_quality_url", &self.air_quality_url.as_str())
            .field("units", &self.units)
            .finish_non_exhaustive()
    }
}

impl OpenWeatherClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `weather_url` and `air_quality_url` are API roots such as
    /// `https://api.openweathermap.org/data/2.5`; endpoint paths are
    /// appended to them.
    pub fn new(
        weather_url: &str,
        air_quality_url: &str,
        api_key: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(weather_url, air_quality_url, api_key, http)
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn from_reqwest(
        weather_url: &str,
        air_quality_url: &str,
        api_key: SecretString,
        http: reqwest::Client,
    ) -> Result<Self, Error> {
        Ok(Self {
            http,
            weather_url: parse_root(weather_url)?,
            air_quality_url: parse_root(air_quality_url)?,
            api_key,
            units: "metric".into(),
        })
    }

    /// Override the unit system sent with weather requests.
    ///
    /// The alert thresholds are Celsius, so anything other than `metric`
    /// only makes sense for diagnostics.
    #[must_use]
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    // ── URL builders ─────────────────────────────────────────────────

    pub(crate) fn weather_endpoint(&self, path: &str) -> Url {
        join(&self.weather_url, path)
    }

    pub(crate) fn air_quality_endpoint(&self, path: &str) -> Url {
        join(&self.air_quality_url, path)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request with the given query pairs plus `appid`, and
    /// decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        mut url: Url,
        query: &[(&str, &str)],
    ) -> Result<T, Error> {
        debug!("GET {}", url);

        url.query_pairs_mut()
            .extend_pairs(query.iter().copied())
            .append_pair("appid", self.api_key.expose_secret());

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        transport::decode_json(resp).await
    }
}

/// Parse an API root, normalising it to end in `/` so endpoint paths are
/// appended after its last segment.
fn parse_root(raw: &str) -> Result<Url, Error> {
    let trimmed = raw.trim_end_matches('/');
    Ok(Url::parse(&format!("{trimmed}/"))?)
}

fn join(root: &Url, path: &str) -> Url {
    let mut url = root.clone();
    // Cannot-be-a-base roots (`mailto:`) have no segments; leave them as is.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push(path);
    }
    url
}
