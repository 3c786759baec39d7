// Shared in-process fakes for engine tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use stormwatch_core::{
    AlertPreferences, ConditionFetcher, CoreError, NotificationSender, ObservedConditions, Subscriber,
};

pub fn conditions(category: &str, temperature: f64, humidity: f64, aqi: u32) -> ObservedConditions {
    ObservedConditions {
        temperature_celsius: temperature,
        humidity_percent: humidity,
        is_raining: category.to_lowercase().contains("rain"),
        weather_category: category.to_owned(),
        air_quality_index: aqi,
        latitude: 18.52,
        longitude: 73.86,
    }
}

pub fn rainy() -> ObservedConditions {
    conditions("Rain", 24.0, 70.0, 2)
}

pub fn pleasant() -> ObservedConditions {
    conditions("Clear", 22.0, 50.0, 1)
}

pub fn rain_only() -> AlertPreferences {
    AlertPreferences {
        rain: true,
        ..Default::default()
    }
}

pub fn subscriber(address: &str, city: &str, preferences: AlertPreferences) -> Subscriber {
    Subscriber::new(address, city).with_preferences(preferences)
}

/// Serves canned conditions per city; unknown cities fail like a provider 404.
#[derive(Default)]
pub struct FakeFetcher {
    conditions: HashMap<String, ObservedConditions>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, city: &str, conditions: ObservedConditions) -> Self {
        self.conditions.insert(city.to_lowercase(), conditions);
        self
    }

    /// Make fetches for `city` take `delay` (virtual time in paused tests).
    pub fn slow(mut self, city: &str, delay: Duration) -> Self {
        self.delays.insert(city.to_lowercase(), delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl ConditionFetcher for FakeFetcher {
    async fn fetch(&self, city: &str) -> Result<ObservedConditions, CoreError> {
        self.calls.lock().unwrap().push(city.to_owned());
        let key = city.to_lowercase();
        if let Some(delay) = self.delays.get(&key).copied() {
            tokio::time::sleep(delay).await;
        }
        self.conditions.get(&key).cloned().ok_or_else(|| CoreError::Provider {
            message: format!("HTTP 404: city not found: {city}"),
            status: Some(404),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Records every send; addresses in `failing` are rejected.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<SentMessage>>,
    failing: HashSet<String>,
}

impl RecordingSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, address: &str) -> Self {
        self.failing.insert(address.to_owned());
        self
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl NotificationSender for RecordingSender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), CoreError> {
        if self.failing.contains(to) {
            return Err(CoreError::Send {
                to: to.to_owned(),
                message: "HTTP 503: relay unavailable".into(),
            });
        }
        self.sent.lock().unwrap().push(SentMessage {
            to: to.to_owned(),
            subject: subject.to_owned(),
            body: body.to_owned(),
        });
        Ok(())
    }
}
