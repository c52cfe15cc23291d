use std::fmt;

use bevy::log::debug;
use bevy::log::warn;
use serde::Deserialize;

use super::Condition;
use super::ConditionCategory;
use super::ConditionProvider;
use crate::config::WeatherConfig;
use crate::geo::Location;
use crate::locations;

/// Reasons a live lookup produced no data
#[derive(Debug)]
pub enum FetchError {
    /// No credential configured
    MissingApiKey,
    /// Location is not in this provider's coordinate table
    UnknownLocation(String),
    /// Connection, DNS, TLS or timeout failure
    Transport(String),
    /// Service answered with a non-success status
    Status(u16),
    /// Body was not the expected JSON shape
    Malformed(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "no API key configured"),
            Self::UnknownLocation(key) => write!(f, "no coordinates for '{key}'"),
            Self::Transport(msg) => write!(f, "transport error: {msg}"),
            Self::Status(code) => write!(f, "HTTP status {code}"),
            Self::Malformed(msg) => write!(f, "malformed response: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

impl From<ureq::Error> for FetchError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(code, _) => Self::Status(code),
            ureq::Error::Transport(transport) => Self::Transport(transport.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main:    MainReading,
    weather: Vec<WeatherDescription>,
}

#[derive(Debug, Deserialize)]
struct MainReading {
    temp: f32,
}

#[derive(Debug, Deserialize)]
struct WeatherDescription {
    description: String,
}

/// Parses a current-weather body into a live condition
pub fn parse_weather(body: &str) -> Result<Condition, FetchError> {
    let response: WeatherResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if !response.main.temp.is_finite() {
        return Err(FetchError::Malformed("temperature is not a number".to_string()));
    }
    let description = response
        .weather
        .first()
        .ok_or_else(|| FetchError::Malformed("empty weather list".to_string()))?;

    Ok(Condition::live(
        response.main.temp,
        ConditionCategory::from_description(&description.description),
    )
    .described(&description.description))
}

/// Current conditions from the weather service, one blocking request per call
pub struct LiveConditions {
    config: WeatherConfig,
    table:  &'static [Location],
    agent:  ureq::Agent,
}

impl LiveConditions {
    pub fn new(config: WeatherConfig, table: &'static [Location]) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout).build();
        Self {
            config,
            table,
            agent,
        }
    }

    /// Coordinates come from this provider's own table, keyed by location key
    pub fn request(&self, key: &str) -> Result<Condition, FetchError> {
        let api_key = self.config.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        let location = locations::find(self.table, key)
            .ok_or_else(|| FetchError::UnknownLocation(key.to_string()))?;

        debug!("requesting weather for {key}");
        let body = self
            .agent
            .get(&self.config.endpoint)
            .query("lat", &location.latitude.to_string())
            .query("lon", &location.longitude.to_string())
            .query("appid", api_key)
            .query("units", self.config.units.query_value())
            .call()?
            .into_string()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        parse_weather(&body)
    }
}

impl ConditionProvider for LiveConditions {
    fn fetch(&self, location: &Location) -> Option<Condition> {
        match self.request(location.key) {
            Ok(condition) => Some(condition),
            Err(error) => {
                warn!("weather lookup for {} failed: {error}", location.key);
                None
            },
        }
    }

    fn unit_suffix(&self) -> &'static str { self.config.units.suffix() }
}
