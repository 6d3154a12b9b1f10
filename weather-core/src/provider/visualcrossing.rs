use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Number;
use thiserror::Error;

use crate::model::{NormalizedWeather, WeatherReadings, WeatherRequest};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str =
    "https://weather.visualcrossing.com/VisualCrossingWebServices/rest/services/timeline";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid upstream base URL '{0}'")]
    InvalidBaseUrl(String),

    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid upstream payload: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Client for the Visual Crossing timeline API.
#[derive(Debug, Clone)]
pub struct VisualCrossingProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl VisualCrossingProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: impl Into<String>) -> Self {
        Self {
            api_key,
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    /// `{base}/{location}/{date}?unitGroup=metric&include=current&key=..&contentType=json`
    fn timeline_url(&self, request: &WeatherRequest) -> Result<Url, ProviderError> {
        let invalid = || ProviderError::InvalidBaseUrl(self.base_url.clone());

        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(&request.location)
            .push(&request.date);

        url.query_pairs_mut()
            .append_pair("unitGroup", "metric")
            .append_pair("include", "current")
            .append_pair("key", &self.api_key)
            .append_pair("contentType", "json");

        Ok(url)
    }

    async fn fetch(&self, request: &WeatherRequest) -> Result<NormalizedWeather, ProviderError> {
        let url = self.timeline_url(request)?;

        let res = self.http.get(url).send().await?;

        let status = res.status();
        let body = res.text().await?;

        if status != StatusCode::OK {
            tracing::warn!(
                status = status.as_u16(),
                location = %request.location,
                "Visual Crossing returned a non-success status"
            );
            return Ok(NormalizedWeather::failed(format!(
                "Error {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TimelineResponse = serde_json::from_str(&body)?;
        let day = parsed.days.into_iter().next().unwrap_or_default();

        Ok(NormalizedWeather::Observed(day.into()))
    }
}

#[derive(Debug, Deserialize)]
struct TimelineResponse {
    #[serde(default)]
    days: Vec<TimelineDay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TimelineDay {
    temp: Option<Number>,
    windspeed: Option<Number>,
    pressure: Option<Number>,
    humidity: Option<Number>,
}

impl From<TimelineDay> for WeatherReadings {
    fn from(day: TimelineDay) -> Self {
        Self {
            temp_c: day.temp,
            wind_kph: day.windspeed,
            pressure_mb: day.pressure,
            humidity: day.humidity,
        }
    }
}

#[async_trait]
impl WeatherProvider for VisualCrossingProvider {
    async fn get_weather(&self, request: &WeatherRequest) -> NormalizedWeather {
        match self.fetch(request).await {
            Ok(weather) => weather,
            Err(err) => {
                tracing::warn!(location = %request.location, error = %err, "weather lookup failed");
                NormalizedWeather::failed(err.to_string())
            }
        }
    }
}
