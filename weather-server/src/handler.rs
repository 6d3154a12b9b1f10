use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Html,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use weather_core::{NormalizedWeather, WeatherRequest};

use crate::{app::AppState, error::ApiError};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const REQUIRED_FIELDS: [&str; 3] = ["requester_name", "location", "date"];

/// Validated inbound request. Values are kept as submitted so they can be
/// echoed back unchanged.
#[derive(Debug, Clone)]
pub struct WeatherQuery {
    pub requester_name: Value,
    pub location: Value,
    pub date: Value,
}

impl WeatherQuery {
    /// Check the shared token, then the presence of the required fields.
    pub fn from_body(mut body: Map<String, Value>, api_token: &str) -> Result<Self, ApiError> {
        match body.get("token") {
            Some(Value::String(token)) if token == api_token => {}
            _ => return Err(ApiError::Unauthorized),
        }

        if !REQUIRED_FIELDS.iter().all(|key| body.contains_key(*key)) {
            return Err(ApiError::MissingFields);
        }

        let mut take = |key: &str| body.remove(key).unwrap_or(Value::Null);

        Ok(Self {
            requester_name: take("requester_name"),
            location: take("location"),
            date: take("date"),
        })
    }

    pub fn weather_request(&self) -> WeatherRequest {
        WeatherRequest::new(path_value(&self.location), path_value(&self.date))
    }
}

/// Strings are used verbatim, anything else as its JSON text.
fn path_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ResponseEnvelope {
    pub requester_name: Value,
    pub timestamp: String,
    pub location: Value,
    pub date: Value,
    pub weather: NormalizedWeather,
}

impl ResponseEnvelope {
    pub fn new(query: WeatherQuery, weather: NormalizedWeather, completed_at: DateTime<Utc>) -> Self {
        Self {
            requester_name: query.requester_name,
            timestamp: completed_at.format(TIMESTAMP_FORMAT).to_string(),
            location: query.location,
            date: query.date,
            weather,
        }
    }
}

pub async fn home_page() -> Html<&'static str> {
    Html("<p><h2>Weather API Service</h2></p>")
}

pub async fn weather_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "rejected undecodable body");
        ApiError::MalformedBody {
            detail: rejection.body_text(),
        }
    })?;

    let query = WeatherQuery::from_body(body, state.api_token()).inspect_err(|err| {
        tracing::info!(error = %err, "rejected weather request");
    })?;

    let request = query.weather_request();
    tracing::info!(location = %request.location, date = %request.date, "looking up weather");

    let weather = state.provider().get_weather(&request).await;

    Ok(Json(ResponseEnvelope::new(query, weather, Utc::now())))
}
