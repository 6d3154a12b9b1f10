use serde::{Deserialize, Serialize};
use serde_json::Number;

/// What the provider is asked for: one location on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeatherRequest {
    pub location: String,
    pub date: String,
}

impl WeatherRequest {
    pub fn new(location: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            date: date.into(),
        }
    }
}

/// The four readings the relay exposes. A reading missing upstream is `None`
/// and serializes as `null`, never as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReadings {
    pub temp_c: Option<Number>,
    pub wind_kph: Option<Number>,
    pub pressure_mb: Option<Number>,
    pub humidity: Option<Number>,
}

/// Result of a provider lookup.
///
/// Upstream failures are ordinary values: they end up nested in the response
/// envelope rather than turning into an HTTP error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NormalizedWeather {
    Failed { error: String },
    Observed(WeatherReadings),
}

impl NormalizedWeather {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed {
            error: error.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_readings_serialize_as_null() {
        let weather = NormalizedWeather::Observed(WeatherReadings::default());

        assert_eq!(
            serde_json::to_value(&weather).unwrap(),
            json!({
                "temp_c": null,
                "wind_kph": null,
                "pressure_mb": null,
                "humidity": null,
            })
        );
    }

    #[test]
    fn failure_serializes_as_error_object() {
        let weather = NormalizedWeather::failed("Error 500: server error");

        assert!(weather.is_failed());
        assert_eq!(
            serde_json::to_value(&weather).unwrap(),
            json!({ "error": "Error 500: server error" })
        );
    }

    #[test]
    fn integer_readings_keep_their_representation() {
        let readings = WeatherReadings {
            wind_kph: Some(10.into()),
            ..Default::default()
        };

        let value = serde_json::to_value(NormalizedWeather::Observed(readings)).unwrap();
        assert_eq!(value["wind_kph"], json!(10));
    }
}
