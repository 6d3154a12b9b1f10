use crate::{
    Config, NormalizedWeather, WeatherRequest, provider::visualcrossing::VisualCrossingProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod visualcrossing;

/// A source of weather data.
///
/// Lookups never fail from the caller's point of view: upstream problems are
/// reported through [`NormalizedWeather::Failed`].
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn get_weather(&self, request: &WeatherRequest) -> NormalizedWeather;
}

/// Construct the upstream provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.provider_api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for the Visual Crossing provider.\n\
                 Hint: run `weather-server configure` and enter your API key."
        )
    })?;

    let provider = match config.provider_base_url() {
        Some(base_url) => VisualCrossingProvider::with_base_url(api_key.to_owned(), base_url),
        None => VisualCrossingProvider::new(api_key.to_owned()),
    };

    Ok(Box::new(provider))
}
