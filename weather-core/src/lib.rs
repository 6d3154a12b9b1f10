//! Core library for the weather relay service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Abstraction over weather providers, with the Visual Crossing client
//! - Shared domain models (requests, normalized readings)
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod provider;

pub use config::{Config, ProviderConfig, ServerConfig};
pub use model::{NormalizedWeather, WeatherReadings, WeatherRequest};
pub use provider::{WeatherProvider, provider_from_config, visualcrossing::VisualCrossingProvider};
