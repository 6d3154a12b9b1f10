use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use weather_core::{Config, WeatherProvider, provider_from_config};

use crate::handler::{home_page, weather_endpoint};

pub const WEATHER_PATH: &str = "/content/api/v1/integration/weather";

/// Read-only state shared by every request.
#[derive(Debug, Clone)]
pub struct AppState {
    api_token: Arc<str>,
    provider: Arc<dyn WeatherProvider>,
}

impl AppState {
    pub fn new(api_token: impl Into<Arc<str>>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self {
            api_token: api_token.into(),
            provider,
        }
    }

    /// Build the state from a loaded configuration.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_token = config.require_api_token()?;
        let provider = provider_from_config(config)?;

        Ok(Self::new(api_token, Arc::from(provider)))
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn provider(&self) -> &dyn WeatherProvider {
        self.provider.as_ref()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home_page))
        .route(WEATHER_PATH, post(weather_endpoint))
        .with_state(state)
}

/// Serve until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    let addr = listener.local_addr().context("Failed to read listener address")?;
    tracing::info!(%addr, "weather relay listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server terminated unexpectedly")?;

    tracing::info!("weather relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
