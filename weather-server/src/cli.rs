use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, config::DEFAULT_BIND};
use weather_server::AppState;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-server", version, about = "Weather relay service")]
pub struct Cli {
    /// Config file to use instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP relay.
    Serve {
        /// Listen address, e.g. "0.0.0.0:5000". Overrides the config file.
        #[arg(long)]
        bind: Option<String>,
    },

    /// Interactively store the shared token and the provider API key.
    Configure,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => Config::config_file_path()?,
        };

        match self.command {
            Command::Serve { bind } => serve(&path, bind).await,
            Command::Configure => configure(&path),
        }
    }
}

async fn serve(path: &Path, bind: Option<String>) -> anyhow::Result<()> {
    init_tracing();

    let mut config = Config::load_from(path)?;
    config.apply_env();
    if let Some(bind) = bind {
        config.server.bind = bind;
    }

    let state = AppState::from_config(&config)?;
    let addr = config.bind_addr()?;

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    weather_server::serve(listener, state).await
}

fn configure(path: &Path) -> anyhow::Result<()> {
    let mut config = Config::load_from(path)?;

    let token = Password::new("Shared API token callers must send:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API token")?;

    let api_key = Password::new("Visual Crossing API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read provider API key")?;

    let current_bind = config.server.bind.clone();
    let bind = Text::new("Listen address:")
        .with_default(if current_bind.is_empty() {
            DEFAULT_BIND
        } else {
            current_bind.as_str()
        })
        .prompt()
        .context("Failed to read listen address")?;

    config.api_token = Some(token);
    config.upsert_provider_api_key(api_key);
    config.server.bind = bind;
    config.bind_addr()?;

    config.save_to(path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
