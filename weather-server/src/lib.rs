//! HTTP surface of the weather relay.
//!
//! - `GET /` answers with a static banner
//! - `POST /content/api/v1/integration/weather` checks the shared token and
//!   the required fields, asks the upstream provider, and wraps the
//!   normalized readings in a timestamped envelope

pub mod app;
pub mod error;
pub mod handler;

pub use app::{AppState, WEATHER_PATH, router, serve};
pub use error::{ApiError, ErrorInfo, error_response};
pub use handler::{ResponseEnvelope, WeatherQuery};
