//! Caller-visible failures and their JSON rendering.
//!
//! Every failure is rendered by [`error_response`] as a JSON object holding
//! a `message` key plus any extra payload keys, with the HTTP status the
//! failure declares.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value};
use thiserror::Error;

/// A failure that knows how to present itself to an HTTP caller.
pub trait ErrorInfo {
    fn status_code(&self) -> StatusCode;

    /// Human-readable message, safe to expose to clients.
    fn message(&self) -> String;

    /// Extra keys merged into the response body next to `message`.
    fn payload(&self) -> Option<Map<String, Value>> {
        None
    }
}

/// Build the JSON error response for any [`ErrorInfo`] implementor.
///
/// `message` always wins over a payload key of the same name.
pub fn error_response(err: &impl ErrorInfo) -> Response {
    let mut body = err.payload().unwrap_or_default();
    body.insert("message".to_string(), Value::String(err.message()));

    (err.status_code(), Json(Value::Object(body))).into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or missing API token")]
    Unauthorized,

    #[error("Missing required fields: requester_name, location, date")]
    MissingFields,

    #[error("Request body must be a JSON object")]
    MalformedBody { detail: String },
}

impl ErrorInfo for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::MissingFields | Self::MalformedBody { .. } => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        self.to_string()
    }

    fn payload(&self) -> Option<Map<String, Value>> {
        match self {
            Self::MalformedBody { detail } => {
                let mut map = Map::new();
                map.insert("detail".to_string(), Value::String(detail.clone()));
                Some(map)
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(&self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    struct RateLimited;

    impl ErrorInfo for RateLimited {
        fn status_code(&self) -> StatusCode {
            StatusCode::TOO_MANY_REQUESTS
        }

        fn message(&self) -> String {
            "Slow down".to_string()
        }

        fn payload(&self) -> Option<Map<String, Value>> {
            let mut map = Map::new();
            map.insert("retry_after".into(), json!(30));
            map.insert("message".into(), json!("overridden"));
            Some(map)
        }
    }

    #[tokio::test]
    async fn unauthorized_is_403_with_message() {
        let response = ApiError::Unauthorized.into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Invalid or missing API token" })
        );
    }

    #[tokio::test]
    async fn missing_fields_is_400_naming_the_fields() {
        let response = ApiError::MissingFields.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "message": "Missing required fields: requester_name, location, date" })
        );
    }

    #[tokio::test]
    async fn malformed_body_carries_detail() {
        let response = ApiError::MalformedBody {
            detail: "EOF while parsing".into(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({
                "message": "Request body must be a JSON object",
                "detail": "EOF while parsing",
            })
        );
    }

    #[tokio::test]
    async fn custom_failures_reuse_the_mapping() {
        let response = error_response(&RateLimited);

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            body_json(response).await,
            json!({ "retry_after": 30, "message": "Slow down" })
        );
    }
}
