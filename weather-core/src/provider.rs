use crate::model::WeatherPayload;
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Failure modes of one outbound provider call. No retry happens at this
/// layer; every variant surfaces to the caller exactly once.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Timeout, connection failure or an unreadable response body.
    #[error("weather provider unavailable: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered 2xx with a body that is not valid JSON.
    #[error("weather provider returned malformed data: {0}")]
    Parse(#[from] serde_json::Error),

    /// Provider HTTP 404: the city is unknown upstream.
    #[error("city not found")]
    CityNotFound,

    /// Provider HTTP 401: the configured credential was rejected.
    #[error("invalid provider credential")]
    InvalidCredential,

    /// Any other non-success status. `message` is derived from the HTTP
    /// status text, not passed through from the provider body.
    #[error("provider error {status}: {message}")]
    Provider { status: u16, message: String },
}

/// A source of current weather for a named city.
///
/// Exactly one outbound request per invocation; implementations map provider
/// errors into [`FetchError`] and never retry.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, city: &str) -> Result<WeatherPayload, FetchError>;
}
