use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use crate::{
    config::ProviderSettings,
    model::{Condition, Coord, MainMetrics, WeatherPayload, Wind},
};

use super::{FetchError, WeatherProvider};

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Current-weather client for the OpenWeather API.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    settings: ProviderSettings,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(settings: ProviderSettings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self { settings, http })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<WeatherPayload, FetchError> {
        let url = format!(
            "{}/data/2.5/weather",
            self.settings.base_url.trim_end_matches('/')
        );

        tracing::debug!(%city, "requesting current weather from OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("units", "metric"),
                ("appid", self.settings.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        match status {
            StatusCode::NOT_FOUND => return Err(FetchError::CityNotFound),
            StatusCode::UNAUTHORIZED => return Err(FetchError::InvalidCredential),
            s if !s.is_success() => {
                return Err(FetchError::Provider {
                    status: s.as_u16(),
                    message: s.canonical_reason().unwrap_or("unknown status").to_string(),
                });
            }
            _ => {}
        }

        let body = res.text().await?;
        let raw: Value = serde_json::from_str(&body)?;
        let parsed: OwCurrentResponse = serde_json::from_value(raw.clone())?;

        Ok(payload_from(parsed, raw))
    }
}

#[derive(Debug, Default, Deserialize)]
struct OwCoord {
    lon: Option<f64>,
    lat: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    #[serde(default)]
    main: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    country: Option<String>,
}

/// The subset of the OpenWeather current-weather response this service
/// consumes. Everything else stays available through the raw body.
#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    #[serde(default)]
    coord: OwCoord,
    #[serde(default)]
    main: OwMain,
    #[serde(default)]
    wind: OwWind,
    #[serde(default)]
    weather: Vec<OwWeather>,
    #[serde(default)]
    sys: OwSys,
}

fn payload_from(parsed: OwCurrentResponse, raw: Value) -> WeatherPayload {
    WeatherPayload {
        country: parsed.sys.country.unwrap_or_default(),
        coord: Coord { lon: parsed.coord.lon, lat: parsed.coord.lat },
        main: MainMetrics {
            temp: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity: parsed.main.humidity,
        },
        wind: Wind { speed: parsed.wind.speed },
        conditions: parsed
            .weather
            .into_iter()
            .map(|w| Condition { main: w.main, description: w.description, icon: w.icon })
            .collect(),
        raw,
    }
}
