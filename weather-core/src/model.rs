use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates as reported by the provider. Serializes to an
/// empty object when the provider omitted them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Coord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
}

/// Temperature and humidity readings, metric units.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MainMetrics {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feels_like: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Wind {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// One entry of the provider's condition list ("Clouds", "broken clouds", ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
}

/// What the upstream provider answered for one city, already reduced to the
/// fields this service consumes plus the verbatim body for audit.
#[derive(Debug, Clone)]
pub struct WeatherPayload {
    pub country: String,
    pub coord: Coord,
    pub main: MainMetrics,
    pub wind: Wind,
    pub conditions: Vec<Condition>,
    pub raw: serde_json::Value,
}

/// A weather snapshot the pipeline built but has not persisted yet.
///
/// Invariant: `normalized_city` always equals `city.to_lowercase()`.
/// `raw` is the full provider response, opaque to callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    pub city: String,
    pub normalized_city: String,
    pub country: String,
    pub coord: Coord,
    pub main: MainMetrics,
    pub wind: Wind,
    pub conditions: Vec<Condition>,
    pub raw: serde_json::Value,
}

/// An observation after the store assigned identity. Immutable from here on:
/// no update operation exists anywhere in the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObservation {
    pub id: String,
    #[serde(flatten)]
    pub observation: Observation,
    pub created_at: DateTime<Utc>,
}

/// Validated pagination parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

/// One page of stored observations plus the total count across all pages.
#[derive(Debug, Clone)]
pub struct ObservationPage {
    pub items: Vec<StoredObservation>,
    pub total: u64,
}

/// The list operation's answer, shaped for the wire.
#[derive(Debug, Clone, Serialize)]
pub struct ResultsPage {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
    pub items: Vec<StoredObservation>,
}
