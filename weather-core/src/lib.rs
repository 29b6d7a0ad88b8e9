//! Core library for the weather observation service.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Validation of city and pagination query parameters
//! - Abstraction over the upstream weather provider
//! - Abstraction over observation storage, with an in-memory backend
//! - The request pipeline tying validation, fetch and persistence together
//!
//! It is used by `weather-server`, but can also be reused by other binaries or services.

pub mod config;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod store;
pub mod validate;

pub use config::{Config, ProviderSettings};
pub use model::{Observation, ObservationPage, ResultsPage, StoredObservation, WeatherPayload};
pub use pipeline::{ApiError, Pipeline};
pub use provider::{FetchError, WeatherProvider};
pub use store::{ObservationStore, StoreError};
