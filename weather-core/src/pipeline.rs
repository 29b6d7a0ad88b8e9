//! The request pipeline: validate -> fetch -> normalize -> persist.
//!
//! Every exit path is a value of [`ApiError`]; nothing is retried and no
//! failure is fatal to the process.

use std::sync::Arc;
use thiserror::Error;

use crate::{
    model::{Observation, ResultsPage, StoredObservation, WeatherPayload},
    provider::{FetchError, WeatherProvider},
    store::{ObservationStore, StoreError},
    validate::{self, ValidationError},
};

/// Caller-visible failure of one pipeline operation. `status()` carries the
/// HTTP status so the transport layer stays a thin mapping.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("{}", upstream_message(.0))]
    Upstream(#[from] FetchError),

    #[error("Not found")]
    NotFound,

    #[error("Failed to store weather observation")]
    Store(#[from] StoreError),
}

/// Stable caller-facing strings; provider wording is never passed through
/// verbatim except for the HTTP status text of unexpected statuses.
fn upstream_message(err: &FetchError) -> String {
    match err {
        FetchError::CityNotFound => "City not found".into(),
        FetchError::InvalidCredential => "Invalid provider credential".into(),
        FetchError::Provider { message, .. } => format!("Weather provider error: {message}"),
        FetchError::Network(_) | FetchError::Parse(_) => "Weather provider unavailable".into(),
    }
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Validation(_) => 400,
            ApiError::Upstream(FetchError::CityNotFound) => 404,
            ApiError::Upstream(FetchError::InvalidCredential) => 401,
            ApiError::Upstream(FetchError::Provider { status, .. }) => *status,
            ApiError::Upstream(_) => 502,
            ApiError::NotFound => 404,
            ApiError::Store(_) => 500,
        }
    }
}

/// Orchestrates validator, provider and store. Construct one at startup and
/// share it; both collaborators are injected so tests can substitute them.
#[derive(Clone)]
pub struct Pipeline {
    provider: Arc<dyn WeatherProvider>,
    store: Arc<dyn ObservationStore>,
}

impl Pipeline {
    pub fn new(provider: Arc<dyn WeatherProvider>, store: Arc<dyn ObservationStore>) -> Self {
        Self { provider, store }
    }

    /// Fetch current weather for `raw_city` and persist it.
    ///
    /// Fails fast on invalid input (no outbound call is made) and on any
    /// provider error (nothing is stored).
    pub async fn fetch_and_store(&self, raw_city: &str) -> Result<StoredObservation, ApiError> {
        let city = validate::city(raw_city)?;

        let payload = self.provider.current(&city).await?;
        let observation = normalize(city, payload);

        let stored = self.store.create(observation).await.map_err(|err| {
            tracing::error!(error = %err, "failed to persist observation");
            ApiError::from(err)
        })?;

        tracing::info!(city = %stored.observation.city, id = %stored.id, "stored observation");
        Ok(stored)
    }

    /// Paginated listing, newest first.
    pub async fn list(
        &self,
        raw_page: Option<&str>,
        raw_limit: Option<&str>,
    ) -> Result<ResultsPage, ApiError> {
        let req = validate::pagination(raw_page, raw_limit)?;

        let page = self.store.list_page(req.page, req.limit).await?;
        let pages = page.total.div_ceil(u64::from(req.limit));

        Ok(ResultsPage {
            page: req.page,
            limit: req.limit,
            total: page.total,
            pages,
            items: page.items,
        })
    }

    pub async fn get(&self, id: &str) -> Result<StoredObservation, ApiError> {
        self.store.get_by_id(id).await?.ok_or(ApiError::NotFound)
    }

    /// Remove every stored observation. Unconditional and irreversible.
    pub async fn clear(&self) -> Result<(), ApiError> {
        let removed = self.store.delete_all().await?;
        tracing::info!(removed, "cleared stored observations");
        Ok(())
    }
}

fn normalize(city: String, payload: WeatherPayload) -> Observation {
    Observation {
        normalized_city: city.to_lowercase(),
        city,
        country: payload.country,
        coord: payload.coord,
        main: payload.main,
        wind: payload.wind,
        conditions: payload.conditions,
        raw: payload.raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Condition, Coord, MainMetrics, Wind};
    use crate::store::memory::MemoryStore;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Provider double: returns a canned outcome and counts invocations.
    #[derive(Debug)]
    struct StubProvider {
        outcome: StubOutcome,
        calls: AtomicUsize,
    }

    #[derive(Debug)]
    enum StubOutcome {
        Payload,
        CityNotFound,
        InvalidCredential,
        ProviderStatus(u16),
    }

    impl StubProvider {
        fn new(outcome: StubOutcome) -> Arc<Self> {
            Arc::new(Self { outcome, calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current(&self, _city: &str) -> Result<WeatherPayload, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.outcome {
                StubOutcome::Payload => Ok(WeatherPayload {
                    country: "GB".into(),
                    coord: Coord { lon: Some(-0.13), lat: Some(51.51) },
                    main: MainMetrics {
                        temp: Some(18.4),
                        feels_like: Some(18.1),
                        humidity: Some(72.0),
                    },
                    wind: Wind { speed: Some(4.1) },
                    conditions: vec![Condition {
                        main: "Clouds".into(),
                        description: "broken clouds".into(),
                        icon: "04d".into(),
                    }],
                    raw: json!({"cod": 200}),
                }),
                StubOutcome::CityNotFound => Err(FetchError::CityNotFound),
                StubOutcome::InvalidCredential => Err(FetchError::InvalidCredential),
                StubOutcome::ProviderStatus(status) => Err(FetchError::Provider {
                    status: *status,
                    message: "Service Unavailable".into(),
                }),
            }
        }
    }

    fn pipeline_with(provider: Arc<StubProvider>) -> (Pipeline, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (Pipeline::new(provider, store.clone()), store)
    }

    #[tokio::test]
    async fn fetch_and_store_persists_normalized_observation() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider.clone());

        let stored = pipeline.fetch_and_store("London").await.expect("must succeed");

        assert_eq!(stored.observation.city, "London");
        assert_eq!(stored.observation.normalized_city, "london");
        assert_eq!(stored.observation.country, "GB");
        assert!(!stored.id.is_empty());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn invalid_city_is_rejected_before_any_outbound_call() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, store) = pipeline_with(provider.clone());

        let err = pipeline.fetch_and_store("12345").await.unwrap_err();

        assert_eq!(err.status(), 400);
        assert_eq!(err.to_string(), "City contains invalid characters");
        assert_eq!(provider.calls(), 0);
        assert_eq!(store.list_page(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn city_is_trimmed_before_fetching() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        let stored = pipeline.fetch_and_store("  London  ").await.expect("must succeed");
        assert_eq!(stored.observation.city, "London");
    }

    #[tokio::test]
    async fn upstream_404_maps_to_city_not_found_and_stores_nothing() {
        let provider = StubProvider::new(StubOutcome::CityNotFound);
        let (pipeline, store) = pipeline_with(provider);

        let err = pipeline.fetch_and_store("Atlantis").await.unwrap_err();

        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "City not found");
        assert_eq!(store.list_page(1, 10).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn upstream_401_maps_to_invalid_credential() {
        let provider = StubProvider::new(StubOutcome::InvalidCredential);
        let (pipeline, _store) = pipeline_with(provider);

        let err = pipeline.fetch_and_store("London").await.unwrap_err();

        assert_eq!(err.status(), 401);
        assert_eq!(err.to_string(), "Invalid provider credential");
    }

    #[tokio::test]
    async fn unexpected_provider_status_passes_through() {
        let provider = StubProvider::new(StubOutcome::ProviderStatus(503));
        let (pipeline, _store) = pipeline_with(provider);

        let err = pipeline.fetch_and_store("London").await.unwrap_err();

        assert_eq!(err.status(), 503);
        assert_eq!(err.to_string(), "Weather provider error: Service Unavailable");
    }

    #[tokio::test]
    async fn list_computes_page_count() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        for _ in 0..25 {
            pipeline.fetch_and_store("London").await.expect("seed");
        }

        let results = pipeline.list(Some("2"), Some("10")).await.expect("must succeed");

        assert_eq!(results.page, 2);
        assert_eq!(results.limit, 10);
        assert_eq!(results.total, 25);
        assert_eq!(results.pages, 3);
        assert_eq!(results.items.len(), 10);
    }

    #[tokio::test]
    async fn list_of_empty_store_has_zero_pages() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        let results = pipeline.list(None, None).await.expect("must succeed");

        assert_eq!(results.page, 1);
        assert_eq!(results.limit, 10);
        assert_eq!(results.total, 0);
        assert_eq!(results.pages, 0);
        assert!(results.items.is_empty());
    }

    #[tokio::test]
    async fn list_rejects_bad_pagination() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        let err = pipeline.list(Some("0"), None).await.unwrap_err();
        assert_eq!(err.status(), 400);

        let err = pipeline.list(None, Some("51")).await.unwrap_err();
        assert_eq!(err.status(), 400);
    }

    #[tokio::test]
    async fn get_returns_stored_record_or_not_found() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        let stored = pipeline.fetch_and_store("London").await.expect("seed");

        let found = pipeline.get(&stored.id).await.expect("must exist");
        assert_eq!(found.id, stored.id);

        let err = pipeline.get("no-such-id").await.unwrap_err();
        assert_eq!(err.status(), 404);
        assert_eq!(err.to_string(), "Not found");
    }

    #[tokio::test]
    async fn clear_then_list_is_empty() {
        let provider = StubProvider::new(StubOutcome::Payload);
        let (pipeline, _store) = pipeline_with(provider);

        pipeline.fetch_and_store("London").await.expect("seed");
        pipeline.clear().await.expect("clear must succeed");

        let results = pipeline.list(None, None).await.expect("must succeed");
        assert_eq!(results.total, 0);
        assert!(results.items.is_empty());
    }
}
