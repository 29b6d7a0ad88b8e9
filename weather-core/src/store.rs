use async_trait::async_trait;
use thiserror::Error;

use crate::model::{Observation, ObservationPage, StoredObservation};

pub mod memory;

/// Persistence failed. Backend detail stays inside the error for logging;
/// callers only ever see a generic message.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(String),
}

/// Persistence abstraction for observations.
///
/// The pipeline only depends on this capability set, so the backend is
/// swappable without touching orchestration code. Observations are
/// append-only: there is no update operation, and the only deletion is the
/// unconditional `delete_all`.
#[async_trait]
pub trait ObservationStore: Send + Sync {
    /// Assign `id` and `created_at`, persist, and return the stored record.
    async fn create(&self, observation: Observation) -> Result<StoredObservation, StoreError>;

    /// One page of records, newest `created_at` first (ties broken by
    /// insertion order). `total` counts every stored record regardless of
    /// the requested page.
    async fn list_page(&self, page: u32, limit: u32) -> Result<ObservationPage, StoreError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<StoredObservation>, StoreError>;

    /// Remove every stored observation. Returns how many were deleted.
    async fn delete_all(&self) -> Result<u64, StoreError>;
}
