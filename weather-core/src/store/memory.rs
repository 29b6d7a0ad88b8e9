//! Vec-backed observation store. Default backend for the service and for
//! tests; real deployments can swap in a database-backed implementation of
//! the same trait.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

use crate::model::{Observation, ObservationPage, StoredObservation};

use super::{ObservationStore, StoreError};

/// In-memory observation store.
///
/// Records are kept in insertion order; since `created_at` is assigned at
/// insert time, reverse insertion order is newest-first with ties resolved
/// the way the trait requires. Clone-friendly via Arc.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<StoredObservation>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ObservationStore for MemoryStore {
    async fn create(&self, observation: Observation) -> Result<StoredObservation, StoreError> {
        let stored = StoredObservation {
            id: Uuid::new_v4().to_string(),
            observation,
            created_at: Utc::now(),
        };

        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        records.push(stored.clone());
        Ok(stored)
    }

    async fn list_page(&self, page: u32, limit: u32) -> Result<ObservationPage, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        let skip = (page.saturating_sub(1) as usize) * (limit as usize);
        let items = records
            .iter()
            .rev()
            .skip(skip)
            .take(limit as usize)
            .cloned()
            .collect();

        Ok(ObservationPage { items, total: records.len() as u64 })
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<StoredObservation>, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn delete_all(&self) -> Result<u64, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".into()))?;

        let removed = records.len() as u64;
        records.clear();
        Ok(removed)
    }
}
