use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::models::resource::Resource;
use crate::database::store::{ResourceStore, StoreError};
use crate::types::{OwnerKey, ResourceId, UserId};

#[derive(Debug, Clone)]
struct Entry {
    owner: UserId,
    id: ResourceId,
    updated_at: DateTime<Utc>,
}

/// Process-local store for development runs and tests.
///
/// Rows live in a vector so list order is insertion order, like the
/// `seq` column of the PostgreSQL table.
#[derive(Debug, Default)]
pub struct MemoryResourceStore {
    rows: RwLock<Vec<Entry>>,
}

impl MemoryResourceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn list(
        &self,
        owner: &UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Resource>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|e| &e.owner == owner)
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|e| Resource::new(e.id.clone()))
            .collect())
    }

    async fn get(&self, key: OwnerKey<'_>) -> Result<Option<Resource>, StoreError> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .find(|e| &e.owner == key.owner && &e.id == key.id)
            .map(|e| Resource::new(e.id.clone())))
    }

    async fn insert(&self, owner: &UserId, resource: &Resource) -> Result<(), StoreError> {
        let mut rows = self.rows.write().await;
        if rows.iter().any(|e| &e.id == resource.id()) {
            return Err(StoreError::Conflict(format!(
                "duplicate resource id {}",
                resource.id()
            )));
        }
        rows.push(Entry {
            owner: owner.clone(),
            id: resource.id().clone(),
            updated_at: Utc::now(),
        });
        Ok(())
    }

    async fn update(&self, owner: &UserId, resource: &Resource) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let mut affected = 0;
        for entry in rows
            .iter_mut()
            .filter(|e| &e.owner == owner && &e.id == resource.id())
        {
            debug!(id = %entry.id, previous = %entry.updated_at, "replacing resource");
            entry.updated_at = Utc::now();
            affected += 1;
        }
        Ok(affected)
    }

    async fn delete(&self, key: OwnerKey<'_>) -> Result<u64, StoreError> {
        let mut rows = self.rows.write().await;
        let before = rows.len();
        rows.retain(|e| !(&e.owner == key.owner && &e.id == key.id));
        Ok((before - rows.len()) as u64)
    }

    async fn exists(&self, id: &ResourceId) -> Result<bool, StoreError> {
        Ok(self.rows.read().await.iter().any(|e| &e.id == id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
