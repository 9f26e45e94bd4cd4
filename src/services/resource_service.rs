use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, error};

use crate::api::paging::{Paging, PagingParams, PagingPolicy};
use crate::database::models::resource::{Resource, ResourcePayload};
use crate::database::store::{ResourceStore, StoreError};
use crate::types::{OwnerKey, ResourceId, UserId};

/// Attempts at drawing a fresh id before giving up on create.
const MAX_ID_ATTEMPTS: usize = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not found")]
    NotFound,

    #[error("Patch method not implemented yet")]
    NotImplemented,

    #[error("could not allocate a unique resource id after {0} attempts")]
    IdExhausted(usize),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One page of an owner's resources plus the window that produced it.
#[derive(Debug, Clone)]
pub struct ResourcePage {
    pub items: Vec<Resource>,
    pub paging: Paging,
}

/// Owner-scoped CRUD over resources.
///
/// Holds the injected store; safe to share across requests since the store
/// handles its own concurrency.
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
    paging: PagingPolicy,
}

impl ResourceService {
    pub fn new(store: Arc<dyn ResourceStore>, paging: PagingPolicy) -> Self {
        Self { store, paging }
    }

    pub async fn list(
        &self,
        owner: &UserId,
        params: &PagingParams,
    ) -> Result<ResourcePage, ServiceError> {
        let paging = self.paging.resolve(params);
        debug!(owner = %owner, offset = paging.offset, limit = paging.limit, "listing resources");

        let items = self
            .store
            .list(owner, paging.offset, paging.limit)
            .await
            .map_err(|e| store_failure("list", e))?;

        Ok(ResourcePage { items, paging })
    }

    /// Client-supplied ids are ignored; a fresh one is always assigned.
    pub async fn create(
        &self,
        owner: &UserId,
        payload: &ResourcePayload,
    ) -> Result<Resource, ServiceError> {
        if let Some(client_id) = payload.client_id() {
            debug!(owner = %owner, ignored = %client_id, "discarding client-supplied id");
        }

        let id = self.allocate_id().await?;
        let resource = Resource::new(id);
        self.store
            .insert(owner, &resource)
            .await
            .map_err(|e| store_failure("insert", e))?;

        debug!(owner = %owner, id = %resource.id(), "resource created");
        Ok(resource)
    }

    pub async fn get(&self, owner: &UserId, id: &ResourceId) -> Result<Resource, ServiceError> {
        let found = self
            .store
            .get(OwnerKey::new(owner, id))
            .await
            .map_err(|e| store_failure("get", e))?;

        // rebuilt from the id so href is always current
        found
            .map(|r| Resource::new(r.id().clone()))
            .ok_or(ServiceError::NotFound)
    }

    /// Full replace. The path id always wins over any id in the payload.
    ///
    /// A store success is reported as success even when no row matched, so
    /// updating a missing or foreign resource does not surface as an error.
    pub async fn update(
        &self,
        owner: &UserId,
        id: &ResourceId,
        payload: &ResourcePayload,
    ) -> Result<Resource, ServiceError> {
        if let Some(client_id) = payload.client_id() {
            debug!(owner = %owner, id = %id, ignored = %client_id, "payload id overridden by path");
        }

        let resource = Resource::new(id.clone());
        let affected = self
            .store
            .update(owner, &resource)
            .await
            .map_err(|e| store_failure("update", e))?;

        debug!(owner = %owner, id = %id, affected, "resource updated");
        Ok(resource)
    }

    /// Partial updates are not supported; always the `NotImplemented` error.
    pub async fn patch(&self, owner: &UserId, id: &ResourceId) -> ServiceError {
        debug!(owner = %owner, id = %id, "patch requested");
        ServiceError::NotImplemented
    }

    /// Deleting a resource that does not exist under `owner` also succeeds.
    pub async fn delete(&self, owner: &UserId, id: &ResourceId) -> Result<(), ServiceError> {
        let affected = self
            .store
            .delete(OwnerKey::new(owner, id))
            .await
            .map_err(|e| store_failure("delete", e))?;

        debug!(owner = %owner, id = %id, affected, "resource deleted");
        Ok(())
    }

    pub async fn store_health(&self) -> Result<(), ServiceError> {
        self.store.ping().await.map_err(ServiceError::from)
    }

    async fn allocate_id(&self) -> Result<ResourceId, ServiceError> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = ResourceId::generate();
            let taken = self
                .store
                .exists(&id)
                .await
                .map_err(|e| store_failure("exists", e))?;
            if !taken {
                return Ok(id);
            }
            debug!(id = %id, "generated id already taken, retrying");
        }
        Err(ServiceError::IdExhausted(MAX_ID_ATTEMPTS))
    }
}

fn store_failure(operation: &str, err: StoreError) -> ServiceError {
    error!(operation, kind = err.kind(), "store failure: {}", err);
    ServiceError::Store(err)
}
