use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::resource::Resource;
use crate::types::{OwnerKey, ResourceId, UserId};

/// Persistence failures, carried upward verbatim.
///
/// "Row not found" is not an error: lookups return `Ok(None)` for that case
/// so callers can tell "doesn't exist" from "couldn't check".
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Connection(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Query(String),
}

impl StoreError {
    pub fn kind(&self) -> &'static str {
        match self {
            StoreError::Connection(_) => "connection",
            StoreError::Conflict(_) => "conflict",
            StoreError::Query(_) => "query",
        }
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_) => StoreError::Connection(err.to_string()),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::Conflict(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}

/// Owner-scoped resource persistence.
///
/// Every single-row read or write takes the owner, so there is no unscoped
/// path to another user's rows. `exists` is the one global check and only
/// answers whether an id is taken.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    /// Owner's resources in insertion order, skipping `offset` and returning at most `limit`.
    async fn list(&self, owner: &UserId, offset: i64, limit: i64)
        -> Result<Vec<Resource>, StoreError>;

    async fn get(&self, key: OwnerKey<'_>) -> Result<Option<Resource>, StoreError>;

    async fn insert(&self, owner: &UserId, resource: &Resource) -> Result<(), StoreError>;

    /// Full replace of the row matching `(owner, resource.id)`. Returns rows affected.
    async fn update(&self, owner: &UserId, resource: &Resource) -> Result<u64, StoreError>;

    /// Returns rows affected; zero when nothing matched.
    async fn delete(&self, key: OwnerKey<'_>) -> Result<u64, StoreError>;

    async fn exists(&self, id: &ResourceId) -> Result<bool, StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}
