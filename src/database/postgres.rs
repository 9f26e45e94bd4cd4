use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::PgPool;
use tracing::info;

use crate::database::models::resource::{Resource, ResourceRow};
use crate::database::store::{ResourceStore, StoreError};
use crate::types::{OwnerKey, ResourceId, UserId};

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS resources (
        id          TEXT PRIMARY KEY,
        owner_id    TEXT NOT NULL,
        seq         BIGSERIAL NOT NULL,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
"#;

// Tables created before `updated_at` existed
const ADD_UPDATED_AT: &str =
    "ALTER TABLE resources ADD COLUMN IF NOT EXISTS updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()";

const CREATE_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS resources_owner_seq_idx ON resources (owner_id, seq)";

/// PostgreSQL-backed store. The pool handles connection-level concurrency,
/// so one instance is shared by all requests.
#[derive(Debug, Clone)]
pub struct PgResourceStore {
    pool: PgPool,
}

impl PgResourceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the `resources` table and its list index when missing.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(ADD_UPDATED_AT).execute(&self.pool).await?;
        sqlx::query(CREATE_OWNER_INDEX).execute(&self.pool).await?;
        info!("resources table ready");
        Ok(())
    }
}

#[async_trait]
impl ResourceStore for PgResourceStore {
    async fn list(
        &self,
        owner: &UserId,
        offset: i64,
        limit: i64,
    ) -> Result<Vec<Resource>, StoreError> {
        let rows: Vec<Resource> = sqlx::query_as::<_, ResourceRow>(
            "SELECT id
             FROM resources
             WHERE owner_id = $1
             ORDER BY seq
             OFFSET $2 LIMIT $3",
        )
        .bind(owner.as_str())
        .bind(offset)
        .bind(limit)
        .fetch(&self.pool)
        .map_ok(Resource::from)
        .try_collect()
        .await?;

        Ok(rows)
    }

    async fn get(&self, key: OwnerKey<'_>) -> Result<Option<Resource>, StoreError> {
        let row = sqlx::query_as::<_, ResourceRow>(
            "SELECT id FROM resources WHERE owner_id = $1 AND id = $2",
        )
        .bind(key.owner.as_str())
        .bind(key.id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Resource::from))
    }

    async fn insert(&self, owner: &UserId, resource: &Resource) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("INSERT INTO resources (id, owner_id) VALUES ($1, $2)")
            .bind(resource.id().as_str())
            .bind(owner.as_str())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, owner: &UserId, resource: &Resource) -> Result<u64, StoreError> {
        let mut tx = self.pool.begin().await?;
        // id is pinned by the key, so a full replace only touches the row
        let result = sqlx::query(
            "UPDATE resources SET updated_at = NOW() WHERE owner_id = $1 AND id = $2",
        )
        .bind(owner.as_str())
        .bind(resource.id().as_str())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, key: OwnerKey<'_>) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM resources WHERE owner_id = $1 AND id = $2")
            .bind(key.owner.as_str())
            .bind(key.id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn exists(&self, id: &ResourceId) -> Result<bool, StoreError> {
        let (found,): (bool,) =
            sqlx::query_as("SELECT EXISTS (SELECT 1 FROM resources WHERE id = $1)")
                .bind(id.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(found)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
