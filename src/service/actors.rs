//! Actor CRUD.

use crate::error::AppError;
use crate::model::{ActorFilter, ActorPatch, ActorRow};
use sqlx::PgPool;

pub struct ActorStore;

impl ActorStore {
    pub async fn create(pool: &PgPool, name: Option<&str>) -> Result<ActorRow, AppError> {
        tracing::debug!(name = ?name, "insert actor");
        let row = sqlx::query_as::<_, ActorRow>(
            "INSERT INTO actors (name) VALUES ($1) RETURNING id, name",
        )
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<ActorRow>, AppError> {
        let row = sqlx::query_as::<_, ActorRow>("SELECT id, name FROM actors WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    /// Keyset-paginated list, primary key ascending. `after` is an exclusive
    /// lower bound on id; filters are exact matches.
    pub async fn list(
        pool: &PgPool,
        filter: &ActorFilter,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<ActorRow>, AppError> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT id, name FROM actors
            WHERE ($1::BIGINT IS NULL OR id = $1)
              AND ($2::TEXT IS NULL OR name = $2)
              AND ($3::BIGINT IS NULL OR id > $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(filter.id)
        .bind(filter.name.as_deref())
        .bind(after)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Apply a patch; `None` fields are left untouched. Returns the updated
    /// row, or None (and no write) when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: &ActorPatch,
    ) -> Result<Option<ActorRow>, AppError> {
        tracing::debug!(id, "update actor");
        let row = sqlx::query_as::<_, ActorRow>(
            "UPDATE actors SET name = COALESCE($2, name) WHERE id = $1 RETURNING id, name",
        )
        .bind(id)
        .bind(patch.name.as_deref())
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Subset of `ids` that exist, in ascending order. Used to verify every
    /// referenced actor before linking.
    pub async fn existing_ids(pool: &PgPool, ids: &[i64]) -> Result<Vec<i64>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(i64,)> =
            sqlx::query_as("SELECT id FROM actors WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
