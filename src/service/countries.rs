//! CountryOrigin CRUD.

use crate::error::AppError;
use crate::model::{CountryOriginFilter, CountryOriginPatch, CountryOriginRow};
use sqlx::PgPool;

pub struct CountryOriginStore;

impl CountryOriginStore {
    pub async fn create(pool: &PgPool, country: Option<&str>) -> Result<CountryOriginRow, AppError> {
        tracing::debug!(country = ?country, "insert country origin");
        let row = sqlx::query_as::<_, CountryOriginRow>(
            "INSERT INTO country_origins (country) VALUES ($1) RETURNING id, country",
        )
        .bind(country)
        .fetch_one(pool)
        .await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<CountryOriginRow>, AppError> {
        let row = sqlx::query_as::<_, CountryOriginRow>(
            "SELECT id, country FROM country_origins WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Keyset-paginated list, primary key ascending.
    pub async fn list(
        pool: &PgPool,
        filter: &CountryOriginFilter,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<CountryOriginRow>, AppError> {
        let rows = sqlx::query_as::<_, CountryOriginRow>(
            r#"
            SELECT id, country FROM country_origins
            WHERE ($1::BIGINT IS NULL OR id = $1)
              AND ($2::TEXT IS NULL OR country = $2)
              AND ($3::BIGINT IS NULL OR id > $3)
            ORDER BY id
            LIMIT $4
            "#,
        )
        .bind(filter.id)
        .bind(filter.country.as_deref())
        .bind(after)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Apply a patch; `None` fields are left untouched. Returns None (and
    /// performs no write) when the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: &CountryOriginPatch,
    ) -> Result<Option<CountryOriginRow>, AppError> {
        tracing::debug!(id, "update country origin");
        let row = sqlx::query_as::<_, CountryOriginRow>(
            "UPDATE country_origins SET country = COALESCE($2, country) WHERE id = $1 RETURNING id, country",
        )
        .bind(id)
        .bind(patch.country.as_deref())
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }
}
