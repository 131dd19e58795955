//! Movie CRUD plus the movie/actor association.
//!
//! Inserting or updating a movie and replacing its actor set happen in one
//! transaction, so a failed write never leaves partial linkage behind.

use crate::error::AppError;
use crate::model::{ActorRow, MovieFilter, MoviePatch, MovieRow, NewMovie};
use sqlx::{PgConnection, PgPool};

const MOVIE_COLUMNS: &str = "id, title, year, country_origin_id";

pub struct MovieStore;

impl MovieStore {
    /// Insert a movie and set its full actor association atomically.
    pub async fn create(pool: &PgPool, new: &NewMovie) -> Result<MovieRow, AppError> {
        tracing::debug!(title = ?new.title, actors = new.actor_ids.len(), "insert movie");
        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "INSERT INTO movies (title, year, country_origin_id) VALUES ($1, $2, $3) RETURNING {}",
            MOVIE_COLUMNS
        ))
        .bind(new.title.as_deref())
        .bind(new.year)
        .bind(new.country_origin_id)
        .fetch_one(&mut *tx)
        .await?;
        Self::set_actors(&mut tx, row.id, &new.actor_ids).await?;
        tx.commit().await?;
        Ok(row)
    }

    pub async fn get(pool: &PgPool, id: i64) -> Result<Option<MovieRow>, AppError> {
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            "SELECT {} FROM movies WHERE id = $1",
            MOVIE_COLUMNS
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row)
    }

    /// Keyset-paginated list, primary key ascending. The actor filter matches
    /// movies whose association set contains that actor.
    pub async fn list(
        pool: &PgPool,
        filter: &MovieFilter,
        after: Option<i64>,
        limit: i64,
    ) -> Result<Vec<MovieRow>, AppError> {
        let rows = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            SELECT {} FROM movies
            WHERE ($1::BIGINT IS NULL OR id = $1)
              AND ($2::TEXT IS NULL OR title = $2)
              AND ($3::BIGINT IS NULL OR country_origin_id = $3)
              AND ($4::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM movie_actors ma
                    WHERE ma.movie_id = movies.id AND ma.actor_id = $4))
              AND ($5::BIGINT IS NULL OR id > $5)
            ORDER BY id
            LIMIT $6
            "#,
            MOVIE_COLUMNS
        ))
        .bind(filter.id)
        .bind(filter.title.as_deref())
        .bind(filter.country_origin_id)
        .bind(filter.actor_id)
        .bind(after)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Apply a patch, then replace the actor set when one is given (None
    /// keeps the existing set). Returns None (and performs no write) when the
    /// id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: i64,
        patch: &MoviePatch,
        actor_ids: Option<&[i64]>,
    ) -> Result<Option<MovieRow>, AppError> {
        tracing::debug!(id, replace_actors = actor_ids.is_some(), "update movie");
        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, MovieRow>(&format!(
            r#"
            UPDATE movies SET
                title = COALESCE($2, title),
                year = COALESCE($3, year),
                country_origin_id = COALESCE($4, country_origin_id)
            WHERE id = $1
            RETURNING {}
            "#,
            MOVIE_COLUMNS
        ))
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.year)
        .bind(patch.country_origin_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        if let Some(ids) = actor_ids {
            Self::set_actors(&mut tx, id, ids).await?;
        }
        tx.commit().await?;
        Ok(Some(row))
    }

    /// Actors associated with a movie, primary key ascending.
    pub async fn actors_of(pool: &PgPool, movie_id: i64) -> Result<Vec<ActorRow>, AppError> {
        let rows = sqlx::query_as::<_, ActorRow>(
            r#"
            SELECT a.id, a.name FROM actors a
            JOIN movie_actors ma ON ma.actor_id = a.id
            WHERE ma.movie_id = $1
            ORDER BY a.id
            "#,
        )
        .bind(movie_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Replace the full association set for a movie.
    async fn set_actors(
        tx: &mut PgConnection,
        movie_id: i64,
        actor_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM movie_actors WHERE movie_id = $1")
            .bind(movie_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "INSERT INTO movie_actors (movie_id, actor_id) SELECT $1, UNNEST($2::BIGINT[])",
        )
        .bind(movie_id)
        .bind(actor_ids)
        .execute(&mut *tx)
        .await?;
        Ok(())
    }
}
