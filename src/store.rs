//! Catalog table DDL and database bootstrap.

use crate::error::AppError;
use sqlx::ConnectOptions;
use sqlx::PgPool;
use std::str::FromStr;

/// Idempotent DDL for the catalog tables. `movies.country_origin_id` is
/// nullable: createMovie accepts a missing country (see DESIGN.md).
const CATALOG_DDL: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS actors (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS country_origins (
        id BIGSERIAL PRIMARY KEY,
        country TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movies (
        id BIGSERIAL PRIMARY KEY,
        title TEXT NOT NULL,
        year INT NOT NULL,
        country_origin_id BIGINT REFERENCES country_origins(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS movie_actors (
        movie_id BIGINT NOT NULL REFERENCES movies(id) ON DELETE CASCADE,
        actor_id BIGINT NOT NULL REFERENCES actors(id),
        PRIMARY KEY (movie_id, actor_id)
    )
    "#,
];

/// Create the catalog tables if they do not exist.
pub async fn ensure_tables(pool: &PgPool) -> Result<(), AppError> {
    for ddl in CATALOG_DDL {
        sqlx::query(ddl).execute(pool).await?;
    }
    Ok(())
}

/// Ensure the database in `database_url` exists; create it if not. Connects to
/// the default `postgres` database to run CREATE DATABASE. Call before
/// creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_admin_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)
        .map_err(|e| AppError::Validation(format!("invalid DATABASE_URL: {}", e)))?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let exists: (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&mut conn)
            .await?;
    if !exists.0 {
        tracing::info!(db = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Split a connection URL into (admin url pointing at `postgres`, db name).
fn split_admin_url(url: &str) -> Result<(String, String), AppError> {
    let path_start = url
        .rfind('/')
        .ok_or_else(|| AppError::Validation("DATABASE_URL: no path".into()))?
        + 1;
    let db_name = url
        .get(path_start..)
        .unwrap_or("")
        .split('?')
        .next()
        .unwrap_or("")
        .trim()
        .to_string();
    let admin_url = format!("{}postgres", url.get(..path_start).unwrap_or(url));
    Ok((admin_url, db_name))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
