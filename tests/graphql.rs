//! End-to-end catalog scenarios through the GraphQL schema.
//!
//! These tests need a PostgreSQL instance; they skip (pass vacuously) when
//! `DATABASE_URL` is unset. Entities are created with unique names so runs
//! are independent of existing rows.

use cinegraph::{build_schema, ensure_tables, CatalogSchema, NodeId, NodeType};
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;

async fn setup() -> Option<CatalogSchema> {
    let url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("DATABASE_URL not set, skipping");
            return None;
        }
    };
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("connect");
    ensure_tables(&pool).await.expect("ddl");
    Some(build_schema(pool))
}

async fn exec(schema: &CatalogSchema, query: &str) -> Value {
    let resp = schema.execute(query).await;
    assert!(resp.errors.is_empty(), "unexpected errors: {:?}", resp.errors);
    resp.data.into_json().expect("json data")
}

fn unique(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    format!("{prefix}-{nanos}")
}

/// Global id that decodes fine but points at no row.
fn dangling(node_type: NodeType) -> String {
    NodeId::new(node_type, i64::MAX - 11).encode()
}

async fn create_actor(schema: &CatalogSchema, name: &str) -> String {
    let data = exec(
        schema,
        &format!(r#"mutation {{ createActor(input: {{name: "{name}"}}) {{ ok actor {{ id name }} }} }}"#),
    )
    .await;
    assert_eq!(data["createActor"]["ok"], Value::Bool(true));
    data["createActor"]["actor"]["id"].as_str().unwrap().to_string()
}

async fn create_country(schema: &CatalogSchema, country: &str) -> String {
    let data = exec(
        schema,
        &format!(
            r#"mutation {{ createCountryOrigin(input: {{country: "{country}"}}) {{ ok countryOrigin {{ id }} }} }}"#
        ),
    )
    .await;
    assert_eq!(data["createCountryOrigin"]["ok"], Value::Bool(true));
    data["createCountryOrigin"]["countryOrigin"]["id"].as_str().unwrap().to_string()
}

async fn create_movie(
    schema: &CatalogSchema,
    title: &str,
    year: i32,
    actor_ids: &[&str],
    country_id: Option<&str>,
) -> Value {
    let actors = actor_ids
        .iter()
        .map(|id| format!(r#""{id}""#))
        .collect::<Vec<_>>()
        .join(", ");
    let country = country_id
        .map(|id| format!(r#", countryOrigin: {{id: "{id}"}}"#))
        .unwrap_or_default();
    exec(
        schema,
        &format!(
            r#"mutation {{ createMovie(input: {{title: "{title}", year: {year}, actors: [{actors}]{country}}}) {{
                ok
                movie {{ id title year actors {{ id name }} countryOrigin {{ id country }} }}
            }} }}"#
        ),
    )
    .await
}

#[tokio::test]
async fn create_then_get_returns_identical_fields() {
    let Some(schema) = setup().await else { return };
    let name = unique("actor");
    let id = create_actor(&schema, &name).await;

    let data = exec(&schema, &format!(r#"{{ actor(id: "{id}") {{ id name }} }}"#)).await;
    assert_eq!(data["actor"]["id"], Value::String(id));
    assert_eq!(data["actor"]["name"], Value::String(name));
}

#[tokio::test]
async fn lookup_of_absent_row_is_null_not_error() {
    let Some(schema) = setup().await else { return };
    let id = dangling(NodeType::Actor);
    let data = exec(&schema, &format!(r#"{{ actor(id: "{id}") {{ id }} }}"#)).await;
    assert_eq!(data["actor"], Value::Null);
}

#[tokio::test]
async fn update_of_missing_rows_reports_not_ok() {
    let Some(schema) = setup().await else { return };

    let id = dangling(NodeType::Actor);
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateActor(id: "{id}", input: {{name: "x"}}) {{ ok actor {{ id }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateActor"]["ok"], Value::Bool(false));
    assert_eq!(data["updateActor"]["actor"], Value::Null);

    let id = dangling(NodeType::CountryOrigin);
    let data = exec(
        &schema,
        &format!(
            r#"mutation {{ updateCountryOrigin(id: "{id}", input: {{country: "x"}}) {{ ok countryOrigin {{ id }} }} }}"#
        ),
    )
    .await;
    assert_eq!(data["updateCountryOrigin"]["ok"], Value::Bool(false));
    assert_eq!(data["updateCountryOrigin"]["countryOrigin"], Value::Null);

    let id = dangling(NodeType::Movie);
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{id}", input: {{title: "x"}}) {{ ok movie {{ id }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateMovie"]["ok"], Value::Bool(false));
    assert_eq!(data["updateMovie"]["movie"], Value::Null);
}

#[tokio::test]
async fn partial_update_touches_only_present_fields() {
    let Some(schema) = setup().await else { return };
    let country_id = create_country(&schema, &unique("se")).await;
    let title = unique("movie");
    let data = create_movie(&schema, &title, 1999, &[], Some(&country_id)).await;
    let movie_id = data["createMovie"]["movie"]["id"].as_str().unwrap().to_string();

    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{year: 2001}}) {{ ok movie {{ title year }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateMovie"]["ok"], Value::Bool(true));
    assert_eq!(data["updateMovie"]["movie"]["title"], Value::String(title));
    assert_eq!(data["updateMovie"]["movie"]["year"], Value::from(2001));
}

#[tokio::test]
async fn update_movie_actor_set_semantics() {
    let Some(schema) = setup().await else { return };
    let a1 = create_actor(&schema, &unique("a1")).await;
    let a2 = create_actor(&schema, &unique("a2")).await;
    let data = create_movie(&schema, &unique("movie"), 2010, &[&a1], None).await;
    let movie_id = data["createMovie"]["movie"]["id"].as_str().unwrap().to_string();

    // actors omitted: set preserved
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{title: "kept"}}) {{ movie {{ actors {{ id }} }} }} }}"#),
    )
    .await;
    let actors = data["updateMovie"]["movie"]["actors"].as_array().unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["id"], Value::String(a1.clone()));

    // actors replaced in full
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{actors: ["{a1}", "{a2}"]}}) {{ movie {{ actors {{ id }} }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateMovie"]["movie"]["actors"].as_array().unwrap().len(), 2);

    // empty list empties the set
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{actors: []}}) {{ movie {{ actors {{ id }} }} }} }}"#),
    )
    .await;
    assert!(data["updateMovie"]["movie"]["actors"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_actor_ids_collapse_to_one_membership() {
    let Some(schema) = setup().await else { return };
    let a1 = create_actor(&schema, &unique("a1")).await;
    let a2 = create_actor(&schema, &unique("a2")).await;

    let data = create_movie(&schema, &unique("movie"), 2005, &[&a1, &a1], None).await;
    assert_eq!(data["createMovie"]["ok"], Value::Bool(true));
    let actors = data["createMovie"]["movie"]["actors"].as_array().unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["id"], Value::String(a1.clone()));

    let movie_id = data["createMovie"]["movie"]["id"].as_str().unwrap().to_string();
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{actors: ["{a2}", "{a1}", "{a2}"]}}) {{ ok movie {{ actors {{ id }} }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateMovie"]["ok"], Value::Bool(true));
    assert_eq!(data["updateMovie"]["movie"]["actors"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn create_movie_with_unknown_actor_creates_nothing() {
    let Some(schema) = setup().await else { return };
    let bogus = dangling(NodeType::Actor);
    let title = unique("ghost");
    let data = create_movie(&schema, &title, 2020, &[bogus.as_str()], None).await;
    assert_eq!(data["createMovie"]["ok"], Value::Bool(false));
    assert_eq!(data["createMovie"]["movie"], Value::Null);

    let data = exec(
        &schema,
        &format!(r#"{{ allMovies(title: "{title}") {{ edges {{ node {{ id }} }} }} }}"#),
    )
    .await;
    assert!(data["allMovies"]["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn update_movie_with_unknown_actor_aborts() {
    let Some(schema) = setup().await else { return };
    let a1 = create_actor(&schema, &unique("a1")).await;
    let data = create_movie(&schema, &unique("movie"), 2015, &[&a1], None).await;
    let movie_id = data["createMovie"]["movie"]["id"].as_str().unwrap().to_string();

    let bogus = dangling(NodeType::Actor);
    let data = exec(
        &schema,
        &format!(r#"mutation {{ updateMovie(id: "{movie_id}", input: {{actors: ["{bogus}"]}}) {{ ok movie {{ id }} }} }}"#),
    )
    .await;
    assert_eq!(data["updateMovie"]["ok"], Value::Bool(false));
    assert_eq!(data["updateMovie"]["movie"], Value::Null);

    // prior set untouched
    let data = exec(&schema, &format!(r#"{{ movie(id: "{movie_id}") {{ actors {{ id }} }} }}"#)).await;
    let actors = data["movie"]["actors"].as_array().unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["id"], Value::String(a1));
}

#[tokio::test]
async fn dangling_country_reference_is_silently_kept() {
    let Some(schema) = setup().await else { return };
    let country_id = create_country(&schema, &unique("uk")).await;
    let data = create_movie(&schema, &unique("movie"), 1995, &[], Some(&country_id)).await;
    let movie_id = data["createMovie"]["movie"]["id"].as_str().unwrap().to_string();

    let bogus = dangling(NodeType::CountryOrigin);
    let data = exec(
        &schema,
        &format!(
            r#"mutation {{ updateMovie(id: "{movie_id}", input: {{countryOrigin: {{id: "{bogus}"}}}}) {{ ok movie {{ countryOrigin {{ id }} }} }} }}"#
        ),
    )
    .await;
    assert_eq!(data["updateMovie"]["ok"], Value::Bool(true));
    assert_eq!(
        data["updateMovie"]["movie"]["countryOrigin"]["id"],
        Value::String(country_id)
    );
}

#[tokio::test]
async fn malformed_and_mismatched_ids_are_protocol_errors() {
    let Some(schema) = setup().await else { return };

    let resp = schema.execute(r#"{ movie(id: "not-a-global-id") { id } }"#).await;
    assert!(!resp.errors.is_empty());

    // an actor id handed to the movie lookup is a type mismatch
    let actor_id = create_actor(&schema, &unique("actor")).await;
    let resp = schema
        .execute(format!(r#"{{ movie(id: "{actor_id}") {{ id }} }}"#))
        .await;
    assert!(!resp.errors.is_empty());
}

#[tokio::test]
async fn list_is_pk_ordered_and_cursor_paginated() {
    let Some(schema) = setup().await else { return };
    let name = unique("same-name");
    for _ in 0..3 {
        create_actor(&schema, &name).await;
    }

    let data = exec(
        &schema,
        &format!(
            r#"{{ allActors(name: "{name}", first: 2) {{
                edges {{ cursor node {{ id }} }}
                pageInfo {{ hasPreviousPage hasNextPage endCursor }}
            }} }}"#
        ),
    )
    .await;
    let edges = data["allActors"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 2);
    assert_eq!(data["allActors"]["pageInfo"]["hasPreviousPage"], Value::Bool(false));
    assert_eq!(data["allActors"]["pageInfo"]["hasNextPage"], Value::Bool(true));

    let keys: Vec<i64> = edges
        .iter()
        .map(|e| {
            NodeId::decode(e["node"]["id"].as_str().unwrap())
                .unwrap()
                .expect(NodeType::Actor)
                .unwrap()
        })
        .collect();
    assert!(keys[0] < keys[1], "pk order not ascending: {keys:?}");

    let cursor = data["allActors"]["pageInfo"]["endCursor"].as_str().unwrap().to_string();
    let data = exec(
        &schema,
        &format!(
            r#"{{ allActors(name: "{name}", first: 2, after: "{cursor}") {{
                edges {{ node {{ id }} }}
                pageInfo {{ hasPreviousPage hasNextPage }}
            }} }}"#
        ),
    )
    .await;
    let edges = data["allActors"]["edges"].as_array().unwrap();
    assert_eq!(edges.len(), 1);
    let next_key = NodeId::decode(edges[0]["node"]["id"].as_str().unwrap())
        .unwrap()
        .expect(NodeType::Actor)
        .unwrap();
    assert!(next_key > keys[1], "page 2 must continue past page 1");
    assert_eq!(data["allActors"]["pageInfo"]["hasPreviousPage"], Value::Bool(true));
    assert_eq!(data["allActors"]["pageInfo"]["hasNextPage"], Value::Bool(false));
}

#[tokio::test]
async fn uk_catalog_scenario() {
    let Some(schema) = setup().await else { return };
    let c1 = create_country(&schema, "UK").await;
    let a1 = create_actor(&schema, "A").await;

    let data = create_movie(&schema, "X", 2000, &[&a1], Some(&c1)).await;
    assert_eq!(data["createMovie"]["ok"], Value::Bool(true));
    let movie = &data["createMovie"]["movie"];
    assert_eq!(movie["title"], Value::String("X".into()));
    assert_eq!(movie["year"], Value::from(2000));
    let actors = movie["actors"].as_array().unwrap();
    assert_eq!(actors.len(), 1);
    assert_eq!(actors[0]["id"], Value::String(a1));
    assert_eq!(movie["countryOrigin"]["id"], Value::String(c1));
}

#[tokio::test]
async fn debug_field_reports_diagnostics() {
    let Some(schema) = setup().await else { return };
    let data = exec(&schema, r#"{ _debug { version poolSize poolIdle } }"#).await;
    assert_eq!(
        data["_debug"]["version"],
        Value::String(env!("CARGO_PKG_VERSION").into())
    );
}
