use anyhow::Context;
use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::{postgres::PgPoolOptions, types::Json, FromRow, PgPool, Postgres, QueryBuilder};
use tracing::debug;
use uuid::Uuid;

use super::{DocumentStore, Entity, Query, SortDirection, StoreError};

/// Entities kept as JSONB documents in a single `entities` table.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct EntityRow {
    kind: String,
    name: String,
    properties: Json<Value>,
}

impl From<EntityRow> for Entity {
    fn from(row: EntityRow) -> Self {
        // Anything other than an object is left for the record codec to reject.
        let properties = match row.properties.0 {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind: row.kind,
            name: Some(row.name),
            properties,
        }
    }
}

impl PgDocumentStore {
    pub async fn connect(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .context("connect to database")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn put(&self, entity: Entity) -> Result<String, StoreError> {
        let name = entity.name.unwrap_or_else(|| Uuid::new_v4().to_string());
        sqlx::query(
            r#"
            INSERT INTO entities (kind, name, properties)
            VALUES ($1, $2, $3)
            ON CONFLICT (kind, name) DO UPDATE SET properties = EXCLUDED.properties
            "#,
        )
        .bind(&entity.kind)
        .bind(&name)
        .bind(Json(Value::Object(entity.properties)))
        .execute(&self.pool)
        .await?;
        debug!(kind = %entity.kind, %name, "entity stored");
        Ok(name)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entity>, StoreError> {
        let mut qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT kind, name, properties FROM entities WHERE kind = ");
        qb.push_bind(&query.kind);

        // Served by the GIN index on `properties`.
        if let Some((property, value)) = &query.filter {
            let mut wanted = Map::new();
            wanted.insert(property.clone(), value.clone());
            qb.push(" AND properties @> ")
                .push_bind(Json(Value::Object(wanted)));
        }

        match &query.sort {
            Some((property, direction)) => {
                qb.push(" AND jsonb_exists(properties, ")
                    .push_bind(property)
                    .push(") ORDER BY properties -> ")
                    .push_bind(property)
                    .push(match direction {
                        SortDirection::Ascending => " ASC",
                        SortDirection::Descending => " DESC",
                    });
            }
            None => {
                qb.push(" ORDER BY created_at ASC");
            }
        }

        let rows = qb.build_query_as::<EntityRow>().fetch_all(&self.pool).await?;
        Ok(rows.into_iter().map(Entity::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Connects to `DATABASE_URL` when it is set; these tests are skipped otherwise.
    async fn live_store() -> Option<PgDocumentStore> {
        let url = std::env::var("DATABASE_URL").ok()?;
        let store = PgDocumentStore::connect(&url).await.expect("connect");
        sqlx::migrate!("./migrations")
            .run(store.pool())
            .await
            .expect("migrate");
        Some(store)
    }

    fn note(kind: &str, name: Option<&str>, owner: &str, rank: Option<i64>) -> Entity {
        let mut e = match name {
            Some(n) => Entity::named(kind, n),
            None => Entity::new(kind),
        };
        e.set("owner", owner);
        if let Some(r) = rank {
            e.set("rank", r);
        }
        e
    }

    #[tokio::test]
    async fn sql_filters_sorts_and_upserts() {
        let Some(store) = live_store().await else {
            eprintln!("DATABASE_URL not set; skipping");
            return;
        };
        let kind = format!("Note-{}", Uuid::new_v4());

        store.put(note(&kind, Some("a"), "x@x.io", Some(2))).await.unwrap();
        store.put(note(&kind, None, "x@x.io", Some(9))).await.unwrap();
        store.put(note(&kind, Some("c"), "x@x.io", None)).await.unwrap();
        store.put(note(&kind, Some("d"), "y@x.io", Some(5))).await.unwrap();
        // Replaces "a" in place.
        store.put(note(&kind, Some("a"), "x@x.io", Some(7))).await.unwrap();

        let unsorted = store
            .query(&Query::new(&kind).filter_eq("owner", "x@x.io"))
            .await
            .unwrap();
        let ranks: Vec<_> = unsorted.iter().map(|e| e.get_i64("rank").ok()).collect();
        assert_eq!(ranks, vec![Some(7), Some(9), None]);
        assert_eq!(unsorted[0].name.as_deref(), Some("a"));

        let sorted = store
            .query(
                &Query::new(&kind)
                    .filter_eq("owner", "x@x.io")
                    .sort_by("rank", SortDirection::Descending),
            )
            .await
            .unwrap();
        let ranks: Vec<_> = sorted.iter().map(|e| e.get_i64("rank").unwrap()).collect();
        assert_eq!(ranks, vec![9, 7]);

        let everyone = store
            .query(&Query::new(&kind).sort_by("rank", SortDirection::Ascending))
            .await
            .unwrap();
        let ranks: Vec<_> = everyone.iter().map(|e| e.get_i64("rank").unwrap()).collect();
        assert_eq!(ranks, vec![5, 7, 9]);

        sqlx::query("DELETE FROM entities WHERE kind = $1")
            .bind(&kind)
            .execute(store.pool())
            .await
            .unwrap();
    }

    #[test]
    fn non_object_documents_become_empty() {
        let entity = Entity::from(EntityRow {
            kind: "User".into(),
            name: "a@x.io".into(),
            properties: Json(json!([1, 2, 3])),
        });
        assert!(entity.properties.is_empty());
        assert_eq!(entity.name.as_deref(), Some("a@x.io"));
    }
}
