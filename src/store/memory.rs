use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{compare_values, DocumentStore, Entity, Query, SortDirection, StoreError};

/// In-process store, kept in insertion order.
#[derive(Default)]
pub struct MemoryDocumentStore {
    entities: RwLock<Vec<Entity>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, mut entity: Entity) -> Result<String, StoreError> {
        let name = entity
            .name
            .get_or_insert_with(|| Uuid::new_v4().to_string())
            .clone();

        let mut entities = self.entities.write().await;
        match entities
            .iter_mut()
            .find(|e| e.kind == entity.kind && e.name.as_deref() == Some(name.as_str()))
        {
            Some(existing) => *existing = entity,
            None => entities.push(entity),
        }
        Ok(name)
    }

    async fn query(&self, query: &Query) -> Result<Vec<Entity>, StoreError> {
        let entities = self.entities.read().await;
        let mut hits: Vec<Entity> = entities
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect();

        if let Some((property, direction)) = &query.sort {
            hits.sort_by(|a, b| {
                let ord = compare_values(&a.properties[property], &b.properties[property]);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
        Ok(hits)
    }
}
