//! Typed access to the records kept in the document store.

pub mod codec;
pub mod repo_types;

use std::sync::Arc;

use tracing::{error, instrument, warn};

use crate::store::{DocumentStore, Entity, Query, SortDirection, StoreError};
use codec::Record;
pub use repo_types::{Interest, Message, User, UserMarker};

#[derive(Clone)]
pub struct Datastore {
    store: Arc<dyn DocumentStore>,
}

impl Datastore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn put<R: Record>(&self, record: &R) -> Result<(), StoreError> {
        self.store.put(record.to_entity()).await?;
        Ok(())
    }

    /// Runs `query` and decodes every hit, dropping the ones that don't decode.
    async fn fetch<R: Record>(&self, query: Query) -> Result<Vec<R>, StoreError> {
        let entities = self.store.query(&query).await?;
        Ok(decode_all(entities))
    }

    #[instrument(skip(self, message), fields(id = %message.id))]
    pub async fn store_message(&self, message: &Message) -> Result<(), StoreError> {
        self.put(message).await
    }

    /// Messages sent to `recipient`, newest first.
    pub async fn get_messages(&self, recipient: &str) -> Result<Vec<Message>, StoreError> {
        self.fetch(
            Query::new(Message::KIND)
                .filter_eq("recipient", recipient)
                .sort_by("timestamp", SortDirection::Descending),
        )
        .await
    }

    /// Every message, newest first.
    pub async fn get_all_messages(&self) -> Result<Vec<Message>, StoreError> {
        self.fetch(Query::new(Message::KIND).sort_by("timestamp", SortDirection::Descending))
            .await
    }

    pub async fn store_interest(&self, interest: &Interest) -> Result<(), StoreError> {
        self.put(interest).await
    }

    pub async fn get_interests(&self, email: &str) -> Result<Vec<Interest>, StoreError> {
        self.fetch(Query::new(Interest::KIND).filter_eq("email", email))
            .await
    }

    pub async fn store_user(&self, user: &User) -> Result<(), StoreError> {
        self.put(user).await
    }

    /// Returns `None` when nobody is stored under `email`.
    ///
    /// Users are keyed by email, so more than one match means the store was
    /// written to outside this type and is reported as an error.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, StoreError> {
        let mut hits = self
            .store
            .query(&Query::new(User::KIND).filter_eq("email", email))
            .await?;

        if hits.len() > 1 {
            error!(%email, count = hits.len(), "duplicate user entities");
            return Err(StoreError::DuplicateKey {
                kind: User::KIND,
                key: email.to_string(),
            });
        }
        Ok(hits.pop().and_then(|e| decode_one(&e)))
    }

    pub async fn store_marker(&self, marker: &UserMarker) -> Result<(), StoreError> {
        self.put(marker).await
    }

    pub async fn get_markers(&self, user: &str) -> Result<Vec<UserMarker>, StoreError> {
        self.fetch(Query::new(UserMarker::KIND).filter_eq("user", user))
            .await
    }
}

fn decode_one<R: Record>(entity: &Entity) -> Option<R> {
    match R::from_entity(entity) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(
                kind = R::KIND,
                key = entity.name.as_deref().unwrap_or("<none>"),
                error = %e,
                "skipping unreadable record"
            );
            None
        }
    }
}

fn decode_all<R: Record>(entities: Vec<Entity>) -> Vec<R> {
    entities.iter().filter_map(decode_one::<R>).collect()
}
