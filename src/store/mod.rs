//! Schemaless document storage.
//!
//! Entities are addressed by `(kind, name)`. Writing an entity whose key
//! already exists replaces it; writing one without a name inserts it under a
//! freshly generated key.

pub mod memory;
pub mod postgres;

use std::cmp::Ordering;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backend could not be reached: pool exhausted or closed, I/O, TLS.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    /// The backend answered but the call failed (bad SQL, decode errors, ...).
    #[error("store error: {0}")]
    Backend(#[source] sqlx::Error),
    #[error("more than one {kind} entity matches {key}")]
    DuplicateKey { kind: &'static str, key: String },
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => Self::Unavailable(e),
            other => Self::Backend(other),
        }
    }
}

/// Reasons a single stored entity could not be read back as a typed record.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum RecordError {
    #[error("entity has no key")]
    MissingKey,
    #[error("invalid id: {0}")]
    InvalidId(#[from] uuid::Error),
    #[error("missing property `{0}`")]
    MissingProperty(&'static str),
    #[error("property `{property}` is not {expected}")]
    WrongType {
        property: &'static str,
        expected: &'static str,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub kind: String,
    pub name: Option<String>,
    pub properties: Map<String, Value>,
}

impl Entity {
    /// An entity that will be stored under a generated key.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: None,
            properties: Map::new(),
        }
    }

    pub fn named(kind: &str, name: impl Into<String>) -> Self {
        Self {
            kind: kind.to_string(),
            name: Some(name.into()),
            properties: Map::new(),
        }
    }

    pub fn set(&mut self, property: &str, value: impl Into<Value>) {
        self.properties.insert(property.to_string(), value.into());
    }

    pub fn name(&self) -> Result<&str, RecordError> {
        self.name.as_deref().ok_or(RecordError::MissingKey)
    }

    fn property(&self, property: &'static str) -> Result<&Value, RecordError> {
        match self.properties.get(property) {
            None | Some(Value::Null) => Err(RecordError::MissingProperty(property)),
            Some(v) => Ok(v),
        }
    }

    pub fn get_str(&self, property: &'static str) -> Result<&str, RecordError> {
        self.property(property)?
            .as_str()
            .ok_or(RecordError::WrongType {
                property,
                expected: "a string",
            })
    }

    /// Like [`Entity::get_str`] but an absent property reads as `None`.
    pub fn get_opt_str(&self, property: &'static str) -> Result<Option<&str>, RecordError> {
        match self.get_str(property) {
            Ok(s) => Ok(Some(s)),
            Err(RecordError::MissingProperty(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn get_i64(&self, property: &'static str) -> Result<i64, RecordError> {
        self.property(property)?
            .as_i64()
            .ok_or(RecordError::WrongType {
                property,
                expected: "an integer",
            })
    }

    pub fn get_f64(&self, property: &'static str) -> Result<f64, RecordError> {
        self.property(property)?
            .as_f64()
            .ok_or(RecordError::WrongType {
                property,
                expected: "a number",
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone)]
pub struct Query {
    pub kind: String,
    pub filter: Option<(String, Value)>,
    pub sort: Option<(String, SortDirection)>,
}

impl Query {
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            filter: None,
            sort: None,
        }
    }

    pub fn filter_eq(mut self, property: &str, value: impl Into<Value>) -> Self {
        self.filter = Some((property.to_string(), value.into()));
        self
    }

    pub fn sort_by(mut self, property: &str, direction: SortDirection) -> Self {
        self.sort = Some((property.to_string(), direction));
        self
    }

    /// Whether `entity` passes the kind and filter clauses of this query.
    pub(crate) fn matches(&self, entity: &Entity) -> bool {
        if entity.kind != self.kind {
            return false;
        }
        if let Some((property, value)) = &self.filter {
            if entity.properties.get(property) != Some(value) {
                return false;
            }
        }
        if let Some((property, _)) = &self.sort {
            if !entity.properties.contains_key(property) {
                return false;
            }
        }
        true
    }
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Upserts `entity` and returns the key it was stored under.
    async fn put(&self, entity: Entity) -> Result<String, StoreError>;

    async fn query(&self, query: &Query) -> Result<Vec<Entity>, StoreError>;
}

/// Orders JSON values the way the backing store orders indexed properties:
/// numbers numerically, strings lexically, mixed types by type rank.
pub(crate) fn compare_values(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) => 4,
            Value::Object(_) => 5,
        }
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x.cmp(&y),
            _ => x
                .as_f64()
                .unwrap_or(f64::NAN)
                .total_cmp(&y.as_f64().unwrap_or(f64::NAN)),
        },
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => rank(a).cmp(&rank(b)),
    }
}
