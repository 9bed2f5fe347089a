use crate::bus_stops::{self, BusStop};
use crate::config::{AppConfig, StoreBackend};
use crate::datastore::Datastore;
use crate::storage::{Storage, StorageClient};
use crate::store::{DocumentStore, MemoryDocumentStore, PgDocumentStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub datastore: Datastore,
    pub config: Arc<AppConfig>,
    pub storage: Arc<dyn StorageClient>,
    pub bus_stops: Arc<Vec<BusStop>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let store: Arc<dyn DocumentStore> = match config.store_backend {
            StoreBackend::Postgres => {
                let url = config
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL must be set")?;
                let pg = PgDocumentStore::connect(url).await?;
                if let Err(e) = sqlx::migrate!("./migrations").run(pg.pool()).await {
                    warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(pg)
            }
            StoreBackend::Memory => {
                warn!("using in-memory store; data is lost on restart");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        let storage = Arc::new(Storage::new(&config.object_store, "us-east-1").await?)
            as Arc<dyn StorageClient>;

        let bus_stops = bus_stops::load(&config.bus_stops_csv)?;
        info!(count = bus_stops.len(), path = %config.bus_stops_csv, "bus stops loaded");

        Ok(Self {
            datastore: Datastore::new(store),
            config,
            storage,
            bus_stops: Arc::new(bus_stops),
        })
    }

    /// State backed by the memory store and a fake object store.
    #[cfg(test)]
    pub fn fake() -> Self {
        use crate::config::{IdentityConfig, ObjectStoreConfig};
        use async_trait::async_trait;

        #[derive(Clone)]
        struct FakeStorage;
        #[async_trait]
        impl StorageClient for FakeStorage {
            async fn presign_put(&self, k: &str, s: u64) -> anyhow::Result<String> {
                Ok(format!("https://fake.local/{}?expires={}", k, s))
            }
            fn public_url(&self, k: &str) -> String {
                format!("https://fake.local/{}", k)
            }
        }

        let config = Arc::new(AppConfig {
            store_backend: StoreBackend::Memory,
            database_url: None,
            identity: IdentityConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                login_url: "/index.html".into(),
            },
            object_store: ObjectStoreConfig {
                endpoint: "fake".into(),
                bucket: "fake".into(),
                access_key: "fake".into(),
                secret_key: "fake".into(),
                upload_ttl_secs: 600,
            },
            bus_stops_csv: "data/bus_stops.csv".into(),
        });

        let bus_stops = vec![
            BusStop {
                neighborhood: "Downtown".into(),
                lat: 38.4404675,
                lng: -122.7144313,
            },
            BusStop {
                neighborhood: "Roseland".into(),
                lat: 38.4202384,
                lng: -122.7463751,
            },
        ];

        Self {
            datastore: Datastore::new(Arc::new(MemoryDocumentStore::new())),
            config,
            storage: Arc::new(FakeStorage) as Arc<dyn StorageClient>,
            bus_stops: Arc::new(bus_stops),
        }
    }
}
