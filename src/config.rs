use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

/// Settings for verifying tokens minted by the identity service.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub login_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectStoreConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub upload_ttl_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub store_backend: StoreBackend,
    pub database_url: Option<String>,
    pub identity: IdentityConfig,
    pub object_store: ObjectStoreConfig,
    pub bus_stops_csv: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let store_backend = match std::env::var("STORE_BACKEND").as_deref() {
            Ok("memory") => StoreBackend::Memory,
            Ok("postgres") | Err(_) => StoreBackend::Postgres,
            Ok(other) => anyhow::bail!("unknown STORE_BACKEND `{other}`"),
        };
        let database_url = std::env::var("DATABASE_URL").ok();
        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            anyhow::bail!("DATABASE_URL must be set for the postgres store");
        }

        let identity = IdentityConfig {
            secret: std::env::var("IDENTITY_JWT_SECRET").context("IDENTITY_JWT_SECRET")?,
            issuer: std::env::var("IDENTITY_ISSUER")
                .unwrap_or_else(|_| "townsquare-identity".into()),
            audience: std::env::var("IDENTITY_AUDIENCE").unwrap_or_else(|_| "townsquare".into()),
            login_url: std::env::var("LOGIN_URL").unwrap_or_else(|_| "/index.html".into()),
        };

        let object_store = ObjectStoreConfig {
            endpoint: std::env::var("MINIO_ENDPOINT").context("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET").context("MINIO_BUCKET")?,
            access_key: std::env::var("MINIO_ACCESS_KEY").context("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY").context("MINIO_SECRET_KEY")?,
            upload_ttl_secs: std::env::var("UPLOAD_URL_TTL_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(600),
        };

        Ok(Self {
            store_backend,
            database_url,
            identity,
            object_store,
            bus_stops_csv: std::env::var("BUS_STOPS_CSV")
                .unwrap_or_else(|_| "data/bus_stops.csv".into()),
        })
    }
}
