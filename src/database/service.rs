use anyhow::Result;
use log::info;
use std::sync::Arc;

use super::cache::Cache;
use super::mongodb::{MongoDbClient, MongoStorage};
use super::storage::{KeyValueStorage, MemoryStorage};
use crate::config::{StorageBackend, StorageConfig};

/// Storage service selecting the configured backend
///
/// The cache layer only sees `Arc<dyn KeyValueStorage>`; this facade is the
/// single place that knows which backend is in use.
#[derive(Clone)]
pub struct StorageService {
    storage: Arc<dyn KeyValueStorage>,
    backend: StorageBackend,
}

impl StorageService {
    /// Create the storage backend described by `config`
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let storage: Arc<dyn KeyValueStorage> = match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory cache storage");
                Arc::new(MemoryStorage::new())
            }
            StorageBackend::MongoDb => {
                config.mongodb.validate()?;
                let client = MongoDbClient::init(&config.mongodb).await?;
                Arc::new(MongoStorage::new(client))
            }
        };

        Ok(Self {
            storage,
            backend: config.backend,
        })
    }

    pub fn backend(&self) -> StorageBackend {
        self.backend
    }

    pub fn cache(&self) -> Cache {
        Cache::new(self.storage.clone())
    }
}
