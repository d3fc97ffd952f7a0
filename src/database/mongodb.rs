use crate::config::MongoDbConfig;
use crate::database::models::CacheEntry;
use crate::database::storage::KeyValueStorage;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use bson::doc;
use log::{debug, error, info};
use mongodb::{
    options::{ClientOptions, IndexOptions, ServerApi, ServerApiVersion},
    Client, Collection, Database as MongoDatabase, IndexModel,
};
use std::sync::Arc;
use std::time::Duration;

const CACHE_COLLECTION: &str = "cache_entries";

/// MongoDB client wrapper for managing database connections and operations
#[derive(Debug, Clone)]
pub struct MongoDbClient {
    _client: Client,
    database: MongoDatabase,
}

impl MongoDbClient {
    /// Initialize the MongoDB client with configuration
    pub async fn init(config: &MongoDbConfig) -> Result<Arc<Self>> {
        let connection_string = config.uri.clone();
        let database_name = config.database.clone();

        info!(
            "Connecting to MongoDB at {} with database {}",
            connection_string, database_name
        );

        let mut client_options = ClientOptions::parse(&connection_string)
            .await
            .map_err(|e| anyhow!("Failed to parse MongoDB connection string: {}", e))?;

        let server_api = ServerApi::builder().version(ServerApiVersion::V1).build();
        client_options.server_api = Some(server_api);
        client_options.connect_timeout = Some(Duration::from_millis(config.connection_timeout_ms));
        client_options.max_pool_size = config.max_pool_size;

        let client = Client::with_options(client_options)
            .map_err(|e| anyhow!("Failed to create MongoDB client: {}", e))?;

        let database = client.database(&database_name);

        // Test connection
        match database.run_command(doc! { "ping": 1 }).await {
            Ok(_) => info!(
                "Successfully connected to MongoDB database: {}",
                database_name
            ),
            Err(e) => {
                error!("Failed to connect to MongoDB: {}", e);
                return Err(anyhow!("Failed to connect to MongoDB: {}", e));
            }
        }

        let db_client = Arc::new(Self {
            _client: client,
            database,
        });

        db_client.create_indexes().await?;

        Ok(db_client)
    }

    /// Get a collection with the given name
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection(name)
    }

    /// Create required indexes for the cache collection
    pub async fn create_indexes(&self) -> Result<()> {
        info!("Creating MongoDB indexes...");

        let collection = self
            .database
            .collection::<mongodb::bson::Document>(CACHE_COLLECTION);

        let updated_at_index = IndexModel::builder()
            .keys(doc! { "updated_at": -1 })
            .options(IndexOptions::builder().build())
            .build();

        collection
            .create_index(updated_at_index)
            .await
            .map_err(|e| anyhow!("Failed to create cache updated_at index: {}", e))?;

        info!("MongoDB indexes created successfully");
        Ok(())
    }
}

/// Cache storage backed by the `cache_entries` collection, one document per key
#[derive(Debug, Clone)]
pub struct MongoStorage {
    client: Arc<MongoDbClient>,
}

impl MongoStorage {
    pub fn new(client: Arc<MongoDbClient>) -> Self {
        Self { client }
    }

    fn collection(&self) -> Collection<CacheEntry> {
        self.client.collection::<CacheEntry>(CACHE_COLLECTION)
    }
}

#[async_trait]
impl KeyValueStorage for MongoStorage {
    async fn get_item(&self, key: &str) -> crate::errors::Result<Option<String>> {
        let entry = self.collection().find_one(doc! { "_id": key }).await?;
        Ok(entry.map(|e| e.value))
    }

    async fn set_item(&self, key: &str, value: &str) -> crate::errors::Result<()> {
        let entry = CacheEntry::new(key.to_string(), value.to_string());
        self.collection()
            .replace_one(doc! { "_id": key }, entry)
            .upsert(true)
            .await?;
        debug!("Stored cache entry {}", key);
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> crate::errors::Result<()> {
        let result = self.collection().delete_one(doc! { "_id": key }).await?;
        if result.deleted_count > 0 {
            info!("Deleted cache entry {}", key);
        } else {
            debug!("Cache entry {} not found", key);
        }
        Ok(())
    }
}
