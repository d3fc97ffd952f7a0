// Cache storage modules
pub mod cache;
pub mod models;
pub mod mongodb;
pub mod service;
pub mod storage;

// Re-export commonly used types
pub use cache::{Cache, MILLISECONDS_ONE_DAY, MILLISECONDS_ONE_HOUR};
pub use mongodb::{MongoDbClient, MongoStorage};
pub use service::StorageService;
pub use storage::{KeyValueStorage, MemoryStorage};
