use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Raw cache document stored by the MongoDB backend
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheEntry {
    #[serde(rename = "_id")]
    pub key: String,
    /// JSON text exactly as written by the cache layer.
    pub value: String,
    /// Milliseconds since the Unix epoch.
    pub updated_at: u64,
}

impl CacheEntry {
    pub fn new(key: String, value: String) -> Self {
        Self {
            key,
            value,
            updated_at: Utc::now().timestamp_millis() as u64,
        }
    }
}
