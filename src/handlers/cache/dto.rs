use serde::{Deserialize, Serialize};

/// Request model for `POST /cache/clear`
#[derive(Debug, Deserialize)]
pub struct ClearCacheRequest {
    pub keys: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ClearCacheResponse {
    pub cleared: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshCacheResponse {
    pub status: &'static str,
}
