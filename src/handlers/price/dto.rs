use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Response model for `GET /prices/{token_id}`
#[derive(Debug, Serialize)]
pub struct TokenPriceResponse {
    pub token_id: String,
    pub prices: BTreeMap<String, f64>,
    pub last_refreshed: Option<i64>,
}

/// Request model for `POST /prices/refresh`
#[derive(Debug, Deserialize)]
pub struct RefreshPricesRequest {
    pub token_ids: Vec<String>,
}

/// Response model for `POST /prices/refresh`
#[derive(Debug, Serialize)]
pub struct RefreshPricesResponse {
    pub requested: usize,
    pub batch_limit: usize,
}
