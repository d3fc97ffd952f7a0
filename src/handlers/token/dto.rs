use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::database::models::{Chain, Token};

/// Query of `GET /tokens` and `tokens.html`
#[derive(Debug, Default, Deserialize)]
pub struct TokenSearchQuery {
    pub query: Option<String>,
    /// Comma-separated chain names; empty means every chain.
    pub chains: Option<String>,
}

/// Response model for `GET /chains`
#[derive(Debug, Serialize)]
pub struct ChainResponse {
    pub name: Chain,
    pub endpoint: &'static str,
    pub cache_key: String,
}

impl From<Chain> for ChainResponse {
    fn from(chain: Chain) -> Self {
        Self {
            name: chain,
            endpoint: chain.endpoint(),
            cache_key: chain.cache_key(),
        }
    }
}

/// Response model for `GET /tokens/{chain}`
#[derive(Debug, Serialize)]
pub struct ChainTokensResponse {
    pub chain: Chain,
    pub tokens: Vec<Token>,
    pub last_refreshed: Option<i64>,
    pub metadata: Map<String, Value>,
}
