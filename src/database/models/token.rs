use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use super::chain::Chain;
use crate::database::cache::parse_timestamp;

/// Token record cached per chain
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Token {
    pub address: String,
    pub chain: Chain,
    #[serde(rename = "logoURI", default)]
    pub logo_uri: String,
    pub name: String,
    pub symbol: String,
    /// CoinGecko id, attached when the token is matched against the supported list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "chainId", default, skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u8>,
}

impl Token {
    pub fn new(address: String, chain: Chain, name: String, symbol: String) -> Self {
        Self {
            address,
            chain,
            logo_uri: String::new(),
            name,
            symbol,
            id: None,
            chain_id: None,
            decimals: None,
        }
    }
}

/// Entry of the CoinGecko coin list.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SupportedToken {
    pub id: String,
    #[serde(default)]
    pub symbol: String,
    pub name: String,
}

/// Cached payload under `tokens-supported`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct SupportedTokenList {
    #[serde(default)]
    pub supported_tokens: Vec<SupportedToken>,
}

impl SupportedTokenList {
    /// First entry whose name equals `name` exactly.
    pub fn find_by_name(&self, name: &str) -> Option<&SupportedToken> {
        self.supported_tokens.iter().find(|t| t.name == name)
    }

    /// Name to id index; the first entry wins on duplicate names.
    pub fn index_by_name(&self) -> HashMap<&str, &str> {
        let mut index = HashMap::with_capacity(self.supported_tokens.len());
        for token in &self.supported_tokens {
            index
                .entry(token.name.as_str())
                .or_insert(token.id.as_str());
        }
        index
    }
}

/// Cached payload under `tokens-<Chain>`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ChainTokenData {
    #[serde(default)]
    pub tokens: Vec<Token>,
    #[serde(
        default,
        deserialize_with = "deserialize_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_refreshed: Option<i64>,
    /// Remaining top-level fields of the provider token list (name, version, ...).
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(parse_timestamp))
}
