use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

/// Supported chain. The set is closed; names are case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chain {
    Arbitrum,
    Ethereum,
    Optimism,
    Polygon,
}

/// Chains in refresh order, each paired with its CoinGecko token-list slug.
pub const CHAIN_ENDPOINTS: [(Chain, &str); 4] = [
    (Chain::Arbitrum, "arbitrum-one"),
    (Chain::Ethereum, "ethereum"),
    (Chain::Optimism, "optimistic-ethereum"),
    (Chain::Polygon, "polygon-pos"),
];

impl Chain {
    pub fn all() -> impl Iterator<Item = Chain> {
        CHAIN_ENDPOINTS.iter().map(|(chain, _)| *chain)
    }

    pub fn name(self) -> &'static str {
        match self {
            Chain::Arbitrum => "Arbitrum",
            Chain::Ethereum => "Ethereum",
            Chain::Optimism => "Optimism",
            Chain::Polygon => "Polygon",
        }
    }

    /// CoinGecko slug used in the token-list URL.
    pub fn endpoint(self) -> &'static str {
        CHAIN_ENDPOINTS
            .iter()
            .find(|(chain, _)| *chain == self)
            .map(|(_, endpoint)| *endpoint)
            .unwrap_or_default()
    }

    pub fn cache_key(self) -> String {
        format!("tokens-{}", self.name())
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Chain::all()
            .find(|chain| chain.name() == s)
            .ok_or_else(|| Error::Validation(format!("\"{}\" is not a supported chain", s)))
    }
}
