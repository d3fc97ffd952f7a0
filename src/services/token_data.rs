use std::sync::Arc;

use crate::config::CoinGeckoConfig;
use crate::database::models::{Chain, Token};
use crate::database::Cache;
use crate::errors::Result;
use crate::providers::{ChainTokenProvider, HttpClient, SupportedTokenProvider, TokenPriceProvider};

/// The cache and the three CoinGecko providers wired to it
#[derive(Clone)]
pub struct TokenDataService {
    cache: Cache,
    supported_tokens: SupportedTokenProvider,
    chain_tokens: ChainTokenProvider,
    token_prices: TokenPriceProvider,
}

impl TokenDataService {
    pub fn new(cache: Cache, http: Arc<dyn HttpClient>, config: &CoinGeckoConfig) -> Self {
        let supported_tokens = SupportedTokenProvider::new(cache.clone(), http.clone(), config);
        let chain_tokens =
            ChainTokenProvider::new(cache.clone(), http.clone(), supported_tokens.clone(), config);
        let token_prices = TokenPriceProvider::new(cache.clone(), http, config);

        Self {
            cache,
            supported_tokens,
            chain_tokens,
            token_prices,
        }
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn supported_tokens(&self) -> &SupportedTokenProvider {
        &self.supported_tokens
    }

    pub fn chain_tokens(&self) -> &ChainTokenProvider {
        &self.chain_tokens
    }

    pub fn token_prices(&self) -> &TokenPriceProvider {
        &self.token_prices
    }

    /// Cached tokens of `chains` in chain order; chains not yet fetched contribute nothing.
    pub async fn tokens_of(&self, chains: &[Chain]) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        for chain in chains {
            if let Some(data) = self.chain_tokens.token_data(*chain).await? {
                tokens.extend(data.tokens);
            }
        }
        Ok(tokens)
    }

    /// Cached token of `chain` carrying CoinGecko id `token_id`.
    pub async fn find_token(&self, chain: Chain, token_id: &str) -> Result<Option<Token>> {
        Ok(self.chain_tokens.token_data(chain).await?.and_then(|data| {
            data.tokens
                .into_iter()
                .find(|token| token.id.as_deref() == Some(token_id))
        }))
    }
}
