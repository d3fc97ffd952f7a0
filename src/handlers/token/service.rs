use log::debug;

use crate::{
    database::models::{Chain, Token},
    errors::{Error, Result},
    handlers::token::dto::{ChainResponse, ChainTokensResponse},
    services::TokenDataService,
    validation::validate_chain,
};

/// Service layer for token queries over the chain caches
pub struct TokenService;

impl TokenService {
    /// Every supported chain in table order
    pub fn list_chains() -> Vec<ChainResponse> {
        Chain::all().map(ChainResponse::from).collect()
    }

    /// Parse a comma-separated chain filter
    ///
    /// # Arguments
    /// * `chains` - Chain names such as `Ethereum,Polygon`; blank means all chains
    ///
    /// # Returns
    /// * `Ok(Vec<Chain>)` - The selected chains, without duplicates
    /// * `Err(Error::Validation)` - If a name is not a supported chain
    pub fn parse_chains(chains: Option<&str>) -> Result<Vec<Chain>> {
        let mut selected = Vec::new();
        for name in chains.unwrap_or_default().split(',').map(str::trim) {
            if name.is_empty() {
                continue;
            }
            let chain = validate_chain(name)?;
            if !selected.contains(&chain) {
                selected.push(chain);
            }
        }

        if selected.is_empty() {
            return Ok(Chain::all().collect());
        }
        Ok(selected)
    }

    /// Search cached tokens
    ///
    /// # Arguments
    /// * `data` - Token data service
    /// * `query` - Case-insensitive substring of the name, symbol or address; blank matches all
    /// * `chains` - Comma-separated chain filter
    ///
    /// # Returns
    /// * `Ok(Vec<Token>)` - Matching tokens in chain order
    /// * `Err(Error)` - If the chain filter is invalid or the cache is unreadable
    pub async fn search_tokens(
        data: &TokenDataService,
        query: Option<&str>,
        chains: Option<&str>,
    ) -> Result<Vec<Token>> {
        let chains = Self::parse_chains(chains)?;
        let query = query.unwrap_or_default().trim().to_lowercase();
        debug!("Searching tokens for {:?} on {:?}", query, chains);

        let tokens = data.tokens_of(&chains).await?;
        if query.is_empty() {
            return Ok(tokens);
        }

        Ok(tokens
            .into_iter()
            .filter(|token| Self::matches(token, &query))
            .collect())
    }

    fn matches(token: &Token, query: &str) -> bool {
        [&token.name, &token.symbol, &token.address]
            .iter()
            .any(|field| field.to_lowercase().contains(query))
    }

    /// Cached token list of one chain
    ///
    /// # Returns
    /// * `Ok(ChainTokensResponse)` - The cached list
    /// * `Err(Error::NotFound)` - If the chain has not been fetched yet
    pub async fn get_chain_tokens(data: &TokenDataService, chain: &str) -> Result<ChainTokensResponse> {
        let chain = validate_chain(chain)?;
        let cached = data
            .chain_tokens()
            .token_data(chain)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No cached tokens for {}", chain)))?;

        Ok(ChainTokensResponse {
            chain,
            tokens: cached.tokens,
            last_refreshed: cached.last_refreshed,
            metadata: cached.metadata,
        })
    }
}
