use log::{debug, info};
use std::sync::Arc;

use super::http::HttpClient;
use crate::config::CoinGeckoConfig;
use crate::database::models::{SupportedToken, SupportedTokenList, Token};
use crate::database::Cache;
use crate::errors::{Error, Result};
use crate::validation::validate_token;

/// Cache key of the CoinGecko coin list.
pub const SUPPORTED_TOKENS_CACHE_KEY: &str = "tokens-supported";

/// Fetches and queries the set of tokens CoinGecko can price.
#[derive(Clone)]
pub struct SupportedTokenProvider {
    cache: Cache,
    http: Arc<dyn HttpClient>,
    url: String,
    refresh_interval_ms: i64,
}

impl SupportedTokenProvider {
    pub fn new(cache: Cache, http: Arc<dyn HttpClient>, config: &CoinGeckoConfig) -> Self {
        Self {
            cache,
            http,
            url: config.supported_tokens_url.clone(),
            refresh_interval_ms: config.token_list_refresh_interval_ms,
        }
    }

    /// Refresh the supported-token list if it is stale.
    ///
    /// `progress` is called exactly once. Fetch, parse and storage errors are
    /// returned after the callback.
    pub async fn refresh_supported_tokens<P: FnMut()>(&self, progress: &mut P) -> Result<()> {
        let result = self.refresh().await;
        progress();
        result
    }

    async fn refresh(&self) -> Result<()> {
        if !self
            .cache
            .requires_refresh(SUPPORTED_TOKENS_CACHE_KEY, self.refresh_interval_ms)
            .await?
        {
            debug!("Supported token list is fresh");
            return Ok(());
        }

        let body = self.http.get_text(&self.url).await.map_err(|e| {
            Error::Fetch(format!(
                "Error fetching supported tokens from {}: {}",
                self.url, e
            ))
        })?;

        let supported_tokens: Vec<SupportedToken> = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Error parsing supported tokens: {}", e)))?;

        info!("Fetched {} supported tokens", supported_tokens.len());

        let data = SupportedTokenList { supported_tokens };
        self.cache
            .set_cached_data(SUPPORTED_TOKENS_CACHE_KEY, &data)
            .await?;
        self.cache
            .set_last_refresh_date(SUPPORTED_TOKENS_CACHE_KEY)
            .await
    }

    /// Cached list; [`Error::NotFound`] if it was never fetched.
    pub async fn supported_tokens(&self) -> Result<SupportedTokenList> {
        self.cache
            .get_cached_data(SUPPORTED_TOKENS_CACHE_KEY)
            .await?
            .ok_or_else(|| Error::NotFound("supported token list is not cached".to_string()))
    }

    /// Whether a supported token has exactly the same name as `token`.
    pub async fn is_supported(&self, token: &Token) -> Result<bool> {
        validate_token(token)?;
        Ok(self.supported_tokens().await?.find_by_name(&token.name).is_some())
    }

    /// CoinGecko id of the first supported token named like `token`.
    pub async fn get_token_id(&self, token: &Token) -> Result<String> {
        validate_token(token)?;
        self.supported_tokens()
            .await?
            .find_by_name(&token.name)
            .map(|supported| supported.id.clone())
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "token \"{}\" is not in the supported token list",
                    token.name
                ))
            })
    }
}
