use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::sync::Arc;

use super::http::HttpClient;
use super::supported_tokens::SupportedTokenProvider;
use crate::config::CoinGeckoConfig;
use crate::database::models::{Chain, ChainTokenData, Token, CHAIN_ENDPOINTS};
use crate::database::Cache;
use crate::errors::{Error, Result};
use crate::validation::{validate_chain, validate_token_value};

/// Fetches the CoinGecko token list of every supported chain and keeps the
/// tokens that can be priced.
#[derive(Clone)]
pub struct ChainTokenProvider {
    cache: Cache,
    http: Arc<dyn HttpClient>,
    supported: SupportedTokenProvider,
    base_url: String,
    file_name: String,
    refresh_interval_ms: i64,
}

impl ChainTokenProvider {
    pub fn new(
        cache: Cache,
        http: Arc<dyn HttpClient>,
        supported: SupportedTokenProvider,
        config: &CoinGeckoConfig,
    ) -> Self {
        Self {
            cache,
            http,
            supported,
            base_url: config.token_list_base_url.clone(),
            file_name: config.token_list_file_name.clone(),
            refresh_interval_ms: config.token_list_refresh_interval_ms,
        }
    }

    /// Refresh the supported-token list, then every stale chain.
    ///
    /// `progress` is called once for the supported list and once per chain.
    /// Only supported-list failures are returned; a failing chain is logged
    /// and skipped.
    pub async fn refresh_token_cache<P: FnMut()>(&self, progress: &mut P) -> Result<()> {
        self.supported.refresh_supported_tokens(progress).await?;

        for (chain, _) in CHAIN_ENDPOINTS {
            if let Err(e) = self.refresh_chain(chain).await {
                error!("Error refreshing token data for {}: {}", chain, e);
            }
            progress();
        }
        Ok(())
    }

    fn chain_url(&self, chain: Chain) -> String {
        format!("{}{}/{}", self.base_url, chain.endpoint(), self.file_name)
    }

    async fn refresh_chain(&self, chain: Chain) -> Result<()> {
        let key = chain.cache_key();
        if !self
            .cache
            .requires_refresh(&key, self.refresh_interval_ms)
            .await?
        {
            debug!("Token data for {} is fresh", chain);
            return Ok(());
        }

        let url = self.chain_url(chain);
        let body = self.http.get_text(&url).await.map_err(|e| {
            Error::Fetch(format!(
                "Error fetching token data for {} from {}: {}",
                chain, url, e
            ))
        })?;

        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Error parsing token data for {}: {}", chain, e)))?;
        let Value::Object(mut metadata) = payload else {
            return Err(Error::Parse(format!(
                "Token data for {} is not an object",
                chain
            )));
        };
        let listed = match metadata.remove("tokens") {
            Some(Value::Array(tokens)) => tokens,
            _ => {
                return Err(Error::Parse(format!(
                    "Token data for {} has no token array",
                    chain
                )))
            }
        };

        let tokens = self.supported_chain_tokens(chain, listed).await?;
        info!("Caching {} supported tokens for {}", tokens.len(), chain);

        let data = ChainTokenData {
            tokens,
            last_refreshed: None,
            metadata,
        };
        self.cache.set_cached_data(&key, &data).await?;
        self.cache.set_last_refresh_date(&key).await
    }

    /// Attach chain, default the logo, drop invalid and unsupported entries, attach ids.
    async fn supported_chain_tokens(&self, chain: Chain, listed: Vec<Value>) -> Result<Vec<Token>> {
        let supported = self.supported.supported_tokens().await?;
        let ids = supported.index_by_name();

        let total = listed.len();
        let mut invalid = 0;
        let mut tokens = Vec::new();
        for mut entry in listed {
            if let Some(object) = entry.as_object_mut() {
                prepare_token_object(object, chain);
            }

            let mut token = match validate_token_value(&entry) {
                Ok(token) => token,
                Err(e) => {
                    debug!("Skipping token entry on {}: {}", chain, e);
                    invalid += 1;
                    continue;
                }
            };

            if let Some(id) = ids.get(token.name.as_str()) {
                token.id = Some(id.to_string());
                tokens.push(token);
            }
        }

        if invalid > 0 {
            warn!("Skipped {} malformed token entries on {}", invalid, chain);
        }
        debug!("{} of {} tokens on {} are supported", tokens.len(), total, chain);
        Ok(tokens)
    }

    /// Cached token data for a chain name, or `None` if not yet fetched.
    pub async fn get_token_data(&self, chain: &str) -> Result<Option<ChainTokenData>> {
        let chain = validate_chain(chain)?;
        self.token_data(chain).await
    }

    pub async fn token_data(&self, chain: Chain) -> Result<Option<ChainTokenData>> {
        self.cache.get_cached_data(&chain.cache_key()).await
    }

    pub fn get_total_chains(&self) -> usize {
        CHAIN_ENDPOINTS.len()
    }
}

fn prepare_token_object(object: &mut Map<String, Value>, chain: Chain) {
    object.insert("chain".to_string(), Value::from(chain.name()));
    let has_logo = matches!(object.get("logoURI"), Some(Value::String(s)) if !s.is_empty());
    if !has_logo {
        object.insert("logoURI".to_string(), Value::from(""));
    }
}
