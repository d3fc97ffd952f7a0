use chrono::Utc;
use log::{debug, error, info, warn};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

use super::http::HttpClient;
use crate::config::CoinGeckoConfig;
use crate::database::cache::{is_stale_at, LAST_REFRESHED_FIELD};
use crate::database::models::TokenPrice;
use crate::database::Cache;
use crate::errors::{Error, Result};
use crate::validation::{validate_non_empty_string, validate_string_array};

/// Cache key shared by the prices of every token.
pub const TOKEN_PRICES_CACHE_KEY: &str = "tokens-prices";

/// Fetches CoinGecko prices for token ids in every supported currency.
///
/// Clones share one refresh lock, so refreshes of the shared price entry run
/// one at a time.
#[derive(Clone)]
pub struct TokenPriceProvider {
    cache: Cache,
    http: Arc<dyn HttpClient>,
    refresh_lock: Arc<Mutex<()>>,
    price_url: String,
    currencies_url: String,
    batch_limit: usize,
    refresh_interval_ms: i64,
}

impl TokenPriceProvider {
    pub fn new(cache: Cache, http: Arc<dyn HttpClient>, config: &CoinGeckoConfig) -> Self {
        Self {
            cache,
            http,
            refresh_lock: Arc::new(Mutex::new(())),
            price_url: config.token_price_url.clone(),
            currencies_url: config.supported_currencies_url.clone(),
            batch_limit: config.price_batch_limit,
            refresh_interval_ms: config.price_refresh_interval_ms,
        }
    }

    pub fn batch_limit(&self) -> usize {
        self.batch_limit
    }

    /// Refresh the prices of the stale ids among `token_ids`.
    ///
    /// `progress` is called exactly once. Invalid ids are returned as
    /// [`Error::Validation`]; every other failure is logged and swallowed.
    pub async fn refresh_token_price_cache<P: FnMut()>(
        &self,
        progress: &mut P,
        token_ids: &[String],
    ) -> Result<()> {
        let result = self.refresh(token_ids).await;
        progress();
        match result {
            Err(e @ Error::Validation(_)) => Err(e),
            Err(e) => {
                error!("Error refreshing token prices: {}", e);
                Ok(())
            }
            Ok(()) => Ok(()),
        }
    }

    async fn refresh(&self, token_ids: &[String]) -> Result<()> {
        validate_string_array(token_ids, "token_ids")?;

        // Held from the staleness check until the merged entry is written.
        let _guard = self.refresh_lock.lock().await;
        let stale = self.stale_token_ids(token_ids).await?;
        if stale.is_empty() {
            debug!("No token prices require a refresh");
            return Ok(());
        }

        if stale.len() > self.batch_limit {
            error!(
                "Cannot fetch price data for more than {} tokens at once ({} requested).",
                self.batch_limit,
                stale.len()
            );
            return Ok(());
        }

        let currencies = self.get_supported_currencies().await?;
        let url = self.price_request_url(&stale, &currencies)?;
        let body = self.http.get_text(url.as_str()).await.map_err(|e| {
            Error::Fetch(format!(
                "Error fetching token price data from {}: {}",
                self.price_url, e
            ))
        })?;
        let prices: Map<String, Value> = serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Error parsing token price data: {}", e)))?;

        info!("Fetched prices for {} of {} tokens", prices.len(), stale.len());
        self.store_prices(prices).await
    }

    /// Distinct ids, in request order, whose cached price is missing or older than the interval.
    async fn stale_token_ids(&self, token_ids: &[String]) -> Result<Vec<String>> {
        let cached = self.cached_prices().await?;
        let now = Utc::now().timestamp_millis();

        let mut seen = HashSet::new();
        Ok(token_ids
            .iter()
            .filter(|id| seen.insert(id.as_str()))
            .filter(|id| {
                let last = cached
                    .get(id.as_str())
                    .and_then(|price| price.get(LAST_REFRESHED_FIELD));
                is_stale_at(last, self.refresh_interval_ms, now)
            })
            .cloned()
            .collect())
    }

    /// The shared price entry; a corrupt entry is treated as empty.
    async fn cached_prices(&self) -> Result<Map<String, Value>> {
        match self
            .cache
            .get_cached_data::<Map<String, Value>>(TOKEN_PRICES_CACHE_KEY)
            .await
        {
            Ok(prices) => Ok(prices.unwrap_or_default()),
            Err(Error::Parse(e)) => {
                warn!("Discarding unreadable price cache: {}", e);
                Ok(Map::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn get_supported_currencies(&self) -> Result<Vec<String>> {
        let body = self.http.get_text(&self.currencies_url).await.map_err(|e| {
            Error::Fetch(format!(
                "Error fetching supported currencies from {}: {}",
                self.currencies_url, e
            ))
        })?;
        serde_json::from_str(&body)
            .map_err(|e| Error::Parse(format!("Error parsing supported currencies: {}", e)))
    }

    fn price_request_url(&self, token_ids: &[String], currencies: &[String]) -> Result<Url> {
        Url::parse_with_params(
            &self.price_url,
            &[
                ("ids", token_ids.join(",")),
                ("vs_currencies", currencies.join(",")),
                ("precision", "full".to_string()),
            ],
        )
        .map_err(|e| Error::Fetch(format!("Invalid token price URL {}: {}", self.price_url, e)))
    }

    /// Merge fetched prices into the shared entry, stamping each refreshed id.
    async fn store_prices(&self, prices: Map<String, Value>) -> Result<()> {
        let mut cached = self.cached_prices().await?;
        let now = Utc::now().timestamp_millis();

        for (token_id, mut price) in prices {
            if let Some(object) = price.as_object_mut() {
                object.insert(LAST_REFRESHED_FIELD.to_string(), Value::from(now));
            }
            cached.insert(token_id, price);
        }

        self.cache
            .set_cached_data(TOKEN_PRICES_CACHE_KEY, &cached)
            .await?;
        self.cache
            .set_last_refresh_date(TOKEN_PRICES_CACHE_KEY)
            .await
    }

    /// Cached prices of `token_id`, or `None` if never fetched.
    pub async fn get_token_price(&self, token_id: &str) -> Result<Option<TokenPrice>> {
        validate_non_empty_string(token_id, "token_id")?;
        Ok(self
            .cache
            .get_cached_data::<Map<String, Value>>(TOKEN_PRICES_CACHE_KEY)
            .await?
            .and_then(|prices| prices.get(token_id).and_then(TokenPrice::from_value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{KeyValueStorage, MemoryStorage, MILLISECONDS_ONE_HOUR};
    use crate::providers::testing::FakeHttpClient;
    use async_trait::async_trait;
    use serde_json::json;

    /// Storage that yields to the scheduler on every call, so concurrent
    /// refreshes interleave between their read and write.
    struct YieldingStorage(MemoryStorage);

    #[async_trait]
    impl KeyValueStorage for YieldingStorage {
        async fn get_item(&self, key: &str) -> Result<Option<String>> {
            tokio::task::yield_now().await;
            self.0.get_item(key).await
        }

        async fn set_item(&self, key: &str, value: &str) -> Result<()> {
            tokio::task::yield_now().await;
            self.0.set_item(key, value).await
        }

        async fn remove_item(&self, key: &str) -> Result<()> {
            self.0.remove_item(key).await
        }
    }

    const PRICE_URL: &str = "http://coingecko.test/simple/price";
    const CURRENCIES_URL: &str = "http://coingecko.test/simple/supported_vs_currencies";

    fn setup(http: Arc<FakeHttpClient>) -> (TokenPriceProvider, MemoryStorage) {
        let storage = MemoryStorage::new();
        let config = CoinGeckoConfig {
            token_price_url: PRICE_URL.to_string(),
            supported_currencies_url: CURRENCIES_URL.to_string(),
            ..CoinGeckoConfig::default()
        };
        (
            TokenPriceProvider::new(Cache::new(Arc::new(storage.clone())), http, &config),
            storage,
        )
    }

    fn priced_http() -> FakeHttpClient {
        FakeHttpClient::new()
            .respond(CURRENCIES_URL, r#"["usd","eur"]"#)
            .respond(
                PRICE_URL,
                r#"{"bitcoin":{"usd":65000.5,"eur":60000},"ethereum":{"usd":3000,"eur":2800.25}}"#,
            )
    }

    fn ids(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    #[tokio::test]
    async fn test_refresh_fetches_and_stores_prices() {
        let http = Arc::new(priced_http());
        let (provider, _) = setup(http.clone());

        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &ids(&["bitcoin", "ethereum", "bitcoin"]))
            .await
            .unwrap();

        assert_eq!(calls, 1);
        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], CURRENCIES_URL);
        assert_eq!(
            requests[1],
            "http://coingecko.test/simple/price?ids=bitcoin%2Cethereum&vs_currencies=usd%2Ceur&precision=full"
        );

        let bitcoin = provider.get_token_price("bitcoin").await.unwrap().unwrap();
        assert_eq!(bitcoin.get("usd"), Some(65000.5));
        assert_eq!(bitcoin.get("eur"), Some(60000.0));
        assert!(bitcoin.last_refreshed.is_some());
        assert!(provider.get_token_price("dogecoin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fresh_prices_are_not_refetched() {
        let http = Arc::new(priced_http());
        let (provider, _) = setup(http.clone());

        provider
            .refresh_token_price_cache(&mut || {}, &ids(&["bitcoin"]))
            .await
            .unwrap();
        assert_eq!(http.request_count(), 2);

        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &ids(&["bitcoin"]))
            .await
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(http.request_count(), 2);
    }

    #[tokio::test]
    async fn test_only_stale_ids_are_requested_and_merged() {
        let http = Arc::new(priced_http());
        let (provider, storage) = setup(http.clone());
        let fresh = Utc::now().timestamp_millis();
        let stale = fresh - MILLISECONDS_ONE_HOUR;
        storage
            .set_item(
                TOKEN_PRICES_CACHE_KEY,
                &json!({
                    "bitcoin": { "usd": 1.0, "last_refreshed": fresh },
                    "ethereum": { "usd": 2.0, "last_refreshed": stale },
                    "tether": { "usd": 1.0, "last_refreshed": fresh }
                })
                .to_string(),
            )
            .await
            .unwrap();

        provider
            .refresh_token_price_cache(&mut || {}, &ids(&["bitcoin", "ethereum"]))
            .await
            .unwrap();

        let requests = http.requests();
        assert!(requests[1].contains("ids=ethereum&"));
        // Response also carries bitcoin; the merge takes whatever the provider returned.
        let ethereum = provider.get_token_price("ethereum").await.unwrap().unwrap();
        assert_eq!(ethereum.get("usd"), Some(3000.0));
        let tether = provider.get_token_price("tether").await.unwrap().unwrap();
        assert_eq!(tether.get("usd"), Some(1.0));
    }

    #[tokio::test]
    async fn test_empty_id_list_is_noop() {
        let http = Arc::new(priced_http());
        let (provider, storage) = setup(http.clone());

        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &[])
            .await
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(http.request_count(), 0);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_more_than_batch_limit_is_not_fetched() {
        let http = Arc::new(priced_http());
        let (provider, storage) = setup(http.clone());
        storage
            .set_item(TOKEN_PRICES_CACHE_KEY, r#"{"bitcoin":{"usd":1}}"#)
            .await
            .unwrap();

        let token_ids: Vec<String> = (0..51).map(|i| format!("token-{}", i)).collect();
        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &token_ids)
            .await
            .unwrap();

        assert_eq!(calls, 1);
        assert_eq!(http.request_count(), 0);
        assert_eq!(
            storage.get_item(TOKEN_PRICES_CACHE_KEY).await.unwrap().as_deref(),
            Some(r#"{"bitcoin":{"usd":1}}"#)
        );
    }

    #[tokio::test]
    async fn test_invalid_ids_call_back_then_error() {
        let http = Arc::new(priced_http());
        let (provider, _) = setup(http.clone());

        let mut calls = 0;
        let result = provider
            .refresh_token_price_cache(&mut || calls += 1, &ids(&["bitcoin", ""]))
            .await;

        assert!(matches!(result, Err(Error::Validation(_))));
        assert_eq!(calls, 1);
        assert_eq!(http.request_count(), 0);
    }

    #[tokio::test]
    async fn test_network_failures_are_swallowed() {
        let currencies_down = Arc::new(FakeHttpClient::new().fail(CURRENCIES_URL, "503"));
        let (provider, storage) = setup(currencies_down.clone());
        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &ids(&["bitcoin"]))
            .await
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(currencies_down.request_count(), 1);
        assert!(storage.is_empty());

        let bad_prices = Arc::new(
            FakeHttpClient::new()
                .respond(CURRENCIES_URL, r#"["usd"]"#)
                .respond(PRICE_URL, "{truncated"),
        );
        let (provider, storage) = setup(bad_prices.clone());
        let mut calls = 0;
        provider
            .refresh_token_price_cache(&mut || calls += 1, &ids(&["bitcoin"]))
            .await
            .unwrap();
        assert_eq!(calls, 1);
        assert_eq!(bad_prices.request_count(), 2);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_get_token_price_validates_id() {
        let (provider, _) = setup(Arc::new(FakeHttpClient::new()));
        assert!(matches!(
            provider.get_token_price(" ").await,
            Err(Error::Validation(_))
        ));
        assert!(provider.get_token_price("bitcoin").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_keep_each_others_prices() {
        let http = Arc::new(
            FakeHttpClient::new()
                .respond(CURRENCIES_URL, r#"["usd"]"#)
                .respond(&format!("{}?ids=bitcoin&", PRICE_URL), r#"{"bitcoin":{"usd":65000}}"#)
                .respond(&format!("{}?ids=ethereum&", PRICE_URL), r#"{"ethereum":{"usd":3000}}"#),
        );
        let config = CoinGeckoConfig {
            token_price_url: PRICE_URL.to_string(),
            supported_currencies_url: CURRENCIES_URL.to_string(),
            ..CoinGeckoConfig::default()
        };
        let cache = Cache::new(Arc::new(YieldingStorage(MemoryStorage::new())));
        let provider = TokenPriceProvider::new(cache, http.clone(), &config);
        let other = provider.clone();

        let bitcoin = ids(&["bitcoin"]);
        let ethereum = ids(&["ethereum"]);
        let (mut first_progress, mut second_progress) = (|| {}, || {});
        let (first, second) = tokio::join!(
            provider.refresh_token_price_cache(&mut first_progress, &bitcoin),
            other.refresh_token_price_cache(&mut second_progress, &ethereum),
        );
        first.unwrap();
        second.unwrap();

        assert_eq!(http.request_count(), 4);
        let bitcoin = provider.get_token_price("bitcoin").await.unwrap().unwrap();
        assert_eq!(bitcoin.get("usd"), Some(65000.0));
        let ethereum = provider.get_token_price("ethereum").await.unwrap().unwrap();
        assert_eq!(ethereum.get("usd"), Some(3000.0));
    }
}
