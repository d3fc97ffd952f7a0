use chrono::Utc;
use log::{error, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use super::storage::KeyValueStorage;
use crate::errors::{Error, Result};
use crate::validation::{validate_non_empty_string, validate_non_zero_interval};

/// Number of milliseconds in one hour.
pub const MILLISECONDS_ONE_HOUR: i64 = 3_600_000;

/// Number of milliseconds in one day.
pub const MILLISECONDS_ONE_DAY: i64 = 86_400_000;

/// Reserved field stamped on cache entries by [`Cache::set_last_refresh_date`].
pub const LAST_REFRESHED_FIELD: &str = "last_refreshed";

/// JSON key-value cache over an injected storage backend.
///
/// Staleness is tracked per key via the `last_refreshed` epoch-millis field
/// and an interval supplied by the caller.
#[derive(Clone)]
pub struct Cache {
    storage: Arc<dyn KeyValueStorage>,
}

impl Cache {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Stored text for `key`; an empty string counts as unset.
    async fn raw(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .storage
            .get_item(key)
            .await?
            .filter(|data| !data.is_empty()))
    }

    /// Parsed data for `key`, or `None` if nothing is stored.
    pub async fn get_cached_data<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        validate_non_empty_string(key, "key")?;

        match self.raw(key).await? {
            None => Ok(None),
            Some(data) => serde_json::from_str(&data).map(Some).map_err(|e| {
                Error::Parse(format!("Error parsing cache data for {}: {}", key, e))
            }),
        }
    }

    pub async fn set_cached_data<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        validate_non_empty_string(key, "key")?;

        let value = serde_json::to_value(value)
            .map_err(|e| Error::Parse(format!("Error serializing cache data for {}: {}", key, e)))?;
        if value.is_null() {
            return Err(Error::Validation(format!(
                "Cache data for {} cannot be null or undefined",
                key
            )));
        }

        self.storage.set_item(key, &value.to_string()).await
    }

    /// Stamp the entry for `key` with the current time. Missing entries are left alone.
    pub async fn set_last_refresh_date(&self, key: &str) -> Result<()> {
        let Some(mut data) = self.get_cached_data::<Value>(key).await? else {
            warn!("Cache data for {} not found.", key);
            return Ok(());
        };

        let Some(object) = data.as_object_mut() else {
            warn!("Cache data for {} is not an object, refresh date not set.", key);
            return Ok(());
        };

        object.insert(
            LAST_REFRESHED_FIELD.to_string(),
            Value::from(Utc::now().timestamp_millis()),
        );
        self.set_cached_data(key, &data).await
    }

    pub async fn requires_refresh(&self, key: &str, interval_ms: i64) -> Result<bool> {
        self.requires_refresh_at(key, interval_ms, Utc::now().timestamp_millis())
            .await
    }

    /// Staleness check against an explicit `now_ms`.
    pub async fn requires_refresh_at(&self, key: &str, interval_ms: i64, now_ms: i64) -> Result<bool> {
        validate_non_empty_string(key, "key")?;
        validate_non_zero_interval(interval_ms)?;

        let Some(data) = self.raw(key).await? else {
            return Ok(true);
        };

        let data: Value = match serde_json::from_str(&data) {
            Ok(data) => data,
            Err(e) => {
                error!("Error parsing cache data for {}: {}", key, e);
                return Ok(true);
            }
        };

        Ok(is_stale_at(data.get(LAST_REFRESHED_FIELD), interval_ms, now_ms))
    }

    /// Remove the entries for `keys`. All keys are validated before anything is removed.
    pub async fn clear(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            validate_non_empty_string(key, "key")?;
        }

        for key in keys {
            self.storage.remove_item(key).await?;
        }
        Ok(())
    }
}

/// True if `last_refreshed` is missing, zero, unparsable, or older than `interval_ms`.
///
/// An elapsed time that does not fit in an `i64` counts as stale.
pub fn is_stale_at(last_refreshed: Option<&Value>, interval_ms: i64, now_ms: i64) -> bool {
    match last_refreshed.and_then(parse_timestamp) {
        None => true,
        Some(last) => now_ms
            .checked_sub(last)
            .map_or(true, |elapsed| elapsed >= interval_ms),
    }
}

/// Epoch-millis from a JSON number or a string with a leading integer.
///
/// Zero is treated as unset.
pub fn parse_timestamp(value: &Value) -> Option<i64> {
    let parsed = match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    };
    parsed.filter(|t| *t != 0)
}

fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, digits) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::storage::MemoryStorage;
    use serde_json::json;

    fn cache() -> (Cache, MemoryStorage) {
        let storage = MemoryStorage::new();
        (Cache::new(Arc::new(storage.clone())), storage)
    }

    #[tokio::test]
    async fn test_requires_refresh_for_missing_key() {
        let (cache, _) = cache();
        for key in ["tokens-supported", "tokens-Ethereum", "anything"] {
            assert!(cache.requires_refresh(key, MILLISECONDS_ONE_DAY).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_requires_refresh_boundary() {
        let (cache, _) = cache();
        let t = 1_700_000_000_000i64;
        let interval = MILLISECONDS_ONE_HOUR;
        cache
            .set_cached_data("prices", &json!({ "last_refreshed": t }))
            .await
            .unwrap();

        assert!(!cache.requires_refresh_at("prices", interval, t).await.unwrap());
        assert!(!cache
            .requires_refresh_at("prices", interval, t + interval - 1)
            .await
            .unwrap());
        assert!(cache
            .requires_refresh_at("prices", interval, t + interval)
            .await
            .unwrap());
        assert!(cache
            .requires_refresh_at("prices", interval, t + interval + 1)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_requires_refresh_after_stamp() {
        let (cache, _) = cache();
        cache.set_cached_data("k", &json!({ "a": 1 })).await.unwrap();
        assert!(cache.requires_refresh("k", MILLISECONDS_ONE_DAY).await.unwrap());

        cache.set_last_refresh_date("k").await.unwrap();
        assert!(!cache.requires_refresh("k", MILLISECONDS_ONE_DAY).await.unwrap());
    }

    #[tokio::test]
    async fn test_requires_refresh_on_bad_entries() {
        let (cache, storage) = cache();
        storage.set_item("corrupt", "{not json").await.unwrap();
        storage.set_item("text", r#"{"last_refreshed":"soon"}"#).await.unwrap();
        storage.set_item("zero", r#"{"last_refreshed":0}"#).await.unwrap();
        storage.set_item("empty", "").await.unwrap();

        for key in ["corrupt", "text", "zero", "empty"] {
            assert!(cache.requires_refresh(key, MILLISECONDS_ONE_DAY).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_requires_refresh_on_extreme_timestamps() {
        let (cache, storage) = cache();
        storage
            .set_item("ancient", r#"{"last_refreshed":"-9223372036854775807"}"#)
            .await
            .unwrap();
        storage
            .set_item("min", &json!({ "last_refreshed": i64::MIN }).to_string())
            .await
            .unwrap();

        for key in ["ancient", "min"] {
            assert!(cache.requires_refresh(key, MILLISECONDS_ONE_HOUR).await.unwrap());
        }
        assert!(is_stale_at(Some(&json!(i64::MIN)), 1, i64::MAX));
        assert!(!is_stale_at(Some(&json!(i64::MAX)), 1, 0));
    }

    #[tokio::test]
    async fn test_requires_refresh_accepts_numeric_string() {
        let (cache, storage) = cache();
        storage
            .set_item("k", r#"{"last_refreshed":"1000abc"}"#)
            .await
            .unwrap();
        assert!(!cache.requires_refresh_at("k", 10, 1005).await.unwrap());
        assert!(cache.requires_refresh_at("k", 10, 1010).await.unwrap());
    }

    #[tokio::test]
    async fn test_requires_refresh_validates_input() {
        let (cache, _) = cache();
        assert!(matches!(
            cache.requires_refresh("", 10).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            cache.requires_refresh("k", 0).await,
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_round_trip() {
        let (cache, _) = cache();
        let value = json!({
            "tokens": [{ "name": "Foo", "decimals": 18 }],
            "nested": { "list": [1, 2, 3], "flag": true }
        });
        cache.set_cached_data("k", &value).await.unwrap();
        let read: Value = cache.get_cached_data("k").await.unwrap().unwrap();
        assert_eq!(read, value);

        cache.set_last_refresh_date("k").await.unwrap();
        let mut stamped: Value = cache.get_cached_data("k").await.unwrap().unwrap();
        assert!(stamped[LAST_REFRESHED_FIELD].as_i64().is_some());
        stamped.as_object_mut().unwrap().remove(LAST_REFRESHED_FIELD);
        assert_eq!(stamped, value);
    }

    #[tokio::test]
    async fn test_get_missing_and_corrupt() {
        let (cache, storage) = cache();
        assert!(cache.get_cached_data::<Value>("missing").await.unwrap().is_none());

        storage.set_item("corrupt", "[1,").await.unwrap();
        assert!(matches!(
            cache.get_cached_data::<Value>("corrupt").await,
            Err(Error::Parse(_))
        ));
    }

    #[tokio::test]
    async fn test_set_rejects_null_and_empty_key() {
        let (cache, storage) = cache();
        assert!(matches!(
            cache.set_cached_data("k", &Value::Null).await,
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            cache.set_cached_data("  ", &json!({})).await,
            Err(Error::Validation(_))
        ));
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_set_last_refresh_date_on_missing_entry_is_noop() {
        let (cache, storage) = cache();
        cache.set_last_refresh_date("missing").await.unwrap();
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_clear() {
        let (cache, storage) = cache();
        cache.set_cached_data("a", &json!(1)).await.unwrap();
        cache.set_cached_data("b", &json!(2)).await.unwrap();
        cache.set_cached_data("c", &json!(3)).await.unwrap();

        assert!(matches!(
            cache.clear(&["a", ""]).await,
            Err(Error::Validation(_))
        ));
        assert_eq!(storage.len(), 3);

        cache.clear(&["a", "b"]).await.unwrap();
        assert!(cache.get_cached_data::<Value>("a").await.unwrap().is_none());
        assert!(cache.get_cached_data::<Value>("b").await.unwrap().is_none());
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_parse_timestamp() {
        assert_eq!(parse_timestamp(&json!(42)), Some(42));
        assert_eq!(parse_timestamp(&json!(42.9)), Some(42));
        assert_eq!(parse_timestamp(&json!(" 17xyz")), Some(17));
        assert_eq!(parse_timestamp(&json!("-5")), Some(-5));
        assert_eq!(parse_timestamp(&json!("abc")), None);
        assert_eq!(parse_timestamp(&json!(0)), None);
        assert_eq!(parse_timestamp(&json!(true)), None);
    }
}
