use anyhow::{anyhow, Result};
use log::{error, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::database::{MILLISECONDS_ONE_DAY, MILLISECONDS_ONE_HOUR};

pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub coingecko: CoinGeckoConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    MongoDb,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    #[serde(default)]
    pub mongodb: MongoDbConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MongoDbConfig {
    pub uri: String,
    pub database: String,
    pub connection_timeout_ms: u64,
    pub max_pool_size: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub supports_credentials: bool,
}

/// CoinGecko endpoints and refresh policy
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CoinGeckoConfig {
    pub supported_tokens_url: String,
    /// Per-chain lists live at `<token_list_base_url><endpoint>/<token_list_file_name>`.
    pub token_list_base_url: String,
    pub token_list_file_name: String,
    pub token_price_url: String,
    pub supported_currencies_url: String,
    /// Largest number of token ids requested in one price call.
    pub price_batch_limit: usize,
    pub token_list_refresh_interval_ms: i64,
    pub price_refresh_interval_ms: i64,
    pub request_timeout_ms: Option<u64>,
}

impl Default for CoinGeckoConfig {
    fn default() -> Self {
        Self {
            supported_tokens_url:
                "https://api.coingecko.com/api/v3/coins/list?include_platform=false".to_string(),
            token_list_base_url: "https://tokens.coingecko.com/".to_string(),
            token_list_file_name: "all.json".to_string(),
            token_price_url: "https://api.coingecko.com/api/v3/simple/price".to_string(),
            supported_currencies_url:
                "https://api.coingecko.com/api/v3/simple/supported_vs_currencies".to_string(),
            price_batch_limit: 50,
            token_list_refresh_interval_ms: MILLISECONDS_ONE_DAY,
            price_refresh_interval_ms: MILLISECONDS_ONE_HOUR,
            request_timeout_ms: None,
        }
    }
}

impl Default for MongoDbConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "token_explorer".to_string(),
            connection_timeout_ms: 5000,
            max_pool_size: Some(10),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8081,
                log_level: "info".to_string(),
                api_key: None,
            },
            storage: StorageConfig {
                backend: StorageBackend::Memory,
                mongodb: MongoDbConfig::default(),
            },
            cors: CorsConfig {
                allowed_origins: vec!["http://localhost:3000".to_string()],
                allowed_methods: vec![
                    "GET".to_string(),
                    "POST".to_string(),
                ],
                allowed_headers: vec![
                    "X-API-Key".to_string(),
                    "Accept".to_string(),
                    "Content-Type".to_string(),
                ],
                supports_credentials: false,
            },
            coingecko: CoinGeckoConfig::default(),
        }
    }
}

impl MongoDbConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.uri.is_empty() {
            return Err(anyhow!("MongoDB URI not configured"));
        }

        if self.database.is_empty() {
            return Err(anyhow!("MongoDB database name not configured"));
        }

        Ok(())
    }
}

impl CoinGeckoConfig {
    pub fn validate(&self) -> Result<()> {
        if self.price_batch_limit == 0 {
            return Err(anyhow!("coingecko.price_batch_limit must be positive"));
        }
        if self.token_list_refresh_interval_ms <= 0 || self.price_refresh_interval_ms <= 0 {
            return Err(anyhow!("coingecko refresh intervals must be positive"));
        }
        Ok(())
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Load `path`, falling back to environment variables and defaults when it cannot be read.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Loading config from {}", path.as_ref().display());
        let config = match Self::load_from_file(&path) {
            Ok(config) => {
                info!("Config loaded from file");
                config
            }
            Err(e) => {
                error!("Failed to load config from file: {}", e);
                info!("Falling back to environment variables or defaults");
                Self::from_env()
            }
        };
        config.coingecko.validate()?;
        Ok(config)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn from_env() -> Self {
        let mut config = Config::default();

        if let Ok(host) = std::env::var("SERVER_HOST") {
            config.server.host = host;
        }

        if let Ok(port) = std::env::var("SERVER_PORT") {
            if let Ok(port_num) = port.parse::<u16>() {
                config.server.port = port_num;
            }
        }

        if let Ok(log_level) = std::env::var("RUST_LOG") {
            config.server.log_level = log_level;
        }

        if let Ok(api_key) = std::env::var("API_KEY") {
            config.server.api_key = Some(api_key);
        }

        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            match backend.to_lowercase().as_str() {
                "memory" => config.storage.backend = StorageBackend::Memory,
                "mongodb" => config.storage.backend = StorageBackend::MongoDb,
                other => error!("Unknown STORAGE_BACKEND '{}', keeping default", other),
            }
        }

        if let Ok(uri) = std::env::var("MONGODB_URI") {
            config.storage.mongodb.uri = uri;
        }

        if let Ok(db_name) = std::env::var("MONGODB_DATABASE") {
            config.storage.mongodb.database = db_name;
        }

        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.cors.allowed_origins =
                origins.split(',').map(|s| s.trim().to_string()).collect();
        }

        if let Ok(limit) = std::env::var("COINGECKO_PRICE_BATCH_LIMIT") {
            if let Ok(limit) = limit.parse::<usize>() {
                config.coingecko.price_batch_limit = limit;
            }
        }

        config
    }
}
