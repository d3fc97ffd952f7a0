pub mod chain_tokens;
pub mod http;
pub mod supported_tokens;
pub mod token_price;

#[cfg(test)]
pub mod testing;

pub use chain_tokens::ChainTokenProvider;
pub use http::{HttpClient, ReqwestHttpClient};
pub use supported_tokens::{SupportedTokenProvider, SUPPORTED_TOKENS_CACHE_KEY};
pub use token_price::{TokenPriceProvider, TOKEN_PRICES_CACHE_KEY};
