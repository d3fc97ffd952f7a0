pub mod cache_entry;
pub mod chain;
pub mod price;
pub mod token;

// Re-export models explicitly to avoid ambiguous glob re-exports
pub use cache_entry::CacheEntry;
pub use chain::{Chain, CHAIN_ENDPOINTS};
pub use price::TokenPrice;
pub use token::{ChainTokenData, SupportedToken, SupportedTokenList, Token};
