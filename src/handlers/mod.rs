pub mod auth;
pub mod cache;
pub mod page;
pub mod price;
pub mod token;

pub use cache::{clear_cache_handler, refresh_cache_handler};
pub use page::{index_page_handler, token_page_handler, tokens_page_handler};
pub use price::{get_token_price_handler, refresh_prices_handler};
pub use token::{get_chain_tokens_handler, get_chains_handler, search_tokens_handler};
