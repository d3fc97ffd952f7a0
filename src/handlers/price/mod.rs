pub mod dto;
pub mod price;

pub use price::{get_token_price_handler, refresh_prices_handler};
