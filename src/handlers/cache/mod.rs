pub mod cache;
pub mod dto;

pub use cache::{clear_cache_handler, refresh_cache_handler};
