pub mod dto;
pub mod page;
pub mod service;

pub use page::{index_page_handler, token_page_handler, tokens_page_handler};
