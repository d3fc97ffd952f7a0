pub mod dto;
pub mod service;
pub mod token;

pub use token::{get_chain_tokens_handler, get_chains_handler, search_tokens_handler};
