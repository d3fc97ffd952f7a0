pub mod initializer;
pub mod token_data;

pub use initializer::{initialize_token_data, PageRegions, MAIN_REGION};
pub use token_data::TokenDataService;
