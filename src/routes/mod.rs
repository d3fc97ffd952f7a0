pub mod cache;
pub mod page;
pub mod price;
pub mod routes;
pub mod token;

pub use routes::*;
