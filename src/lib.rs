pub mod components;
pub mod config;
pub mod database;
pub mod errors;
pub mod handlers;
pub mod providers;
pub mod routes;
pub mod services;
pub mod validation;
