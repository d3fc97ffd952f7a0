use actix_web::web;

use crate::handlers::page::{index_page_handler, token_page_handler, tokens_page_handler};

/// HTML pages, served at the root
pub fn configure_page_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index_page_handler))
        .route("/index.html", web::get().to(index_page_handler))
        .route("/tokens.html", web::get().to(tokens_page_handler))
        .route("/token.html", web::get().to(token_page_handler));
}
