use actix_web::web;

use crate::handlers::token::{get_chain_tokens_handler, get_chains_handler, search_tokens_handler};

pub fn configure_token_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/chains", web::get().to(get_chains_handler))
        .route("/tokens", web::get().to(search_tokens_handler))
        .route("/tokens/{chain}", web::get().to(get_chain_tokens_handler));
}
