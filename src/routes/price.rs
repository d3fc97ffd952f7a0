use actix_web::web;

use crate::handlers::price::{get_token_price_handler, refresh_prices_handler};

pub fn configure_price_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/prices/refresh", web::post().to(refresh_prices_handler))
        .route("/prices/{token_id}", web::get().to(get_token_price_handler));
}
