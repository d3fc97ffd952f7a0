use actix_web::web;

use crate::handlers::cache::{clear_cache_handler, refresh_cache_handler};

pub fn configure_cache_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/cache/refresh", web::post().to(refresh_cache_handler))
        .route("/cache/clear", web::post().to(clear_cache_handler));
}
