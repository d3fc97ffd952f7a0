use actix_web::{http::StatusCode, web, HttpResponse};
use log::{error, info};
use std::future::Future;

use crate::{
    components::Layout,
    errors::Result,
    handlers::{
        page::{dto::TokenPageQuery, service::PageService},
        token::dto::TokenSearchQuery,
    },
    services::{PageRegions, TokenDataService, MAIN_REGION},
};

fn html(status: StatusCode, title: &str, main: &str) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .body(Layout::render(title, main))
}

/// Render a page, showing the progress bar instead of `body` while token data loads.
async fn render_page<F>(regions: &PageRegions, title: &str, body: F) -> HttpResponse
where
    F: Future<Output = Result<String>>,
{
    match regions.render(MAIN_REGION) {
        Ok(Some(progress)) => return html(StatusCode::OK, title, &progress),
        Ok(None) => {}
        Err(e) => error!("Failed to render progress bar: {}", e),
    }

    match body.await {
        Ok(main) => html(StatusCode::OK, title, &main),
        Err(e) => {
            error!("Failed to render {} page: {}", title, e);
            let (status, main) = PageService::error_body(&e);
            html(status, title, &main)
        }
    }
}

/// GET /, /index.html - Search form and every cached token
pub async fn index_page_handler(
    data: web::Data<TokenDataService>,
    regions: web::Data<PageRegions>,
    query: web::Query<TokenSearchQuery>,
) -> HttpResponse {
    info!("Handling GET /index.html request: {:?}", query);
    render_page(
        &regions,
        "Tokens",
        PageService::index_body(&data, query.chains.as_deref()),
    )
    .await
}

/// GET /tokens.html - Search results
pub async fn tokens_page_handler(
    data: web::Data<TokenDataService>,
    regions: web::Data<PageRegions>,
    query: web::Query<TokenSearchQuery>,
) -> HttpResponse {
    info!("Handling GET /tokens.html request: {:?}", query);
    render_page(
        &regions,
        "Search",
        PageService::search_body(&data, query.query.as_deref(), query.chains.as_deref()),
    )
    .await
}

/// GET /token.html - Token detail and prices
pub async fn token_page_handler(
    data: web::Data<TokenDataService>,
    regions: web::Data<PageRegions>,
    query: web::Query<TokenPageQuery>,
) -> HttpResponse {
    info!("Handling GET /token.html request: {:?}", query);
    render_page(
        &regions,
        "Token",
        PageService::token_body(&data, query.chain.as_deref(), query.token_id.as_deref()),
    )
    .await
}
