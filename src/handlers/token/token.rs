use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::{
    errors::ApiError,
    handlers::token::{dto::TokenSearchQuery, service::TokenService},
    services::TokenDataService,
};

/// GET /chains - Returns the supported chains
pub async fn get_chains_handler() -> Result<HttpResponse, ApiError> {
    info!("Handling GET /chains request");
    Ok(HttpResponse::Ok().json(TokenService::list_chains()))
}

/// GET /tokens - Searches cached tokens
///
/// # Arguments
/// * `data` - Token data service
/// * `query` - Optional `query` text and comma-separated `chains`
///
/// # Returns
/// JSON array of matching tokens
pub async fn search_tokens_handler(
    data: web::Data<TokenDataService>,
    query: web::Query<TokenSearchQuery>,
) -> Result<HttpResponse, ApiError> {
    info!("Handling GET /tokens request: {:?}", query);

    match TokenService::search_tokens(&data, query.query.as_deref(), query.chains.as_deref()).await {
        Ok(tokens) => {
            info!("Found {} tokens", tokens.len());
            Ok(HttpResponse::Ok().json(tokens))
        }
        Err(e) => {
            error!("Failed to search tokens: {}", e);
            Err(e.into())
        }
    }
}

/// GET /tokens/{chain} - Returns the cached token list of a chain
pub async fn get_chain_tokens_handler(
    data: web::Data<TokenDataService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let chain = path.into_inner();
    info!("Handling GET /tokens/{} request", chain);

    match TokenService::get_chain_tokens(&data, &chain).await {
        Ok(response) => {
            info!("Retrieved {} tokens for {}", response.tokens.len(), chain);
            Ok(HttpResponse::Ok().json(response))
        }
        Err(e) => {
            error!("Failed to retrieve tokens for {}: {}", chain, e);
            Err(e.into())
        }
    }
}
