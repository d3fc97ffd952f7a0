use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::{
    errors::ApiError,
    handlers::{
        auth::ApiKey,
        price::dto::{RefreshPricesRequest, RefreshPricesResponse, TokenPriceResponse},
    },
    services::TokenDataService,
};

/// GET /prices/{token_id} - Returns the cached prices of a token
///
/// # Returns
/// JSON object of TokenPriceResponse, 404 when the token was never priced
pub async fn get_token_price_handler(
    data: web::Data<TokenDataService>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let token_id = path.into_inner();
    info!("Handling GET /prices/{} request", token_id);

    match data.token_prices().get_token_price(&token_id).await {
        Ok(Some(price)) => Ok(HttpResponse::Ok().json(TokenPriceResponse {
            token_id,
            prices: price.prices,
            last_refreshed: price.last_refreshed,
        })),
        Ok(None) => {
            info!("No cached price for {}", token_id);
            Err(ApiError::NotFound(format!("No price cached for {}", token_id)))
        }
        Err(e) => {
            error!("Failed to retrieve price of {}: {}", token_id, e);
            Err(e.into())
        }
    }
}

/// POST /prices/refresh - Refreshes the prices of the given token ids
/// Requires API key authentication via X-API-Key header
///
/// Ids with a fresh cached price are skipped. Provider failures are logged
/// by the price provider and do not fail the request.
pub async fn refresh_prices_handler(
    _api_key: ApiKey,
    data: web::Data<TokenDataService>,
    body: web::Json<RefreshPricesRequest>,
) -> Result<HttpResponse, ApiError> {
    let token_ids = body.into_inner().token_ids;
    info!("Handling POST /prices/refresh request for {} ids", token_ids.len());

    let prices = data.token_prices();
    match prices.refresh_token_price_cache(&mut || {}, &token_ids).await {
        Ok(()) => Ok(HttpResponse::Ok().json(RefreshPricesResponse {
            requested: token_ids.len(),
            batch_limit: prices.batch_limit(),
        })),
        Err(e) => {
            error!("Rejected price refresh: {}", e);
            Err(e.into())
        }
    }
}
