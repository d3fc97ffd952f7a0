use actix_web::{web, HttpResponse};
use log::{error, info};

use crate::{
    errors::ApiError,
    handlers::{
        auth::ApiKey,
        cache::dto::{ClearCacheRequest, ClearCacheResponse, RefreshCacheResponse},
    },
    services::{initialize_token_data, PageRegions, TokenDataService, MAIN_REGION},
};

/// POST /cache/refresh - Re-runs the token data initializer in the background
/// Requires API key authentication via X-API-Key header
///
/// # Returns
/// 202 Accepted; pages show the progress bar until loading completes.
/// 409 Conflict if a load is already running
pub async fn refresh_cache_handler(
    _api_key: ApiKey,
    data: web::Data<TokenDataService>,
    regions: web::Data<PageRegions>,
) -> Result<HttpResponse, ApiError> {
    info!("Handling POST /cache/refresh request");

    if regions.is_loading(MAIN_REGION) {
        return Err(ApiError::Conflict(
            "Token data is already loading".to_string(),
        ));
    }

    let data = data.get_ref().clone();
    let regions = regions.get_ref().clone();
    actix_web::rt::spawn(async move {
        if let Err(e) = initialize_token_data(&regions, &data).await {
            error!("Token data refresh failed: {}", e);
        }
    });

    Ok(HttpResponse::Accepted().json(RefreshCacheResponse {
        status: "refreshing",
    }))
}

/// POST /cache/clear - Removes the given cache entries
/// Requires API key authentication via X-API-Key header
///
/// # Returns
/// JSON object listing the cleared keys; 400 if any key is blank
pub async fn clear_cache_handler(
    _api_key: ApiKey,
    data: web::Data<TokenDataService>,
    body: web::Json<ClearCacheRequest>,
) -> Result<HttpResponse, ApiError> {
    let keys = body.into_inner().keys;
    info!("Handling POST /cache/clear request for {:?}", keys);

    let key_refs: Vec<&str> = keys.iter().map(String::as_str).collect();
    match data.cache().clear(&key_refs).await {
        Ok(()) => {
            info!("Cleared {} cache entries", keys.len());
            Ok(HttpResponse::Ok().json(ClearCacheResponse { cleared: keys }))
        }
        Err(e) => {
            error!("Failed to clear cache: {}", e);
            Err(e.into())
        }
    }
}
