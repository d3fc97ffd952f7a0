use actix_web::{dev::Payload, web, Error, FromRequest, HttpRequest};
use futures::future::{ready, Ready};
use log::warn;
use std::sync::Arc;

use crate::config::Config;

pub const API_KEY_HEADER: &str = "X-API-Key";

/// API key extractor guarding the cache-mutating endpoints
///
/// Access is allowed with a warning when no key is configured.
pub struct ApiKey(pub String);

impl FromRequest for ApiKey {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(config) = req.app_data::<web::Data<Arc<Config>>>() else {
            warn!("Config not found in app data");
            return ready(Err(actix_web::error::ErrorInternalServerError(
                "Configuration error",
            )));
        };

        let header_key = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        match (&config.server.api_key, header_key) {
            (Some(configured_key), Some(header_key)) if configured_key == &header_key => {
                ready(Ok(ApiKey(header_key)))
            }
            (Some(_), Some(_)) => {
                warn!("Invalid API key provided");
                ready(Err(actix_web::error::ErrorUnauthorized("Invalid API key")))
            }
            (Some(_), None) => {
                warn!("API key required but not provided");
                ready(Err(actix_web::error::ErrorUnauthorized("API key required")))
            }
            (None, header_key) => {
                warn!("API key not configured, allowing access");
                ready(Ok(ApiKey(header_key.unwrap_or_default())))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn config(api_key: Option<&str>) -> web::Data<Arc<Config>> {
        let mut config = Config::default();
        config.server.api_key = api_key.map(str::to_string);
        web::Data::new(Arc::new(config))
    }

    async fn extract(request: TestRequest) -> Result<ApiKey, Error> {
        let (req, mut payload) = request.to_http_parts();
        ApiKey::from_request(&req, &mut payload).await
    }

    #[actix_web::test]
    async fn test_matching_key_is_accepted() {
        let request = TestRequest::default()
            .app_data(config(Some("secret")))
            .insert_header((API_KEY_HEADER, "secret"));
        assert_eq!(extract(request).await.unwrap().0, "secret");
    }

    #[actix_web::test]
    async fn test_wrong_or_missing_key_is_rejected() {
        let wrong = TestRequest::default()
            .app_data(config(Some("secret")))
            .insert_header((API_KEY_HEADER, "guess"));
        assert!(extract(wrong).await.is_err());

        let missing = TestRequest::default().app_data(config(Some("secret")));
        assert!(extract(missing).await.is_err());
    }

    #[actix_web::test]
    async fn test_unconfigured_key_allows_access() {
        let request = TestRequest::default().app_data(config(None));
        assert_eq!(extract(request).await.unwrap().0, "");
    }
}
