use actix_web::http::StatusCode;
use log::debug;

use crate::{
    components::{escape_html, Token, TokenList, TokenPriceTable, TokenSearchForm},
    errors::{Error, Result},
    handlers::token::service::TokenService,
    services::TokenDataService,
    validation::{validate_chain, validate_non_empty_string},
};

pub const TOKEN_LIST_ID: &str = "token-list";

/// Builds the `<main>` content of each page
pub struct PageService;

impl PageService {
    /// Search form followed by every cached token of `chains`
    pub async fn index_body(data: &TokenDataService, chains: Option<&str>) -> Result<String> {
        let tokens = TokenService::search_tokens(data, None, chains).await?;
        debug!("Rendering {} tokens on the home page", tokens.len());
        Ok(format!(
            "{}\n{}",
            TokenSearchForm::render(),
            TokenList::render(TOKEN_LIST_ID, &tokens)?
        ))
    }

    /// Search form followed by the tokens matching `query`
    pub async fn search_body(
        data: &TokenDataService,
        query: Option<&str>,
        chains: Option<&str>,
    ) -> Result<String> {
        let tokens = TokenService::search_tokens(data, query, chains).await?;
        let heading = match query.map(str::trim).filter(|q| !q.is_empty()) {
            Some(query) => format!("<h1>Results for \"{}\"</h1>", escape_html(query)),
            None => "<h1>All tokens</h1>".to_string(),
        };
        Ok(format!(
            "{}\n{}\n{}",
            heading,
            TokenSearchForm::render(),
            TokenList::render(TOKEN_LIST_ID, &tokens)?
        ))
    }

    /// Token detail with its prices, refreshed first if stale
    ///
    /// # Returns
    /// * `Err(Error::Validation)` - If the chain or id is missing or invalid
    /// * `Err(Error::NotFound)` - If no cached token of `chain` has this id
    pub async fn token_body(
        data: &TokenDataService,
        chain: Option<&str>,
        token_id: Option<&str>,
    ) -> Result<String> {
        let chain = chain.unwrap_or_default();
        let token_id = token_id.unwrap_or_default();
        validate_non_empty_string(chain, "chain")?;
        validate_non_empty_string(token_id, "tokenId")?;
        let chain = validate_chain(chain)?;

        let token = data
            .find_token(chain, token_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("No token {} on {}", token_id, chain)))?;

        let prices = data.token_prices();
        prices
            .refresh_token_price_cache(&mut || {}, &[token_id.to_string()])
            .await?;
        let price = prices.get_token_price(token_id).await?;

        Ok(format!(
            "{}\n<h2>Price</h2>\n{}",
            Token::render(&token)?,
            TokenPriceTable::render(price.as_ref())
        ))
    }

    /// Status and `<main>` content for a failed page
    pub fn error_body(error: &Error) -> (StatusCode, String) {
        let (status, heading) = match error {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "Bad request"),
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Something went wrong"),
        };
        let body = format!(
            "<h1>{}</h1>\n<p>{}</p>\n<p><a href=\"index.html\">Back to all tokens</a></p>",
            heading,
            escape_html(&error.to_string())
        );
        (status, body)
    }
}
