use crate::components::{encode_query_value, escape_html};
use crate::database::models::Token;
use crate::errors::Result;
use crate::validation::validate_token;

const EXPLORER_SEARCH_URL: &str = "https://www.blockchain.com/explorer/search?search=";

/// Link to a token address on the blockchain.com explorer.
pub struct TokenAddressLink;

impl TokenAddressLink {
    pub fn render(token: &Token) -> Result<String> {
        validate_token(token)?;
        Ok(format!(
            r#"<a href="{url}{query}" target="_blank">{address}</a>"#,
            url = EXPLORER_SEARCH_URL,
            query = encode_query_value(&token.address),
            address = escape_html(&token.address),
        ))
    }
}
