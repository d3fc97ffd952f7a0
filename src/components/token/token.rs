use super::{ChainNameLink, TokenAddressLink};
use crate::components::escape_html;
use crate::database::models::Token as TokenRecord;
use crate::errors::Result;
use crate::validation::validate_token;

/// Detail view of a single token.
pub struct Token;

impl Token {
    pub fn render(token: &TokenRecord) -> Result<String> {
        validate_token(token)?;
        let name = escape_html(&token.name);
        Ok(format!(
            r#"<img src="{logo}" alt="Logo of {name}." />
<h1>{name}</h1>
<p>Address: {address}</p>
<p>Chain: {chain}</p>
<p>Symbol: {symbol}</p>"#,
            logo = escape_html(&token.logo_uri),
            name = name,
            address = TokenAddressLink::render(token)?,
            chain = ChainNameLink::render(token.chain.name())?,
            symbol = escape_html(&token.symbol),
        ))
    }
}
