use super::{ChainNameLink, TokenAddressLink};
use crate::components::{encode_query_value, escape_html};
use crate::database::models::Token;
use crate::errors::Result;
use crate::validation::validate_token;

/// Table row of a [`super::TokenList`].
pub struct TokenListElement;

impl TokenListElement {
    pub fn render(token: &Token) -> Result<String> {
        validate_token(token)?;
        let name = escape_html(&token.name);
        Ok(format!(
            r#"<tr>
    <td><img src="{logo}" alt="Logo of {name}." /></td>
    <td><a href="token.html?chain={chain}&amp;tokenId={id}">{name}</a></td>
    <td>{symbol}</td>
    <td>{address}</td>
    <td>{chain_link}</td>
</tr>"#,
            logo = escape_html(&token.logo_uri),
            name = name,
            chain = encode_query_value(token.chain.name()),
            id = encode_query_value(token.id.as_deref().unwrap_or_default()),
            symbol = escape_html(&token.symbol),
            address = TokenAddressLink::render(token)?,
            chain_link = ChainNameLink::render(token.chain.name())?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::token::sample_token;

    #[test]
    fn test_render_links_to_detail_page() {
        let mut token = sample_token("Wrapped Ether");
        token.id = Some("weth".to_string());
        let html = TokenListElement::render(&token).unwrap();

        assert!(html.starts_with("<tr>"));
        assert!(html.contains(r#"<a href="token.html?chain=Ethereum&amp;tokenId=weth">Wrapped Ether</a>"#));
        assert!(html.contains("<td>WRAPPED ETHER</td>"));
    }
}
