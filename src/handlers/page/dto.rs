use serde::Deserialize;

/// Query of `token.html`
#[derive(Debug, Default, Deserialize)]
pub struct TokenPageQuery {
    pub chain: Option<String>,
    #[serde(rename = "tokenId")]
    pub token_id: Option<String>,
}
