use crate::components::{encode_query_value, escape_html};
use crate::errors::Result;
use crate::validation::validate_chain;

/// Link to the home page filtered to one chain.
pub struct ChainNameLink;

impl ChainNameLink {
    pub fn render(chain: &str) -> Result<String> {
        let chain = validate_chain(chain)?;
        Ok(format!(
            r#"<a href="index.html?chains={query}" target="_blank">{name}</a>"#,
            query = encode_query_value(chain.name()),
            name = escape_html(chain.name()),
        ))
    }
}
