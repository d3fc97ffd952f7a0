//! HTML fragments for the explorer pages.
//!
//! Every component is a pure function of its inputs. Interpolated text goes
//! through [`escape_html`]; query-string values through [`encode_query_value`].

pub mod layout;
pub mod price_table;
pub mod progress_bar;
pub mod token;

pub use layout::Layout;
pub use price_table::TokenPriceTable;
pub use progress_bar::ProgressBar;
pub use token::{
    ChainNameLink, Token, TokenAddressLink, TokenList, TokenListElement, TokenSearchForm,
};

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Form-encode a single query-string value.
pub fn encode_query_value(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("USD Coin"), "USD Coin");
    }

    #[test]
    fn test_encode_query_value() {
        assert_eq!(encode_query_value("wrapped bitcoin"), "wrapped+bitcoin");
        assert_eq!(encode_query_value("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_query_value("usd-coin"), "usd-coin");
    }
}
