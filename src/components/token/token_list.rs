use std::cmp::Ordering;

use super::TokenListElement;
use crate::components::escape_html;
use crate::database::models::Token;
use crate::errors::Result;
use crate::validation::{validate_non_empty_string, validate_token_array};

pub const EMPTY_LIST_PLACEHOLDER: &str = "No data available.";

/// Table of tokens sorted by name.
pub struct TokenList;

impl TokenList {
    pub fn render(id: &str, tokens: &[Token]) -> Result<String> {
        validate_non_empty_string(id, "id")?;
        validate_token_array(tokens)?;

        let mut sorted: Vec<&Token> = tokens.iter().collect();
        sorted.sort_by(|a, b| compare_names(&a.name, &b.name));

        let rows = if sorted.is_empty() {
            format!("<tr><td colspan=\"5\">{}</td></tr>", EMPTY_LIST_PLACEHOLDER)
        } else {
            sorted
                .into_iter()
                .map(TokenListElement::render)
                .collect::<Result<Vec<_>>>()?
                .join("\n")
        };

        Ok(format!(
            r#"<table id="{id}" class="token-list">
<thead>
    <tr>
        <th>Logo</th>
        <th>Name</th>
        <th>Symbol</th>
        <th>Address</th>
        <th>Chain</th>
    </tr>
</thead>
<tbody>
{rows}
</tbody>
</table>"#,
            id = escape_html(id),
            rows = rows,
        ))
    }
}

/// Case-insensitive order; on a tie lowercase sorts before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| {
        let case = |s: &str| s.chars().map(char::is_uppercase).collect::<Vec<_>>();
        case(a).cmp(&case(b))
    })
}
