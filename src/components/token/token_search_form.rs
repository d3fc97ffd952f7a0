use crate::components::escape_html;
use crate::database::models::Chain;

/// Search form submitting `query` and `chains` to the results page.
pub struct TokenSearchForm;

impl TokenSearchForm {
    pub fn render() -> String {
        let options: String = Chain::all()
            .map(|chain| {
                format!(
                    r#"<option value="{0}">{0}</option>"#,
                    escape_html(chain.name())
                )
            })
            .collect();

        format!(
            r#"<form id="token-search-form" action="tokens.html" method="get">
    <input id="token-search-text" name="query" placeholder="Search for a token..." type="text">
    <select autocomplete="off" name="chains">
        <option value="">All Chains</option>{options}
    </select>
    <button id="token-search-button" type="submit">Search</button>
</form>"#,
            options = options,
        )
    }
}
