use chrono::{DateTime, Utc};

use super::escape_html;
use crate::database::models::TokenPrice;

pub const NO_PRICE_PLACEHOLDER: &str = "No price data available.";

/// Price of a token in every cached currency.
pub struct TokenPriceTable;

impl TokenPriceTable {
    pub fn render(price: Option<&TokenPrice>) -> String {
        let rows = match price {
            Some(price) if !price.prices.is_empty() => price
                .prices
                .iter()
                .map(|(currency, amount)| {
                    format!(
                        "<tr><td>{}</td><td>{}</td></tr>",
                        escape_html(&currency.to_uppercase()),
                        amount
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            _ => format!("<tr><td colspan=\"2\">{}</td></tr>", NO_PRICE_PLACEHOLDER),
        };

        let updated = price
            .and_then(|p| p.last_refreshed)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|at| {
                format!(
                    "\n<p class=\"price-updated\">Updated {}</p>",
                    at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            })
            .unwrap_or_default();

        format!(
            r#"<table id="token-price" class="token-price">
<thead>
    <tr><th>Currency</th><th>Price</th></tr>
</thead>
<tbody>
{rows}
</tbody>
</table>{updated}"#,
            rows = rows,
            updated = updated,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_prices() {
        let price = TokenPrice::from_value(&json!({
            "usd": 1.5,
            "eur": 1.25,
            "last_refreshed": 0
        }))
        .unwrap();
        let html = TokenPriceTable::render(Some(&price));

        assert!(html.contains("<tr><td>EUR</td><td>1.25</td></tr>"));
        assert!(html.contains("<tr><td>USD</td><td>1.5</td></tr>"));
        assert!(html.find("EUR").unwrap() < html.find("USD").unwrap());
        assert!(!html.contains("Updated"));
    }

    #[test]
    fn test_render_refresh_time() {
        let price = TokenPrice::from_value(&json!({
            "usd": 2,
            "last_refreshed": 1_700_000_000_000_i64
        }))
        .unwrap();
        let html = TokenPriceTable::render(Some(&price));
        assert!(html.contains("Updated 2023-11-14 22:13:20 UTC"));
    }

    #[test]
    fn test_render_placeholder() {
        assert!(TokenPriceTable::render(None).contains(NO_PRICE_PLACEHOLDER));
        assert!(TokenPriceTable::render(Some(&TokenPrice::default())).contains(NO_PRICE_PLACEHOLDER));
    }
}
