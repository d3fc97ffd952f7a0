use crate::errors::Result;
use crate::validation::validate_non_empty_string;

use super::escape_html;

/// `<progress>` element the initializer advances while data loads.
pub struct ProgressBar;

impl ProgressBar {
    pub const MAX: f64 = 100.0;

    /// Empty progress bar.
    pub fn render(id: &str, label: &str) -> Result<String> {
        Self::render_with_value(id, label, 0.0)
    }

    /// Progress bar filled to `value`, clamped to `0..=MAX`.
    pub fn render_with_value(id: &str, label: &str, value: f64) -> Result<String> {
        validate_non_empty_string(id, "id")?;
        validate_non_empty_string(label, "label")?;

        Ok(format!(
            r#"<progress id="{id}" aria-label="{label}" max="{max}" value="{value}"></progress>"#,
            id = escape_html(id),
            label = escape_html(label),
            max = format_value(Self::MAX),
            value = format_value(value.clamp(0.0, Self::MAX)),
        ))
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
