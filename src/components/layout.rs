use super::escape_html;

/// Full page shell; the body goes into the `main` region.
pub struct Layout;

impl Layout {
    pub fn render(title: &str, main: &str) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title} - Token Explorer</title>
    <style>{styles}</style>
</head>
<body>
    <header>
        <a href="index.html">Token Explorer</a>
    </header>
    <main id="main">
{main}
    </main>
</body>
</html>"#,
            title = escape_html(title),
            styles = STYLES,
            main = main,
        )
    }
}

const STYLES: &str = r#"
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; margin: 0; color: #2d3748; }
        header { padding: 16px 24px; background: #2d3748; }
        header a { color: #fff; font-weight: 600; text-decoration: none; }
        main { padding: 24px; }
        table { border-collapse: collapse; width: 100%; margin-top: 16px; }
        th, td { padding: 8px; border-bottom: 1px solid #e2e8f0; text-align: left; }
        td img { width: 24px; height: 24px; }
        progress { width: 100%; }
    "#;
