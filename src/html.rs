//! Shared maud layout, styling, and formatting helpers for the web pages.

use std::sync::OnceLock;

use maud::{DOCTYPE, Markup, PreEscaped, html};
use numfmt::{Formatter, Precision};

/// The stylesheet shared by every page. Embedded in the document head so
/// the server has no static assets to serve.
const APP_STYLE: &str = r#"
:root { color-scheme: light; }
* { box-sizing: border-box; }
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: #333;
    margin: 0;
    background: #f4f5f7;
}
.nav {
    display: flex;
    gap: 0.25rem;
    align-items: center;
    padding: 0.75rem 1.5rem;
    background: #2c3e50;
}
.nav .brand { color: white; font-weight: 700; margin-right: 1rem; }
.nav a {
    color: #cfd8e3;
    text-decoration: none;
    padding: 0.35rem 0.75rem;
    border-radius: 4px;
}
.nav a:hover { background: #3d5166; color: white; }
.nav a.current { background: #3498db; color: white; }
.page { max-width: 960px; margin: 0 auto; padding: 1.5rem; }
.page h1 { color: #2c3e50; }
.cards {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));
    gap: 1rem;
    margin: 1.5rem 0;
}
.card {
    background: linear-gradient(135deg, #3498db, #2980b9);
    color: white;
    padding: 1.25rem;
    border-radius: 8px;
    text-align: center;
}
.card h3 { margin: 0 0 0.5rem 0; font-size: 0.95rem; opacity: 0.9; }
.card .value { font-size: 1.6rem; font-weight: 700; }
table.expense-table {
    width: 100%;
    border-collapse: collapse;
    background: white;
    border-radius: 8px;
    overflow: hidden;
    box-shadow: 0 2px 8px rgba(0,0,0,0.08);
}
table.expense-table th {
    background: #34495e;
    color: white;
    padding: 0.75rem;
    text-align: left;
}
table.expense-table td { padding: 0.6rem 0.75rem; border-bottom: 1px solid #ecf0f1; }
table.expense-table tr.total-row td { font-weight: 700; border-top: 2px solid #34495e; }
td.amount, th.amount { text-align: right; }
a.delete-link { color: #c0392b; }
.bar-track { background: #ecf0f1; border-radius: 4px; height: 0.75rem; min-width: 8rem; }
.bar-fill { background: #3498db; border-radius: 4px; height: 100%; }
form.expense-form { max-width: 24rem; }
form.expense-form label { display: block; margin-top: 0.75rem; font-weight: 600; }
form.expense-form input, form.expense-form select {
    width: 100%;
    padding: 0.5rem;
    border: 1px solid #bdc3c7;
    border-radius: 4px;
}
form.expense-form button, a.button {
    display: inline-block;
    margin-top: 1rem;
    padding: 0.5rem 1.25rem;
    background: #3498db;
    color: white;
    border: none;
    border-radius: 4px;
    cursor: pointer;
    text-decoration: none;
}
form.expense-form button:hover, a.button:hover { background: #2980b9; }
p.form-error { color: #c0392b; font-weight: 600; }
.filter-bar { display: flex; gap: 0.5rem; align-items: center; margin: 1rem 0; }
.error-page { text-align: center; padding: 4rem 1rem; }
.error-page .status { font-size: 5rem; font-weight: 800; color: #3498db; margin: 0; }
"#;

/// The application name shown in page titles and the navigation bar.
pub const APP_NAME: &str = "Spendlog";

/// Wrap `content` in the shared HTML document shell.
pub fn base(title: &str, content: &Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) " - " (APP_NAME) }
                style { (PreEscaped(APP_STYLE)) }
            }

            body
            {
                (content)
            }
        }
    }
}

/// A full error page with a status code headline, a description, and a
/// suggestion for what to do about it.
pub fn error_view(title: &str, header: &str, description: &str, fix: &str) -> Markup {
    let content = html!(
        div class="page error-page"
        {
            p class="status" { (header) }
            h1 { (description) }
            p { (fix) }
            a href="/" class="button" { "Back to the dashboard" }
        }
    );

    base(title, &content)
}

/// Format `number` as a dollar amount, e.g. `$1,234.50`.
pub fn currency(number: f64) -> String {
    static FMT: OnceLock<Formatter> = OnceLock::new();

    let fmt = FMT.get_or_init(|| {
        Formatter::currency("$")
            .unwrap()
            .precision(Precision::Decimals(2))
    });

    if number == 0.0 {
        // Zero is hardcoded as "0" by numfmt, so spell it out ourselves.
        return "$0.00".to_owned();
    }

    let mut formatted_string = fmt.fmt_string(number);

    // numfmt omits the last trailing zero, so we must add it ourselves.
    // For example, "12.30" is rendered as "12.3" so we append "0".
    if formatted_string.as_bytes()[formatted_string.len() - 3] != b'.' {
        formatted_string = format!("{formatted_string}0");
    }

    formatted_string
}
