//! Builds the standalone, shareable HTML expense report.
//!
//! The report is a single self-contained document: it embeds its own
//! stylesheet so it can be emailed or dropped on a file share and opened in
//! any browser. Both the web export endpoint and the CLI `report` command
//! render through [report_document].

use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::Date;

use crate::{
    expense::Expense,
    html::currency,
    summary::{category_percentages, spending_summary},
};

const REPORT_STYLE: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
    line-height: 1.6;
    color: #333;
    max-width: 1100px;
    margin: 0 auto;
    padding: 20px;
    background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    min-height: 100vh;
}
.container {
    background: white;
    border-radius: 10px;
    box-shadow: 0 10px 30px rgba(0,0,0,0.1);
    padding: 30px;
    margin: 20px 0;
}
h1 { color: #2c3e50; text-align: center; margin-bottom: 10px; }
p.subtitle { text-align: center; color: #7f8c8d; margin-top: 0; }
h2 { color: #34495e; border-bottom: 3px solid #3498db; padding-bottom: 10px; margin-top: 30px; }
.summary-grid {
    display: grid;
    grid-template-columns: repeat(auto-fit, minmax(220px, 1fr));
    gap: 20px;
    margin: 30px 0;
}
.summary-card {
    background: linear-gradient(135deg, #3498db, #2980b9);
    color: white;
    padding: 20px;
    border-radius: 8px;
    text-align: center;
}
.summary-card h3 { margin: 0 0 10px 0; font-size: 1.05em; opacity: 0.9; }
.summary-card .value { font-size: 1.8em; font-weight: bold; margin: 0; }
table {
    width: 100%;
    border-collapse: collapse;
    margin: 20px 0;
    background: white;
    border-radius: 8px;
    overflow: hidden;
    box-shadow: 0 5px 15px rgba(0,0,0,0.1);
}
th { background: #34495e; color: white; padding: 12px 15px; text-align: left; }
td { padding: 10px 15px; border-bottom: 1px solid #ecf0f1; }
td.amount, th.amount { text-align: right; }
.bar-track { background: #ecf0f1; border-radius: 4px; height: 12px; min-width: 120px; }
.bar-fill { background: #3498db; border-radius: 4px; height: 100%; }
footer { text-align: center; color: rgba(255,255,255,0.85); padding: 10px; }
"#;

/// Render the complete report for `expenses`, stamped with `generated_on`.
pub fn report_document(expenses: &[Expense], generated_on: Date) -> Markup {
    let summary = spending_summary(expenses);
    let breakdown = category_percentages(expenses);

    let date_range = match (summary.earliest, summary.latest) {
        (Some(earliest), Some(latest)) => format!("{earliest} to {latest}"),
        _ => "N/A".to_owned(),
    };

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { "Expense Report - " (generated_on) }
                style { (PreEscaped(REPORT_STYLE)) }
            }

            body
            {
                div class="container"
                {
                    h1 { "Expense Report" }
                    p class="subtitle" { "Generated on " (generated_on) }

                    div class="summary-grid"
                    {
                        div class="summary-card"
                        {
                            h3 { "Total Spending" }
                            p class="value" { (currency(summary.total)) }
                        }
                        div class="summary-card"
                        {
                            h3 { "Number of Expenses" }
                            p class="value" { (summary.count) }
                        }
                        div class="summary-card"
                        {
                            h3 { "Average Expense" }
                            p class="value" { (currency(summary.average)) }
                        }
                        div class="summary-card"
                        {
                            h3 { "Date Range" }
                            p class="value" { (date_range) }
                        }
                    }

                    h2 { "Spending by Category" }
                    table
                    {
                        thead
                        {
                            tr
                            {
                                th { "Category" }
                                th class="amount" { "Amount" }
                                th class="amount" { "Percentage" }
                                th { "" }
                            }
                        }
                        tbody
                        {
                            @for row in &breakdown
                            {
                                tr
                                {
                                    td { (row.category) }
                                    td class="amount" { (currency(row.total)) }
                                    td class="amount" { (format!("{:.1}%", row.percentage)) }
                                    td
                                    {
                                        div class="bar-track"
                                        {
                                            div class="bar-fill"
                                                style=(format!("width: {:.1}%", row.percentage)) {}
                                        }
                                    }
                                }
                            }
                        }
                    }

                    h2 { "All Expenses" }
                    @if expenses.is_empty()
                    {
                        p { "No expenses recorded." }
                    }
                    @else
                    {
                        table
                        {
                            thead
                            {
                                tr
                                {
                                    th { "Date" }
                                    th class="amount" { "Amount" }
                                    th { "Category" }
                                    th { "Description" }
                                }
                            }
                            tbody
                            {
                                @for expense in expenses
                                {
                                    tr
                                    {
                                        td { (expense.date) }
                                        td class="amount" { (currency(expense.amount)) }
                                        td { (expense.category) }
                                        td { (expense.description) }
                                    }
                                }
                            }
                        }
                    }
                }

                footer { "Produced by Spendlog" }
            }
        }
    }
}

/// The default file name for a report generated on `date`, e.g.
/// `expense_report_20251024.html`.
pub fn report_file_name(date: Date) -> String {
    format!(
        "expense_report_{:04}{:02}{:02}.html",
        date.year(),
        date.month() as u8,
        date.day()
    )
}

#[cfg(test)]
mod report_tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::expense::{CategoryName, Expense};

    use super::{report_document, report_file_name};

    fn sample_expenses() -> Vec<Expense> {
        vec![
            Expense {
                id: 1,
                date: date!(2025 - 10 - 22),
                amount: 4.50,
                category: CategoryName::new_unchecked("Food"),
                description: "Morning coffee".to_owned(),
            },
            Expense {
                id: 2,
                date: date!(2025 - 10 - 24),
                amount: 15.00,
                category: CategoryName::new_unchecked("Transport"),
                description: "Bus fare".to_owned(),
            },
        ]
    }

    #[test]
    fn report_contains_summary_and_all_expenses() {
        let markup = report_document(&sample_expenses(), date!(2025 - 10 - 24));

        let html = Html::parse_document(&markup.into_string());
        assert!(html.errors.is_empty(), "invalid HTML: {:?}", html.errors);

        let text = html.root_element().text().collect::<String>();
        assert!(text.contains("$19.50"), "missing total: {text}");
        assert!(text.contains("Morning coffee"));
        assert!(text.contains("Bus fare"));
        assert!(text.contains("2025-10-22 to 2025-10-24"));
    }

    #[test]
    fn report_embeds_its_stylesheet() {
        let markup = report_document(&sample_expenses(), date!(2025 - 10 - 24));

        let html = Html::parse_document(&markup.into_string());
        let selector = Selector::parse("style").unwrap();
        assert!(html.select(&selector).next().is_some());
    }

    #[test]
    fn empty_report_shows_placeholder() {
        let markup = report_document(&[], date!(2025 - 10 - 24));

        let text = markup.into_string();
        assert!(text.contains("No expenses recorded."));
        assert!(text.contains("N/A"));
    }

    #[test]
    fn report_file_name_is_date_stamped() {
        assert_eq!(
            report_file_name(date!(2025 - 10 - 24)),
            "expense_report_20251024.html"
        );
    }
}
