//! Text rendering of the dashboard for the terminal.
//!
//! Every function returns a `String` so that commands can print it, or tests can inspect it.

use crate::charts::{CategorySlice, Chart, MonthlyBar};
use crate::dashboard::Dashboard;
use crate::model::{money, Transaction};
use crate::theme::UiContext;
use chrono::Local;
use colored::Colorize;
use comfy_table::{Cell, Table};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

pub const TITLE: &str = "Finance Dashboard";
pub const SUBTITLE: &str = "Track your income and expenses smartly";
pub const NO_TRANSACTIONS: &str = "No transactions found.";
pub const NO_SUMMARY: &str = "No summary data available";
pub const NO_CATEGORIES: &str = "No category data available";
pub const LOADING: &str = "Loading...";

/// The widest bar, in characters.
const BAR_WIDTH: u32 = 30;
const BAR: char = '█';

pub fn header(ui: &UiContext) -> String {
    format!(
        "{}\n{}",
        TITLE.color(ui.heading()).bold(),
        SUBTITLE.color(ui.muted())
    )
}

pub fn error_banner(ui: &UiContext, message: &str) -> String {
    format!("{} {message}", "Error:".color(ui.expense()).bold())
}

/// Formats the amount of `t` with a sign, e.g. `+$1,200.00` or `-$4.50`.
pub fn signed_money(t: &Transaction) -> String {
    format!("{}{}", t.kind().sign(), t.amount().money())
}

pub fn transaction_table(ui: &UiContext, rows: &[&Transaction]) -> String {
    let mut table = Table::new();
    table.set_header(
        ["Description", "Amount", "Category", "Type", "Date", "Id"]
            .into_iter()
            .map(|h| Cell::new(h).fg(ui.header_cell())),
    );
    if rows.is_empty() {
        table.add_row(vec![Cell::new(NO_TRANSACTIONS)]);
    }
    for t in rows {
        table.add_row(vec![
            Cell::new(t.description()),
            Cell::new(signed_money(t)).fg(ui.amount_cell(t.kind().is_expense())),
            Cell::new(t.category()),
            Cell::new(t.kind()),
            Cell::new(t.date().with_timezone(&Local).format("%Y-%m-%d")),
            Cell::new(t.id()),
        ]);
    }
    table.to_string()
}

fn bar(value: Decimal, max: Decimal) -> String {
    if max <= Decimal::ZERO {
        return String::new();
    }
    let width = (value * Decimal::from(BAR_WIDTH) / max)
        .round()
        .to_usize()
        .unwrap_or_default();
    BAR.to_string().repeat(width)
}

/// Income and expense bars per month, scaled to the largest value in the chart.
pub fn monthly_chart(ui: &UiContext, chart: &Chart<MonthlyBar>) -> String {
    let mut out = format!("{}\n", "Monthly Income vs Expenses".color(ui.heading()).bold());
    if chart.is_no_data() {
        out.push_str(NO_SUMMARY);
        return out;
    }
    let series = chart.series();
    let max = series
        .iter()
        .flat_map(|b| [b.income, b.expense])
        .max()
        .unwrap_or_default();
    let label_width = series.iter().map(|b| b.label.len()).max().unwrap_or(0);
    let lines: Vec<String> = series
        .iter()
        .map(|b| {
            format!(
                "{:label_width$}  income  {} {}\n{:label_width$}  expense {} {}",
                b.label,
                bar(b.income, max).color(ui.income()),
                money(b.income),
                "",
                bar(b.expense, max).color(ui.expense()),
                money(b.expense),
            )
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}

/// Parses `#RRGGBB`.
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |ix: usize| u8::from_str_radix(hex.get(ix..ix + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

/// One line per expense category with its share of the total.
pub fn category_chart(ui: &UiContext, chart: &Chart<CategorySlice>) -> String {
    let mut out = format!("{}\n", "Expenses by Category".color(ui.heading()).bold());
    if chart.is_no_data() {
        out.push_str(NO_CATEGORIES);
        return out;
    }
    let series = chart.series();
    let total: Decimal = series.iter().map(|s| s.value).sum();
    let max = series.iter().map(|s| s.value).max().unwrap_or_default();
    let label_width = series.iter().map(|s| s.label.len()).max().unwrap_or(0);
    let lines: Vec<String> = series
        .iter()
        .map(|s| {
            let share = if total > Decimal::ZERO {
                s.value * Decimal::ONE_HUNDRED / total
            } else {
                Decimal::ZERO
            };
            let bar = bar(s.value, max);
            let bar = match hex_rgb(s.color) {
                Some((r, g, b)) => bar.truecolor(r, g, b),
                None => bar.normal(),
            };
            format!(
                "{:label_width$}  {bar} {} ({share:.1}%)",
                s.label,
                money(s.value)
            )
        })
        .collect();
    out.push_str(&lines.join("\n"));
    out
}

/// The whole dashboard: header, error banner, both charts and the filtered table.
pub fn dashboard(ui: &UiContext, dashboard: &Dashboard) -> String {
    let mut sections = vec![header(ui)];
    if let Some(message) = dashboard.error() {
        sections.push(error_banner(ui, message));
    }
    sections.push(monthly_chart(ui, &dashboard.monthly_chart()));
    sections.push(category_chart(ui, &dashboard.category_chart()));

    let sort = dashboard.sort();
    let mut status = format!("Sorted by {} ({})", sort.field, sort.direction);
    if !dashboard.query().is_empty() {
        status = format!("Search: \"{}\"  {status}", dashboard.query());
    }
    sections.push(status.color(ui.muted()).to_string());
    sections.push(transaction_table(ui, &dashboard.view()));
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryApi;
    use crate::charts;
    use crate::model::{Amount, CategorySummaryPoint, Kind, MonthlySummaryPoint, NewTransaction};
    use crate::theme::Theme;
    use chrono::{TimeZone, Utc};

    fn ui() -> UiContext {
        UiContext::new(Theme::Light)
    }

    fn transaction(amount: i64, kind: Kind) -> Transaction {
        Transaction::from_new(
            "abc123",
            NewTransaction::new(
                "Rent",
                Amount::new(Decimal::from(amount)),
                "Housing",
                kind,
                Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            ),
        )
    }

    #[test]
    fn test_signed_money() {
        assert_eq!(signed_money(&transaction(1200, Kind::Expense)), "-$1,200.00");
        assert_eq!(signed_money(&transaction(5, Kind::Income)), "+$5.00");
    }

    #[test]
    fn test_empty_table() {
        let table = transaction_table(&ui(), &[]);
        assert!(table.contains("Description"));
        assert!(table.contains(NO_TRANSACTIONS));
    }

    #[test]
    fn test_table_rows() {
        let t = transaction(1200, Kind::Expense);
        let table = transaction_table(&ui(), &[&t]);
        assert!(table.contains("Rent"));
        assert!(table.contains("-$1,200.00"));
        assert!(table.contains("Housing"));
        assert!(table.contains("expense"));
        assert!(table.contains("abc123"));
        assert!(!table.contains(NO_TRANSACTIONS));
    }

    #[test]
    fn test_monthly_chart_scales_bars() {
        let chart = charts::monthly(&[MonthlySummaryPoint::new(
            "2024-01",
            Decimal::from(100),
            Decimal::from(50),
        )]);
        let text = monthly_chart(&ui(), &chart);
        assert!(text.contains("Jan 2024"));
        assert_eq!(text.matches(BAR).count(), 45);
        assert!(text.contains("$100.00"));
    }

    #[test]
    fn test_charts_without_data() {
        assert!(monthly_chart(&ui(), &charts::monthly(&[])).contains(NO_SUMMARY));
        assert!(category_chart(&ui(), &charts::categories(&[])).contains(NO_CATEGORIES));
    }

    #[test]
    fn test_category_chart_shares() {
        let chart = charts::categories(&[
            CategorySummaryPoint::new("Food", Kind::Expense, Decimal::from(25)),
            CategorySummaryPoint::new("Rent", Kind::Expense, Decimal::from(75)),
        ]);
        let text = category_chart(&ui(), &chart);
        assert!(text.contains("Food"));
        assert!(text.contains("(25.0%)"));
        assert!(text.contains("(75.0%)"));
    }

    #[test]
    fn test_hex_rgb() {
        assert_eq!(hex_rgb("#6366F1"), Some((0x63, 0x66, 0xF1)));
        assert_eq!(hex_rgb("6366F1"), None);
        assert_eq!(hex_rgb("#12"), None);
    }

    #[tokio::test]
    async fn test_dashboard_shows_error_banner() {
        let api = MemoryApi::seeded().unwrap();
        let mut dashboard = Dashboard::new(Box::new(api.clone()));
        dashboard.load().await.unwrap();
        api.set_offline(true);
        let _ = dashboard.load().await;

        let text = super::dashboard(&ui(), &dashboard);
        assert!(text.contains(TITLE));
        assert!(text.contains(crate::dashboard::LOAD_ERROR));
        assert!(text.contains("Aug 2025"));
        assert!(text.contains("Whole Foods Market"));
    }
}
