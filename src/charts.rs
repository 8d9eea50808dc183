//! Reshapes the backend's summaries into chart-ready series.
//!
//! Both adapters accept an empty list and then produce `Chart::NoData`, which the renderer turns
//! into a "no data" message instead of an empty chart.

use crate::model::{CategorySummaryPoint, MonthlySummaryPoint};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Slice colours, assigned by position and repeated when there are more slices than colours.
pub const PALETTE: [&str; 6] = [
    "#6366F1", "#06B6D4", "#10B981", "#F59E0B", "#EF4444", "#A855F7",
];

/// Either something to draw or the explicit absence of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "series")]
pub enum Chart<T> {
    NoData,
    Series(Vec<T>),
}

impl<T> Chart<T> {
    fn from_series(series: Vec<T>) -> Self {
        if series.is_empty() {
            Chart::NoData
        } else {
            Chart::Series(series)
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, Chart::NoData)
    }

    /// The series, empty for `NoData`.
    pub fn series(&self) -> &[T] {
        match self {
            Chart::NoData => &[],
            Chart::Series(series) => series,
        }
    }
}

/// One month on the income/expense bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyBar {
    pub label: String,
    pub income: Decimal,
    pub expense: Decimal,
}

/// One slice of the expenses-by-category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    pub label: String,
    pub value: Decimal,
    pub color: &'static str,
}

/// Maps each month to a bar with a readable label such as `Jan 2024`.
pub fn monthly(points: &[MonthlySummaryPoint]) -> Chart<MonthlyBar> {
    Chart::from_series(
        points
            .iter()
            .map(|p| MonthlyBar {
                label: month_label(p.month()),
                income: p.total_income(),
                expense: p.total_expense(),
            })
            .collect(),
    )
}

/// Keeps only expense totals and colours them from `PALETTE` by position. Income by category is
/// never charted.
pub fn categories(points: &[CategorySummaryPoint]) -> Chart<CategorySlice> {
    Chart::from_series(
        points
            .iter()
            .filter(|p| p.kind().is_expense())
            .enumerate()
            .map(|(ix, p)| CategorySlice {
                label: p.category().to_string(),
                value: p.total(),
                color: PALETTE[ix % PALETTE.len()],
            })
            .collect(),
    )
}

/// Turns `2024-01` or `2024-01-31` into `Jan 2024`. Anything else is returned unchanged.
pub fn month_label(month: &str) -> String {
    let month = month.trim();
    let date = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(month, "%Y-%m-%d"));
    match date {
        Ok(date) => date.format("%b %Y").to_string(),
        Err(_) => month.to_string(),
    }
}
