//! Aggregates computed by the backend. The client never recomputes these; it only decodes them
//! leniently, because a chart should still render when one total is missing or malformed.

use crate::model::{Kind, DEFAULT_CATEGORY};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// Income and expense totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlySummaryPoint {
    /// The month, usually `YYYY-MM`.
    #[serde(default, alias = "_id")]
    pub(crate) month: String,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub(crate) total_income: Decimal,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub(crate) total_expense: Decimal,
}

impl MonthlySummaryPoint {
    pub fn new(month: impl Into<String>, total_income: Decimal, total_expense: Decimal) -> Self {
        Self {
            month: month.into(),
            total_income,
            total_expense,
        }
    }

    pub fn month(&self) -> &str {
        &self.month
    }

    pub fn total_income(&self) -> Decimal {
        self.total_income
    }

    pub fn total_expense(&self) -> Decimal {
        self.total_expense
    }
}

/// The total for one (category, kind) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummaryPoint {
    #[serde(default = "default_category", alias = "_id")]
    pub(crate) category: String,
    #[serde(rename = "type", default = "default_kind", deserialize_with = "lenient_kind")]
    pub(crate) kind: Kind,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub(crate) total: Decimal,
}

impl CategorySummaryPoint {
    pub fn new(category: impl Into<String>, kind: Kind, total: Decimal) -> Self {
        Self {
            category: category.into(),
            kind,
            total,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn total(&self) -> Decimal {
        self.total
    }
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Category summaries predate the `type` field and only covered expenses.
fn default_kind() -> Kind {
    Kind::Expense
}

/// Reads a number, a numeric string, or anything else as zero.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    let text = match value {
        Some(serde_json::Value::Number(n)) => n.to_string(),
        Some(serde_json::Value::String(s)) => s,
        _ => return Ok(Decimal::ZERO),
    };
    let trimmed = text.trim();
    Ok(Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO))
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Kind, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(match value {
        Some(label) => Kind::from_label(Some(&label)),
        None => default_kind(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monthly_lenient_totals() {
        let json = r#"[
            {"month": "2024-01", "total_income": 1200.5, "total_expense": "300"},
            {"month": "2024-02", "total_income": null, "total_expense": "n/a"},
            {"month": "2024-03"}
        ]"#;
        let points: Vec<MonthlySummaryPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].total_income(), Decimal::from_str("1200.5").unwrap());
        assert_eq!(points[0].total_expense(), Decimal::from(300));
        assert_eq!(points[1].total_income(), Decimal::ZERO);
        assert_eq!(points[1].total_expense(), Decimal::ZERO);
        assert_eq!(points[2].total_income(), Decimal::ZERO);
    }

    #[test]
    fn test_category_kind_and_defaults() {
        let json = r#"[
            {"category": "Food", "type": "Expense", "total": 42},
            {"category": "Salary", "type": "income", "total": 3000},
            {"category": "Rent", "total": {"oops": true}}
        ]"#;
        let points: Vec<CategorySummaryPoint> = serde_json::from_str(json).unwrap();
        assert_eq!(points[0].kind(), Kind::Expense);
        assert_eq!(points[1].kind(), Kind::Income);
        assert_eq!(points[2].kind(), Kind::Expense);
        assert_eq!(points[2].total(), Decimal::ZERO);
    }

    #[test]
    fn test_category_missing_name() {
        let points: Vec<CategorySummaryPoint> =
            serde_json::from_str(r#"[{"type": "expense", "total": 5}]"#).unwrap();
        assert_eq!(points[0].category(), "Other");
    }
}
