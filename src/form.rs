//! The "add transaction" form: raw user input and its validation.

use crate::csv_codec::parse_date;
use crate::error::{Error, ErrorType};
use crate::model::{Amount, Kind, NewTransaction, DEFAULT_CATEGORY};
use crate::Result;
use anyhow::anyhow;
use chrono::{DateTime, Utc};
use std::str::FromStr;

/// Categories offered to the user. Any other text is accepted too.
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Food",
    "Housing",
    "Transportation",
    "Utilities",
    "Entertainment",
    "Other",
];

/// One line naming the suggested categories, for help text.
pub fn category_hint() -> String {
    format!("Suggested categories: {}", SUGGESTED_CATEGORIES.join(", "))
}

/// Unvalidated form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionForm {
    pub description: String,
    pub amount: String,
    pub category: String,
    pub kind: Kind,
    /// Optional date. Blank means "now".
    pub date: Option<String>,
}

impl Default for TransactionForm {
    fn default() -> Self {
        Self {
            description: String::new(),
            amount: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            kind: Kind::Income,
            date: None,
        }
    }
}

impl TransactionForm {
    /// Validates the input, dating the transaction `now` when no date was given.
    ///
    /// # Errors
    /// - `Validation` if the description is blank, or the amount is blank, not a number, or
    ///   negative, or the date cannot be read.
    pub fn submit(&self, now: DateTime<Utc>) -> Result<NewTransaction> {
        let description = self.description.trim();
        if description.is_empty() {
            return Err(invalid("A description is required"));
        }
        let amount_text = self.amount.trim();
        if amount_text.is_empty() {
            return Err(invalid("An amount is required"));
        }
        if amount_text.starts_with('-') {
            return Err(invalid(
                "The amount must not be negative, choose income or expense instead",
            ));
        }
        let amount = Amount::from_str(amount_text).map_err(|e| invalid(e.to_string()))?;
        let date = match self.date.as_deref().map(str::trim) {
            None | Some("") => now,
            Some(text) => parse_date(text)
                .ok_or_else(|| invalid(format!("'{text}' is not a date, use YYYY-MM-DD")))?,
        };
        Ok(NewTransaction::new(
            description,
            amount,
            self.category.trim(),
            self.kind,
            date,
        ))
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::new(ErrorType::Validation, anyhow!(message.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    fn form(description: &str, amount: &str) -> TransactionForm {
        TransactionForm {
            description: description.to_string(),
            amount: amount.to_string(),
            ..TransactionForm::default()
        }
    }

    #[test]
    fn test_submit_defaults() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let new = form("Paycheck", "1500").submit(now).unwrap();
        assert_eq!(new.description(), "Paycheck");
        assert_eq!(new.amount().value(), Decimal::from(1500));
        assert_eq!(new.category(), "Other");
        assert_eq!(new.kind(), Kind::Income);
        assert_eq!(new.date(), now);
    }

    #[test]
    fn test_submit_with_date_and_kind() {
        let f = TransactionForm {
            kind: Kind::Expense,
            category: "Food".to_string(),
            date: Some("2024-04-30".to_string()),
            ..form("Groceries", "54.20")
        };
        let new = f.submit(Utc::now()).unwrap();
        assert_eq!(new.kind(), Kind::Expense);
        assert_eq!(new.category(), "Food");
        assert_eq!(
            new.date(),
            Utc.with_ymd_and_hms(2024, 4, 30, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_submit_rejects_missing_fields() {
        let err = form("  ", "10").submit(Utc::now()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.to_string().contains("description"));

        let err = form("Lunch", "").submit(Utc::now()).unwrap_err();
        assert!(err.to_string().contains("amount"));
    }

    #[test]
    fn test_submit_rejects_bad_amounts() {
        let err = form("Lunch", "ten").submit(Utc::now()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
        assert!(err.to_string().contains("not a number"));

        let err = form("Lunch", "-5").submit(Utc::now()).unwrap_err();
        assert!(err.to_string().contains("negative"));
    }

    #[test]
    fn test_category_hint() {
        assert_eq!(
            category_hint(),
            "Suggested categories: Food, Housing, Transportation, Utilities, Entertainment, Other"
        );
    }

    #[test]
    fn test_submit_rejects_bad_date() {
        let f = TransactionForm {
            date: Some("yesterday".to_string()),
            ..form("Lunch", "5")
        };
        let err = f.submit(Utc::now()).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }
}
