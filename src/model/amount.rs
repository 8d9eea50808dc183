//! Amount type for the unsigned magnitude of a transaction.
//!
//! Transactions never carry a negative amount: the sign is implied by the transaction's `Kind`.
//! `Amount` enforces this by storing the absolute value of whatever it is given.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// A non-negative monetary value.
///
/// # Examples
///
/// ```
/// # use findash::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("-12.50").unwrap();
/// assert_eq!(amount.to_string(), "12.50");
/// assert_eq!(amount.money(), "$12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    /// Creates an `Amount` holding the magnitude of `value`.
    pub fn new(value: Decimal) -> Self {
        Self(value.abs())
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Formats the amount as dollars with thousands separators, e.g. `$1,234.50`.
    pub fn money(&self) -> String {
        money(self.0)
    }
}

/// Formats `value` as dollars with thousands separators, e.g. `$1,234.50` or `-$3.00`.
pub fn money(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let num = value.abs().to_f64().unwrap_or_default();
    format!("{sign}${}", format_num::format_num!(",.2", num))
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    source: Option<rust_decimal::Error>,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AmountError({:?})", self.input)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a number", self.input)
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source.as_ref().map(|e| e as &(dyn Error + 'static))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    /// Parses plain (`12.50`, `-3`) or scientific (`1.5e3`) notation. Anything else, including the
    /// empty string, is an error.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AmountError {
                input: s.to_string(),
                source: None,
            });
        }
        let value = match Decimal::from_str(trimmed) {
            Ok(value) => value,
            Err(e) => Decimal::from_scientific(trimmed).map_err(|_| AmountError {
                input: s.to_string(),
                source: Some(e),
            })?,
        };
        Ok(Amount::new(value))
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        // A JSON number carrying the exact decimal digits
        let number = serde_json::Number::from_str(&self.0.normalize().to_string())
            .map_err(serde::ser::Error::custom)?;
        number.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    /// Accepts a JSON number or, occasionally, a numeric string.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::String(s) => s,
            other => {
                return Err(serde::de::Error::custom(format!(
                    "expected an amount, got {other}"
                )))
            }
        };
        Amount::from_str(&text).map_err(serde::de::Error::custom)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("50.00").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_negative_stores_magnitude() {
        let amount = Amount::from_str("-50.25").unwrap();
        assert_eq!(amount.value(), dec("50.25"));
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1.5e3").unwrap();
        assert_eq!(amount.value(), dec("1500"));
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  7.5  ").unwrap();
        assert_eq!(amount.value(), dec("7.5"));
    }

    #[test]
    fn test_parse_rejects_text_and_empty() {
        assert!(Amount::from_str("abc").is_err());
        assert!(Amount::from_str("").is_err());
        assert!(Amount::from_str("$5").is_err());
        let err = Amount::from_str("abc").unwrap_err();
        assert_eq!(err.to_string(), "'abc' is not a number");
    }

    #[test]
    fn test_money() {
        assert_eq!(money(dec("1234.5")), "$1,234.50");
        assert_eq!(money(dec("-3")), "-$3.00");
        assert_eq!(money(Decimal::ZERO), "$0.00");
        assert_eq!(Amount::new(dec("-0.5")).money(), "$0.50");
    }

    #[test]
    fn test_json_number_and_string() {
        let a: Amount = serde_json::from_str("12.5").unwrap();
        assert_eq!(a.value(), dec("12.5"));
        let b: Amount = serde_json::from_str("\"0.1\"").unwrap();
        assert_eq!(b.value(), dec("0.1"));
        let c: Amount = serde_json::from_str("0.1").unwrap();
        assert_eq!(c.value(), dec("0.1"));
        assert!(serde_json::from_str::<Amount>("\"abc\"").is_err());
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&Amount::new(dec("12.5"))).unwrap();
        assert_eq!(json, "12.5");
        let json = serde_json::to_string(&Amount::new(dec("12.50"))).unwrap();
        assert_eq!(json, "12.5");
    }

    #[test]
    fn test_json_keeps_every_digit() {
        let amount = Amount::new(dec("12345678901234567.89"));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "12345678901234567.89");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }
}
