use crate::model::Amount;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// The category used when none is given.
pub const DEFAULT_CATEGORY: &str = "Other";

/// Whether money came in or went out.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    #[default]
    Income,
    Expense,
}

serde_plain::derive_display_from_serialize!(Kind);
serde_plain::derive_fromstr_from_deserialize!(Kind);

impl Kind {
    /// Interprets a free-form label. Only a case-insensitive `expense` is an expense; everything
    /// else, including a missing label, is income.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(s) if s.trim().eq_ignore_ascii_case("expense") => Kind::Expense,
            _ => Kind::Income,
        }
    }

    pub fn is_expense(&self) -> bool {
        matches!(self, Kind::Expense)
    }

    /// `+` for income and `-` for expenses.
    pub fn sign(&self) -> &'static str {
        match self {
            Kind::Income => "+",
            Kind::Expense => "-",
        }
    }
}

/// A transaction that has not been stored yet and therefore has no id. This is the body of a
/// create request and the output of a CSV import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub(crate) description: String,
    pub(crate) amount: Amount,
    pub(crate) category: String,
    #[serde(rename = "type")]
    pub(crate) kind: Kind,
    pub(crate) date: DateTime<Utc>,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: Amount,
        category: impl Into<String>,
        kind: Kind,
        date: DateTime<Utc>,
    ) -> Self {
        let category = category.into();
        Self {
            description: description.into(),
            amount,
            category: if category.trim().is_empty() {
                DEFAULT_CATEGORY.to_string()
            } else {
                category
            },
            kind,
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }
}

/// A transaction as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id", alias = "id")]
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) amount: Amount,
    #[serde(default = "default_category")]
    pub(crate) category: String,
    #[serde(rename = "type", default, deserialize_with = "kind_label")]
    pub(crate) kind: Kind,
    pub(crate) date: DateTime<Utc>,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

/// Reads `type` the way CSV import does: anything but `expense` is income.
fn kind_label<'de, D>(deserializer: D) -> Result<Kind, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(Kind::from_label(label.as_deref()))
}

impl Transaction {
    /// Gives `new` the identifier `id`, as the backend does when it stores a transaction.
    pub fn from_new(id: impl Into<String>, new: NewTransaction) -> Self {
        Self {
            id: id.into(),
            description: new.description,
            amount: new.amount,
            category: new.category,
            kind: new.kind,
            date: new.date,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// The transaction without its id.
    pub fn to_new(&self) -> NewTransaction {
        NewTransaction {
            description: self.description.clone(),
            amount: self.amount,
            category: self.category.clone(),
            kind: self.kind,
            date: self.date,
        }
    }
}
