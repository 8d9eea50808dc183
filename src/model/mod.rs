//! Types that represent the core data model, such as `Transaction` and the summary points.
mod amount;
mod summary;
mod transaction;

pub use amount::{money, Amount, AmountError};
pub use summary::{CategorySummaryPoint, MonthlySummaryPoint};
pub use transaction::{Kind, NewTransaction, Transaction, DEFAULT_CATEGORY};
