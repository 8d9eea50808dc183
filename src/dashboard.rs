//! The dashboard view-model.
//!
//! `Dashboard` owns the last successfully fetched transactions and summaries, plus the user's
//! search and sort choices. Every mutation goes to the backend and is followed by a full reload,
//! so the local lists only ever hold what the server last reported.

use crate::api::{self, Api, Mode};
use crate::charts::{self, CategorySlice, Chart, MonthlyBar};
use crate::csv_codec;
use crate::error::{ErrorType, IntoResult};
use crate::form::TransactionForm;
use crate::model::{CategorySummaryPoint, MonthlySummaryPoint, Transaction};
use crate::{Config, Result};
use anyhow::Context;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::io::Read;
use tracing::{debug, error, info, warn};

/// The message shown when the dashboard data cannot be fetched.
pub const LOAD_ERROR: &str = "Failed to load data. Please try again later.";

/// The column the transaction list is ordered by.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Category,
    Description,
}

serde_plain::derive_display_from_serialize!(SortField);
serde_plain::derive_fromstr_from_deserialize!(SortField);

impl SortField {
    fn compare(self, a: &Transaction, b: &Transaction) -> Ordering {
        match self {
            SortField::Date => a.date().cmp(&b.date()),
            SortField::Amount => a.amount().cmp(&b.amount()),
            SortField::Category => a.category().cmp(b.category()),
            SortField::Description => a.description().cmp(b.description()),
        }
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

serde_plain::derive_display_from_serialize!(Direction);
serde_plain::derive_fromstr_from_deserialize!(Direction);

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Asc => Direction::Desc,
            Direction::Desc => Direction::Asc,
        }
    }
}

/// Newest first unless told otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: Direction,
}

impl Sort {
    pub fn new(field: SortField, direction: Direction) -> Self {
        Self { field, direction }
    }
}

/// How a CSV file gets to the backend.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Decode the file locally and create the transactions one at a time.
    #[default]
    Sequential,
    /// Send the raw file to the backend's import endpoint.
    Upload,
}

serde_plain::derive_display_from_serialize!(ImportMode);
serde_plain::derive_fromstr_from_deserialize!(ImportMode);

/// The outcome of an import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Transactions the backend accepted.
    pub submitted: usize,
    /// Transactions the backend rejected.
    pub failed: usize,
    /// Rows that were skipped because they could not be read.
    pub dropped: usize,
    /// The backend's response to an upload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

pub struct Dashboard {
    api: Box<dyn Api>,
    transactions: Vec<Transaction>,
    monthly: Vec<MonthlySummaryPoint>,
    categories: Vec<CategorySummaryPoint>,
    error: Option<String>,
    query: String,
    sort: Sort,
}

impl Dashboard {
    /// An empty dashboard backed by `api`. Nothing is fetched until `load` is called.
    pub fn new(api: Box<dyn Api>) -> Self {
        Self {
            api,
            transactions: Vec::new(),
            monthly: Vec::new(),
            categories: Vec::new(),
            error: None,
            query: String::new(),
            sort: Sort::default(),
        }
    }

    /// Creates the backend for `mode` and loads the initial data.
    ///
    /// # Errors
    /// - Returns an error if the backend cannot be created or the initial load fails.
    pub async fn open(config: &Config, mode: Mode) -> Result<Self> {
        let mut dashboard = Self::new(api::connect(config, mode)?);
        dashboard.load().await?;
        Ok(dashboard)
    }

    /// Fetches the transactions and both summaries together. The lists are only replaced when
    /// all three requests succeed; otherwise the previous lists stay and `error` is set.
    pub async fn load(&mut self) -> Result<()> {
        let result = tokio::try_join!(
            self.api.transactions(),
            self.api.monthly_summary(),
            self.api.category_summary(),
        );
        match result {
            Ok((transactions, monthly, categories)) => {
                debug!(
                    "Loaded {} transactions, {} months, {} category totals",
                    transactions.len(),
                    monthly.len(),
                    categories.len()
                );
                self.transactions = transactions;
                self.monthly = monthly;
                self.categories = categories;
                self.error = None;
                Ok(())
            }
            Err(e) => {
                error!("Error loading dashboard data: {e}");
                self.error = Some(LOAD_ERROR.to_string());
                Err(e.context(LOAD_ERROR))
            }
        }
    }

    /// Reloads after a mutation. A failure here is already recorded in `error`, so the mutation
    /// itself still counts as done.
    async fn refresh(&mut self) {
        if let Err(e) = self.load().await {
            warn!("Unable to refresh after a change: {e}");
        }
    }

    /// Validates `form`, creates the transaction and reloads.
    ///
    /// # Errors
    /// - `Validation` if the form is not valid, or the backend error if the create fails.
    pub async fn add(&mut self, form: &TransactionForm) -> Result<Transaction> {
        let new = form.submit(Utc::now())?;
        let created = self.api.create_transaction(&new).await?;
        info!("Added transaction {}", created.id());
        self.refresh().await;
        Ok(created)
    }

    /// Deletes the transaction with `id` and reloads.
    pub async fn delete(&mut self, id: &str) -> Result<()> {
        self.api.delete_transaction(id).await?;
        info!("Deleted transaction {id}");
        self.refresh().await;
        Ok(())
    }

    /// Imports a CSV file and reloads.
    ///
    /// With `ImportMode::Sequential` each readable row is created on its own; a row the backend
    /// rejects is logged and counted but does not stop the rest. With `ImportMode::Upload` the
    /// file is sent as-is and the backend does the parsing.
    ///
    /// # Errors
    /// - `Csv` if the header cannot be read, `Io` if the file cannot be read for an upload, or
    ///   the backend error if an upload fails.
    pub async fn import<R>(
        &mut self,
        mut reader: R,
        file_name: &str,
        mode: ImportMode,
    ) -> Result<ImportReport>
    where
        R: Read,
    {
        let report = match mode {
            ImportMode::Sequential => {
                let mut rows = csv_codec::import(reader)?;
                let mut report = ImportReport::default();
                for new in rows.by_ref() {
                    match self.api.create_transaction(&new).await {
                        Ok(created) => {
                            debug!("Imported '{}' as {}", created.description(), created.id());
                            report.submitted += 1;
                        }
                        Err(e) => {
                            warn!("Unable to import '{}': {e}", new.description());
                            report.failed += 1;
                        }
                    }
                }
                report.dropped = rows.dropped();
                report
            }
            ImportMode::Upload => {
                let mut contents = Vec::new();
                reader
                    .read_to_end(&mut contents)
                    .with_context(|| format!("Unable to read '{file_name}'"))
                    .pub_result(ErrorType::Io)?;
                let response = self.api.import_file(file_name, contents).await?;
                ImportReport {
                    response: Some(response),
                    ..ImportReport::default()
                }
            }
        };
        info!(
            "Imported {file_name}: {} submitted, {} failed, {} dropped",
            report.submitted, report.failed, report.dropped
        );
        self.refresh().await;
        Ok(report)
    }

    /// The loaded transactions as CSV, `None` when there are none.
    pub fn export(&self) -> Result<Option<String>> {
        csv_codec::export(&self.transactions)
    }

    /// The backend's own CSV export.
    pub async fn download(&self) -> Result<Vec<u8>> {
        self.api.export_file().await
    }

    /// The transactions matching the query, in sort order.
    ///
    /// The query matches case-insensitively anywhere in the description or the category. An
    /// empty query matches everything.
    pub fn view(&self) -> Vec<&Transaction> {
        let query = self.query.to_lowercase();
        let mut rows: Vec<&Transaction> = self
            .transactions
            .iter()
            .filter(|t| {
                query.is_empty()
                    || t.description().to_lowercase().contains(&query)
                    || t.category().to_lowercase().contains(&query)
            })
            .collect();
        let Sort { field, direction } = self.sort;
        rows.sort_by(|a, b| {
            let ordering = field.compare(a, b);
            match direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            }
        });
        rows
    }

    pub fn monthly_chart(&self) -> Chart<MonthlyBar> {
        charts::monthly(&self.monthly)
    }

    pub fn category_chart(&self) -> Chart<CategorySlice> {
        charts::categories(&self.categories)
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
    }

    /// Sorts by `field` without changing the direction.
    pub fn set_sort_field(&mut self, field: SortField) {
        self.sort.field = field;
    }

    pub fn toggle_direction(&mut self) {
        self.sort.direction = self.sort.direction.reversed();
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn monthly(&self) -> &[MonthlySummaryPoint] {
        &self.monthly
    }

    pub fn categories(&self) -> &[CategorySummaryPoint] {
        &self.categories
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn sort(&self) -> Sort {
        self.sort
    }
}
