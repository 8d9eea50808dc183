//! Implements the `Api` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without a backend server. It plays the role of the backend, so unlike the
//! rest of the client it assigns ids and computes the summaries itself.

use crate::api::Api;
use crate::csv_codec;
use crate::error::{Error, ErrorType};
use crate::model::{
    CategorySummaryPoint, Kind, MonthlySummaryPoint, NewTransaction, Transaction,
};
use crate::Result;
use anyhow::anyhow;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// An in-memory backend. Clones share the same state, which lets a test keep a handle while the
/// dashboard owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryApi {
    transactions: Arc<Mutex<Vec<Transaction>>>,
    offline: Arc<AtomicBool>,
}

impl MemoryApi {
    /// Create a new `MemoryApi` holding `transactions`.
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self {
            transactions: Arc::new(Mutex::new(transactions)),
            offline: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a new `MemoryApi` seeded with the sample data from this module.
    pub fn seeded() -> Result<Self> {
        let transactions = csv_codec::import(SEED_DATA.as_bytes())?
            .map(|new| Transaction::from_new(new_id(), new))
            .collect();
        Ok(Self::new(transactions))
    }

    /// While offline every call fails with a `Network` error, like an unreachable server.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// A copy of the stored transactions.
    pub async fn snapshot(&self) -> Vec<Transaction> {
        self.transactions.lock().await.clone()
    }

    fn check_online(&self, what: &str) -> Result<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::new(
                ErrorType::Network,
                anyhow!("Unable to reach the API to {what}: connection refused"),
            ));
        }
        Ok(())
    }
}

fn new_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait::async_trait]
impl Api for MemoryApi {
    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.check_online("list transactions")?;
        Ok(self.snapshot().await)
    }

    async fn monthly_summary(&self) -> Result<Vec<MonthlySummaryPoint>> {
        self.check_online("get the monthly summary")?;
        let transactions = self.transactions.lock().await;
        Ok(monthly_summary(&transactions))
    }

    async fn category_summary(&self) -> Result<Vec<CategorySummaryPoint>> {
        self.check_online("get the category summary")?;
        let transactions = self.transactions.lock().await;
        Ok(category_summary(&transactions))
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        self.check_online("create a transaction")?;
        let stored = Transaction::from_new(new_id(), transaction.clone());
        debug!("Storing transaction {}", stored.id());
        self.transactions.lock().await.push(stored.clone());
        Ok(stored)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        self.check_online(&format!("delete transaction {id}"))?;
        let mut transactions = self.transactions.lock().await;
        let before = transactions.len();
        transactions.retain(|t| t.id() != id);
        if transactions.len() == before {
            return Err(Error::new(
                ErrorType::Http,
                anyhow!(
                    "The API failed to delete transaction {id} with status 404 Not Found: \
                    Transaction not found"
                ),
            ));
        }
        Ok(())
    }

    async fn import_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String> {
        self.check_online("import transactions")?;
        let mut rows = csv_codec::import(contents.as_slice())?;
        let imported: Vec<Transaction> = rows
            .by_ref()
            .map(|new| Transaction::from_new(new_id(), new))
            .collect();
        let count = imported.len();
        debug!("Imported {count} transactions from {file_name}");
        self.transactions.lock().await.extend(imported);
        Ok(serde_json::json!({ "imported": count, "skipped": rows.dropped() }).to_string())
    }

    async fn export_file(&self) -> Result<Vec<u8>> {
        self.check_online("export transactions")?;
        let transactions = self.transactions.lock().await;
        Ok(csv_codec::write_csv(&transactions)?.into_bytes())
    }
}

/// Totals per calendar month (`YYYY-MM`), oldest first.
fn monthly_summary(transactions: &[Transaction]) -> Vec<MonthlySummaryPoint> {
    let mut months: BTreeMap<String, (Decimal, Decimal)> = BTreeMap::new();
    for t in transactions {
        let entry = months
            .entry(t.date().format("%Y-%m").to_string())
            .or_default();
        match t.kind() {
            Kind::Income => entry.0 += t.amount().value(),
            Kind::Expense => entry.1 += t.amount().value(),
        }
    }
    months
        .into_iter()
        .map(|(month, (income, expense))| MonthlySummaryPoint::new(month, income, expense))
        .collect()
}

/// Totals per (category, kind), ordered by category name.
fn category_summary(transactions: &[Transaction]) -> Vec<CategorySummaryPoint> {
    let mut totals: BTreeMap<(String, Kind), Decimal> = BTreeMap::new();
    for t in transactions {
        *totals
            .entry((t.category().to_string(), t.kind()))
            .or_default() += t.amount().value();
    }
    totals
        .into_iter()
        .map(|((category, kind), total)| CategorySummaryPoint::new(category, kind, total))
        .collect()
}

/// Seed transaction data.
const SEED_DATA: &str = r##"description,amount,category,type,date
Salary,4200.00,Income,income,2025-08-01T09:00:00.000Z
Rent,1450.00,Housing,expense,2025-08-02T10:00:00.000Z
Whole Foods Market,87.43,Food,expense,2025-08-05T18:22:00.000Z
Coffee,4.75,Food,expense,2025-08-06T08:15:00.000Z
Electric bill,92.10,Utilities,expense,2025-08-10T07:00:00.000Z
Bus pass,65.00,Transportation,expense,2025-08-12T07:45:00.000Z
Concert tickets,120.00,Entertainment,expense,2025-08-20T20:00:00.000Z
Salary,4200.00,Income,income,2025-09-01T09:00:00.000Z
Rent,1450.00,Housing,expense,2025-09-02T10:00:00.000Z
Freelance design,650.00,Income,income,2025-09-14T16:30:00.000Z
Trader Joe's,63.21,Food,expense,2025-09-15T17:05:00.000Z
Internet,59.99,Utilities,expense,2025-09-18T07:00:00.000Z
Gas,48.90,Transportation,expense,2025-09-21T12:40:00.000Z
Streaming subscription,15.49,Entertainment,expense,2025-09-25T00:00:00.000Z
"##;
