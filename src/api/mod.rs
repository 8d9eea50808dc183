//! Access to the finance API.
//!
//! `Api` is the seam between the dashboard and the network. `HttpApi` talks to the real REST
//! backend and `MemoryApi` keeps everything in memory so that the whole app can be exercised
//! without a server.

mod http;
mod memory;

use crate::model::{CategorySummaryPoint, MonthlySummaryPoint, NewTransaction, Transaction};
use crate::{Config, Result};

pub use memory::MemoryApi;

/// The operations offered by the finance backend. Every call is a single round trip: there are
/// no retries and no timeouts beyond those of the transport.
#[async_trait::async_trait]
pub trait Api: Send + Sync {
    /// `GET /transactions`
    async fn transactions(&self) -> Result<Vec<Transaction>>;

    /// `GET /summary/monthly`
    async fn monthly_summary(&self) -> Result<Vec<MonthlySummaryPoint>>;

    /// `GET /summary/categories`
    async fn category_summary(&self) -> Result<Vec<CategorySummaryPoint>>;

    /// `POST /transactions`, returning the stored transaction with its new id.
    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction>;

    /// `DELETE /transactions/{id}`
    async fn delete_transaction(&self, id: &str) -> Result<()>;

    /// `POST /transactions/import` as a multipart upload. The response format is up to the
    /// backend so it is returned as text.
    async fn import_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String>;

    /// `GET /transactions/export`, returning the raw CSV bytes.
    async fn export_file(&self) -> Result<Vec<u8>>;
}

/// Whether the app is talking to the real backend or to the in-memory one.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// When `FINDASH_IN_TEST_MODE` is set and non-empty the mode is `Mode::Test`, otherwise it is
    /// `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var("FINDASH_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the `Api` implementation for `mode`.
pub fn connect(config: &Config, mode: Mode) -> Result<Box<dyn Api>> {
    match mode {
        Mode::Http => Ok(Box::new(http::HttpApi::new(config.api_url())?)),
        Mode::Test => Ok(Box::new(MemoryApi::seeded()?)),
    }
}
