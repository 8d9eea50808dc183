//! Conversion between CSV files and transactions.
//!
//! The file format has the header `description,amount,category,type,date`. On import, columns are
//! matched by name, so their order does not matter and extra columns are ignored. Rows that cannot
//! be turned into a valid transaction are dropped rather than failing the whole file.
//!
//! Only the header and the `amount`, `type` and `date` values are trimmed. Descriptions and
//! categories are kept exactly as written so that an export reads back unchanged.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{Amount, Kind, NewTransaction, Transaction, DEFAULT_CATEGORY};
use crate::Result;
use anyhow::{anyhow, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use csv::{StringRecord, Trim};
use std::io;
use std::str::FromStr;
use tracing::debug;

/// The header row, in the order used for export.
pub const HEADERS: [&str; 5] = ["description", "amount", "category", "type", "date"];

/// Where each known column sits in the file. Missing columns are `None`.
#[derive(Debug, Default, Clone, Copy)]
struct Columns {
    description: Option<usize>,
    amount: Option<usize>,
    category: Option<usize>,
    kind: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    /// Finds the known columns by name, ignoring case.
    fn new(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
        Self {
            description: find("description"),
            amount: find("amount"),
            category: find("category"),
            kind: find("type"),
            date: find("date"),
        }
    }
}

/// Returns the non-empty value at `column`, if any. Short rows simply lack trailing values.
fn field(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    column
        .and_then(|ix| record.get(ix))
        .filter(|value| !value.is_empty())
}

/// Like `field`, with surrounding whitespace removed first.
fn trimmed(record: &StringRecord, column: Option<usize>) -> Option<&str> {
    field(record, column)
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Applies the per-column defaults to one row. Returns `None` when the amount is not a number.
fn row_to_transaction(
    record: &StringRecord,
    columns: &Columns,
    imported_at: DateTime<Utc>,
) -> Option<NewTransaction> {
    let amount = match Amount::from_str(trimmed(record, columns.amount).unwrap_or_default()) {
        Ok(amount) => amount,
        Err(e) => {
            debug!("Dropping CSV row {:?}: {e}", record.position().map(|p| p.line()));
            return None;
        }
    };
    let date = trimmed(record, columns.date)
        .and_then(parse_date)
        .unwrap_or(imported_at);
    Some(NewTransaction::new(
        field(record, columns.description).unwrap_or_default(),
        amount,
        field(record, columns.category).unwrap_or(DEFAULT_CATEGORY),
        Kind::from_label(trimmed(record, columns.kind)),
        date,
    ))
}

/// A lazy sequence of valid transactions read from a CSV source.
///
/// The sequence is finite and can only be consumed once. After it has been consumed, `dropped`
/// tells how many rows were skipped because they were malformed or had no numeric amount.
pub struct Import<R> {
    records: csv::StringRecordsIntoIter<R>,
    columns: Columns,
    imported_at: DateTime<Utc>,
    dropped: usize,
}

impl<R> Import<R> {
    /// The number of rows skipped so far.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

impl<R> Iterator for Import<R>
where
    R: io::Read,
{
    type Item = NewTransaction;

    fn next(&mut self) -> Option<Self::Item> {
        for record in self.records.by_ref() {
            match record {
                Ok(record) => match row_to_transaction(&record, &self.columns, self.imported_at) {
                    Some(transaction) => return Some(transaction),
                    None => self.dropped += 1,
                },
                Err(e) => {
                    debug!("Dropping malformed CSV row: {e}");
                    self.dropped += 1;
                }
            }
        }
        None
    }
}

/// Starts reading transactions from `reader`. Rows without a usable date are dated with the time
/// of this call.
///
/// # Errors
/// - Returns a `Csv` error if the header row cannot be read.
pub fn import<R>(reader: R) -> Result<Import<R>>
where
    R: io::Read,
{
    let mut reader = csv::ReaderBuilder::new()
        .trim(Trim::Headers)
        .flexible(true)
        .from_reader(reader);
    let headers = reader
        .headers()
        .context("Unable to read the CSV header row")
        .pub_result(ErrorType::Csv)?;
    let columns = Columns::new(headers);
    debug!("CSV columns: {columns:?}");
    Ok(Import {
        records: reader.into_records(),
        columns,
        imported_at: Utc::now(),
        dropped: 0,
    })
}

/// Encodes `transactions` as CSV. Returns `None` when there is nothing to export, so that the
/// caller can tell the user instead of producing an empty file.
pub fn export(transactions: &[Transaction]) -> Result<Option<String>> {
    if transactions.is_empty() {
        return Ok(None);
    }
    write_csv(transactions).map(Some)
}

/// Encodes `transactions` as CSV, writing the header even when the list is empty.
pub(crate) fn write_csv(transactions: &[Transaction]) -> Result<String> {
    write_csv_inner(transactions).pub_result(ErrorType::Csv)
}

fn write_csv_inner(transactions: &[Transaction]) -> Res<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(HEADERS)
        .context("Unable to write the CSV header")?;
    for t in transactions {
        writer
            .write_record([
                t.description().to_string(),
                t.amount().to_string(),
                t.category().to_string(),
                t.kind().to_string(),
                format_date(t.date()),
            ])
            .with_context(|| format!("Unable to write transaction {} as CSV", t.id()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow!("Unable to finish writing CSV: {}", e.error()))?;
    String::from_utf8(bytes).context("The CSV output was not valid UTF-8")
}

/// ISO-8601 in UTC, e.g. `2024-01-15T08:30:00.000Z`. Milliseconds are always written. Finer
/// fractions are written in full so that the date reads back exactly.
pub fn format_date(date: DateTime<Utc>) -> String {
    let format = if date.timestamp_subsec_nanos() % 1_000_000 == 0 {
        SecondsFormat::Millis
    } else {
        SecondsFormat::AutoSi
    };
    date.to_rfc3339_opts(format, true)
}

/// Parses the date formats found in exported and hand-written files. Dates without a time are
/// taken as midnight UTC.
pub fn parse_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = DateTime::parse_from_rfc3339(s) {
        return Some(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(date) = NaiveDateTime::parse_from_str(s, format) {
            return Some(date.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return date.and_hms_opt(0, 0, 0).map(|d| d.and_utc());
        }
    }
    None
}
