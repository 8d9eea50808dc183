//! Implements the `Api` trait with `reqwest` against the finance REST backend.

use crate::api::Api;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{CategorySummaryPoint, MonthlySummaryPoint, NewTransaction, Transaction};
use crate::Result;
use anyhow::{anyhow, Context};
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

pub(super) struct HttpApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpApi {
    pub(super) fn new(api_url: &str) -> Result<Self> {
        let base = Url::parse(api_url)
            .with_context(|| format!("'{api_url}' is not a valid API URL"))
            .pub_result(ErrorType::Config)?;
        if base.cannot_be_a_base() {
            return Err(Error::new(
                ErrorType::Config,
                anyhow!("'{api_url}' cannot be used as an API base URL"),
            ));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            base,
        })
    }

    /// Appends `segments` to the base URL. Each segment is percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends `request` and turns transport failures and non-success statuses into errors.
    async fn send(&self, request: RequestBuilder, what: &str) -> Result<Response> {
        trace!("send: {what}");
        let response = request
            .send()
            .await
            .with_context(|| format!("Unable to reach the API to {what}"))
            .pub_result(ErrorType::Network)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            return Err(Error::new(
                ErrorType::Http,
                anyhow!("The API failed to {what} with status {status}: {body}"),
            ));
        }
        debug!("{what}: {status}");
        Ok(response)
    }

    /// Fetches a JSON array. A `null` body is treated as an empty list.
    async fn get_list<T>(&self, segments: &[&str], what: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let response = self
            .send(self.client.get(self.endpoint(segments)), what)
            .await?;
        let list: Option<Vec<T>> = response
            .json()
            .await
            .with_context(|| format!("Unable to decode the response to {what}"))
            .pub_result(ErrorType::Decode)?;
        Ok(list.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl Api for HttpApi {
    async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.get_list(&["transactions"], "list transactions").await
    }

    async fn monthly_summary(&self) -> Result<Vec<MonthlySummaryPoint>> {
        self.get_list(&["summary", "monthly"], "get the monthly summary")
            .await
    }

    async fn category_summary(&self) -> Result<Vec<CategorySummaryPoint>> {
        self.get_list(&["summary", "categories"], "get the category summary")
            .await
    }

    async fn create_transaction(&self, transaction: &NewTransaction) -> Result<Transaction> {
        let request = self
            .client
            .post(self.endpoint(&["transactions"]))
            .json(transaction);
        let response = self.send(request, "create a transaction").await?;
        response
            .json()
            .await
            .context("Unable to decode the created transaction")
            .pub_result(ErrorType::Decode)
    }

    async fn delete_transaction(&self, id: &str) -> Result<()> {
        let request = self.client.delete(self.endpoint(&["transactions", id]));
        self.send(request, &format!("delete transaction {id}"))
            .await?;
        Ok(())
    }

    async fn import_file(&self, file_name: &str, contents: Vec<u8>) -> Result<String> {
        let part = Part::bytes(contents)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .context("Unable to build the upload")
            .pub_result(ErrorType::Request)?;
        let request = self
            .client
            .post(self.endpoint(&["transactions", "import"]))
            .multipart(Form::new().part("file", part));
        let response = self.send(request, "import transactions").await?;
        response
            .text()
            .await
            .context("Unable to read the import response")
            .pub_result(ErrorType::Decode)
    }

    async fn export_file(&self) -> Result<Vec<u8>> {
        let request = self.client.get(self.endpoint(&["transactions", "export"]));
        let response = self.send(request, "export transactions").await?;
        let bytes = response
            .bytes()
            .await
            .context("Unable to download the export")
            .pub_result(ErrorType::Network)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let api = HttpApi::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            api.endpoint(&["summary", "monthly"]).as_str(),
            "http://localhost:8080/api/summary/monthly"
        );
    }

    #[test]
    fn test_endpoint_trailing_slash() {
        let api = HttpApi::new("http://localhost:8080/api/").unwrap();
        assert_eq!(
            api.endpoint(&["transactions"]).as_str(),
            "http://localhost:8080/api/transactions"
        );
    }

    #[test]
    fn test_endpoint_encodes_id() {
        let api = HttpApi::new("http://localhost:8080/api").unwrap();
        assert_eq!(
            api.endpoint(&["transactions", "a/b c"]).as_str(),
            "http://localhost:8080/api/transactions/a%2Fb%20c"
        );
    }

    #[test]
    fn test_new_rejects_bad_url() {
        let err = HttpApi::new("localhost").err().unwrap();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Port 9 (discard) on localhost is not expected to be serving HTTP.
        let api = HttpApi::new("http://127.0.0.1:9/api").unwrap();
        let err = api.transactions().await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Network);
        assert!(err.to_string().contains("list transactions"));
    }
}
