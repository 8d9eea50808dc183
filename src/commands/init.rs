use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json` file.
///
/// # Arguments
/// - `findash_home` - The directory that will be the root of data directory, e.g. `$HOME/findash`
/// - `api_url` - The base URL of the finance API. The default is used when `None`.
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(findash_home: &Path, api_url: Option<&str>) -> Result<Out<()>> {
    let config = Config::create(findash_home, api_url)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the findash directory and config at {}, using the API at {}",
        config.root().display(),
        config.api_url()
    )
    .into())
}
