//! Configuration file handling for findash.
//!
//! The configuration file is stored at `$FINDASH_HOME/config.json` and holds the base URL of the
//! finance API and the persisted theme preference.

use crate::error::{ErrorType, IntoResult, Res};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "findash";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The API location used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FINDASH_HOME` and from there it loads `$FINDASH_HOME/config.json`.
///
/// The API URL can be overridden for a single run with `with_api_url`; overrides are never
/// written back to disk.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
    api_url_override: Option<String>,
}

impl Config {
    /// Creates the data directory and an initial `config.json` file.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/findash`
    /// - `api_url` - The base URL of the finance API, e.g. `http://localhost:8080/api`. When
    ///   `None`, `DEFAULT_API_URL` is used.
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a usable URL or if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: Option<&str>) -> Result<Self> {
        Self::create_inner(dir.into(), api_url)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf, api_url: Option<&str>) -> Res<Self> {
        let api_url = api_url.unwrap_or(DEFAULT_API_URL);
        validate_api_url(api_url)?;

        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the findash home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;
        let config_path = root.join(CONFIG_JSON);

        let config_file = ConfigFile {
            api_url: api_url.to_string(),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url_override: None,
        })
    }

    /// This will
    /// - validate that `findash_home` exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(findash_home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(findash_home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> Res<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("findash home is missing, run 'findash init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'findash init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
            api_url_override: None,
        })
    }

    /// Uses `api_url` instead of the configured URL for the lifetime of this object.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Result<Self> {
        if let Some(url) = &api_url {
            validate_api_url(url).pub_result(ErrorType::Config)?;
        }
        self.api_url_override = api_url;
        Ok(self)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The base URL of the finance API.
    pub fn api_url(&self) -> &str {
        self.api_url_override
            .as_deref()
            .unwrap_or(&self.config_file.api_url)
    }

    /// The persisted theme preference, `None` if the user has never chosen one.
    pub fn dark_mode(&self) -> Option<bool> {
        self.config_file.dark_mode
    }

    /// Persists the theme preference.
    pub async fn set_dark_mode(&mut self, dark_mode: bool) -> Result<()> {
        self.config_file.dark_mode = Some(dark_mode);
        self.config_file
            .save(&self.config_path)
            .await
            .pub_result(ErrorType::Config)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "findash",
///   "config_version": 1,
///   "api_url": "http://localhost:8080/api",
///   "dark_mode": true
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "findash"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the finance API
    #[serde(default = "default_api_url")]
    api_url: String,

    /// Whether the dark theme was chosen. Absent until the user toggles the theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    dark_mode: Option<bool>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url: default_api_url(),
            dark_mode: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Res<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        validate_api_url(&config.api_url)
            .with_context(|| format!("Invalid api_url in config file {}", path.display()))?;

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Res<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

/// Checks that `api_url` is an absolute http(s) URL that paths can be appended to.
fn validate_api_url(api_url: &str) -> Res<()> {
    let url = Url::parse(api_url).with_context(|| format!("'{api_url}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        bail!("'{api_url}' must be an http or https URL");
    }
    Ok(())
}
