//! Command handlers for the findash CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod add;
mod delete;
mod export;
mod import;
mod init;
mod list;
mod session;
mod summary;
mod theme;

use crate::api::{self, Mode};
use crate::dashboard::Dashboard;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use delete::delete;
pub use export::{download, export};
pub use import::import;
pub use init::init;
pub use list::list;
pub use session::{dashboard, Session};
pub use summary::summary;
pub use theme::theme;

/// The output type for a command. This allows the command to return a consistent message,
/// optionally structured data, and optionally a rendered view for the terminal.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// Text meant for stdout, such as a rendered table or CSV.
    #[serde(skip)]
    view: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            view: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            view: None,
        }
    }

    /// Attach text to be written to stdout.
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Get the rendered view, if any.
    pub fn view(&self) -> Option<&str> {
        self.view.as_deref()
    }

    /// Print the view to stdout, the message to `info!` and the structured data (if it exists) as
    /// JSON to `debug!`.
    pub fn print(&self) {
        if let Some(view) = self.view() {
            println!("{view}");
        }
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Connects to the backend without loading anything.
fn connect(config: &Config, mode: Mode) -> Result<Dashboard> {
    Ok(Dashboard::new(api::connect(config, mode)?))
}
