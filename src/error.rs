//! The public error type.
//!
//! Internally the crate works with `anyhow` and attaches context as errors bubble up. At the
//! boundary of an operation the error is classified with an `ErrorType` using
//! `IntoResult::pub_result` so that callers can decide how to present it.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// Internal result type.
pub(crate) type Res<T> = std::result::Result<T, anyhow::Error>;

/// Public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The backend could not be reached.
    Network,
    /// The backend answered with a non-success status.
    Http,
    /// A response body could not be decoded.
    Decode,
    /// A CSV file could not be read.
    Csv,
    /// User input was rejected.
    Validation,
    /// The configuration is missing or invalid.
    Config,
    /// A local file or terminal operation failed.
    Io,
    /// A request could not be built.
    Request,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

impl ErrorType {
    /// A short message suitable for showing to the user in a banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorType::Network => "Unable to reach the server.",
            ErrorType::Http => "The server rejected the request.",
            ErrorType::Decode => "The server sent data that could not be read.",
            ErrorType::Csv => "Failed to read CSV file. Please check your format.",
            ErrorType::Validation => "Please check the values you entered.",
            ErrorType::Config => "The configuration is missing or invalid.",
            ErrorType::Io => "A file could not be read or written.",
            ErrorType::Request => "The request could not be sent.",
        }
    }
}

/// An error with an `ErrorType` and the full chain of context that led to it.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Adds a layer of context while keeping the `ErrorType`.
    pub(crate) fn context<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        Self {
            error_type: self.error_type,
            inner: self.inner.context(context),
        }
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The short message for this error's `ErrorType`.
    pub fn user_message(&self) -> &'static str {
        self.error_type.user_message()
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Converts any result whose error converts to `anyhow::Error` into the public `Result`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}
