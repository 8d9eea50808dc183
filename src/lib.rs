pub mod api;
pub mod args;
pub mod charts;
pub mod commands;
mod config;
pub mod csv_codec;
pub mod dashboard;
mod error;
pub mod form;
pub mod model;
pub mod render;
pub mod theme;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use config::{Config, DEFAULT_API_URL};
pub use error::{Error, ErrorType, Result};
