use clap::Parser;
use findash::args::{Args, Command};
use findash::{commands, Config, Mode, Result};
use std::path::Path;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            std::process::ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().findash_home().path();
    let api_url = args.common().api_url();

    // This allows for running the program without a backend server. When FINDASH_IN_TEST_MODE is
    // set and non-zero in length, then the mode will be Mode::Test, otherwise it will be
    // Mode::Http.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.url().or(api_url))
            .await?
            .print(),

        Command::List(list_args) => {
            commands::list(load(home, api_url).await?, mode, list_args.clone())
                .await?
                .print()
        }

        Command::Add(add_args) => {
            commands::add(load(home, api_url).await?, mode, add_args.clone())
                .await?
                .print()
        }

        Command::Delete(delete_args) => {
            commands::delete(load(home, api_url).await?, mode, delete_args.id())
                .await?
                .print()
        }

        Command::Import(import_args) => {
            commands::import(load(home, api_url).await?, mode, import_args.clone())
                .await?
                .print()
        }

        Command::Export(export_args) => {
            commands::export(load(home, api_url).await?, mode, export_args.clone())
                .await?
                .print()
        }

        Command::Download(download_args) => {
            commands::download(load(home, api_url).await?, mode, download_args.clone())
                .await?
                .print()
        }

        Command::Summary => commands::summary(load(home, api_url).await?, mode)
            .await?
            .print(),

        Command::Theme(theme_args) => {
            commands::theme(load(home, api_url).await?, theme_args.action())
                .await?
                .print()
        }

        Command::Dashboard => commands::dashboard(load(home, api_url).await?, mode)
            .await?
            .print(),
    };
    Ok(())
}

/// Loads the config, applying the `--api-url` override.
async fn load(home: &Path, api_url: Option<&str>) -> Result<Config> {
    Config::load(home)
        .await?
        .with_api_url(api_url.map(String::from))
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                env!("CARGO_BIN_NAME"),
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
