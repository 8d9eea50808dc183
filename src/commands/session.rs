//! The interactive dashboard.
//!
//! A `Session` renders the dashboard, then reads one action per line. Actions are parsed with
//! `clap` so that `help` and usage errors come for free. A failing action is reported in one line
//! and the session carries on with whatever the dashboard last loaded successfully.

use crate::api::Mode;
use crate::commands::export::{write_export, NOTHING_TO_EXPORT};
use crate::commands::import::{import_file, import_message};
use crate::commands::{connect, Out};
use crate::dashboard::{Dashboard, ImportMode, SortField};
use crate::error::{Error, ErrorType, IntoResult};
use crate::form::TransactionForm;
use crate::model::Kind;
use crate::render;
use crate::theme::UiContext;
use crate::{Config, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, warn};

#[derive(Debug, Parser)]
#[command(multicall = true)]
struct Line {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Show only transactions whose description or category contains the text.
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Show all transactions again.
    Clear,
    /// Sort by a column.
    Sort {
        #[arg(value_enum)]
        field: SortField,
    },
    /// Flip the sort direction.
    Reverse,
    /// Add a transaction, e.g. `add 12.50 expense Food Lunch with Sam`.
    #[command(after_help = crate::form::category_hint())]
    Add {
        amount: String,
        #[arg(value_enum)]
        kind: Kind,
        category: String,
        #[arg(required = true, num_args = 1..)]
        description: Vec<String>,
    },
    /// Delete a transaction by id.
    Delete { id: String },
    /// Import a CSV file.
    Import {
        file: PathBuf,
        /// Send the file to the server's import endpoint.
        #[arg(long)]
        upload: bool,
    },
    /// Export the transactions to a CSV file.
    Export { file: PathBuf },
    /// Switch between the light and dark themes.
    Theme,
    /// Fetch everything again.
    Refresh,
    /// Leave the dashboard.
    #[command(alias = "exit")]
    Quit,
}

impl Action {
    /// Whether the action waits on the backend.
    fn hits_backend(&self) -> bool {
        matches!(
            self,
            Action::Add { .. } | Action::Delete { .. } | Action::Import { .. } | Action::Refresh
        )
    }
}

/// What to do after an action.
enum Next {
    Render(String),
    Quit,
}

pub struct Session {
    config: Config,
    ui: UiContext,
    dashboard: Dashboard,
}

impl Session {
    /// Connects and loads. A failed load is not fatal: the session starts with the error banner.
    pub async fn open(config: Config, mode: Mode) -> Result<Self> {
        let dashboard = connect(&config, mode)?;
        Ok(Self::new(config, dashboard).await)
    }

    pub async fn new(config: Config, mut dashboard: Dashboard) -> Self {
        if let Err(e) = dashboard.load().await {
            warn!("{e}");
        }
        let ui = UiContext::from_config(&config);
        Self {
            config,
            ui,
            dashboard,
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn ui(&self) -> &UiContext {
        &self.ui
    }

    /// Reads actions from `input` until it ends or the user quits, writing to `output`.
    pub async fn run<R, W>(&mut self, input: R, output: &mut W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        write_out(output, &render::dashboard(&self.ui, &self.dashboard))?;
        let mut lines = input.lines();
        loop {
            write!(output, "> ")
                .and_then(|_| output.flush())
                .pub_result(ErrorType::Io)?;
            let Some(line) = lines.next_line().await.pub_result(ErrorType::Io)? else {
                break;
            };
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() {
                continue;
            }
            let action = match Line::try_parse_from(words) {
                Ok(line) => line.action,
                Err(e) => {
                    write_out(output, &e.render().to_string())?;
                    continue;
                }
            };
            debug!("Session action: {action:?}");
            if action.hits_backend() {
                write_out(output, render::LOADING)?;
            }
            match self.apply(action).await {
                Ok(Next::Quit) => break,
                Ok(Next::Render(message)) => {
                    write_out(output, &render::dashboard(&self.ui, &self.dashboard))?;
                    write_out(output, &message)?;
                }
                Err(e) => {
                    warn!("{e}");
                    write_out(output, &render::error_banner(&self.ui, &short_message(&e)))?;
                }
            }
        }
        Ok(())
    }

    async fn apply(&mut self, action: Action) -> Result<Next> {
        let message = match action {
            Action::Search { query } => {
                let query = query.join(" ");
                self.dashboard.set_query(&query);
                format!("Searching for \"{query}\"")
            }
            Action::Clear => {
                self.dashboard.clear_query();
                "Showing all transactions".to_string()
            }
            Action::Sort { field } => {
                self.dashboard.set_sort_field(field);
                format!("Sorted by {field}")
            }
            Action::Reverse => {
                self.dashboard.toggle_direction();
                format!("Sorted {}", self.dashboard.sort().direction)
            }
            Action::Add {
                amount,
                kind,
                category,
                description,
            } => {
                let form = TransactionForm {
                    description: description.join(" "),
                    amount,
                    category,
                    kind,
                    date: None,
                };
                let created = self.dashboard.add(&form).await?;
                format!("Added '{}' with id {}", created.description(), created.id())
            }
            Action::Delete { id } => {
                self.dashboard.delete(&id).await?;
                format!("Deleted transaction {id}")
            }
            Action::Import { file, upload } => {
                let mode = if upload {
                    ImportMode::Upload
                } else {
                    ImportMode::Sequential
                };
                let report = import_file(&mut self.dashboard, &file, mode).await?;
                import_message(&report)
            }
            Action::Export { file } => match self.dashboard.export()? {
                None => NOTHING_TO_EXPORT.to_string(),
                Some(csv) => {
                    write_export(&file, &csv).await?;
                    format!("Exported to {}", file.display())
                }
            },
            Action::Theme => {
                let theme = self.ui.toggle(&mut self.config).await?;
                format!("Switched to the {theme} theme")
            }
            Action::Refresh => {
                self.dashboard.load().await?;
                "Refreshed".to_string()
            }
            Action::Quit => return Ok(Next::Quit),
        };
        Ok(Next::Render(message))
    }
}

/// The detail for input mistakes, the generic message for everything else.
fn short_message(e: &Error) -> String {
    match e.error_type() {
        ErrorType::Validation => e.to_string(),
        _ => e.user_message().to_string(),
    }
}

fn write_out<W: Write>(output: &mut W, text: &str) -> Result<()> {
    writeln!(output, "{text}").pub_result(ErrorType::Io)
}

/// Runs an interactive session on stdin and stdout.
pub async fn dashboard(config: Config, mode: Mode) -> Result<Out<()>> {
    let mut stdout = std::io::stdout();
    write_out(&mut stdout, render::LOADING)?;
    let mut session = Session::open(config, mode).await?;
    session
        .run(BufReader::new(tokio::io::stdin()), &mut stdout)
        .await?;
    Ok("Closed the dashboard".into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryApi;
    use crate::test::TestEnv;

    async fn run(env: &TestEnv, api: &MemoryApi, script: &str) -> (Session, String) {
        let dashboard = Dashboard::new(Box::new(api.clone()));
        let mut session = Session::new(env.config(), dashboard).await;
        let mut output = Vec::new();
        session.run(script.as_bytes(), &mut output).await.unwrap();
        (session, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_search_sort_and_quit() {
        let env = TestEnv::new().await;
        let api = MemoryApi::seeded().unwrap();
        let script = "search rent\nsort amount\nreverse\nquit\nsearch never-reached\n";
        let (session, output) = run(&env, &api, script).await;
        assert_eq!(session.dashboard().query(), "rent");
        assert_eq!(session.dashboard().sort().field, SortField::Amount);
        assert_eq!(session.dashboard().view().len(), 2);
        assert!(output.contains("Searching for \"rent\""));
    }

    #[tokio::test]
    async fn test_add_then_delete() {
        let env = TestEnv::new().await;
        let api = MemoryApi::default();
        let (session, _) = run(&env, &api, "add 12.50 expense Food Lunch with Sam\n").await;
        let created = &session.dashboard().transactions()[0];
        assert_eq!(created.description(), "Lunch with Sam");
        assert_eq!(created.kind(), Kind::Expense);

        let script = format!("delete {}\n", created.id());
        let (session, output) = run(&env, &api, &script).await;
        assert!(session.dashboard().transactions().is_empty());
        assert!(output.contains(render::NO_TRANSACTIONS));
    }

    #[tokio::test]
    async fn test_errors_do_not_end_the_session() {
        let env = TestEnv::new().await;
        let api = MemoryApi::seeded().unwrap();
        let script = "add ten expense Food Lunch\nfrobnicate\ndelete missing\nsearch coffee\n";
        let (session, output) = run(&env, &api, script).await;
        assert!(output.contains("is not a number"));
        assert!(output.contains("The server rejected the request."));
        assert_eq!(session.dashboard().query(), "coffee");
        assert_eq!(session.dashboard().transactions().len(), 14);
    }

    #[tokio::test]
    async fn test_offline_refresh_keeps_data() {
        let env = TestEnv::new().await;
        let api = MemoryApi::seeded().unwrap();
        let dashboard = Dashboard::new(Box::new(api.clone()));
        let mut session = Session::new(env.config(), dashboard).await;
        api.set_offline(true);
        let mut output = Vec::new();
        session
            .run("refresh\n".as_bytes(), &mut output)
            .await
            .unwrap();
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("Unable to reach the server."));
        assert_eq!(session.dashboard().transactions().len(), 14);
        assert_eq!(
            session.dashboard().error(),
            Some(crate::dashboard::LOAD_ERROR)
        );
    }

    #[tokio::test]
    async fn test_export_and_theme() {
        let env = TestEnv::new().await;
        let api = MemoryApi::seeded().unwrap();
        let path = env.path("session.csv");
        let script = format!("export {}\ntheme\n", path.display());
        let (session, _) = run(&env, &api, &script).await;
        assert_eq!(std::fs::read_to_string(&path).unwrap().lines().count(), 15);
        assert_ne!(session.ui().theme(), UiContext::from_config(&env.config()).theme());
    }

    #[tokio::test]
    async fn test_loading_shown_for_backend_actions_only() {
        let env = TestEnv::new().await;
        let api = MemoryApi::seeded().unwrap();
        let (_, output) = run(&env, &api, "search rent\nsort amount\n").await;
        assert!(!output.contains(render::LOADING));

        let (_, output) = run(&env, &api, "refresh\n").await;
        assert_eq!(output.matches(render::LOADING).count(), 1);
        let loading = output.find(render::LOADING).unwrap();
        assert!(output[loading..].contains("Refreshed"));
    }

    #[tokio::test]
    async fn test_add_help_lists_categories() {
        let env = TestEnv::new().await;
        let api = MemoryApi::default();
        let (_, output) = run(&env, &api, "add --help\n").await;
        assert!(output.contains(&crate::form::category_hint()));
    }

    #[tokio::test]
    async fn test_export_nothing() {
        let env = TestEnv::new().await;
        let api = MemoryApi::default();
        let path = env.path("empty.csv");
        let script = format!("export {}\n", path.display());
        let (_, output) = run(&env, &api, &script).await;
        assert!(output.contains(NOTHING_TO_EXPORT));
        assert!(!path.exists());
    }
}
