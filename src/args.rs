//! These structs provide the CLI interface for the findash CLI.

use crate::dashboard::{Direction, SortField};
use crate::model::Kind;
use crate::theme::Theme;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// findash: A command-line dashboard for your income and expenses.
///
/// findash talks to a finance REST API that stores your transactions. From the command line you
/// can list, search and sort transactions, add and delete them, import and export CSV files, and
/// see your monthly totals and spending by category as charts.
///
/// Run `findash init` first to create the configuration, then `findash dashboard` for an
/// interactive session.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and the configuration file.
    ///
    /// This is the first command you should run. By default the data directory is $HOME/findash,
    /// pass --findash-home to put it somewhere else. The API URL given here is saved and used by
    /// every later command unless overridden with --api-url or FINDASH_API_URL.
    Init(InitArgs),
    /// List transactions, optionally filtered and sorted.
    List(ListArgs),
    /// Add a transaction.
    #[command(after_help = crate::form::category_hint())]
    Add(AddArgs),
    /// Delete a transaction by its id.
    Delete(DeleteArgs),
    /// Import transactions from a CSV file.
    Import(ImportArgs),
    /// Export the transactions to a CSV file.
    Export(ExportArgs),
    /// Download the server's own CSV export.
    Download(DownloadArgs),
    /// Show the monthly and category charts.
    Summary,
    /// Show or change the colour theme.
    Theme(ThemeArgs),
    /// Start an interactive dashboard session.
    Dashboard,
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where findash configuration is held. Defaults to ~/findash
    #[arg(long, env = "FINDASH_HOME", default_value_t = default_findash_home())]
    findash_home: DisplayPath,

    /// Use this API URL instead of the one in config.json.
    #[arg(long, env = "FINDASH_API_URL")]
    api_url: Option<String>,
}

impl Common {
    pub fn new(log_level: LevelFilter, findash_home: PathBuf, api_url: Option<String>) -> Self {
        Self {
            log_level,
            findash_home: findash_home.into(),
            api_url,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn findash_home(&self) -> &DisplayPath {
        &self.findash_home
    }

    pub fn api_url(&self) -> Option<&str> {
        self.api_url.as_deref()
    }
}

/// (Not shown): Args for the `findash init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the finance API to save, e.g. http://localhost:8080/api
    #[arg(long)]
    url: Option<String>,
}

impl InitArgs {
    pub fn new(url: Option<String>) -> Self {
        Self { url }
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }
}

/// (Not shown): Args for the `findash list` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ListArgs {
    /// Only show transactions whose description or category contains this text.
    #[arg(long)]
    search: Option<String>,

    /// The column to sort by.
    #[arg(long, value_enum, default_value_t)]
    sort: SortField,

    /// The sort direction.
    #[arg(long, value_enum, default_value_t)]
    direction: Direction,
}

impl ListArgs {
    pub fn new(search: Option<String>, sort: SortField, direction: Direction) -> Self {
        Self {
            search,
            sort,
            direction,
        }
    }

    pub fn search(&self) -> Option<&str> {
        self.search.as_deref()
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

/// (Not shown): Args for the `findash add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    /// What the transaction was for.
    #[arg(long)]
    description: String,

    /// The amount, without a sign. Whether it is money in or out is set with --kind.
    #[arg(long)]
    amount: String,

    /// The category. Any text is accepted, see below for suggestions.
    #[arg(long, default_value = "Other")]
    category: String,

    /// Whether this is income or an expense.
    #[arg(long, value_enum, default_value_t)]
    kind: Kind,

    /// The date, e.g. 2024-01-31. Defaults to now.
    #[arg(long)]
    date: Option<String>,
}

impl AddArgs {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        category: impl Into<String>,
        kind: Kind,
        date: Option<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            category: category.into(),
            kind,
            date,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> &str {
        &self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }
}

/// (Not shown): Args for the `findash delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    /// The id of the transaction, as shown by `findash list`.
    id: String,
}

impl DeleteArgs {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// (Not shown): Args for the `findash import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The CSV file. Its header must name the columns description, amount, category, type and
    /// date, in any order.
    file: PathBuf,

    /// Send the file to the server's import endpoint instead of adding each row separately.
    #[arg(long)]
    upload: bool,
}

impl ImportArgs {
    pub fn new(file: impl Into<PathBuf>, upload: bool) -> Self {
        Self {
            file: file.into(),
            upload,
        }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn upload(&self) -> bool {
        self.upload
    }
}

/// (Not shown): Args for the `findash export` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ExportArgs {
    /// Where to write the CSV. Printed to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// (Not shown): Args for the `findash download` command.
#[derive(Debug, Parser, Clone)]
pub struct DownloadArgs {
    /// Where to save the file.
    #[arg(long, default_value = "transactions.csv")]
    output: PathBuf,
}

impl DownloadArgs {
    pub fn new(output: impl Into<PathBuf>) -> Self {
        Self {
            output: output.into(),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output
    }
}

/// What `findash theme` should do.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum ThemeAction {
    #[default]
    Show,
    Toggle,
    Set(Theme),
}

/// (Not shown): Args for the `findash theme` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct ThemeArgs {
    /// Switch between light and dark.
    #[arg(long, conflicts_with = "set")]
    toggle: bool,

    /// Use this theme.
    #[arg(long, value_enum)]
    set: Option<Theme>,
}

impl ThemeArgs {
    pub fn new(action: ThemeAction) -> Self {
        match action {
            ThemeAction::Show => Self::default(),
            ThemeAction::Toggle => Self {
                toggle: true,
                set: None,
            },
            ThemeAction::Set(theme) => Self {
                toggle: false,
                set: Some(theme),
            },
        }
    }

    pub fn action(&self) -> ThemeAction {
        match (self.toggle, self.set) {
            (_, Some(theme)) => ThemeAction::Set(theme),
            (true, None) => ThemeAction::Toggle,
            (false, None) => ThemeAction::Show,
        }
    }
}

fn default_findash_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("findash"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --findash-home or FINDASH_HOME instead of relying on the \
                default findash home directory. If you continue using the program right now, you \
                may have problems!",
            );
            PathBuf::from("findash")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let args = Args::parse_from([
            "findash",
            "--findash-home",
            "/tmp/fd",
            "list",
            "--search",
            "food",
            "--sort",
            "amount",
            "--direction",
            "asc",
        ]);
        assert_eq!(args.common().findash_home().path(), Path::new("/tmp/fd"));
        let Command::List(list) = args.command() else {
            panic!("expected list, got {:?}", args.command());
        };
        assert_eq!(list.search(), Some("food"));
        assert_eq!(list.sort(), SortField::Amount);
        assert_eq!(list.direction(), Direction::Asc);
    }

    #[test]
    fn test_add_help_lists_categories() {
        use clap::CommandFactory;
        let mut command = <Args as CommandFactory>::command();
        let help = command
            .find_subcommand_mut("add")
            .unwrap()
            .render_help()
            .to_string();
        assert!(help.contains(&crate::form::category_hint()));
    }

    #[test]
    fn test_parse_add_defaults() {
        let args = Args::parse_from([
            "findash",
            "add",
            "--description",
            "Coffee",
            "--amount",
            "4.50",
        ]);
        let Command::Add(add) = args.command() else {
            panic!("expected add, got {:?}", args.command());
        };
        assert_eq!(add.category(), "Other");
        assert_eq!(add.kind(), Kind::Income);
        assert_eq!(add.date(), None);
    }

    #[test]
    fn test_add_requires_description() {
        assert!(Args::try_parse_from(["findash", "add", "--amount", "4"]).is_err());
    }

    #[test]
    fn test_theme_action() {
        let args = Args::parse_from(["findash", "theme", "--set", "dark"]);
        let Command::Theme(theme) = args.command() else {
            panic!("expected theme, got {:?}", args.command());
        };
        assert_eq!(theme.action(), ThemeAction::Set(Theme::Dark));
        assert!(Args::try_parse_from(["findash", "theme", "--toggle", "--set", "dark"]).is_err());
        assert_eq!(ThemeArgs::default().action(), ThemeAction::Show);
    }
}
