use crate::api::Mode;
use crate::args::ListArgs;
use crate::commands::Out;
use crate::dashboard::{Dashboard, Sort};
use crate::model::Transaction;
use crate::render;
use crate::theme::UiContext;
use crate::{Config, Result};

/// Loads the transactions and renders the ones matching `args` as a table.
pub async fn list(config: Config, mode: Mode, args: ListArgs) -> Result<Out<Vec<Transaction>>> {
    let mut dashboard = Dashboard::open(&config, mode).await?;
    if let Some(search) = args.search() {
        dashboard.set_query(search);
    }
    dashboard.set_sort(Sort::new(args.sort(), args.direction()));

    let ui = UiContext::from_config(&config);
    let rows: Vec<Transaction> = dashboard.view().into_iter().cloned().collect();
    let view = render::transaction_table(&ui, &dashboard.view());
    Ok(Out::new(
        format!(
            "Showing {} of {} transactions",
            rows.len(),
            dashboard.transactions().len()
        ),
        rows,
    )
    .with_view(view))
}
