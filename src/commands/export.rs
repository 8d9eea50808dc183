use crate::api::Mode;
use crate::args::{DownloadArgs, ExportArgs};
use crate::commands::{connect, Out};
use crate::dashboard::Dashboard;
use crate::error::{ErrorType, IntoResult};
use crate::{utils, Config, Result};
use std::path::Path;

pub(crate) const NOTHING_TO_EXPORT: &str = "No transactions to export";

/// Writes the loaded transactions as CSV to the file in `args`, or to stdout.
pub async fn export(config: Config, mode: Mode, args: ExportArgs) -> Result<Out<()>> {
    let dashboard = Dashboard::open(&config, mode).await?;
    let Some(csv) = dashboard.export()? else {
        return Ok(NOTHING_TO_EXPORT.into());
    };
    let count = dashboard.transactions().len();
    match args.output() {
        Some(path) => {
            write_export(path, &csv).await?;
            Ok(format!("Exported {count} transactions to {}", path.display()).into())
        }
        None => Ok(Out::new_message(format!("Exported {count} transactions")).with_view(csv)),
    }
}

pub(crate) async fn write_export(path: &Path, csv: &str) -> Result<()> {
    utils::write(path, csv).await.pub_result(ErrorType::Io)
}

/// Saves the server's CSV export to the file in `args`.
pub async fn download(config: Config, mode: Mode, args: DownloadArgs) -> Result<Out<()>> {
    let dashboard = connect(&config, mode)?;
    let bytes = dashboard.download().await?;
    let path = args.output();
    utils::write(path, &bytes).await.pub_result(ErrorType::Io)?;
    Ok(format!("Saved {} bytes to {}", bytes.len(), path.display()).into())
}
