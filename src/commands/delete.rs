use crate::api::Mode;
use crate::commands::{connect, Out};
use crate::{Config, Result};

/// Deletes the transaction with `id`.
pub async fn delete(config: Config, mode: Mode, id: &str) -> Result<Out<()>> {
    let mut dashboard = connect(&config, mode)?;
    dashboard.delete(id).await?;
    Ok(format!("Deleted transaction {id}").into())
}
