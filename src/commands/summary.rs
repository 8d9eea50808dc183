use crate::api::Mode;
use crate::commands::Out;
use crate::dashboard::Dashboard;
use crate::render;
use crate::theme::UiContext;
use crate::{Config, Result};

/// Renders the monthly and category charts.
pub async fn summary(config: Config, mode: Mode) -> Result<Out<()>> {
    let dashboard = Dashboard::open(&config, mode).await?;
    let ui = UiContext::from_config(&config);
    let view = format!(
        "{}\n\n{}",
        render::monthly_chart(&ui, &dashboard.monthly_chart()),
        render::category_chart(&ui, &dashboard.category_chart())
    );
    Ok(Out::new_message(format!(
        "Summarized {} months and {} category totals",
        dashboard.monthly().len(),
        dashboard.categories().len()
    ))
    .with_view(view))
}
