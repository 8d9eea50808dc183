use crate::args::ThemeAction;
use crate::commands::Out;
use crate::theme::{Theme, UiContext};
use crate::{Config, Result};

/// Shows the current theme, or changes it and saves the choice.
pub async fn theme(mut config: Config, action: ThemeAction) -> Result<Out<Theme>> {
    let mut ui = UiContext::from_config(&config);
    let theme = match action {
        ThemeAction::Show => {
            return Ok(Out::new(format!("The theme is {}", ui.theme()), ui.theme()))
        }
        ThemeAction::Toggle => ui.toggle(&mut config).await?,
        ThemeAction::Set(theme) => {
            ui.set_theme(theme, &mut config).await?;
            theme
        }
    };
    Ok(Out::new(format!("Switched to the {theme} theme"), theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_theme_set_and_toggle() {
        let env = TestEnv::new().await;
        let out = theme(env.config(), ThemeAction::Set(Theme::Dark))
            .await
            .unwrap();
        assert_eq!(out.structure(), Some(&Theme::Dark));

        let config = Config::load(env.config().root()).await.unwrap();
        let out = theme(config, ThemeAction::Toggle).await.unwrap();
        assert_eq!(out.structure(), Some(&Theme::Light));

        let config = Config::load(env.config().root()).await.unwrap();
        let out = theme(config, ThemeAction::Show).await.unwrap();
        assert_eq!(out.message(), "The theme is light");
    }
}
