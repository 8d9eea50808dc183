//! Light and dark colour themes.
//!
//! The theme lives in a `UiContext` that is handed to every renderer. It starts from the saved
//! preference in `config.json`, falls back to the terminal's background as reported by
//! `COLORFGBG`, and finally to light.

use crate::{Config, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

serde_plain::derive_display_from_serialize!(Theme);
serde_plain::derive_fromstr_from_deserialize!(Theme);

impl Theme {
    pub fn from_dark_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Reads `COLORFGBG` (e.g. `15;0`). A background of 0 to 6 or 8 is dark. `None` when the
    /// variable is absent or unreadable.
    pub fn from_system() -> Option<Self> {
        let value = std::env::var("COLORFGBG").ok()?;
        Self::from_colorfgbg(&value)
    }

    fn from_colorfgbg(value: &str) -> Option<Self> {
        let background: u8 = value.rsplit(';').next()?.trim().parse().ok()?;
        Some(Self::from_dark_mode(matches!(background, 0..=6 | 8)))
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

/// Presentation state shared by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UiContext {
    theme: Theme,
}

impl UiContext {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }

    /// The saved preference, else the terminal background, else light.
    pub fn from_config(config: &Config) -> Self {
        let theme = match config.dark_mode() {
            Some(dark_mode) => Theme::from_dark_mode(dark_mode),
            None => Theme::from_system().unwrap_or_default(),
        };
        debug!("Using the {theme} theme");
        Self { theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Switches to `theme` and saves it as the preference.
    pub async fn set_theme(&mut self, theme: Theme, config: &mut Config) -> Result<()> {
        config.set_dark_mode(theme.is_dark()).await?;
        self.theme = theme;
        Ok(())
    }

    /// Flips the theme and saves it as the preference.
    pub async fn toggle(&mut self, config: &mut Config) -> Result<Theme> {
        let theme = self.theme.toggled();
        self.set_theme(theme, config).await?;
        Ok(theme)
    }

    pub fn income(&self) -> colored::Color {
        match self.theme {
            Theme::Light => colored::Color::Green,
            Theme::Dark => colored::Color::BrightGreen,
        }
    }

    pub fn expense(&self) -> colored::Color {
        match self.theme {
            Theme::Light => colored::Color::Red,
            Theme::Dark => colored::Color::BrightRed,
        }
    }

    pub fn heading(&self) -> colored::Color {
        match self.theme {
            Theme::Light => colored::Color::Blue,
            Theme::Dark => colored::Color::BrightCyan,
        }
    }

    pub fn muted(&self) -> colored::Color {
        match self.theme {
            Theme::Light => colored::Color::BrightBlack,
            Theme::Dark => colored::Color::White,
        }
    }

    /// Table cell colour for an amount.
    pub fn amount_cell(&self, is_expense: bool) -> comfy_table::Color {
        match (self.theme, is_expense) {
            (Theme::Light, false) => comfy_table::Color::DarkGreen,
            (Theme::Light, true) => comfy_table::Color::DarkRed,
            (Theme::Dark, false) => comfy_table::Color::Green,
            (Theme::Dark, true) => comfy_table::Color::Red,
        }
    }

    pub fn header_cell(&self) -> comfy_table::Color {
        match self.theme {
            Theme::Light => comfy_table::Color::DarkBlue,
            Theme::Dark => comfy_table::Color::Cyan,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    #[test]
    fn test_colorfgbg() {
        assert_eq!(Theme::from_colorfgbg("15;0"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("0;15"), Some(Theme::Light));
        assert_eq!(Theme::from_colorfgbg("12;default;8"), Some(Theme::Dark));
        assert_eq!(Theme::from_colorfgbg("garbage"), None);
    }

    #[test]
    fn test_theme_strings() {
        assert_eq!(Theme::Dark.to_string(), "dark");
        assert_eq!("light".parse::<Theme>().unwrap(), Theme::Light);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
    }

    #[tokio::test]
    async fn test_toggle_persists() {
        let env = TestEnv::new().await;
        let mut config = env.config();
        let mut ui = UiContext::new(Theme::Light);

        assert_eq!(ui.toggle(&mut config).await.unwrap(), Theme::Dark);
        assert!(ui.theme().is_dark());

        let reloaded = Config::load(config.root()).await.unwrap();
        assert_eq!(reloaded.dark_mode(), Some(true));
        assert_eq!(UiContext::from_config(&reloaded).theme(), Theme::Dark);
    }
}
