//! Layout and theme toggles shared by every page.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Shell flags observed by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ShellState {
    pub sidebar_collapsed: bool,
    /// Set while a collection load is in flight.
    pub loading: bool,
    pub theme: Theme,
}

impl ShellState {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Self::default()
        }
    }

    /// Flips the sidebar and returns the new collapsed state.
    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_collapsed = !self.sidebar_collapsed;
        self.sidebar_collapsed
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Switches light/dark and returns the new theme.
    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }
}

#[cfg(test)]
mod tests {
    use super::{ShellState, Theme};

    #[test]
    fn toggles_flip_back_and_forth() {
        let mut shell = ShellState::default();
        assert!(shell.toggle_sidebar());
        assert!(!shell.toggle_sidebar());
        assert_eq!(shell.toggle_theme(), Theme::Dark);
        assert_eq!(shell.toggle_theme(), Theme::Light);
    }
}
