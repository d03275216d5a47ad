//! Shared palette for the console screens.

use lipgloss_extras::prelude::*;

/// Styles shared by every screen.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Screen titles.
    pub title: Style,
    /// Section headings.
    pub subtitle: Style,
    /// Informational lines.
    pub notice: Style,
    /// Errors.
    pub error: Style,
    /// De-emphasised text.
    pub muted: Style,
    /// The tab of the current screen.
    pub active_tab: Style,
    /// Other tabs.
    pub tab: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            title: Style::new()
                .background(Color::from("62"))
                .foreground(Color::from("230"))
                .padding(0, 1, 0, 1),
            subtitle: Style::new().foreground(Color::from("#A49FA5")),
            notice: Style::new().foreground(Color::from("#3C8DBC")),
            error: Style::new().foreground(Color::from("#FF5F87")).bold(true),
            muted: Style::new().foreground(Color::from("240")),
            active_tab: Style::new()
                .bold(true)
                .foreground(Color::from("#EE6FF8"))
                .underline(true),
            tab: Style::new().foreground(Color::from("#909090")),
        }
    }
}
