use ratatui::style::Modifier;
use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct GridTheme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub header: Style,
    /// Vertical rule between the pinned and unpinned regions.
    pub pin_separator: Style,
    pub group_header: Style,
    pub detail: Style,
    pub summary: Style,
    pub filter: Style,
    pub editing: Style,
}

impl Default for GridTheme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            header: Style::default().add_modifier(Modifier::BOLD),
            pin_separator: Style::default().yellow(),
            group_header: Style::default().magenta().add_modifier(Modifier::BOLD),
            detail: Style::default().dark_gray(),
            summary: Style::default().green(),
            filter: Style::default().italic(),
            editing: Style::default().yellow(),
        }
    }
}
