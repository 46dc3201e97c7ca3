//! Editor Theme - colors and styles for the binding editor

use ratatui::style::{Color, Modifier, Style};

/// Editor color palette
pub struct EditorTheme {
    // Primary palette
    pub violet: Color,
    pub amber: Color,
    pub teal: Color,
    pub white: Color,
    pub gray: Color,

    // Status colors
    pub success_green: Color,
    pub warning_orange: Color,
    pub error_red: Color,
}

impl Default for EditorTheme {
    fn default() -> Self {
        Self {
            violet: Color::Rgb(138, 43, 226), // #8A2BE2
            amber: Color::Rgb(255, 191, 0),   // #FFBF00
            teal: Color::Rgb(0, 255, 255),    // #00FFFF
            white: Color::Rgb(230, 237, 243), // #E6EDF3
            gray: Color::Rgb(128, 128, 128),

            success_green: Color::Rgb(63, 185, 80),   // #3FB950
            warning_orange: Color::Rgb(210, 153, 34), // #D29922
            error_red: Color::Rgb(248, 81, 73),       // #F85149
        }
    }
}

impl EditorTheme {
    pub fn new() -> Self {
        Self::default()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Text
    // ─────────────────────────────────────────────────────────────────────

    pub fn text(&self) -> Style {
        Style::default().fg(self.white)
    }

    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.gray)
    }

    pub fn header(&self) -> Style {
        Style::default().fg(self.violet).add_modifier(Modifier::BOLD)
    }

    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber)
    }

    /// A complete `{{path}}` token in the input
    pub fn binding(&self) -> Style {
        Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
    }

    /// A token whose path is missing from the sample data
    pub fn unresolved(&self) -> Style {
        Style::default()
            .fg(self.warning_orange)
            .add_modifier(Modifier::UNDERLINED)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Panels
    // ─────────────────────────────────────────────────────────────────────

    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(self.teal).add_modifier(Modifier::BOLD)
        } else {
            self.dimmed()
        }
    }

    /// Highlighted popup entry or active explorer row
    pub fn selected(&self) -> Style {
        Style::default()
            .fg(Color::Black)
            .bg(self.amber)
            .add_modifier(Modifier::BOLD)
    }

    /// Header badge color for a popup state name
    pub fn popup_state(&self, state: &str) -> Style {
        match state {
            "PENDING" => Style::default().fg(self.warning_orange),
            s if s.starts_with("OPEN") => Style::default().fg(self.success_green),
            _ => self.dimmed(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Icons and Symbols
// ─────────────────────────────────────────────────────────────────────────────

pub mod icons {
    pub const EXPANDED: &str = "▾";
    pub const COLLAPSED: &str = "▸";
    pub const LEAF: &str = "•";
    pub const BINDING: &str = "◆";
}
