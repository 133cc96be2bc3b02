//! Theme and Colors
//!
//! Palette for the lookup screen: an accent, a dim tone for chrome, and a
//! colour per notice level.

use bizlookup_core::NotifyLevel;
use ratatui::style::{Color, Modifier, Style};

// ============================================================================
// Chrome
// ============================================================================

/// Accent for the selected mode, headings and the input prompt
pub const ACCENT: Color = Color::Rgb(90, 170, 255);

/// Labels, borders, key hints
pub const DIM_GRAY: Color = Color::Rgb(110, 110, 110);

/// Regular text
pub const TEXT: Color = Color::Rgb(220, 220, 220);

/// Background of the highlighted list row
pub const SELECTED_BG: Color = Color::Rgb(40, 60, 90);

// ============================================================================
// Status Colors
// ============================================================================

/// Errors and error notices
pub const ERROR_RED: Color = Color::Rgb(255, 90, 90);

/// Warning notices
pub const WARNING_AMBER: Color = Color::Rgb(255, 190, 80);

/// Informational notices and successful results
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 220, 140);

/// Border colour for a notice of `level`
pub fn level_color(level: NotifyLevel) -> Color {
    match level {
        NotifyLevel::Info => SUCCESS_GREEN,
        NotifyLevel::Warning => WARNING_AMBER,
        NotifyLevel::Error => ERROR_RED,
    }
}

/// Bold accent text
pub fn heading() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// Dim chrome text
pub fn dim() -> Style {
    Style::default().fg(DIM_GRAY)
}

/// Regular body text
pub fn text() -> Style {
    Style::default().fg(TEXT)
}
