//! Theme color definitions for the UI

use crate::config::Theme;
use crate::metrics::RowStatus;
use ratatui::style::Color;

/// Color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text, borders
    pub dim: Color,
    /// Accent color (headings, active tab)
    pub accent: Color,
    /// Status bar background
    pub bar: Color,
    /// Success / OK status
    pub green: Color,
    /// Warning status
    pub yellow: Color,
    /// Informational values
    pub info: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(240, 180, 80),
            bar: Color::Rgb(40, 40, 50),
            green: Color::Rgb(80, 200, 120),
            yellow: Color::Rgb(240, 180, 80),
            info: Color::Rgb(80, 200, 220),
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Rgb(30, 30, 40),
            dim: Color::Rgb(130, 130, 150),
            accent: Color::Rgb(180, 120, 0),
            bar: Color::Rgb(220, 220, 228),
            green: Color::Rgb(30, 150, 70),
            yellow: Color::Rgb(180, 120, 0),
            info: Color::Rgb(0, 130, 160),
        }
    }

    /// Color for a metric row status
    pub fn status(&self, status: RowStatus) -> Color {
        match status {
            RowStatus::Ok => self.green,
            RowStatus::Warning => self.yellow,
            RowStatus::Info => self.info,
        }
    }
}
