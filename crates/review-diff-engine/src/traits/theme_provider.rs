//! Trait for providing theme colors to the diff widgets.

use ratatui::style::Color;

/// Provides colors for the diff widgets.
///
/// Only the addition and deletion backgrounds are required; everything else
/// has a dark-mode default.
///
/// # Example
///
/// ```ignore
/// use review_diff_engine::ThemeProvider;
/// use ratatui::style::Color;
///
/// struct Solarized;
///
/// impl ThemeProvider for Solarized {
///     fn addition_background(&self) -> Color {
///         Color::Rgb(0, 43, 54)
///     }
///
///     fn deletion_background(&self) -> Color {
///         Color::Rgb(60, 20, 20)
///     }
/// }
/// ```
pub trait ThemeProvider: Send + Sync {
    /// Background color for addition lines.
    fn addition_background(&self) -> Color;

    /// Background color for deletion lines.
    fn deletion_background(&self) -> Color;

    /// Background for the changed part of an added line.
    fn addition_word_background(&self) -> Color {
        Color::Rgb(40, 110, 40)
    }

    /// Background for the changed part of a deleted line.
    fn deletion_word_background(&self) -> Color {
        Color::Rgb(120, 40, 40)
    }

    /// Background color for context lines.
    fn context_background(&self) -> Color {
        Color::Reset
    }

    /// Background color for hunk header lines.
    fn hunk_header_background(&self) -> Color {
        Color::Rgb(40, 40, 60)
    }

    /// Foreground color for hunk header text.
    fn hunk_header_foreground(&self) -> Color {
        Color::Cyan
    }

    /// Foreground color for line numbers.
    fn line_number_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Background color for the selected row.
    fn cursor_background(&self) -> Color {
        Color::Rgb(50, 50, 80)
    }

    /// Foreground color for the selected row.
    fn cursor_foreground(&self) -> Color {
        Color::White
    }

    /// Foreground color for comment rows.
    fn comment_foreground(&self) -> Color {
        Color::Yellow
    }

    /// Foreground color for resolved comment rows.
    fn resolved_comment_foreground(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for fold placeholders.
    fn fold_foreground(&self) -> Color {
        Color::Blue
    }

    /// Background color for fold placeholders.
    fn fold_background(&self) -> Color {
        Color::Rgb(40, 40, 40)
    }

    /// Foreground color for the blame gutter.
    fn blame_foreground(&self) -> Color {
        Color::Gray
    }

    /// Background color for search matches.
    fn search_match_background(&self) -> Color {
        Color::Rgb(120, 100, 20)
    }

    /// Border color of the viewer pane.
    fn border(&self) -> Color {
        Color::DarkGray
    }

    /// Foreground color for key hints (the key part like "n", "z").
    fn hint_key_foreground(&self) -> Color {
        Color::Yellow
    }

    /// Foreground color for hint descriptions.
    fn hint_text_foreground(&self) -> Color {
        Color::DarkGray
    }
}

/// Default theme with dark-mode colors.
#[derive(Debug, Clone, Default)]
pub struct DefaultTheme;

impl ThemeProvider for DefaultTheme {
    fn addition_background(&self) -> Color {
        Color::Rgb(30, 60, 30) // dark green
    }

    fn deletion_background(&self) -> Color {
        Color::Rgb(60, 30, 30) // dark red
    }
}
