//! Main diff viewer composite widget.

use super::{DiffContentWidget, DiffRenderData, FooterHint};
use crate::action::DiffAction;
use crate::config::DiffLayout;
use crate::state::DiffViewState;
use crate::traits::ThemeProvider;
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, StatefulWidget, Widget};

/// The main diff viewer widget.
///
/// A bordered pane around [`DiffContentWidget`] with the file name, change
/// stats, footer hints and search status.
///
/// # Example
///
/// ```ignore
/// use review_diff_engine::{DefaultTheme, DiffViewer};
///
/// let theme = DefaultTheme;
/// let widget = DiffViewer::new(&theme);
/// frame.render_stateful_widget(widget, area, &mut state);
/// ```
pub struct DiffViewer<'a, T: ThemeProvider> {
    /// Theme provider.
    theme: &'a T,
    /// Footer hints to display.
    footer_hints: Vec<FooterHint>,
    /// Fixed reference time for blame ages.
    now: Option<DateTime<Utc>>,
}

impl<'a, T: ThemeProvider> DiffViewer<'a, T> {
    /// Create a new diff viewer widget.
    pub fn new(theme: &'a T) -> Self {
        Self {
            theme,
            footer_hints: Vec::new(),
            now: None,
        }
    }

    /// Set footer hints to display at the bottom border.
    pub fn with_footer_hints(mut self, hints: Vec<FooterHint>) -> Self {
        self.footer_hints = hints;
        self
    }

    /// Use a fixed time for blame ages instead of the clock.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    fn footer_line(&self) -> Option<Line<'static>> {
        if self.footer_hints.is_empty() {
            return None;
        }
        let mut spans = vec![Span::raw(" ")];
        for (i, hint) in self.footer_hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(
                    " │ ",
                    Style::default().fg(self.theme.hint_text_foreground()),
                ));
            }
            spans.push(Span::styled(
                hint.key.clone(),
                Style::default()
                    .fg(self.theme.hint_key_foreground())
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                format!(" {}", hint.description),
                Style::default().fg(self.theme.hint_text_foreground()),
            ));
        }
        spans.push(Span::raw(" "));
        Some(Line::from(spans))
    }
}

fn search_status(state: &DiffViewState) -> Option<String> {
    let search = state.search.as_ref()?;
    Some(match search.position_of(state.nav.cursor_row) {
        Some(pos) => format!(" /{} {}/{} ", search.query, pos, search.len()),
        None if search.is_empty() => format!(" /{} no matches ", search.query),
        None => format!(" /{} {} matches ", search.query, search.len()),
    })
}

impl<T: ThemeProvider> StatefulWidget for DiffViewer<'_, T> {
    type State = DiffViewState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut DiffViewState) {
        self.render_with_state(area, buf, state);
    }
}

impl<T: ThemeProvider> DiffViewer<'_, T> {
    /// Render the diff viewer with state.
    pub fn render_with_state(self, area: Rect, buf: &mut Buffer, state: &mut DiffViewState) {
        let layout = match state.layout {
            DiffLayout::Unified => "unified",
            DiffLayout::SideBySide => "split",
        };
        let title = format!(" {} [{}] ", state.review.diff.display_name(), layout);
        let stats = Line::from(vec![
            Span::styled(
                format!(" +{}", state.review.diff.additions),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!(" -{} ", state.review.diff.deletions),
                Style::default().fg(Color::Red),
            ),
        ])
        .right_aligned();

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.theme.border()))
            .title(title)
            .title(stats);
        if let Some(footer) = self.footer_line() {
            block = block.title_bottom(footer);
        }
        if let Some(status) = search_status(state) {
            block = block.title_bottom(
                Line::styled(status, Style::default().fg(self.theme.hint_key_foreground()))
                    .right_aligned(),
            );
        }

        let inner = block.inner(area);
        block.render(area, buf);

        // Viewport follows the actual render area
        state.handle_action(DiffAction::SetViewport {
            width: inner.width,
            height: inner.height,
        });

        let data = DiffRenderData {
            window: state.visible_window(),
            cursor_row: state.nav.cursor_row,
            scroll_offset: state.nav.scroll_offset,
            h_offset: state.nav.h_offset,
            tab_width: state.config.tab_width,
            show_blame: state.show_blame,
        };
        let now = self.now.unwrap_or_else(Utc::now);
        let (rows, review, search) = state.view();
        DiffContentWidget::new(rows, review, data, self.theme)
            .with_search(search)
            .with_now(now)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::model::{DiffLine, FileDiff, FileReview, Hunk};
    use crate::traits::DefaultTheme;

    fn sample_state() -> DiffViewState {
        let hunk = Hunk::new(1, 2, 1, 3)
            .push(DiffLine::context("fn main() {", 1, 1))
            .push(DiffLine::addition("    println!(\"Hello\");", 2))
            .push(DiffLine::context("}", 2, 3));
        DiffViewState::new(
            FileReview::new(FileDiff::with_hunks("src/main.rs", vec![hunk])),
            EngineConfig::default(),
        )
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn test_diff_viewer_render() {
        let theme = DefaultTheme;
        let mut state = sample_state();
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));

        DiffViewer::new(&theme)
            .with_footer_hints(vec![FooterHint::new("n", "Next hunk")])
            .render(Rect::new(0, 0, 60, 10), &mut buf, &mut state);

        let top = row_text(&buf, 0);
        assert!(top.contains(" src/main.rs [unified] "));
        assert!(top.contains("+1 -0"));
        assert!(row_text(&buf, 1).contains("@@ -1,2 +1,3 @@"));
        assert!(row_text(&buf, 3).contains("+    println!(\"Hello\");"));
        assert!(row_text(&buf, 9).contains("n Next hunk"));
        assert_eq!(state.nav.viewport_height, 8);
        assert_eq!(state.nav.viewport_width, 58);
    }

    #[test]
    fn test_search_status_in_footer() {
        let theme = DefaultTheme;
        let mut state = sample_state();
        state.handle_action(DiffAction::Search("main".to_string()));
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));

        DiffViewer::new(&theme).render(Rect::new(0, 0, 60, 10), &mut buf, &mut state);
        assert!(row_text(&buf, 9).contains("/main 1/1"));
    }

    #[test]
    fn test_split_layout_title() {
        let theme = DefaultTheme;
        let mut state = sample_state().with_layout(DiffLayout::SideBySide);
        let mut buf = Buffer::empty(Rect::new(0, 0, 60, 10));

        DiffViewer::new(&theme).render(Rect::new(0, 0, 60, 10), &mut buf, &mut state);
        assert!(row_text(&buf, 0).contains("[split]"));
        assert!(row_text(&buf, 2).contains("│"));
    }
}
