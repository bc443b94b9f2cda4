//! Application state and rendering for one reviewed file.

use crate::input::InputHandler;
use crate::keymap::CommandId;
use ratatui::crossterm::event::KeyEvent;
use ratatui::prelude::*;
use ratatui::widgets::Widget;
use review_diff_engine::{
    DefaultTheme, DiffAction, DiffEvent, DiffLayout, DiffViewState, DiffViewer, ThemeProvider,
};

/// Commands advertised in the viewer's bottom border.
const FOOTER_COMMANDS: &[(CommandId, &str)] = &[
    (CommandId::NextHunk, "next hunk"),
    (CommandId::PrevHunk, "prev hunk"),
    (CommandId::ToggleFold, "fold"),
    (CommandId::ToggleLayout, "layout"),
    (CommandId::ToggleBlame, "blame"),
    (CommandId::SearchStart, "search"),
    (CommandId::GoToLineStart, "line"),
    (CommandId::Close, "quit"),
];

pub struct App {
    pub view: DiffViewState,
    pub running: bool,
    input: InputHandler,
    message: Option<String>,
    theme: DefaultTheme,
}

impl App {
    pub fn new(view: DiffViewState, input: InputHandler) -> Self {
        Self {
            view,
            running: true,
            input,
            message: None,
            theme: DefaultTheme,
        }
    }

    /// Route a key press to the view and react to what it reports.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if let Some(action) = self.input.handle_key(key) {
            self.dispatch(action);
        }
    }

    pub fn dispatch(&mut self, action: DiffAction) {
        log::debug!("Dispatching {:?}", action);
        self.message = None;
        for event in self.view.handle_action(action) {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: DiffEvent) {
        match event {
            DiffEvent::SelectionChanged { .. } => {}
            DiffEvent::FoldToggled { hunk_index, folded } => {
                let verb = if folded { "Folded" } else { "Unfolded" };
                self.message = Some(format!("{} hunk {}", verb, hunk_index + 1));
            }
            DiffEvent::LineNotFound(line) => {
                self.message = Some(format!("Line {} is not visible in this diff", line));
            }
            DiffEvent::SearchUpdated { query, .. } if query.is_empty() => {
                self.message = Some("Search cleared".to_string());
            }
            DiffEvent::SearchUpdated { query, match_count } => {
                self.message = Some(match match_count {
                    0 => format!("No matches for \"{}\"", query),
                    1 => format!("1 match for \"{}\"", query),
                    n => format!("{} matches for \"{}\"", n, query),
                });
            }
            DiffEvent::LayoutChanged(layout) => {
                let name = match layout {
                    DiffLayout::Unified => "unified",
                    DiffLayout::SideBySide => "side-by-side",
                };
                self.message = Some(format!("Layout: {}", name));
            }
            DiffEvent::Close => {
                log::info!("Closing {}", self.view.review.diff.path);
                self.running = false;
            }
        }
    }

    /// Text for the status line below the viewer.
    pub fn status_text(&mut self) -> String {
        if let Some(prompt) = self.input.prompt() {
            return format!("{}{}", prompt.kind.marker(), prompt.text);
        }
        if let Some(ref message) = self.message {
            return message.clone();
        }
        let cursor = self.view.nav.cursor_row;
        let total = self.view.row_count();
        match self.view.rows().line_numbers(cursor) {
            (_, Some(line)) | (Some(line), None) => {
                format!("row {}/{}  line {}", cursor + 1, total, line)
            }
            (None, None) => format!("row {}/{}", (cursor + 1).min(total), total),
        }
    }

    pub fn render(&mut self, area: Rect, buf: &mut Buffer) {
        let [viewer_area, status_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        let hints = self.input.keymap().footer_hints(FOOTER_COMMANDS);
        DiffViewer::new(&self.theme)
            .with_footer_hints(hints)
            .render_with_state(viewer_area, buf, &mut self.view);

        let status = self.status_text();
        StatusLine {
            text: &status,
            theme: &self.theme,
        }
        .render(status_area, buf);
    }
}

struct StatusLine<'a, T: ThemeProvider> {
    text: &'a str,
    theme: &'a T,
}

impl<T: ThemeProvider> Widget for StatusLine<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 1 {
            return;
        }
        buf.set_style(area, Style::default().bg(self.theme.context_background()));
        buf.set_stringn(
            area.x + 1,
            area.y,
            self.text,
            area.width.saturating_sub(2) as usize,
            Style::default().fg(self.theme.hint_text_foreground()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::default_keymap;
    use pretty_assertions::assert_eq;
    use ratatui::crossterm::event::{KeyCode, KeyModifiers};
    use review_diff_engine::{DiffLine, EngineConfig, FileDiff, FileReview, Hunk};

    fn app() -> App {
        let first = Hunk::new(1, 2, 1, 2)
            .push(DiffLine::context("fn main() {", 1, 1))
            .push(DiffLine::addition("    run();", 2));
        let second = Hunk::new(40, 1, 41, 1).push(DiffLine::deletion("old()", 40));
        let review = FileReview::new(FileDiff::with_hunks("src/main.rs", vec![first, second]));
        let view = DiffViewState::new(review, EngineConfig::default());
        App::new(view, InputHandler::new(default_keymap()))
    }

    fn press(app: &mut App, c: char) {
        app.handle_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn test_close_stops_app() {
        let mut app = app();
        press(&mut app, 'q');
        assert!(!app.running);
    }

    #[test]
    fn test_status_shows_position() {
        let mut app = app();
        assert_eq!(app.status_text(), "row 1/5");
        press(&mut app, 'j');
        assert_eq!(app.status_text(), "row 2/5  line 1");
    }

    #[test]
    fn test_go_to_missing_line_reports() {
        let mut app = app();
        press(&mut app, ':');
        press(&mut app, '9');
        assert_eq!(app.status_text(), ":9");
        app.handle_key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(app.status_text(), "Line 9 is not visible in this diff");
    }

    #[test]
    fn test_search_reports_match_count() {
        let mut app = app();
        app.dispatch(DiffAction::Search("()".to_string()));
        assert_eq!(app.status_text(), "3 matches for \"()\"");
    }

    #[test]
    fn test_clear_search_reports() {
        let mut app = app();
        app.dispatch(DiffAction::Search("run".to_string()));
        app.handle_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.view.search.is_none());
        assert_eq!(app.status_text(), "Search cleared");
    }

    #[test]
    fn test_layout_toggle_reports() {
        let mut app = app();
        press(&mut app, 's');
        assert_eq!(app.view.layout, DiffLayout::SideBySide);
        assert_eq!(app.status_text(), "Layout: side-by-side");
    }

    #[test]
    fn test_render_viewer_and_status() {
        let mut app = app();
        let area = Rect::new(0, 0, 60, 10);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);

        let top: String = (0..area.width).map(|x| buf[(x, 0)].symbol()).collect();
        assert!(top.contains("src/main.rs"));
        let status: String = (0..area.width).map(|x| buf[(x, 9)].symbol()).collect();
        assert!(status.trim_start().starts_with("row 1/5"));
    }
}
