//! Diff content widget painting the rows of the virtual window.

use crate::blame::{
    blank_blame_gutter, content_width, format_blame_gutter, get_blame_for_row,
    get_blame_for_split_side, BLAME_GUTTER_WIDTH,
};
use crate::model::{BlameInfo, FileReview, LineKind};
use crate::navigation::{match_columns, DiffRow, SearchMatches};
use crate::rows::{PairedSide, RowLine, Rows, SplitRow, UnifiedRow};
use crate::traits::ThemeProvider;
use crate::window::VirtualWindow;
use crate::word_diff::{
    expand_tabs, slice_columns, slice_word_diff_segments, SegmentKind, WordDiffSegment,
};
use chrono::{DateTime, Utc};
use ratatui::prelude::*;
use ratatui::widgets::Widget;

/// View parameters taken from the state for one frame.
#[derive(Debug, Clone, Default)]
pub struct DiffRenderData {
    /// Rows to lay out.
    pub window: VirtualWindow,
    /// Selected row.
    pub cursor_row: usize,
    /// First row in the viewport.
    pub scroll_offset: usize,
    /// Horizontal scroll in columns.
    pub h_offset: usize,
    /// Tab stop width.
    pub tab_width: usize,
    /// Whether to reserve the blame gutter.
    pub show_blame: bool,
}

/// A single hint entry for the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterHint {
    /// The key (e.g., "n", "z").
    pub key: String,
    /// The description (e.g., "Next hunk", "Fold").
    pub description: String,
}

impl FooterHint {
    /// Create a new footer hint.
    pub fn new(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            description: description.into(),
        }
    }
}

/// Widget painting diff rows in either layout.
pub struct DiffContentWidget<'a, T: ThemeProvider> {
    rows: &'a Rows,
    review: &'a FileReview,
    data: DiffRenderData,
    search: Option<&'a SearchMatches>,
    now: DateTime<Utc>,
    theme: &'a T,
}

impl<'a, T: ThemeProvider> DiffContentWidget<'a, T> {
    /// Create a content widget for one frame.
    pub fn new(rows: &'a Rows, review: &'a FileReview, data: DiffRenderData, theme: &'a T) -> Self {
        Self {
            rows,
            review,
            data,
            search: None,
            now: Utc::now(),
            theme,
        }
    }

    /// Highlight matches of an active search.
    pub fn with_search(mut self, search: Option<&'a SearchMatches>) -> Self {
        self.search = search;
        self
    }

    /// Reference time for blame ages.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }
}

impl<T: ThemeProvider> Widget for DiffContentWidget<'_, T> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.rows.is_empty() {
            let msg = "No changes in this file";
            let x = area.x + (area.width.saturating_sub(msg.len() as u16)) / 2;
            let y = area.y + area.height / 2;
            buf.set_string(x, y, msg, Style::default().fg(Color::DarkGray));
            return;
        }

        let scroll = self.data.scroll_offset;
        let viewport_end = scroll + area.height as usize;
        let split_hunks = match self.rows {
            Rows::SideBySide(rows) => SplitRow::hunk_assignments(rows),
            Rows::Unified(_) => Vec::new(),
        };

        // Overscan rows are part of the window but fall outside the buffer
        for index in self.data.window.visible_range.clone() {
            if index < scroll || index >= viewport_end {
                continue;
            }
            let y = area.y + (index - scroll) as u16;
            let is_cursor = index == self.data.cursor_row;
            match self.rows {
                Rows::Unified(rows) => {
                    if let Some(row) = rows.get(index) {
                        self.render_unified_row(row, area.x, y, area.width, is_cursor, buf);
                    }
                }
                Rows::SideBySide(rows) => {
                    if let Some(row) = rows.get(index) {
                        let hunk = split_hunks.get(index).copied().flatten();
                        self.render_split_row(row, hunk, area.x, y, area.width, is_cursor, buf);
                    }
                }
            }
        }
    }
}

impl<T: ThemeProvider> DiffContentWidget<'_, T> {
    fn content_of(&self, line: &RowLine) -> &str {
        self.review
            .diff
            .line(line.hunk_index, line.line_index)
            .map(|l| l.content.as_str())
            .unwrap_or("")
    }

    fn line_style(&self, kind: LineKind, is_cursor: bool) -> Style {
        if is_cursor {
            return Style::default()
                .fg(self.theme.cursor_foreground())
                .bg(self.theme.cursor_background());
        }
        let bg = match kind {
            LineKind::Addition => self.theme.addition_background(),
            LineKind::Deletion => self.theme.deletion_background(),
            LineKind::Header => self.theme.hunk_header_background(),
            LineKind::Context => self.theme.context_background(),
        };
        Style::default().bg(bg)
    }

    fn fill(&self, x: u16, y: u16, width: u16, style: Style, buf: &mut Buffer) {
        buf.set_string(x, y, " ".repeat(width as usize), style);
    }

    fn render_unified_row(
        &self,
        row: &UnifiedRow,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        match row {
            UnifiedRow::Line { line, segments, .. } => {
                if line.kind == LineKind::Header {
                    self.render_hunk_header(self.content_of(line), x, y, width, is_cursor, buf);
                    return;
                }

                let base = self.line_style(line.kind, is_cursor);
                self.fill(x, y, width, base, buf);

                let mut current_x = x;
                if self.data.show_blame {
                    let info = get_blame_for_row(row, self.review.blame.as_ref());
                    current_x = self.render_blame(info, current_x, y, base, is_cursor, buf);
                }

                let line_no_width = self.review.diff.line_no_width();
                current_x = self.render_line_number(line.old_line, current_x, y, base, is_cursor, buf);
                current_x += 1;
                current_x = self.render_line_number(line.new_line, current_x, y, base, is_cursor, buf);
                current_x += 1;
                current_x = self.render_prefix(line.kind, current_x, y, base, is_cursor, buf);

                let gutter = 2 * line_no_width + 3;
                let width = content_width(
                    (width as usize).saturating_sub(gutter),
                    self.data.show_blame,
                );
                self.render_text(
                    self.content_of(line),
                    segments.as_deref(),
                    line.kind,
                    current_x,
                    y,
                    width,
                    base,
                    is_cursor,
                    buf,
                );
            }
            UnifiedRow::Folded {
                folded_line_count, ..
            } => self.render_fold(*folded_line_count, x, y, width, is_cursor, buf),
            UnifiedRow::Comment { thread_index } => {
                self.render_comment(*thread_index, x, y, width, is_cursor, buf)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_split_row(
        &self,
        row: &SplitRow,
        hunk: Option<usize>,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        match row {
            SplitRow::Header => {
                let header = hunk
                    .and_then(|h| self.review.diff.line(h, 0))
                    .filter(|l| l.kind == LineKind::Header)
                    .map(|l| l.content.as_str())
                    .unwrap_or("");
                self.render_hunk_header(header, x, y, width, is_cursor, buf);
            }
            SplitRow::Folded {
                folded_line_count, ..
            } => self.render_fold(*folded_line_count, x, y, width, is_cursor, buf),
            SplitRow::Comment { thread_index } => {
                self.render_comment(*thread_index, x, y, width, is_cursor, buf)
            }
            SplitRow::Paired { left, right } => {
                let base = self.line_style(LineKind::Context, is_cursor);
                self.fill(x, y, width, base, buf);

                let mut current_x = x;
                if self.data.show_blame {
                    let blame = self.review.blame.as_ref();
                    let info = right
                        .as_ref()
                        .and_then(|side| get_blame_for_split_side(side, blame))
                        .or_else(|| {
                            left.as_ref()
                                .and_then(|side| get_blame_for_split_side(side, blame))
                        });
                    current_x = self.render_blame(info, current_x, y, base, is_cursor, buf);
                }

                let remaining = width.saturating_sub(current_x - x);
                let half = remaining / 2;
                self.render_side(left.as_ref(), true, current_x, y, half, is_cursor, buf);
                buf.set_string(
                    current_x + half,
                    y,
                    "│",
                    base.fg(self.theme.border()),
                );
                self.render_side(
                    right.as_ref(),
                    false,
                    current_x + half + 1,
                    y,
                    remaining.saturating_sub(half + 1),
                    is_cursor,
                    buf,
                );
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn render_side(
        &self,
        side: Option<&PairedSide>,
        old_side: bool,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        let Some(side) = side else {
            return;
        };
        let kind = side.line.kind;
        let base = self.line_style(kind, is_cursor);
        self.fill(x, y, width, base, buf);

        let number = if old_side {
            side.line.old_line
        } else {
            side.line.new_line
        };
        let mut current_x = self.render_line_number(number, x, y, base, is_cursor, buf);
        current_x += 1;
        current_x = self.render_prefix(kind, current_x, y, base, is_cursor, buf);

        let gutter = self.review.diff.line_no_width() + 2;
        self.render_text(
            self.content_of(&side.line),
            side.segments.as_deref(),
            kind,
            current_x,
            y,
            (width as usize).saturating_sub(gutter),
            base,
            is_cursor,
            buf,
        );
    }

    fn render_hunk_header(
        &self,
        header: &str,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        let style = if is_cursor {
            self.line_style(LineKind::Header, true)
        } else {
            Style::default()
                .fg(self.theme.hunk_header_foreground())
                .bg(self.theme.hunk_header_background())
        };
        self.fill(x, y, width, style, buf);
        buf.set_string(x, y, slice_columns(header, 0, width as usize), style);
    }

    fn render_fold(
        &self,
        folded_line_count: usize,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        let style = if is_cursor {
            self.line_style(LineKind::Context, true)
        } else {
            Style::default()
                .fg(self.theme.fold_foreground())
                .bg(self.theme.fold_background())
        };
        self.fill(x, y, width, style, buf);
        let label = format!("  ⋯ {} unchanged lines folded", folded_line_count);
        buf.set_string(x, y, slice_columns(&label, 0, width as usize), style);
    }

    fn render_comment(
        &self,
        thread_index: usize,
        x: u16,
        y: u16,
        width: u16,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        let Some(thread) = self.review.threads.get(thread_index) else {
            return;
        };
        let fg = if thread.is_resolved {
            self.theme.resolved_comment_foreground()
        } else {
            self.theme.comment_foreground()
        };
        let style = if is_cursor {
            self.line_style(LineKind::Context, true)
        } else {
            Style::default().fg(fg).bg(self.theme.context_background())
        };
        self.fill(x, y, width, style, buf);

        let mut label = match thread.summary() {
            Some(comment) => format!(
                "{:indent$}▍ {}: {}",
                "",
                comment.author,
                comment.body.lines().next().unwrap_or(""),
                indent = self.review.diff.line_no_width() + 1
            ),
            None => format!("{:indent$}▍ (empty thread)", "", indent = self.review.diff.line_no_width() + 1),
        };
        let replies = thread.comments.len().saturating_sub(1);
        if replies > 0 {
            label.push_str(&format!(" (+{} replies)", replies));
        }
        if thread.is_resolved {
            label.push_str(" [resolved]");
        }
        buf.set_string(x, y, slice_columns(&label, 0, width as usize), style);
    }

    fn render_blame(
        &self,
        info: Option<&BlameInfo>,
        x: u16,
        y: u16,
        base: Style,
        is_cursor: bool,
        buf: &mut Buffer,
    ) -> u16 {
        let gutter = match info {
            Some(info) => format_blame_gutter(info, self.now),
            None => blank_blame_gutter(),
        };
        let style = if is_cursor {
            base
        } else {
            base.fg(self.theme.blame_foreground())
        };
        buf.set_string(x, y, gutter, style);
        x + BLAME_GUTTER_WIDTH as u16
    }

    fn render_line_number(
        &self,
        number: Option<u32>,
        x: u16,
        y: u16,
        base: Style,
        is_cursor: bool,
        buf: &mut Buffer,
    ) -> u16 {
        let width = self.review.diff.line_no_width();
        let text = number
            .map(|n| format!("{:>width$}", n, width = width))
            .unwrap_or_else(|| " ".repeat(width));
        // Line number style - use cursor foreground on cursor line for contrast
        let style = if is_cursor {
            base
        } else {
            base.fg(self.theme.line_number_foreground())
        };
        buf.set_string(x, y, text, style);
        x + width as u16
    }

    fn render_prefix(
        &self,
        kind: LineKind,
        x: u16,
        y: u16,
        base: Style,
        is_cursor: bool,
        buf: &mut Buffer,
    ) -> u16 {
        let style = match kind {
            _ if is_cursor => base,
            LineKind::Addition => base.fg(Color::Green),
            LineKind::Deletion => base.fg(Color::Red),
            _ => base,
        };
        buf.set_string(x, y, kind.prefix().to_string(), style);
        x + 1
    }

    #[allow(clippy::too_many_arguments)]
    fn render_text(
        &self,
        content: &str,
        segments: Option<&[WordDiffSegment]>,
        kind: LineKind,
        x: u16,
        y: u16,
        width: usize,
        base: Style,
        is_cursor: bool,
        buf: &mut Buffer,
    ) {
        let offset = self.data.h_offset;
        let expanded = expand_tabs(content, self.data.tab_width);

        match segments {
            Some(segments) => {
                let word_bg = match kind {
                    LineKind::Deletion => self.theme.deletion_word_background(),
                    _ => self.theme.addition_word_background(),
                };
                let mut col = 0u16;
                for segment in slice_word_diff_segments(segments, offset, width) {
                    let style = match segment.kind {
                        SegmentKind::Changed if is_cursor => base.add_modifier(Modifier::BOLD),
                        SegmentKind::Changed => base.bg(word_bg),
                        SegmentKind::Unchanged => base,
                    };
                    buf.set_string(x + col, y, &segment.text, style);
                    col += segment.text.chars().count() as u16;
                }
            }
            None => {
                buf.set_string(x, y, slice_columns(&expanded, offset, width), base);
            }
        }

        let Some(search) = self.search else {
            return;
        };
        let match_style = Style::default().bg(self.theme.search_match_background());
        for range in match_columns(&expanded, &search.query) {
            let start = range.start.max(offset);
            let end = range.end.min(offset + width);
            if start < end {
                let area = Rect::new(x + (start - offset) as u16, y, (end - start) as u16, 1);
                buf.set_style(area.intersection(buf.area), match_style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::fold::FoldState;
    use crate::model::{
        blame_map, CommentAnchor, CommentThread, DiffLine, FileDiff, Hunk, ReviewComment,
    };
    use crate::rows::{build_side_by_side_rows, build_unified_rows};
    use crate::traits::DefaultTheme;
    use crate::window::compute_virtual_window;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn review() -> FileReview {
        let hunk = Hunk::new(1, 2, 1, 2)
            .push(DiffLine::context("fn main() {", 1, 1))
            .push(DiffLine::deletion("    old()", 2))
            .push(DiffLine::addition("    new()", 2));
        FileReview::new(FileDiff::with_hunks("src/main.rs", vec![hunk])).with_threads(vec![
            CommentThread::new("t", CommentAnchor::right(2))
                .with_comment(ReviewComment::new("ana", "Looks good\nsecond line"))
                .with_comment(ReviewComment::new("bo", "thanks")),
        ])
    }

    fn unified(review: &FileReview) -> Rows {
        let config = EngineConfig::default();
        let fold = FoldState::for_hunks(&review.diff.hunks, &config);
        Rows::Unified(build_unified_rows(
            &review.diff.hunks,
            &review.threads,
            &fold,
            &config,
        ))
    }

    fn data(rows: &Rows, height: usize) -> DiffRenderData {
        DiffRenderData {
            window: compute_virtual_window(rows.len(), height, 0, 5),
            cursor_row: 99,
            scroll_offset: 0,
            h_offset: 0,
            tab_width: 4,
            show_blame: false,
        }
    }

    fn render(widget: DiffContentWidget<'_, DefaultTheme>, width: u16, height: u16) -> Buffer {
        let mut buf = Buffer::empty(Rect::new(0, 0, width, height));
        widget.render(Rect::new(0, 0, width, height), &mut buf);
        buf
    }

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol())
            .collect::<String>()
            .trim_end()
            .to_string()
    }

    #[test]
    fn test_unified_rows_painted() {
        let review = review();
        let rows = unified(&review);
        let theme = DefaultTheme;
        let buf = render(DiffContentWidget::new(&rows, &review, data(&rows, 8), &theme), 60, 8);

        assert_eq!(row_text(&buf, 0), "@@ -1,2 +1,2 @@");
        assert_eq!(row_text(&buf, 1), format!("{:>4} {:>4} {}", 1, 1, " fn main() {"));
        assert_eq!(row_text(&buf, 2), format!("{:>4} {:>4} -    old()", 2, ""));
        assert_eq!(row_text(&buf, 3), format!("{:>4} {:>4} +    new()", "", 2));
        assert!(row_text(&buf, 4).contains("▍ ana: Looks good (+1 replies)"));

        // "new" is the changed word of the pair
        assert_eq!(buf[(15, 3)].bg, theme.addition_word_background());
        assert_eq!(buf[(12, 3)].bg, theme.addition_background());
    }

    #[test]
    fn test_horizontal_offset() {
        let review = review();
        let rows = unified(&review);
        let theme = DefaultTheme;
        let mut data = data(&rows, 8);
        data.h_offset = 4;
        let buf = render(DiffContentWidget::new(&rows, &review, data, &theme), 60, 8);
        assert_eq!(row_text(&buf, 3), format!("{:>4} {:>4} +new()", "", 2));
    }

    #[test]
    fn test_viewport_clips_rows() {
        let review = review();
        let rows = unified(&review);
        let theme = DefaultTheme;
        let mut data = data(&rows, 2);
        data.scroll_offset = 2;
        data.window = compute_virtual_window(rows.len(), 2, 2, 5);
        let buf = render(DiffContentWidget::new(&rows, &review, data, &theme), 40, 2);
        assert!(row_text(&buf, 0).ends_with("-    old()"));
        assert!(row_text(&buf, 1).ends_with("+    new()"));
    }

    #[test]
    fn test_blame_gutter() {
        let blame = blame_map([crate::model::BlameInfo {
            line: 1,
            author: "ana".to_string(),
            date: "2024-06-13".to_string(),
            commit_sha: "abc".to_string(),
            commit_message: String::new(),
        }]);
        let review = review().with_blame(blame);
        let rows = unified(&review);
        let theme = DefaultTheme;
        let mut data = data(&rows, 8);
        data.show_blame = true;
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let buf = render(
            DiffContentWidget::new(&rows, &review, data, &theme).with_now(now),
            60,
            8,
        );
        assert!(row_text(&buf, 1).starts_with("ana       2d │   1    1  fn main() {"));
        assert!(row_text(&buf, 2).starts_with("             │   2"));
    }

    #[test]
    fn test_search_highlight() {
        let review = review();
        let rows = unified(&review);
        let theme = DefaultTheme;
        let search = SearchMatches {
            query: "MAIN".to_string(),
            rows: vec![1],
        };
        let buf = render(
            DiffContentWidget::new(&rows, &review, data(&rows, 8), &theme).with_search(Some(&search)),
            60,
            8,
        );
        // content starts at column 11: "fn main() {"
        assert_eq!(buf[(14, 1)].bg, theme.search_match_background());
        assert_eq!(buf[(17, 1)].bg, theme.search_match_background());
        assert_eq!(buf[(18, 1)].bg, theme.context_background());
    }

    #[test]
    fn test_folded_placeholder() {
        let mut hunk = Hunk::new(1, 12, 1, 13).push(DiffLine::addition("x", 1));
        for i in 0..12 {
            hunk = hunk.push(DiffLine::context("c", i + 1, i + 2));
        }
        let review = FileReview::new(FileDiff::with_hunks("a.rs", vec![hunk]));
        let rows = unified(&review);
        let theme = DefaultTheme;
        let buf = render(DiffContentWidget::new(&rows, &review, data(&rows, 10), &theme), 50, 10);
        assert_eq!(row_text(&buf, 5), "  ⋯ 6 unchanged lines folded");
    }

    #[test]
    fn test_split_rows_painted() {
        let review = review();
        let config = EngineConfig::default();
        let fold = FoldState::for_hunks(&review.diff.hunks, &config);
        let rows = Rows::SideBySide(build_side_by_side_rows(
            &review.diff.hunks,
            &review.threads,
            &fold,
            &config,
        ));
        let theme = DefaultTheme;
        let buf = render(DiffContentWidget::new(&rows, &review, data(&rows, 6), &theme), 40, 6);

        assert_eq!(row_text(&buf, 0), "@@ -1,2 +1,2 @@");
        assert_eq!(
            row_text(&buf, 2),
            format!("{:>4} -    old(){:5}│{:>4} +    new()", 2, "", 2)
        );
        assert_eq!(buf[(20, 2)].symbol(), "│");
    }

    #[test]
    fn test_cursor_row_style() {
        let review = review();
        let rows = unified(&review);
        let theme = DefaultTheme;
        let mut data = data(&rows, 8);
        data.cursor_row = 1;
        let buf = render(DiffContentWidget::new(&rows, &review, data, &theme), 60, 8);
        assert_eq!(buf[(30, 1)].bg, theme.cursor_background());
    }

    #[test]
    fn test_empty_rows_message() {
        let review = FileReview::default();
        let rows = Rows::Unified(Vec::new());
        let theme = DefaultTheme;
        let buf = render(
            DiffContentWidget::new(&rows, &review, DiffRenderData::default(), &theme),
            40,
            3,
        );
        assert!(row_text(&buf, 1).contains("No changes in this file"));
    }
}
