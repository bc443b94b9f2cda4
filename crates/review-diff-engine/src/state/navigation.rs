//! Cursor, scroll and viewport bookkeeping.

use crate::window::{max_scroll_offset, scroll_to_reveal};

/// Cursor and scroll position within the built rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationState {
    /// Selected row index.
    pub cursor_row: usize,
    /// First row at the top of the viewport.
    pub scroll_offset: usize,
    /// Horizontal scroll in display columns.
    pub h_offset: usize,
    /// Viewport height in rows.
    pub viewport_height: usize,
    /// Viewport width in columns.
    pub viewport_width: usize,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    /// Create new navigation state.
    pub fn new() -> Self {
        Self {
            cursor_row: 0,
            scroll_offset: 0,
            h_offset: 0,
            viewport_height: 20, // Updated by the host through SetViewport
            viewport_width: 80,
        }
    }

    /// Move cursor down by one row.
    pub fn cursor_down(&mut self, total_rows: usize) {
        if self.cursor_row + 1 < total_rows {
            self.cursor_row += 1;
        }
        self.ensure_cursor_visible();
    }

    /// Move cursor up by one row.
    pub fn cursor_up(&mut self) {
        self.cursor_row = self.cursor_row.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Move cursor to the first row.
    pub fn cursor_first(&mut self) {
        self.cursor_row = 0;
        self.scroll_offset = 0;
    }

    /// Move cursor to the last row.
    pub fn cursor_last(&mut self, total_rows: usize) {
        self.cursor_row = total_rows.saturating_sub(1);
        self.ensure_cursor_visible();
    }

    /// Put the cursor on `row` and scroll it into view.
    pub fn jump_to(&mut self, row: usize, total_rows: usize) {
        self.cursor_row = row.min(total_rows.saturating_sub(1));
        self.ensure_cursor_visible();
    }

    /// Adjust scroll to keep cursor visible.
    pub fn ensure_cursor_visible(&mut self) {
        self.scroll_offset =
            scroll_to_reveal(self.cursor_row, self.scroll_offset, self.viewport_height);
    }

    /// Pull cursor and scroll back inside `total_rows` after the rows changed.
    pub fn clamp(&mut self, total_rows: usize) {
        self.cursor_row = self.cursor_row.min(total_rows.saturating_sub(1));
        self.scroll_offset = self
            .scroll_offset
            .min(max_scroll_offset(total_rows, self.viewport_height));
        self.ensure_cursor_visible();
    }

    /// Scroll down by half page.
    pub fn scroll_half_down(&mut self, total_rows: usize) {
        let half = (self.viewport_height / 2).max(1);
        self.cursor_row = (self.cursor_row + half).min(total_rows.saturating_sub(1));
        self.ensure_cursor_visible();
    }

    /// Scroll up by half page.
    pub fn scroll_half_up(&mut self) {
        let half = (self.viewport_height / 2).max(1);
        self.cursor_row = self.cursor_row.saturating_sub(half);
        self.ensure_cursor_visible();
    }

    /// Scroll down by full page.
    pub fn scroll_page_down(&mut self, total_rows: usize) {
        let page = self.viewport_height.max(1);
        self.cursor_row = (self.cursor_row + page).min(total_rows.saturating_sub(1));
        self.scroll_offset = (self.scroll_offset + page).min(max_scroll_offset(total_rows, page));
        self.ensure_cursor_visible();
    }

    /// Scroll up by full page.
    pub fn scroll_page_up(&mut self) {
        let page = self.viewport_height.max(1);
        self.cursor_row = self.cursor_row.saturating_sub(page);
        self.scroll_offset = self.scroll_offset.saturating_sub(page);
        self.ensure_cursor_visible();
    }

    /// Scroll content left.
    pub fn scroll_left(&mut self, columns: usize) {
        self.h_offset = self.h_offset.saturating_sub(columns);
    }

    /// Scroll content right, never past `max_width`.
    pub fn scroll_right(&mut self, columns: usize, max_width: usize) {
        self.h_offset = self.h_offset.saturating_add(columns).min(max_width);
    }

    /// Back to the top-left corner, keeping the viewport size.
    pub fn reset(&mut self) {
        self.cursor_row = 0;
        self.scroll_offset = 0;
        self.h_offset = 0;
    }
}
