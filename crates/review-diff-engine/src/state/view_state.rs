//! Main state of one open file's diff view.

use super::NavigationState;
use crate::action::DiffAction;
use crate::config::{DiffLayout, EngineConfig};
use crate::event::DiffEvent;
use crate::fold::{is_foldable, FoldState};
use crate::model::{DiffSide, FileReview};
use crate::navigation::SearchMatches;
use crate::rows::{RowCache, RowCacheKey, Rows};
use crate::window::{compute_virtual_window, VirtualWindow};
use crate::word_diff::expand_tabs;

/// State of the diff view for one file.
///
/// Views are independent: each owns its review data, fold flags, cursor and
/// row cache.
#[derive(Debug, Clone)]
pub struct DiffViewState {
    /// Diff, threads and blame being viewed.
    pub review: FileReview,
    /// Engine policy.
    pub config: EngineConfig,
    /// Per-hunk fold flags.
    pub fold_state: FoldState,
    /// Row layout.
    pub layout: DiffLayout,
    /// Cursor and scroll.
    pub nav: NavigationState,
    /// Whether the blame gutter is shown.
    pub show_blame: bool,
    /// Active search, if any.
    pub search: Option<SearchMatches>,
    /// Bumped whenever `review` is replaced.
    diff_revision: u64,
    cache: RowCache,
}

impl DiffViewState {
    /// Create a view with default fold flags, unified layout and no blame.
    pub fn new(review: FileReview, config: EngineConfig) -> Self {
        let fold_state = FoldState::for_hunks(&review.diff.hunks, &config);
        Self {
            review,
            config,
            fold_state,
            layout: DiffLayout::default(),
            nav: NavigationState::new(),
            show_blame: false,
            search: None,
            diff_revision: 0,
            cache: RowCache::new(),
        }
    }

    /// Start in `layout` (builder style).
    pub fn with_layout(mut self, layout: DiffLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Start with the blame gutter shown when blame is available.
    pub fn with_blame_shown(mut self, show: bool) -> Self {
        self.show_blame = show && self.review.blame.is_some();
        self
    }

    /// Swap in fresh data for the file.
    ///
    /// Fold flags, cursor, scroll and search start over; the viewport size
    /// is kept.
    pub fn replace_review(&mut self, review: FileReview) {
        self.diff_revision += 1;
        self.fold_state = FoldState::for_hunks(&review.diff.hunks, &self.config);
        self.show_blame = self.show_blame && review.blame.is_some();
        self.review = review;
        self.nav.reset();
        self.search = None;
        log::debug!(
            "Review for {} replaced (revision {})",
            self.review.diff.path,
            self.diff_revision
        );
    }

    /// Revision of the current review data.
    pub fn diff_revision(&self) -> u64 {
        self.diff_revision
    }

    /// Rows for the current inputs, rebuilt only when they changed.
    pub fn rows(&mut self) -> &Rows {
        self.view().0
    }

    /// Rows together with the review they refer to and the active search.
    pub fn view(&mut self) -> (&Rows, &FileReview, Option<&SearchMatches>) {
        let key = RowCacheKey::new(self.diff_revision, &self.fold_state, self.layout, &self.config);
        let rows = self.cache.get_or_build(
            key,
            &self.review.diff.hunks,
            &self.review.threads,
            &self.config,
        );
        (rows, &self.review, self.search.as_ref())
    }

    /// Number of rows.
    pub fn row_count(&mut self) -> usize {
        self.rows().len()
    }

    /// How many times rows were built so far.
    pub fn row_build_count(&self) -> usize {
        self.cache.build_count()
    }

    /// The rows to paint for the current scroll position.
    pub fn visible_window(&mut self) -> VirtualWindow {
        let total = self.row_count();
        compute_virtual_window(
            total,
            self.nav.viewport_height,
            self.nav.scroll_offset,
            self.config.overscan,
        )
    }

    /// Widest line in display columns.
    pub fn max_line_width(&self) -> usize {
        self.review
            .diff
            .hunks
            .iter()
            .flat_map(|h| &h.lines)
            .map(|l| expand_tabs(&l.content, self.config.tab_width).chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Handle an action and return resulting events.
    pub fn handle_action(&mut self, action: DiffAction) -> Vec<DiffEvent> {
        let before = self.nav.cursor_row;
        let mut events = Vec::new();

        match action {
            // === Cursor Navigation ===
            DiffAction::CursorDown => {
                let total = self.row_count();
                self.nav.cursor_down(total);
            }
            DiffAction::CursorUp => self.nav.cursor_up(),
            DiffAction::CursorFirst => self.nav.cursor_first(),
            DiffAction::CursorLast => {
                let total = self.row_count();
                self.nav.cursor_last(total);
            }

            // === Hunk Navigation ===
            DiffAction::NextHunk => {
                let current = self.nav.cursor_row;
                if let Some(row) = self.rows().next_hunk_start(current) {
                    self.jump_to(row);
                }
            }
            DiffAction::PrevHunk => {
                let current = self.nav.cursor_row;
                if let Some(row) = self.rows().prev_hunk_start(current) {
                    self.jump_to(row);
                }
            }
            DiffAction::GoToLine(line) => match self.rows().row_by_line_number(line) {
                Some(row) => self.jump_to(row),
                None => events.push(DiffEvent::LineNotFound(line)),
            },

            // === Scrolling ===
            DiffAction::ScrollHalfDown => {
                let total = self.row_count();
                self.nav.scroll_half_down(total);
            }
            DiffAction::ScrollHalfUp => self.nav.scroll_half_up(),
            DiffAction::ScrollPageDown => {
                let total = self.row_count();
                self.nav.scroll_page_down(total);
            }
            DiffAction::ScrollPageUp => self.nav.scroll_page_up(),
            DiffAction::ScrollLeft(columns) => self.nav.scroll_left(columns),
            DiffAction::ScrollRight(columns) => {
                let max = self.max_line_width();
                self.nav.scroll_right(columns, max);
            }

            // === Folding ===
            DiffAction::ToggleFold => events.extend(self.toggle_fold_at_cursor()),
            DiffAction::FoldAll => self.set_all_folds(true),
            DiffAction::UnfoldAll => self.set_all_folds(false),

            // === Display ===
            DiffAction::ToggleLayout => {
                let cursor = self.nav.cursor_row;
                let anchor = self.rows().line_numbers(cursor);
                self.layout = self.layout.toggled();
                self.after_rows_changed(anchor, None);
                events.push(DiffEvent::LayoutChanged(self.layout));
            }
            DiffAction::ToggleBlame => {
                if self.review.blame.is_some() {
                    self.show_blame = !self.show_blame;
                } else {
                    log::debug!("No blame available for {}", self.review.diff.path);
                }
            }

            // === Search ===
            DiffAction::Search(query) => events.extend(self.start_search(&query)),
            DiffAction::NextMatch => {
                let current = self.nav.cursor_row;
                if let Some(row) = self.search.as_ref().and_then(|m| m.next_after(current)) {
                    self.jump_to(row);
                }
            }
            DiffAction::PrevMatch => {
                let current = self.nav.cursor_row;
                if let Some(row) = self.search.as_ref().and_then(|m| m.prev_before(current)) {
                    self.jump_to(row);
                }
            }
            DiffAction::ClearSearch => {
                if self.search.take().is_some() {
                    events.push(DiffEvent::SearchUpdated {
                        query: String::new(),
                        match_count: 0,
                    });
                }
            }

            // === General ===
            DiffAction::Close => events.push(DiffEvent::Close),

            // === Viewport ===
            DiffAction::SetViewport { width, height } => {
                self.nav.viewport_width = width as usize;
                self.nav.viewport_height = height as usize;
                self.nav.ensure_cursor_visible();
            }
        }

        if self.nav.cursor_row != before {
            events.push(self.selection_changed());
        }
        events
    }

    fn jump_to(&mut self, row: usize) {
        let total = self.row_count();
        self.nav.jump_to(row, total);
    }

    fn selection_changed(&mut self) -> DiffEvent {
        let row = self.nav.cursor_row;
        let (old, new) = self.rows().line_numbers(row);
        DiffEvent::SelectionChanged {
            row,
            line: new.or(old),
        }
    }

    fn toggle_fold_at_cursor(&mut self) -> Option<DiffEvent> {
        let cursor = self.nav.cursor_row;
        let (hunk_index, anchor) = {
            let rows = self.rows();
            (rows.hunk_at(cursor)?, rows.line_numbers(cursor))
        };
        let hunk = self.review.diff.hunks.get(hunk_index)?;
        if !is_foldable(hunk, &self.config) {
            return None;
        }
        let folded = self.fold_state.toggle(hunk_index)?;
        self.after_rows_changed(anchor, Some(hunk_index));
        Some(DiffEvent::FoldToggled { hunk_index, folded })
    }

    fn set_all_folds(&mut self, folded: bool) {
        let cursor = self.nav.cursor_row;
        let anchor = self.rows().line_numbers(cursor);
        self.fold_state.set_all(folded);
        self.after_rows_changed(anchor, None);
    }

    /// Keep the cursor on the same source line after the rows were rebuilt,
    /// falling back to the hunk's fold placeholder when the line got hidden.
    fn after_rows_changed(&mut self, anchor: (Option<u32>, Option<u32>), hunk: Option<usize>) {
        let total = self.row_count();
        let rows = self.rows();
        let target = anchor
            .1
            .and_then(|n| rows.row_by_side_line(DiffSide::Right, n))
            .or_else(|| anchor.0.and_then(|n| rows.row_by_side_line(DiffSide::Left, n)))
            .or_else(|| hunk.and_then(|h| rows.fold_row(h)));

        match target {
            Some(row) => self.nav.jump_to(row, total),
            None => self.nav.clamp(total),
        }
        self.refresh_search();
    }

    fn refresh_search(&mut self) {
        if let Some(query) = self.search.as_ref().map(|m| m.query.clone()) {
            let matches = self.run_search(&query);
            self.search = Some(matches);
        }
    }

    fn run_search(&mut self, query: &str) -> SearchMatches {
        let tab_width = self.config.tab_width;
        let (rows, review, _) = self.view();
        rows.search(&review.diff.hunks, &review.threads, query, tab_width)
    }

    fn start_search(&mut self, query: &str) -> Option<DiffEvent> {
        if query.is_empty() {
            self.search = None;
            return Some(DiffEvent::SearchUpdated {
                query: String::new(),
                match_count: 0,
            });
        }

        let matches = self.run_search(query);
        let cursor = self.nav.cursor_row;
        let target = if matches.rows.contains(&cursor) {
            Some(cursor)
        } else {
            matches.next_after(cursor)
        };
        let event = DiffEvent::SearchUpdated {
            query: query.to_string(),
            match_count: matches.len(),
        };
        self.search = Some(matches);
        if let Some(row) = target {
            self.jump_to(row);
        }
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{blame_map, BlameInfo, CommentAnchor, CommentThread, DiffLine, FileDiff, Hunk};
    use pretty_assertions::assert_eq;

    fn long_hunk(start: u32) -> Hunk {
        let mut hunk = Hunk::new(start, 12, start, 13).push(DiffLine::addition("added", start));
        for i in 0..12 {
            hunk = hunk.push(DiffLine::context(
                format!("context {}", i),
                start + i,
                start + i + 1,
            ));
        }
        hunk
    }

    fn review() -> FileReview {
        let hunks = vec![
            long_hunk(1),
            Hunk::new(100, 1, 101, 1)
                .push(DiffLine::deletion("let x = 1;", 100))
                .push(DiffLine::addition("let x = 2;", 101)),
        ];
        FileReview::new(FileDiff::with_hunks("src/lib.rs", hunks)).with_threads(vec![
            CommentThread::new("t", CommentAnchor::right(101)),
        ])
    }

    fn state() -> DiffViewState {
        let mut state = DiffViewState::new(review(), EngineConfig::default());
        state.handle_action(DiffAction::SetViewport {
            width: 80,
            height: 5,
        });
        state
    }

    #[test]
    fn test_initial_rows_are_folded() {
        let mut state = state();
        // hunk 0: header, add, 3 ctx, fold, 3 ctx; hunk 1: header, del, add, comment
        assert_eq!(state.row_count(), 13);
    }

    #[test]
    fn test_cursor_events() {
        let mut state = state();
        let events = state.handle_action(DiffAction::CursorDown);
        assert_eq!(
            events,
            vec![DiffEvent::SelectionChanged {
                row: 1,
                line: Some(1)
            }]
        );
        assert!(state.handle_action(DiffAction::CursorUp).len() == 1);
        assert!(state.handle_action(DiffAction::CursorUp).is_empty());
    }

    #[test]
    fn test_hunk_navigation_wraps() {
        let mut state = state();
        state.handle_action(DiffAction::NextHunk);
        assert_eq!(state.nav.cursor_row, 10);
        state.handle_action(DiffAction::NextHunk);
        assert_eq!(state.nav.cursor_row, 1);
        state.handle_action(DiffAction::PrevHunk);
        assert_eq!(state.nav.cursor_row, 10);
        // viewport follows the cursor
        assert!(state.nav.scroll_offset <= 10 && 10 < state.nav.scroll_offset + 5);
    }

    #[test]
    fn test_toggle_fold_keeps_cursor_line() {
        let mut state = state();
        state.handle_action(DiffAction::GoToLine(12));
        let row = state.nav.cursor_row;
        assert_eq!(row, 7);

        let events = state.handle_action(DiffAction::ToggleFold);
        assert_eq!(
            events[0],
            DiffEvent::FoldToggled {
                hunk_index: 0,
                folded: false
            }
        );
        assert_eq!(state.row_count(), 18);
        let cursor = state.nav.cursor_row;
        assert_eq!(state.rows().line_numbers(cursor).1, Some(12));

        state.handle_action(DiffAction::ToggleFold);
        assert_eq!(state.row_count(), 13);
        assert_eq!(state.nav.cursor_row, 7);
    }

    #[test]
    fn test_fold_hides_cursor_line_moves_to_placeholder() {
        let mut state = state();
        state.handle_action(DiffAction::UnfoldAll);
        state.handle_action(DiffAction::GoToLine(8));
        state.handle_action(DiffAction::ToggleFold);
        assert_eq!(state.nav.cursor_row, 5);
    }

    #[test]
    fn test_toggle_fold_on_unfoldable_hunk_is_noop() {
        let mut state = state();
        state.handle_action(DiffAction::GoToLine(101));
        assert!(state.handle_action(DiffAction::ToggleFold).is_empty());
    }

    #[test]
    fn test_go_to_missing_line() {
        let mut state = state();
        assert_eq!(
            state.handle_action(DiffAction::GoToLine(5000)),
            vec![DiffEvent::LineNotFound(5000)]
        );
    }

    #[test]
    fn test_row_cache_reuse() {
        let mut state = state();
        state.handle_action(DiffAction::CursorDown);
        state.handle_action(DiffAction::CursorDown);
        state.visible_window();
        assert_eq!(state.row_build_count(), 1);

        state.handle_action(DiffAction::ToggleLayout);
        assert_eq!(state.row_build_count(), 2);
    }

    #[test]
    fn test_toggle_layout_follows_line() {
        let mut state = state();
        state.handle_action(DiffAction::GoToLine(101));
        let events = state.handle_action(DiffAction::ToggleLayout);
        assert_eq!(events[0], DiffEvent::LayoutChanged(DiffLayout::SideBySide));
        // split: H, R, LR, LR, LR, F, LR, LR, LR, H, LR(del|add), C
        assert_eq!(state.nav.cursor_row, 10);
        assert_eq!(state.row_count(), 12);
    }

    #[test]
    fn test_toggle_layout_keeps_new_line_side() {
        // Old line 20 is a deletion in the first hunk; new line 20 is
        // context at old line 30 in the second.
        let mut first = Hunk::new(15, 11, 15, 1).push(DiffLine::context("start", 15, 15));
        for old in 16..=25 {
            first = first.push(DiffLine::deletion(format!("removed {}", old), old));
        }
        let second = Hunk::new(30, 1, 20, 1).push(DiffLine::context("kept", 30, 20));
        let review = FileReview::new(FileDiff::with_hunks("src/lib.rs", vec![first, second]));
        let mut state = DiffViewState::new(review, EngineConfig::default());

        state.handle_action(DiffAction::GoToLine(30));
        assert_eq!(state.nav.cursor_row, 13);

        state.handle_action(DiffAction::ToggleLayout);
        let cursor = state.nav.cursor_row;
        assert_eq!(cursor, 13);
        assert_eq!(state.rows().line_numbers(cursor), (Some(30), Some(20)));

        state.handle_action(DiffAction::ToggleLayout);
        let cursor = state.nav.cursor_row;
        assert_eq!(state.rows().line_numbers(cursor), (Some(30), Some(20)));
    }

    #[test]
    fn test_search_and_cycle() {
        let mut state = state();
        let events = state.handle_action(DiffAction::Search("CONTEXT".to_string()));
        assert_eq!(
            events[0],
            DiffEvent::SearchUpdated {
                query: "CONTEXT".to_string(),
                match_count: 6
            }
        );
        assert_eq!(state.nav.cursor_row, 2);

        state.handle_action(DiffAction::PrevMatch);
        assert_eq!(state.nav.cursor_row, 8);

        // unfolding exposes more matches
        state.handle_action(DiffAction::UnfoldAll);
        assert_eq!(state.search.as_ref().map(|m| m.len()), Some(12));

        state.handle_action(DiffAction::ClearSearch);
        assert!(state.search.is_none());
    }

    #[test]
    fn test_toggle_blame_needs_blame() {
        let mut state = state();
        state.handle_action(DiffAction::ToggleBlame);
        assert!(!state.show_blame);

        let blame = blame_map([BlameInfo {
            line: 1,
            author: "ana".to_string(),
            date: "2024-01-01".to_string(),
            commit_sha: "abc".to_string(),
            commit_message: String::new(),
        }]);
        state.replace_review(review().with_blame(blame));
        state.handle_action(DiffAction::ToggleBlame);
        assert!(state.show_blame);
    }

    #[test]
    fn test_replace_review_resets() {
        let mut state = state();
        state.handle_action(DiffAction::CursorLast);
        state.handle_action(DiffAction::ScrollRight(4));
        state.handle_action(DiffAction::Search("let".to_string()));
        state.replace_review(FileReview::new(FileDiff::with_hunks(
            "src/lib.rs",
            vec![Hunk::new(1, 1, 1, 1).push(DiffLine::addition("x", 1))],
        )));

        assert_eq!(state.diff_revision(), 1);
        assert_eq!(state.nav.cursor_row, 0);
        assert_eq!(state.nav.h_offset, 0);
        assert_eq!(state.nav.viewport_height, 5);
        assert!(state.search.is_none());
        assert_eq!(state.row_count(), 2);
    }

    #[test]
    fn test_scroll_right_is_bounded() {
        let mut state = state();
        state.handle_action(DiffAction::ScrollRight(100));
        // hunk headers are the widest lines here
        assert_eq!(state.nav.h_offset, "@@ -100,1 +101,1 @@".len());
    }

    #[test]
    fn test_close() {
        let mut state = state();
        assert_eq!(state.handle_action(DiffAction::Close), vec![DiffEvent::Close]);
    }
}
