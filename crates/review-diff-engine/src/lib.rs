//! # review-diff-engine
//!
//! Diff rendering and navigation for terminal code review: turns the hunks,
//! review threads and blame of one file into display rows, and answers the
//! questions a reviewer's keyboard asks of them (next hunk, go to line,
//! search, fold, scroll).
//!
//! ## Design Principles
//!
//! The engine is **instrumented**: it receives already-fetched data through
//! the [`ReviewSource`] seam and emits [`DiffEvent`]s instead of performing
//! side effects. Row building, folding, word diff, windowing and navigation
//! are plain synchronous functions over their inputs; [`DiffViewState`]
//! owns the per-file state and memoizes rows in a [`RowCache`].
//!
//! ## Action-Based Architecture
//!
//! The host maps its key events to [`DiffAction`] variants and dispatches
//! them to the view state.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use review_diff_engine::{DefaultTheme, DiffAction, DiffViewState, DiffViewer, EngineConfig};
//!
//! let review = load_file_review(&source, &target, "src/lib.rs").await?;
//! let mut state = DiffViewState::new(review, EngineConfig::default());
//!
//! // Render the widget
//! let theme = DefaultTheme;
//! frame.render_stateful_widget(DiffViewer::new(&theme), area, &mut state);
//!
//! // Handle actions (mapped from key events by the host)
//! for event in state.handle_action(DiffAction::NextHunk) {
//!     // React to DiffEvent (status line, close, ...)
//! }
//! ```

pub mod action;
pub mod blame;
pub mod config;
pub mod event;
pub mod fold;
pub mod model;
pub mod navigation;
pub mod rows;
pub mod state;
pub mod traits;
pub mod widget;
pub mod window;
pub mod word_diff;

// Re-export commonly used types
pub use action::DiffAction;
pub use blame::{
    compact_relative_date, content_width, format_blame_gutter, get_blame_for_row,
    get_blame_for_split_side, BLAME_GUTTER_WIDTH,
};
pub use config::{ConfigError, DiffLayout, EngineConfig};
pub use event::DiffEvent;
pub use fold::FoldState;
pub use model::{
    BlameInfo, BlameMap, CommentAnchor, CommentThread, DiffLine, DiffSide, FileDiff, FileReview,
    Hunk, LineKind, ReviewComment,
};
pub use navigation::{
    find_next_hunk_start, find_prev_hunk_start, find_row_by_line_number, find_row_by_side_line,
    search_rows, DiffRow,
    SearchMatches,
};
pub use rows::{
    build_side_by_side_rows, build_unified_rows, orphaned_split_threads, orphaned_threads, RowCache,
    RowCacheKey, Rows, SplitRow, UnifiedRow,
};
pub use state::DiffViewState;
pub use traits::{
    load_file_review, DefaultTheme, ReviewSource, ReviewTarget, SourceError, ThemeProvider,
};
pub use widget::{DiffViewer, FooterHint};
pub use window::{compute_virtual_window, VirtualWindow};
pub use word_diff::{slice_word_diff_segments, WordDiffSegment};
