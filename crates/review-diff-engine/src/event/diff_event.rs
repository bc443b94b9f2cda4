//! Events emitted by the diff view for the host to handle.

use crate::config::DiffLayout;

/// Events emitted by [`crate::DiffViewState::handle_action`].
///
/// The view performs no side effects of its own: the host reacts to these
/// (status bar updates, closing the view).
///
/// # Example
///
/// ```ignore
/// for event in state.handle_action(action) {
///     match event {
///         DiffEvent::SelectionChanged { line, .. } => status.set_line(line),
///         DiffEvent::LineNotFound(n) => status.flash(format!("line {} not in diff", n)),
///         DiffEvent::Close => return Ok(()),
///         _ => {}
///     }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEvent {
    /// The selected row changed.
    SelectionChanged {
        /// Index of the selected row.
        row: usize,
        /// Line number shown by the row, if it shows a line.
        line: Option<u32>,
    },

    /// A hunk was folded or unfolded.
    FoldToggled {
        /// Hunk index.
        hunk_index: usize,
        /// Whether the hunk is now folded.
        folded: bool,
    },

    /// A go-to-line target is not visible in the diff.
    LineNotFound(u32),

    /// The search results changed.
    SearchUpdated {
        /// The active query.
        query: String,
        /// Number of matching rows.
        match_count: usize,
    },

    /// The row layout changed.
    LayoutChanged(DiffLayout),

    /// User wants to close the diff view.
    Close,
}
