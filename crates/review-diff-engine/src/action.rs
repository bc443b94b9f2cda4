//! Diff view actions
//!
//! Tagged actions the view state understands. The host maps its key events
//! to these and dispatches them to [`crate::DiffViewState::handle_action`].

/// Actions that can be performed on a diff view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffAction {
    // === Navigation ===
    /// Move cursor down one row
    CursorDown,
    /// Move cursor up one row
    CursorUp,
    /// Move to first row
    CursorFirst,
    /// Move to last row
    CursorLast,
    /// Jump to the first change of the next hunk
    NextHunk,
    /// Jump to the first change of the previous hunk
    PrevHunk,
    /// Jump to the row showing a line number (old or new side)
    GoToLine(u32),

    // === Scrolling ===
    /// Scroll down half page
    ScrollHalfDown,
    /// Scroll up half page
    ScrollHalfUp,
    /// Scroll down full page
    ScrollPageDown,
    /// Scroll up full page
    ScrollPageUp,
    /// Scroll content left by some columns
    ScrollLeft(usize),
    /// Scroll content right by some columns
    ScrollRight(usize),

    // === Folding ===
    /// Fold or unfold the hunk under the cursor
    ToggleFold,
    /// Fold every foldable hunk
    FoldAll,
    /// Unfold every hunk
    UnfoldAll,

    // === Display ===
    /// Switch between unified and side-by-side
    ToggleLayout,
    /// Show or hide the blame gutter
    ToggleBlame,

    // === Search ===
    /// Search for a query and jump to the first match after the cursor
    Search(String),
    /// Jump to the next match
    NextMatch,
    /// Jump to the previous match
    PrevMatch,
    /// Drop the current search
    ClearSearch,

    // === General ===
    /// Close the diff view
    Close,

    // === Viewport ===
    /// Set the viewport dimensions (for scroll calculations)
    SetViewport { width: u16, height: u16 },
}

impl DiffAction {
    /// Check if this action moves the cursor
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            DiffAction::CursorDown
                | DiffAction::CursorUp
                | DiffAction::CursorFirst
                | DiffAction::CursorLast
                | DiffAction::NextHunk
                | DiffAction::PrevHunk
                | DiffAction::GoToLine(_)
                | DiffAction::NextMatch
                | DiffAction::PrevMatch
        )
    }

    /// Check if this action is a scroll action
    pub fn is_scroll(&self) -> bool {
        matches!(
            self,
            DiffAction::ScrollHalfDown
                | DiffAction::ScrollHalfUp
                | DiffAction::ScrollPageDown
                | DiffAction::ScrollPageUp
                | DiffAction::ScrollLeft(_)
                | DiffAction::ScrollRight(_)
        )
    }

    /// Check if this action changes which rows exist
    pub fn rebuilds_rows(&self) -> bool {
        matches!(
            self,
            DiffAction::ToggleFold
                | DiffAction::FoldAll
                | DiffAction::UnfoldAll
                | DiffAction::ToggleLayout
        )
    }
}
