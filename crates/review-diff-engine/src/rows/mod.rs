//! Display rows built from hunks, review threads and fold state.
//!
//! Rows are recomputed from their inputs and never patched in place: a fold
//! toggle shifts the index of every row after it. Rows refer back to hunks
//! and threads by index only.

mod cache;
mod side_by_side;
mod unified;

pub use cache::{RowCache, RowCacheKey, Rows};
pub use side_by_side::{build_side_by_side_rows, orphaned_split_threads, PairedSide, SplitRow};
pub use unified::{build_unified_rows, orphaned_threads, UnifiedRow};

use crate::model::{CommentAnchor, CommentThread, DiffLine, DiffSide, LineKind, ThreadIndex};
use std::collections::HashSet;

/// Back-reference to one line of one hunk, with its line numbers copied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLine {
    /// Hunk the line belongs to.
    pub hunk_index: usize,
    /// Position of the line inside the hunk.
    pub line_index: usize,
    /// Line kind.
    pub kind: LineKind,
    /// Old-side line number.
    pub old_line: Option<u32>,
    /// New-side line number.
    pub new_line: Option<u32>,
}

impl RowLine {
    /// Reference `line` at `hunk_index`/`line_index`.
    pub fn new(hunk_index: usize, line_index: usize, line: &DiffLine) -> Self {
        Self {
            hunk_index,
            line_index,
            kind: line.kind,
            old_line: line.old_line,
            new_line: line.new_line,
        }
    }

    /// Display line number (old side for deletions, new side otherwise).
    pub fn display_line_number(&self) -> Option<u32> {
        self.kind.display_line_number(self.old_line, self.new_line)
    }

    /// Anchors a comment on this line can use, natural side first.
    fn comment_anchors(&self) -> impl Iterator<Item = CommentAnchor> {
        let (first, second) = match self.kind {
            LineKind::Header => (None, None),
            LineKind::Deletion | LineKind::Addition => {
                let side = self.kind.comment_side();
                let line = match side {
                    DiffSide::Left => self.old_line,
                    DiffSide::Right => self.new_line,
                };
                (line.map(|line| CommentAnchor { side, line }), None)
            }
            LineKind::Context => (
                self.new_line.map(CommentAnchor::right),
                self.old_line.map(CommentAnchor::left),
            ),
        };
        first.into_iter().chain(second)
    }
}

/// Attaches each thread once, to the first line matching one of its anchors.
struct CommentAttacher {
    index: ThreadIndex,
    attached: HashSet<usize>,
}

impl CommentAttacher {
    fn new(threads: &[CommentThread]) -> Self {
        Self {
            index: ThreadIndex::new(threads),
            attached: HashSet::new(),
        }
    }

    /// Thread indices to emit after `lines`, in lookup order.
    fn take_for<'a>(&mut self, lines: impl IntoIterator<Item = &'a RowLine>) -> Vec<usize> {
        if self.index.is_empty() {
            return Vec::new();
        }
        let mut result = Vec::new();
        for line in lines {
            for anchor in line.comment_anchors() {
                for &thread in self.index.get(anchor) {
                    if self.attached.insert(thread) {
                        result.push(thread);
                    }
                }
            }
        }
        result
    }
}

/// Threads that did not make it into `attached` (e.g. anchored to lines
/// outside every hunk, or hidden inside a fold).
pub(crate) fn unattached_threads(
    thread_count: usize,
    attached: impl IntoIterator<Item = usize>,
) -> Vec<usize> {
    let attached: HashSet<usize> = attached.into_iter().collect();
    (0..thread_count).filter(|t| !attached.contains(t)).collect()
}
