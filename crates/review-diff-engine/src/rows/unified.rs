//! Single-column row layout.

use super::{unattached_threads, CommentAttacher, RowLine};
use crate::config::EngineConfig;
use crate::fold::FoldState;
use crate::model::{CommentThread, Hunk};
use crate::word_diff::{word_diff_for_hunk, WordDiffSegment};

/// One row of the unified layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnifiedRow {
    /// A diff line (header lines included).
    Line {
        /// The referenced line.
        line: RowLine,
        /// Number shown in the gutter.
        line_number: Option<u32>,
        /// Intra-line segments when the line is part of a comparable pair.
        segments: Option<Vec<WordDiffSegment>>,
    },
    /// Placeholder for a collapsed context span.
    Folded {
        /// Hunk the span belongs to.
        hunk_index: usize,
        /// Number of hidden lines.
        folded_line_count: usize,
    },
    /// A review thread shown below the line it is anchored to.
    Comment {
        /// Index into the thread list.
        thread_index: usize,
    },
}

impl UnifiedRow {
    /// Hunk of a line or fold row.
    pub fn hunk_index(&self) -> Option<usize> {
        match self {
            UnifiedRow::Line { line, .. } => Some(line.hunk_index),
            UnifiedRow::Folded { hunk_index, .. } => Some(*hunk_index),
            UnifiedRow::Comment { .. } => None,
        }
    }

    /// The referenced line, for line rows.
    pub fn row_line(&self) -> Option<&RowLine> {
        match self {
            UnifiedRow::Line { line, .. } => Some(line),
            _ => None,
        }
    }
}

/// Build the unified rows for a file.
///
/// Every line outside a fold range becomes a [`UnifiedRow::Line`], a folded
/// hunk gets one [`UnifiedRow::Folded`] in place of its hidden span, and
/// each thread is emitted once below the first line matching one of its
/// anchors. Threads matching no emitted line are left out.
pub fn build_unified_rows(
    hunks: &[Hunk],
    threads: &[CommentThread],
    fold_state: &FoldState,
    config: &EngineConfig,
) -> Vec<UnifiedRow> {
    let mut rows = Vec::new();
    let mut attacher = CommentAttacher::new(threads);

    for (hunk_index, hunk) in hunks.iter().enumerate() {
        let hidden = fold_state.hidden_range(hunk_index, hunk, config);
        let mut segments = word_diff_for_hunk(hunk, config);

        for (line_index, diff_line) in hunk.lines.iter().enumerate() {
            if let Some(ref range) = hidden {
                if range.start == line_index {
                    rows.push(UnifiedRow::Folded {
                        hunk_index,
                        folded_line_count: range.len(),
                    });
                }
                if range.contains(&line_index) {
                    continue;
                }
            }

            let line = RowLine::new(hunk_index, line_index, diff_line);
            rows.push(UnifiedRow::Line {
                line,
                line_number: line.display_line_number(),
                segments: segments[line_index].take(),
            });
            rows.extend(
                attacher
                    .take_for([&line])
                    .into_iter()
                    .map(|thread_index| UnifiedRow::Comment { thread_index }),
            );
        }
    }

    if !threads.is_empty() {
        let orphaned = unattached_threads(threads.len(), attacher.attached.iter().copied());
        if !orphaned.is_empty() {
            log::debug!("{} review thread(s) not anchored to a visible line", orphaned.len());
        }
    }

    rows
}

/// Threads missing from a built row sequence.
pub fn orphaned_threads(rows: &[UnifiedRow], thread_count: usize) -> Vec<usize> {
    unattached_threads(
        thread_count,
        rows.iter().filter_map(|row| match row {
            UnifiedRow::Comment { thread_index } => Some(*thread_index),
            _ => None,
        }),
    )
}
