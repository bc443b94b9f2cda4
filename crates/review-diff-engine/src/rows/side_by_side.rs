//! Two-column row layout.

use super::{unattached_threads, CommentAttacher, RowLine};
use crate::config::EngineConfig;
use crate::fold::FoldState;
use crate::model::{CommentThread, Hunk, LineKind};
use crate::word_diff::{word_diff_for_hunk, WordDiffSegment};

/// One side of a paired row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairedSide {
    /// The referenced line.
    pub line: RowLine,
    /// Intra-line segments when the line is part of a comparable pair.
    pub segments: Option<Vec<WordDiffSegment>>,
}

/// One row of the side-by-side layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SplitRow {
    /// Old line on the left, new line on the right; either may be missing.
    Paired {
        /// Old-side line.
        left: Option<PairedSide>,
        /// New-side line.
        right: Option<PairedSide>,
    },
    /// Start of a hunk.
    Header,
    /// Placeholder for a collapsed context span.
    Folded {
        /// Hunk the span belongs to.
        hunk_index: usize,
        /// Number of hidden lines.
        folded_line_count: usize,
    },
    /// A review thread shown below the row it is anchored to.
    Comment {
        /// Index into the thread list.
        thread_index: usize,
    },
}

impl SplitRow {
    /// Lines held by a paired row.
    pub fn sides(&self) -> (Option<&PairedSide>, Option<&PairedSide>) {
        match self {
            SplitRow::Paired { left, right } => (left.as_ref(), right.as_ref()),
            _ => (None, None),
        }
    }
}

/// Build the side-by-side rows for a file.
///
/// Each hunk starts with a [`SplitRow::Header`]. Context lines fill both
/// sides; inside a change block the `i`-th deletion is paired with the
/// `i`-th addition and the longer run continues alone on its side.
pub fn build_side_by_side_rows(
    hunks: &[Hunk],
    threads: &[CommentThread],
    fold_state: &FoldState,
    config: &EngineConfig,
) -> Vec<SplitRow> {
    let mut rows = Vec::new();
    let mut attacher = CommentAttacher::new(threads);

    for (hunk_index, hunk) in hunks.iter().enumerate() {
        rows.push(SplitRow::Header);

        let hidden = fold_state.hidden_range(hunk_index, hunk, config);
        let mut segments = word_diff_for_hunk(hunk, config);
        let mut side = |line_index: usize| PairedSide {
            line: RowLine::new(hunk_index, line_index, &hunk.lines[line_index]),
            segments: segments[line_index].take(),
        };

        let lines = &hunk.lines;
        let mut idx = 0;
        while idx < lines.len() {
            if let Some(ref range) = hidden {
                if range.start == idx {
                    rows.push(SplitRow::Folded {
                        hunk_index,
                        folded_line_count: range.len(),
                    });
                    idx = range.end;
                    continue;
                }
            }

            let mut pending = Vec::new();
            match lines[idx].kind {
                LineKind::Header => {
                    idx += 1;
                    continue;
                }
                LineKind::Context => {
                    let both = side(idx);
                    pending.push((Some(both.clone()), Some(both)));
                    idx += 1;
                }
                LineKind::Deletion | LineKind::Addition => {
                    let del_start = idx;
                    while idx < lines.len() && lines[idx].kind == LineKind::Deletion {
                        idx += 1;
                    }
                    let add_start = idx;
                    while idx < lines.len() && lines[idx].kind == LineKind::Addition {
                        idx += 1;
                    }
                    let dels = add_start - del_start;
                    let adds = idx - add_start;
                    for offset in 0..dels.max(adds) {
                        let left = (offset < dels).then(|| side(del_start + offset));
                        let right = (offset < adds).then(|| side(add_start + offset));
                        pending.push((left, right));
                    }
                }
            }

            for (left, right) in pending {
                let lines_in_row: Vec<RowLine> = left
                    .iter()
                    .chain(right.iter())
                    .map(|s| s.line)
                    .collect();
                rows.push(SplitRow::Paired { left, right });
                rows.extend(
                    attacher
                        .take_for(&lines_in_row)
                        .into_iter()
                        .map(|thread_index| SplitRow::Comment { thread_index }),
                );
            }
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

/// Threads missing from a built side-by-side row sequence.
pub fn orphaned_split_threads(rows: &[SplitRow], thread_count: usize) -> Vec<usize> {
    unattached_threads(
        thread_count,
        rows.iter().filter_map(|row| match row {
            SplitRow::Comment { thread_index } => Some(*thread_index),
            _ => None,
        }),
    )
}
