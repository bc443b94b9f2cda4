//! Hunk jumping, go-to-line and search over built rows.
//!
//! Everything here works on either row layout through [`DiffRow`], and on
//! the rows as built, so lines hidden inside a fold are not reachable until
//! the hunk is unfolded.

mod hunks;
mod search;

pub use hunks::{
    find_next_hunk_start, find_prev_hunk_start, find_row_by_line_number, find_row_by_side_line,
};
pub use search::{match_columns, search_rows, SearchMatches};

use crate::model::{CommentThread, DiffSide, Hunk, LineKind};
use crate::rows::{RowLine, Rows, SplitRow, UnifiedRow};

/// Row behavior shared by the unified and side-by-side layouts.
pub trait DiffRow {
    /// Whether the row shows an added or deleted line.
    fn is_change(&self) -> bool;

    /// Old and new line numbers shown by the row. Header, fold and comment
    /// rows have none.
    fn line_numbers(&self) -> (Option<u32>, Option<u32>);

    /// Searchable text of the row, borrowed from the hunks and threads the
    /// rows were built from.
    fn texts<'a>(&self, hunks: &'a [Hunk], threads: &'a [CommentThread]) -> Vec<&'a str>;

    /// Hunk group of every row, `None` for rows before the first hunk.
    fn hunk_assignments(rows: &[Self]) -> Vec<Option<usize>>
    where
        Self: Sized;
}

fn line_content<'a>(hunks: &'a [Hunk], line: &RowLine) -> Option<&'a str> {
    hunks
        .get(line.hunk_index)
        .and_then(|hunk| hunk.lines.get(line.line_index))
        .map(|l| l.content.as_str())
}

fn thread_texts(threads: &[CommentThread], thread_index: usize) -> Vec<&str> {
    threads
        .get(thread_index)
        .map(|thread| thread.comments.iter().map(|c| c.body.as_str()).collect())
        .unwrap_or_default()
}

impl DiffRow for UnifiedRow {
    fn is_change(&self) -> bool {
        self.row_line().is_some_and(|line| line.kind.is_change())
    }

    fn line_numbers(&self) -> (Option<u32>, Option<u32>) {
        match self.row_line() {
            Some(line) if line.kind != LineKind::Header => (line.old_line, line.new_line),
            _ => (None, None),
        }
    }

    fn texts<'a>(&self, hunks: &'a [Hunk], threads: &'a [CommentThread]) -> Vec<&'a str> {
        match self {
            UnifiedRow::Line { line, .. } if line.kind != LineKind::Header => {
                line_content(hunks, line).into_iter().collect()
            }
            UnifiedRow::Comment { thread_index } => thread_texts(threads, *thread_index),
            _ => Vec::new(),
        }
    }

    fn hunk_assignments(rows: &[Self]) -> Vec<Option<usize>> {
        let mut current = None;
        rows.iter()
            .map(|row| {
                if let Some(hunk) = row.hunk_index() {
                    current = Some(hunk);
                }
                current
            })
            .collect()
    }
}

impl DiffRow for SplitRow {
    fn is_change(&self) -> bool {
        let (left, right) = self.sides();
        left.into_iter()
            .chain(right)
            .any(|side| side.line.kind.is_change())
    }

    fn line_numbers(&self) -> (Option<u32>, Option<u32>) {
        let (left, right) = self.sides();
        (
            left.and_then(|side| side.line.old_line),
            right.and_then(|side| side.line.new_line),
        )
    }

    fn texts<'a>(&self, hunks: &'a [Hunk], threads: &'a [CommentThread]) -> Vec<&'a str> {
        match self {
            SplitRow::Paired { left, right } => {
                let mut texts: Vec<&str> = left
                    .iter()
                    .filter_map(|side| line_content(hunks, &side.line))
                    .collect();
                if let Some(right) = right {
                    // Context rows show the same line on both sides
                    if left.as_ref().map(|l| l.line) != Some(right.line) {
                        texts.extend(line_content(hunks, &right.line));
                    }
                }
                texts
            }
            SplitRow::Comment { thread_index } => thread_texts(threads, *thread_index),
            SplitRow::Header | SplitRow::Folded { .. } => Vec::new(),
        }
    }

    fn hunk_assignments(rows: &[Self]) -> Vec<Option<usize>> {
        let mut headers_seen = 0usize;
        rows.iter()
            .map(|row| {
                if matches!(row, SplitRow::Header) {
                    headers_seen += 1;
                }
                headers_seen.checked_sub(1)
            })
            .collect()
    }
}

impl Rows {
    /// See [`find_next_hunk_start`].
    pub fn next_hunk_start(&self, current: usize) -> Option<usize> {
        match self {
            Rows::Unified(rows) => find_next_hunk_start(rows, current),
            Rows::SideBySide(rows) => find_next_hunk_start(rows, current),
        }
    }

    /// See [`find_prev_hunk_start`].
    pub fn prev_hunk_start(&self, current: usize) -> Option<usize> {
        match self {
            Rows::Unified(rows) => find_prev_hunk_start(rows, current),
            Rows::SideBySide(rows) => find_prev_hunk_start(rows, current),
        }
    }

    /// See [`find_row_by_line_number`].
    pub fn row_by_line_number(&self, line_number: u32) -> Option<usize> {
        match self {
            Rows::Unified(rows) => find_row_by_line_number(rows, line_number),
            Rows::SideBySide(rows) => find_row_by_line_number(rows, line_number),
        }
    }

    /// See [`find_row_by_side_line`].
    pub fn row_by_side_line(&self, side: DiffSide, line_number: u32) -> Option<usize> {
        match self {
            Rows::Unified(rows) => find_row_by_side_line(rows, side, line_number),
            Rows::SideBySide(rows) => find_row_by_side_line(rows, side, line_number),
        }
    }

    /// See [`search_rows`].
    pub fn search(
        &self,
        hunks: &[Hunk],
        threads: &[CommentThread],
        query: &str,
        tab_width: usize,
    ) -> SearchMatches {
        match self {
            Rows::Unified(rows) => search_rows(rows, hunks, threads, query, tab_width),
            Rows::SideBySide(rows) => search_rows(rows, hunks, threads, query, tab_width),
        }
    }

    /// Old and new line numbers shown by `row`.
    pub fn line_numbers(&self, row: usize) -> (Option<u32>, Option<u32>) {
        let numbers = match self {
            Rows::Unified(rows) => rows.get(row).map(DiffRow::line_numbers),
            Rows::SideBySide(rows) => rows.get(row).map(DiffRow::line_numbers),
        };
        numbers.unwrap_or((None, None))
    }

    /// Hunk that `row` belongs to.
    pub fn hunk_at(&self, row: usize) -> Option<usize> {
        let assignments = match self {
            Rows::Unified(rows) => UnifiedRow::hunk_assignments(rows),
            Rows::SideBySide(rows) => SplitRow::hunk_assignments(rows),
        };
        assignments.get(row).copied().flatten()
    }

    /// The fold placeholder of `hunk_index`, if the hunk is folded.
    pub fn fold_row(&self, hunk_index: usize) -> Option<usize> {
        match self {
            Rows::Unified(rows) => rows.iter().position(|row| {
                matches!(row, UnifiedRow::Folded { hunk_index: h, .. } if *h == hunk_index)
            }),
            Rows::SideBySide(rows) => rows.iter().position(|row| {
                matches!(row, SplitRow::Folded { hunk_index: h, .. } if *h == hunk_index)
            }),
        }
    }
}
