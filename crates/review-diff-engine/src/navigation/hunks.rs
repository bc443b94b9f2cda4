//! Hunk-to-hunk jumps and go-to-line.

use super::DiffRow;
use crate::model::DiffSide;
use std::collections::HashSet;

/// First change row of every hunk that has one, as `(row, hunk)` pairs in
/// row order.
fn hunk_starts<R: DiffRow>(rows: &[R], assignments: &[Option<usize>]) -> Vec<(usize, usize)> {
    let mut seen = HashSet::new();
    rows.iter()
        .zip(assignments)
        .enumerate()
        .filter_map(|(idx, (row, hunk))| match hunk {
            Some(hunk) if row.is_change() && seen.insert(*hunk) => Some((idx, *hunk)),
            _ => None,
        })
        .collect()
}

/// Row index of the next hunk's first change after `current`.
///
/// Never lands inside the hunk containing `current` when more than one hunk
/// has changes; wraps to the first such hunk at the end. With a single
/// changed hunk its start is always returned.
pub fn find_next_hunk_start<R: DiffRow>(rows: &[R], current: usize) -> Option<usize> {
    let assignments = R::hunk_assignments(rows);
    let starts = hunk_starts(rows, &assignments);
    match starts.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        _ => {
            let current_hunk = assignments.get(current).copied().flatten();
            starts
                .iter()
                .find(|(idx, hunk)| *idx > current && Some(*hunk) != current_hunk)
                .or_else(|| starts.iter().find(|(_, hunk)| Some(*hunk) != current_hunk))
                .map(|(idx, _)| *idx)
        }
    }
}

/// Row index of the previous hunk's first change before `current`,
/// wrapping to the last one. Mirrors [`find_next_hunk_start`].
pub fn find_prev_hunk_start<R: DiffRow>(rows: &[R], current: usize) -> Option<usize> {
    let assignments = R::hunk_assignments(rows);
    let starts = hunk_starts(rows, &assignments);
    match starts.as_slice() {
        [] => None,
        [(only, _)] => Some(*only),
        _ => {
            let current_hunk = assignments.get(current).copied().flatten();
            starts
                .iter()
                .rev()
                .find(|(idx, hunk)| *idx < current && Some(*hunk) != current_hunk)
                .or_else(|| {
                    starts
                        .iter()
                        .rev()
                        .find(|(_, hunk)| Some(*hunk) != current_hunk)
                })
                .map(|(idx, _)| *idx)
        }
    }
}

/// First row showing `line_number` on either side.
pub fn find_row_by_line_number<R: DiffRow>(rows: &[R], line_number: u32) -> Option<usize> {
    rows.iter().position(|row| {
        let (old, new) = row.line_numbers();
        old == Some(line_number) || new == Some(line_number)
    })
}

/// First row showing `line_number` on the given side.
pub fn find_row_by_side_line<R: DiffRow>(
    rows: &[R],
    side: DiffSide,
    line_number: u32,
) -> Option<usize> {
    rows.iter().position(|row| {
        let (old, new) = row.line_numbers();
        match side {
            DiffSide::Left => old == Some(line_number),
            DiffSide::Right => new == Some(line_number),
        }
    })
}
