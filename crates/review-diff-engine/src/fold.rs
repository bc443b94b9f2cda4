//! Collapsing long unchanged spans inside hunks.

use crate::config::EngineConfig;
use crate::model::{Hunk, LineKind};
use std::collections::BTreeMap;
use std::ops::Range;

/// Longest contiguous run of context lines in a hunk (first one on ties).
fn longest_context_run(hunk: &Hunk) -> Option<Range<usize>> {
    let mut best: Option<Range<usize>> = None;
    let mut run_start = None;

    for (idx, line) in hunk.lines.iter().enumerate() {
        if line.kind == LineKind::Context {
            run_start.get_or_insert(idx);
            continue;
        }
        if let Some(start) = run_start.take() {
            if best.as_ref().map_or(true, |b| idx - start > b.len()) {
                best = Some(start..idx);
            }
        }
    }
    if let Some(start) = run_start {
        let end = hunk.lines.len();
        if best.as_ref().map_or(true, |b| end - start > b.len()) {
            best = Some(start..end);
        }
    }

    best
}

/// Line indices of `hunk` hidden when it is folded.
///
/// The longest context run is folded when it is longer than
/// `fold_threshold`; `context_margin` lines stay visible at each end.
/// Returns `None` when there is nothing to hide.
pub fn fold_range(hunk: &Hunk, config: &EngineConfig) -> Option<Range<usize>> {
    let run = longest_context_run(hunk)?;
    let margin = config.context_margin;
    if run.len() <= config.fold_threshold || run.len() <= 2 * margin {
        return None;
    }
    Some(run.start + margin..run.end - margin)
}

/// Whether `hunk` has a run long enough to fold.
pub fn is_foldable(hunk: &Hunk, config: &EngineConfig) -> bool {
    fold_range(hunk, config).is_some()
}

/// Per-hunk fold flags for one open file.
///
/// Flags default to folded for every hunk that has a foldable run. A flag
/// set on a hunk without one has no visible effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FoldState {
    folded: BTreeMap<usize, bool>,
}

impl FoldState {
    /// Default fold flags for `hunks`.
    pub fn for_hunks(hunks: &[Hunk], config: &EngineConfig) -> Self {
        let folded = hunks
            .iter()
            .enumerate()
            .map(|(idx, hunk)| (idx, is_foldable(hunk, config)))
            .collect();
        Self { folded }
    }

    /// Whether the hunk's flag is set.
    pub fn is_folded(&self, hunk_index: usize) -> bool {
        self.folded.get(&hunk_index).copied().unwrap_or(false)
    }

    /// Hidden line range of a hunk under this state.
    pub fn hidden_range(
        &self,
        hunk_index: usize,
        hunk: &Hunk,
        config: &EngineConfig,
    ) -> Option<Range<usize>> {
        if self.is_folded(hunk_index) {
            fold_range(hunk, config)
        } else {
            None
        }
    }

    /// Flip the flag of a hunk. Unknown indices are ignored.
    ///
    /// Returns the new flag, or `None` when nothing changed.
    pub fn toggle(&mut self, hunk_index: usize) -> Option<bool> {
        let flag = self.folded.get_mut(&hunk_index)?;
        *flag = !*flag;
        log::debug!("Fold toggled for hunk {}: {}", hunk_index, flag);
        Some(*flag)
    }

    /// Copy of this state with one hunk toggled.
    pub fn toggled(&self, hunk_index: usize) -> Self {
        let mut next = self.clone();
        next.toggle(hunk_index);
        next
    }

    /// Set every known hunk to `folded`.
    pub fn set_all(&mut self, folded: bool) {
        for flag in self.folded.values_mut() {
            *flag = folded;
        }
    }

    /// Number of hunks tracked.
    pub fn len(&self) -> usize {
        self.folded.len()
    }

    /// Whether no hunk is tracked.
    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }
}
