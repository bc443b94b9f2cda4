//! Memoized row building keyed on every input that can change the rows.

use super::{build_side_by_side_rows, build_unified_rows, SplitRow, UnifiedRow};
use crate::config::{DiffLayout, EngineConfig};
use crate::fold::FoldState;
use crate::model::{CommentThread, Hunk};

/// Rows in either layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rows {
    /// Single-column rows.
    Unified(Vec<UnifiedRow>),
    /// Two-column rows.
    SideBySide(Vec<SplitRow>),
}

impl Rows {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Rows::Unified(rows) => rows.len(),
            Rows::SideBySide(rows) => rows.len(),
        }
    }

    /// Whether there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The layout these rows were built for.
    pub fn layout(&self) -> DiffLayout {
        match self {
            Rows::Unified(_) => DiffLayout::Unified,
            Rows::SideBySide(_) => DiffLayout::SideBySide,
        }
    }
}

/// Everything the rows depend on.
///
/// `diff_revision` identifies the hunks and threads: the owner bumps it
/// whenever it receives new data for the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowCacheKey {
    /// Revision of hunks and threads.
    pub diff_revision: u64,
    /// Fold flags.
    pub fold_state: FoldState,
    /// Row layout.
    pub layout: DiffLayout,
    /// Engine policy affecting rows.
    config: [u64; 5],
}

impl RowCacheKey {
    /// Key for the given inputs.
    pub fn new(
        diff_revision: u64,
        fold_state: &FoldState,
        layout: DiffLayout,
        config: &EngineConfig,
    ) -> Self {
        Self {
            diff_revision,
            fold_state: fold_state.clone(),
            layout,
            config: config.fingerprint(),
        }
    }
}

impl Default for Rows {
    fn default() -> Self {
        Rows::Unified(Vec::new())
    }
}

/// Holds the last built rows and their key.
#[derive(Debug, Clone, Default)]
pub struct RowCache {
    key: Option<RowCacheKey>,
    rows: Rows,
    builds: usize,
}

impl RowCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows for `key`, rebuilt only when the key differs from the last one.
    pub fn get_or_build(
        &mut self,
        key: RowCacheKey,
        hunks: &[Hunk],
        threads: &[CommentThread],
        config: &EngineConfig,
    ) -> &Rows {
        if self.key.as_ref() != Some(&key) {
            let rows = match key.layout {
                DiffLayout::Unified => {
                    Rows::Unified(build_unified_rows(hunks, threads, &key.fold_state, config))
                }
                DiffLayout::SideBySide => Rows::SideBySide(build_side_by_side_rows(
                    hunks,
                    threads,
                    &key.fold_state,
                    config,
                )),
            };
            self.builds += 1;
            log::debug!(
                "Rebuilt {} {:?} rows (revision {})",
                rows.len(),
                key.layout,
                key.diff_revision
            );
            self.rows = rows;
            self.key = Some(key);
        }
        &self.rows
    }

    /// Rows from the last build, if any.
    pub fn current(&self) -> Option<&Rows> {
        self.key.as_ref().map(|_| &self.rows)
    }

    /// Drop the cached rows.
    pub fn invalidate(&mut self) {
        self.key = None;
        self.rows = Rows::default();
    }

    /// How many times rows were built.
    pub fn build_count(&self) -> usize {
        self.builds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiffLine;

    fn hunks() -> Vec<Hunk> {
        let mut hunk = Hunk::new(1, 12, 1, 13).push(DiffLine::addition("x", 1));
        for i in 0..12 {
            hunk = hunk.push(DiffLine::context("c", i + 1, i + 2));
        }
        vec![hunk]
    }

    #[test]
    fn test_cache_hit_and_miss() {
        let config = EngineConfig::default();
        let hunks = hunks();
        let fold = FoldState::for_hunks(&hunks, &config);
        let mut cache = RowCache::new();

        let key = RowCacheKey::new(1, &fold, DiffLayout::Unified, &config);
        let len = cache.get_or_build(key.clone(), &hunks, &[], &config).len();
        cache.get_or_build(key, &hunks, &[], &config);
        assert_eq!(cache.build_count(), 1);

        // Fold toggle changes the key
        let unfolded = fold.toggled(0);
        let key = RowCacheKey::new(1, &unfolded, DiffLayout::Unified, &config);
        let unfolded_len = cache.get_or_build(key, &hunks, &[], &config).len();
        assert_eq!(cache.build_count(), 2);
        assert_eq!(unfolded_len, len + 5);
    }

    #[test]
    fn test_layout_and_revision_change_key() {
        let config = EngineConfig::default();
        let hunks = hunks();
        let fold = FoldState::for_hunks(&hunks, &config);
        let mut cache = RowCache::new();

        let rows = cache.get_or_build(
            RowCacheKey::new(1, &fold, DiffLayout::SideBySide, &config),
            &hunks,
            &[],
            &config,
        );
        assert_eq!(rows.layout(), DiffLayout::SideBySide);
        cache.get_or_build(
            RowCacheKey::new(2, &fold, DiffLayout::SideBySide, &config),
            &hunks,
            &[],
            &config,
        );
        assert_eq!(cache.build_count(), 2);

        cache.invalidate();
        assert!(cache.current().is_none());
    }
}
