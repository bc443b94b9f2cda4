//! Case-insensitive search over visible row text.

use super::DiffRow;
use crate::model::{CommentThread, Hunk};
use crate::word_diff::expand_tabs;
use std::ops::Range;

/// Rows matching a query, in row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchMatches {
    /// The query as typed.
    pub query: String,
    /// Matching row indices, ascending.
    pub rows: Vec<usize>,
}

impl SearchMatches {
    /// Number of matching rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether nothing matched.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First match after `current`, wrapping to the first match.
    pub fn next_after(&self, current: usize) -> Option<usize> {
        self.rows
            .iter()
            .copied()
            .find(|&row| row > current)
            .or_else(|| self.rows.first().copied())
    }

    /// Last match before `current`, wrapping to the last match.
    pub fn prev_before(&self, current: usize) -> Option<usize> {
        self.rows
            .iter()
            .rev()
            .copied()
            .find(|&row| row < current)
            .or_else(|| self.rows.last().copied())
    }

    /// 1-based position of `row` among the matches.
    pub fn position_of(&self, row: usize) -> Option<usize> {
        self.rows.binary_search(&row).ok().map(|idx| idx + 1)
    }
}

fn fold_case(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Character ranges of non-overlapping case-insensitive matches of `query`
/// in `text`.
///
/// Ranges count chars, so on tab-expanded text they are display columns.
pub fn match_columns(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = query.chars().map(fold_case).collect();
    if needle.is_empty() {
        return Vec::new();
    }
    let haystack: Vec<char> = text.chars().map(fold_case).collect();

    let mut matches = Vec::new();
    let mut start = 0;
    while start + needle.len() <= haystack.len() {
        if haystack[start..start + needle.len()] == needle[..] {
            matches.push(start..start + needle.len());
            start += needle.len();
        } else {
            start += 1;
        }
    }
    matches
}

/// Indices of the rows whose visible text contains `query`.
///
/// Only built rows are searched: lines inside a fold do not match until the
/// hunk is unfolded. Line text is tab-expanded first so that matches line up
/// with what is drawn.
pub fn search_rows<R: DiffRow>(
    rows: &[R],
    hunks: &[Hunk],
    threads: &[CommentThread],
    query: &str,
    tab_width: usize,
) -> SearchMatches {
    let rows = if query.is_empty() {
        Vec::new()
    } else {
        rows.iter()
            .enumerate()
            .filter(|(_, row)| {
                row.texts(hunks, threads)
                    .into_iter()
                    .any(|text| !match_columns(&expand_tabs(text, tab_width), query).is_empty())
            })
            .map(|(idx, _)| idx)
            .collect()
    };
    log::debug!("Search {:?} matched {} row(s)", query, rows.len());
    SearchMatches {
        query: query.to_string(),
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::fold::FoldState;
    use crate::model::{CommentAnchor, DiffLine, ReviewComment};
    use crate::rows::{build_side_by_side_rows, build_unified_rows};
    use pretty_assertions::assert_eq;

    fn hunks() -> Vec<Hunk> {
        vec![Hunk::new(1, 3, 1, 3)
            .push(DiffLine::context("fn Parse() {", 1, 1))
            .push(DiffLine::deletion("\tlet x = parse_old();", 2))
            .push(DiffLine::addition("\tlet x = parse_new();", 2))
            .push(DiffLine::context("}", 3, 3))]
    }

    #[test]
    fn test_match_columns_case_insensitive() {
        assert_eq!(match_columns("Foo foo FOO", "foo"), vec![0..3, 4..7, 8..11]);
        assert_eq!(match_columns("aaaa", "aa"), vec![0..2, 2..4]);
        assert_eq!(match_columns("abc", ""), Vec::<Range<usize>>::new());
        assert_eq!(match_columns("ab", "abc"), Vec::<Range<usize>>::new());
    }

    #[test]
    fn test_match_columns_counts_chars() {
        assert_eq!(match_columns("héllo wörld", "WÖR"), vec![6..9]);
    }

    #[test]
    fn test_search_unified_rows() {
        let hunks = hunks();
        let threads = vec![CommentThread::new("t", CommentAnchor::right(3))
            .with_comment(ReviewComment::new("ana", "Should PARSE errors"))];
        let config = EngineConfig::default();
        let rows = build_unified_rows(
            &hunks,
            &threads,
            &FoldState::for_hunks(&hunks, &config),
            &config,
        );
        let matches = search_rows(&rows, &hunks, &threads, "parse", 4);
        // header row never matches; comment row after `}` does
        assert_eq!(matches.rows, vec![1, 2, 3, 5]);
        assert_eq!(matches.position_of(3), Some(3));
        assert_eq!(matches.position_of(4), None);
    }

    #[test]
    fn test_search_matches_expanded_tabs() {
        let hunks = hunks();
        let config = EngineConfig::default();
        let rows =
            build_unified_rows(&hunks, &[], &FoldState::for_hunks(&hunks, &config), &config);
        let matches = search_rows(&rows, &hunks, &[], "    let", 4);
        assert_eq!(matches.rows, vec![2, 3]);
    }

    #[test]
    fn test_search_split_rows() {
        let hunks = hunks();
        let config = EngineConfig::default();
        let rows =
            build_side_by_side_rows(&hunks, &[], &FoldState::for_hunks(&hunks, &config), &config);
        // H, ctx, del|add, ctx
        assert_eq!(search_rows(&rows, &hunks, &[], "new", 4).rows, vec![2]);
        assert_eq!(search_rows(&rows, &hunks, &[], "()", 4).rows, vec![1, 2]);
    }

    #[test]
    fn test_folded_lines_are_not_searchable() {
        let mut hunk = Hunk::new(1, 12, 1, 13).push(DiffLine::addition("x", 1));
        for i in 0..12 {
            hunk = hunk.push(DiffLine::context(format!("line {}", i), i + 1, i + 2));
        }
        let hunks = vec![hunk];
        let config = EngineConfig::default();
        let folded = FoldState::for_hunks(&hunks, &config);
        let rows = build_unified_rows(&hunks, &[], &folded, &config);
        assert!(search_rows(&rows, &hunks, &[], "line 5", 4).is_empty());

        let rows = build_unified_rows(&hunks, &[], &folded.toggled(0), &config);
        assert_eq!(search_rows(&rows, &hunks, &[], "line 5", 4).len(), 1);
    }

    #[test]
    fn test_cycle_with_wraparound() {
        let matches = SearchMatches {
            query: "x".to_string(),
            rows: vec![2, 5, 9],
        };
        assert_eq!(matches.next_after(2), Some(5));
        assert_eq!(matches.next_after(9), Some(2));
        assert_eq!(matches.prev_before(5), Some(2));
        assert_eq!(matches.prev_before(2), Some(9));
        assert_eq!(SearchMatches::default().next_after(0), None);
    }

    #[test]
    fn test_empty_query_matches_nothing() {
        let hunks = hunks();
        let config = EngineConfig::default();
        let rows =
            build_unified_rows(&hunks, &[], &FoldState::for_hunks(&hunks, &config), &config);
        assert!(search_rows(&rows, &hunks, &[], "", 4).is_empty());
    }
}
