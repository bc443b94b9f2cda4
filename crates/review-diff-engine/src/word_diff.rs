//! Word-level diff of paired deletion/addition lines.
//!
//! All column math in this module counts `char`s of tab-expanded text, so a
//! character index is always a column index.

use crate::config::EngineConfig;
use crate::model::{Hunk, LineKind};
use std::borrow::Cow;
use std::ops::Range;

/// Whether a segment differs from the paired line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind {
    /// Present in both lines.
    Unchanged,
    /// Only present in this line.
    Changed,
}

/// A labeled substring of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDiffSegment {
    /// Segment kind.
    pub kind: SegmentKind,
    /// Segment text.
    pub text: String,
}

impl WordDiffSegment {
    /// Unchanged segment.
    pub fn unchanged(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Unchanged,
            text: text.into(),
        }
    }

    /// Changed segment.
    pub fn changed(text: impl Into<String>) -> Self {
        Self {
            kind: SegmentKind::Changed,
            text: text.into(),
        }
    }
}

/// Expand tabs to spaces using fixed tab stops.
pub fn expand_tabs(text: &str, tab_width: usize) -> Cow<'_, str> {
    if !text.contains('\t') {
        return Cow::Borrowed(text);
    }
    let tab_width = tab_width.max(1);
    let mut out = String::with_capacity(text.len() + tab_width);
    let mut col = 0;
    for ch in text.chars() {
        if ch == '\t' {
            let pad = tab_width - col % tab_width;
            out.extend(std::iter::repeat(' ').take(pad));
            col += pad;
        } else {
            out.push(ch);
            col += 1;
        }
    }
    Cow::Owned(out)
}

#[derive(PartialEq, Eq, Clone, Copy)]
enum TokenClass {
    Word,
    Space,
    Punct,
}

fn classify(ch: char) -> TokenClass {
    if ch.is_alphanumeric() || ch == '_' {
        TokenClass::Word
    } else if ch.is_whitespace() {
        TokenClass::Space
    } else {
        TokenClass::Punct
    }
}

/// Split a line into word, whitespace and punctuation tokens.
///
/// Words and whitespace are kept as runs, every punctuation character is
/// its own token. Concatenating the tokens yields the input.
pub fn tokenize(text: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenClass> = None;

    for (i, ch) in text.char_indices() {
        let class = classify(ch);
        match current {
            Some(c) if c == class && class != TokenClass::Punct => {}
            Some(_) => {
                tokens.push(&text[start..i]);
                start = i;
            }
            None => {}
        }
        current = Some(class);
    }
    if start < text.len() {
        tokens.push(&text[start..]);
    }

    tokens
}

/// Flags marking which tokens of `a` are not part of the LCS with `b`.
fn lcs_changed_flags(a: &[&str], b: &[&str]) -> (Vec<bool>, Vec<bool>) {
    let (m, n) = (a.len(), b.len());
    let mut table = vec![vec![0u32; n + 1]; m + 1];
    for i in 1..=m {
        for j in 1..=n {
            table[i][j] = if a[i - 1] == b[j - 1] {
                table[i - 1][j - 1] + 1
            } else {
                table[i - 1][j].max(table[i][j - 1])
            };
        }
    }

    let mut changed_a = vec![true; m];
    let mut changed_b = vec![true; n];
    let (mut i, mut j) = (m, n);
    while i > 0 && j > 0 {
        if a[i - 1] == b[j - 1] {
            changed_a[i - 1] = false;
            changed_b[j - 1] = false;
            i -= 1;
            j -= 1;
        } else if table[i - 1][j] >= table[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }

    (changed_a, changed_b)
}

/// Merge tokens into segments, joining neighbours of the same kind.
fn build_segments(tokens: &[&str], changed: &[bool]) -> Vec<WordDiffSegment> {
    let mut segments: Vec<WordDiffSegment> = Vec::new();
    for (token, &is_changed) in tokens.iter().zip(changed) {
        let kind = if is_changed {
            SegmentKind::Changed
        } else {
            SegmentKind::Unchanged
        };
        match segments.last_mut() {
            Some(last) if last.kind == kind => last.text.push_str(token),
            _ => segments.push(WordDiffSegment {
                kind,
                text: (*token).to_string(),
            }),
        }
    }
    segments
}

/// Compute segments for a deleted line and its paired added line.
///
/// Lines with more than `max_tokens` tokens are reported as one changed
/// segment each.
pub fn diff_words(
    old: &str,
    new: &str,
    max_tokens: usize,
) -> (Vec<WordDiffSegment>, Vec<WordDiffSegment>) {
    let old_tokens = tokenize(old);
    let new_tokens = tokenize(new);

    if old_tokens.len() > max_tokens || new_tokens.len() > max_tokens {
        let whole = |text: &str| {
            if text.is_empty() {
                Vec::new()
            } else {
                vec![WordDiffSegment::changed(text)]
            }
        };
        return (whole(old), whole(new));
    }

    let (old_changed, new_changed) = lcs_changed_flags(&old_tokens, &new_tokens);
    (
        build_segments(&old_tokens, &old_changed),
        build_segments(&new_tokens, &new_changed),
    )
}

/// A run of deletions directly followed by a run of additions.
///
/// Either run may be empty (pure deletion or pure addition).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeBlock {
    /// Line indices of the deletions.
    pub deletions: Range<usize>,
    /// Line indices of the additions.
    pub additions: Range<usize>,
}

impl ChangeBlock {
    /// Number of positionally paired lines.
    pub fn paired_len(&self) -> usize {
        self.deletions.len().min(self.additions.len())
    }
}

/// Find the change blocks of a hunk in line order.
pub fn change_blocks(hunk: &Hunk) -> Vec<ChangeBlock> {
    let lines = &hunk.lines;
    let mut blocks = Vec::new();
    let mut idx = 0;

    while idx < lines.len() {
        if !lines[idx].kind.is_change() {
            idx += 1;
            continue;
        }
        let del_start = idx;
        while idx < lines.len() && lines[idx].kind == LineKind::Deletion {
            idx += 1;
        }
        let add_start = idx;
        while idx < lines.len() && lines[idx].kind == LineKind::Addition {
            idx += 1;
        }
        blocks.push(ChangeBlock {
            deletions: del_start..add_start,
            additions: add_start..idx,
        });
    }

    blocks
}

/// Whether a block is an edit rather than a wholesale rewrite.
pub fn is_comparable(deletions: usize, additions: usize, ratio: f64) -> bool {
    let shorter = deletions.min(additions);
    let longer = deletions.max(additions);
    shorter > 0 && (longer as f64) <= ratio * shorter as f64
}

/// Word-diff segments for every line of a hunk, indexed by line index.
///
/// Only lines paired inside a comparable change block get segments; the
/// segments reconstruct the tab-expanded line text.
pub fn word_diff_for_hunk(hunk: &Hunk, config: &EngineConfig) -> Vec<Option<Vec<WordDiffSegment>>> {
    let mut result = vec![None; hunk.lines.len()];

    for block in change_blocks(hunk) {
        if !is_comparable(
            block.deletions.len(),
            block.additions.len(),
            config.word_diff_ratio,
        ) {
            continue;
        }
        for offset in 0..block.paired_len() {
            let del_idx = block.deletions.start + offset;
            let add_idx = block.additions.start + offset;
            let old = expand_tabs(&hunk.lines[del_idx].content, config.tab_width);
            let new = expand_tabs(&hunk.lines[add_idx].content, config.tab_width);
            let (old_segments, new_segments) =
                diff_words(&old, &new, config.max_word_diff_tokens);
            result[del_idx] = Some(old_segments);
            result[add_idx] = Some(new_segments);
        }
    }

    result
}

/// Byte offset of the `n`th char of `text` (or its length).
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices()
        .nth(n)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}

/// Slice `text` to the columns `offset..offset + width`.
pub fn slice_columns(text: &str, offset: usize, width: usize) -> &str {
    let start = byte_offset(text, offset);
    let rest = &text[start..];
    &rest[..byte_offset(rest, width)]
}

/// Slice segments for horizontal scrolling.
///
/// The concatenated text of the result equals the columns
/// `offset..offset + width` of the concatenated input. Segments cut at the
/// edges keep their kind; empty pieces are dropped.
pub fn slice_word_diff_segments(
    segments: &[WordDiffSegment],
    offset: usize,
    width: usize,
) -> Vec<WordDiffSegment> {
    let end = offset.saturating_add(width);
    let mut result = Vec::new();
    let mut col = 0;

    for segment in segments {
        if col >= end {
            break;
        }
        let len = segment.text.chars().count();
        let seg_end = col + len;
        if seg_end > offset {
            let from = offset.saturating_sub(col);
            let to = end.min(seg_end) - col;
            let piece = slice_columns(&segment.text, from, to - from);
            if !piece.is_empty() {
                result.push(WordDiffSegment {
                    kind: segment.kind,
                    text: piece.to_string(),
                });
            }
        }
        col = seg_end;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiffLine;
    use pretty_assertions::assert_eq;

    fn concat(segments: &[WordDiffSegment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_expand_tabs_uses_tab_stops() {
        assert_eq!(expand_tabs("\tx", 4), "    x");
        assert_eq!(expand_tabs("ab\tc", 4), "ab  c");
        assert_eq!(expand_tabs("abcd\te", 4), "abcd    e");
        assert!(matches!(expand_tabs("plain", 4), Cow::Borrowed(_)));
    }

    #[test]
    fn test_tokenize_preserves_text() {
        let line = "let x = foo.bar(1, \"é\");  // ok";
        let tokens = tokenize(line);
        assert_eq!(tokens.concat(), line);
        assert_eq!(&tokens[..5], &["let", " ", "x", " ", "="]);
        assert!(tokens.contains(&"."));
        assert!(tokens.contains(&"  "));
    }

    #[test]
    fn test_tokenize_punctuation_is_split() {
        assert_eq!(tokenize("a::b"), vec!["a", ":", ":", "b"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_diff_words_single_change() {
        let (old, new) = diff_words("let x = 1;", "let x = 2;", 200);
        assert_eq!(
            old,
            vec![
                WordDiffSegment::unchanged("let x = "),
                WordDiffSegment::changed("1"),
                WordDiffSegment::unchanged(";"),
            ]
        );
        assert_eq!(
            new,
            vec![
                WordDiffSegment::unchanged("let x = "),
                WordDiffSegment::changed("2"),
                WordDiffSegment::unchanged(";"),
            ]
        );
    }

    #[test]
    fn test_diff_words_reconstructs_lines() {
        let (old, new) = diff_words("fn a(x: u8) {}", "pub fn b(x: u16, y: u8) {}", 200);
        assert_eq!(concat(&old), "fn a(x: u8) {}");
        assert_eq!(concat(&new), "pub fn b(x: u16, y: u8) {}");
        // Neighbouring segments never share a kind
        for pair in new.windows(2) {
            assert_ne!(pair[0].kind, pair[1].kind);
        }
    }

    #[test]
    fn test_diff_words_token_cap() {
        let (old, new) = diff_words("a b c", "a b d", 2);
        assert_eq!(old, vec![WordDiffSegment::changed("a b c")]);
        assert_eq!(new, vec![WordDiffSegment::changed("a b d")]);
    }

    #[test]
    fn test_change_blocks() {
        let hunk = Hunk::new(1, 4, 1, 4)
            .push(DiffLine::deletion("a", 1))
            .push(DiffLine::deletion("b", 2))
            .push(DiffLine::addition("c", 1))
            .push(DiffLine::context("d", 3, 2))
            .push(DiffLine::addition("e", 3));
        assert_eq!(
            change_blocks(&hunk),
            vec![
                ChangeBlock {
                    deletions: 1..3,
                    additions: 3..4
                },
                ChangeBlock {
                    deletions: 5..5,
                    additions: 5..6
                },
            ]
        );
    }

    #[test]
    fn test_is_comparable() {
        assert!(is_comparable(1, 1, 2.0));
        assert!(is_comparable(2, 4, 2.0));
        assert!(!is_comparable(1, 3, 2.0));
        assert!(!is_comparable(0, 3, 2.0));
    }

    #[test]
    fn test_word_diff_for_hunk_skips_rewrites() {
        let config = EngineConfig::default();
        let hunk = Hunk::new(1, 1, 1, 3)
            .push(DiffLine::deletion("old", 1))
            .push(DiffLine::addition("new 1", 1))
            .push(DiffLine::addition("new 2", 2))
            .push(DiffLine::addition("new 3", 3));
        let segments = word_diff_for_hunk(&hunk, &config);
        assert!(segments.iter().all(Option::is_none));
    }

    #[test]
    fn test_word_diff_for_hunk_pairs_positionally() {
        let config = EngineConfig::default();
        let hunk = Hunk::new(1, 2, 1, 3)
            .push(DiffLine::deletion("\tone", 1))
            .push(DiffLine::deletion("two", 2))
            .push(DiffLine::addition("\tone!", 1))
            .push(DiffLine::addition("two?", 2))
            .push(DiffLine::addition("three", 3));
        let segments = word_diff_for_hunk(&hunk, &config);
        assert!(segments[0].is_none());
        assert_eq!(concat(segments[1].as_ref().unwrap()), "    one");
        assert_eq!(concat(segments[3].as_ref().unwrap()), "    one!");
        assert!(segments[4].is_some());
        // Third addition has no partner
        assert!(segments[5].is_none());
    }

    #[test]
    fn test_slice_round_trip() {
        let segments = vec![
            WordDiffSegment::unchanged("héllo "),
            WordDiffSegment::changed("wörld"),
            WordDiffSegment::unchanged("!"),
        ];
        let text = concat(&segments);
        let chars: Vec<char> = text.chars().collect();
        for offset in 0..=chars.len() + 2 {
            for width in 0..=chars.len() + 2 {
                let expected: String = chars.iter().skip(offset).take(width).collect();
                let sliced = slice_word_diff_segments(&segments, offset, width);
                assert_eq!(concat(&sliced), expected, "offset {offset} width {width}");
                assert!(sliced.iter().all(|s| !s.text.is_empty()));
            }
        }
    }

    #[test]
    fn test_slice_keeps_kinds_at_boundary() {
        let segments = vec![
            WordDiffSegment::unchanged("abc"),
            WordDiffSegment::changed("def"),
        ];
        assert_eq!(
            slice_word_diff_segments(&segments, 2, 2),
            vec![
                WordDiffSegment::unchanged("c"),
                WordDiffSegment::changed("d"),
            ]
        );
    }

    #[test]
    fn test_slice_columns() {
        assert_eq!(slice_columns("añb", 1, 1), "ñ");
        assert_eq!(slice_columns("abc", 5, 3), "");
        assert_eq!(slice_columns("abc", 0, 10), "abc");
    }
}
