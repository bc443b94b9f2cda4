//! Review thread data structures and their line anchoring.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which side of the diff a comment is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DiffSide {
    /// Old file (deletions side).
    Left,
    /// New file (additions side).
    Right,
}

/// A `(side, line)` position a thread is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentAnchor {
    /// Which side the line number refers to.
    pub side: DiffSide,
    /// Line number in the respective file version.
    pub line: u32,
}

impl CommentAnchor {
    /// Anchor on the old side.
    pub fn left(line: u32) -> Self {
        Self {
            side: DiffSide::Left,
            line,
        }
    }

    /// Anchor on the new side.
    pub fn right(line: u32) -> Self {
        Self {
            side: DiffSide::Right,
            line,
        }
    }
}

/// One comment inside a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewComment {
    /// Author login.
    pub author: String,
    /// Comment body (markdown).
    pub body: String,
    /// When the comment was created.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ReviewComment {
    /// Create a comment without a timestamp.
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            body: body.into(),
            created_at: None,
        }
    }
}

/// A resolvable group of comments anchored to one file position.
///
/// Threads migrated across diff revisions can carry several anchors; the
/// row builders attach a thread once, below the first row matching any of
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentThread {
    /// Provider thread id.
    pub id: String,
    /// Whether the thread was resolved.
    #[serde(default)]
    pub is_resolved: bool,
    /// Positions of the thread's own comments.
    pub anchors: Vec<CommentAnchor>,
    /// Comments in chronological order.
    #[serde(default)]
    pub comments: Vec<ReviewComment>,
}

impl CommentThread {
    /// Create an unresolved thread with a single anchor.
    pub fn new(id: impl Into<String>, anchor: CommentAnchor) -> Self {
        Self {
            id: id.into(),
            is_resolved: false,
            anchors: vec![anchor],
            comments: Vec::new(),
        }
    }

    /// Add a comment (builder style).
    pub fn with_comment(mut self, comment: ReviewComment) -> Self {
        self.comments.push(comment);
        self
    }

    /// Mark the thread resolved (builder style).
    pub fn resolved(mut self) -> Self {
        self.is_resolved = true;
        self
    }

    /// Text shown for the thread's first comment.
    pub fn summary(&self) -> Option<&ReviewComment> {
        self.comments.first()
    }
}

/// Lookup from anchor to thread indices, in thread input order.
#[derive(Debug, Clone, Default)]
pub struct ThreadIndex {
    by_anchor: HashMap<CommentAnchor, Vec<usize>>,
}

impl ThreadIndex {
    /// Index the anchors of all threads.
    pub fn new(threads: &[CommentThread]) -> Self {
        let mut by_anchor: HashMap<CommentAnchor, Vec<usize>> = HashMap::new();
        for (idx, thread) in threads.iter().enumerate() {
            for anchor in &thread.anchors {
                let entry = by_anchor.entry(*anchor).or_default();
                if !entry.contains(&idx) {
                    entry.push(idx);
                }
            }
        }
        Self { by_anchor }
    }

    /// Threads anchored at `anchor`.
    pub fn get(&self, anchor: CommentAnchor) -> &[usize] {
        self.by_anchor
            .get(&anchor)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Whether no thread is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_anchor.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_index_keeps_input_order() {
        let threads = vec![
            CommentThread::new("a", CommentAnchor::right(5)),
            CommentThread::new("b", CommentAnchor::left(5)),
            CommentThread::new("c", CommentAnchor::right(5)),
        ];
        let index = ThreadIndex::new(&threads);
        assert_eq!(index.get(CommentAnchor::right(5)), &[0, 2]);
        assert_eq!(index.get(CommentAnchor::left(5)), &[1]);
        assert!(index.get(CommentAnchor::left(6)).is_empty());
    }

    #[test]
    fn test_thread_with_duplicate_anchor_indexed_once() {
        let mut thread = CommentThread::new("a", CommentAnchor::right(1));
        thread.anchors.push(CommentAnchor::right(1));
        let index = ThreadIndex::new(&[thread]);
        assert_eq!(index.get(CommentAnchor::right(1)), &[0]);
    }

    #[test]
    fn test_deserialize_thread() {
        let json = r#"{
            "id": "t1",
            "anchors": [{"side": "LEFT", "line": 40}],
            "comments": [{"author": "octo", "body": "why?"}]
        }"#;
        let thread: CommentThread = serde_json::from_str(json).unwrap();
        assert!(!thread.is_resolved);
        assert_eq!(thread.anchors, vec![CommentAnchor::left(40)]);
        assert_eq!(thread.summary().map(|c| c.body.as_str()), Some("why?"));
    }
}
