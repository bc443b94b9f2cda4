//! Everything the data source delivers for one open file.

use super::{BlameMap, CommentThread, FileDiff};
use serde::{Deserialize, Serialize};

/// Diff, review threads and optional blame for one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReview {
    /// The file's hunks.
    pub diff: FileDiff,
    /// Review threads anchored in this file.
    #[serde(default)]
    pub threads: Vec<CommentThread>,
    /// Blame keyed by line number (absent when the provider has none).
    #[serde(default)]
    pub blame: Option<BlameMap>,
}

impl FileReview {
    /// Review without threads or blame.
    pub fn new(diff: FileDiff) -> Self {
        Self {
            diff,
            threads: Vec::new(),
            blame: None,
        }
    }

    /// Attach review threads (builder style).
    pub fn with_threads(mut self, threads: Vec<CommentThread>) -> Self {
        self.threads = threads;
        self
    }

    /// Attach blame (builder style).
    pub fn with_blame(mut self, blame: BlameMap) -> Self {
        self.blame = Some(blame);
        self
    }
}
