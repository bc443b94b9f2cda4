//! Per-line authorship records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Blame record for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlameInfo {
    /// Line number the record belongs to.
    pub line: u32,
    /// Commit author.
    pub author: String,
    /// Commit date (RFC 3339 or `YYYY-MM-DD`).
    pub date: String,
    /// Full commit SHA.
    pub commit_sha: String,
    /// First line of the commit message.
    #[serde(default)]
    pub commit_message: String,
}

/// Blame records keyed by line number.
pub type BlameMap = HashMap<u32, BlameInfo>;

/// Build a [`BlameMap`] from a list of records.
pub fn blame_map(records: impl IntoIterator<Item = BlameInfo>) -> BlameMap {
    records.into_iter().map(|b| (b.line, b)).collect()
}
