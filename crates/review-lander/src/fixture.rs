//! Review source backed by a JSON fixture file.
//!
//! The fixture holds already-hunked files with their review threads and
//! blame records:
//!
//! ```json
//! {
//!   "files": [
//!     {
//!       "path": "src/lib.rs",
//!       "hunks": [{ "lines": [{ "kind": "addition", "content": "x", "new_line": 1 }] }],
//!       "threads": [],
//!       "blame": [{ "line": 1, "author": "ana", "date": "2024-05-01", "commit_sha": "abc" }]
//!     }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use review_diff_engine::{
    model::blame_map, BlameInfo, BlameMap, CommentThread, Hunk, ReviewSource, SourceError,
};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
struct FixtureFile {
    path: String,
    #[serde(default)]
    hunks: Vec<Hunk>,
    #[serde(default)]
    threads: Vec<CommentThread>,
    #[serde(default)]
    blame: Option<Vec<BlameInfo>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Fixture {
    #[serde(default)]
    files: Vec<FixtureFile>,
}

/// Serves hunks, threads and blame from a fixture, ignoring owner, repo,
/// pull request number and git ref.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    fixture: Fixture,
}

impl FixtureSource {
    /// Parse fixture JSON.
    pub fn from_json(content: &str) -> Result<Self> {
        let fixture = serde_json::from_str(content).context("Invalid review fixture")?;
        Ok(Self { fixture })
    }

    /// Read and parse a fixture file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Paths of all files in the fixture, in fixture order.
    pub fn paths(&self) -> Vec<&str> {
        self.fixture.files.iter().map(|f| f.path.as_str()).collect()
    }

    fn file(&self, path: &str) -> Result<&FixtureFile, SourceError> {
        self.fixture
            .files
            .iter()
            .find(|f| f.path == path)
            .ok_or_else(|| SourceError::NotFound(path.to_string()))
    }
}

#[async_trait]
impl ReviewSource for FixtureSource {
    async fn get_hunks(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
        path: &str,
    ) -> Result<Vec<Hunk>, SourceError> {
        Ok(self.file(path)?.hunks.clone())
    }

    async fn get_review_threads(
        &self,
        _owner: &str,
        _repo: &str,
        _pr_number: u64,
        path: &str,
    ) -> Result<Vec<CommentThread>, SourceError> {
        Ok(self.file(path)?.threads.clone())
    }

    async fn get_blame(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        _git_ref: &str,
    ) -> Result<Option<BlameMap>, SourceError> {
        Ok(self.file(path)?.blame.clone().map(blame_map))
    }
}
