//! Trait for fetching the data a file review is built from.

use crate::model::{BlameMap, CommentThread, FileDiff, FileReview, Hunk};
use async_trait::async_trait;
use thiserror::Error;

/// Errors a review source can report.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The pull request or file does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A network error occurred.
    #[error("Network error: {0}")]
    Network(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// The source cannot provide this kind of data.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The source returned data that could not be read.
    #[error("Malformed data: {0}")]
    Malformed(String),
}

/// Supplies already-parsed hunks, review threads and blame for a file.
///
/// The engine never calls this itself: the host resolves the futures and
/// hands the results to [`crate::DiffViewState`].
///
/// # Example
///
/// ```ignore
/// struct ApiSource {
///     client: ApiClient,
/// }
///
/// #[async_trait]
/// impl ReviewSource for ApiSource {
///     async fn get_hunks(
///         &self,
///         owner: &str,
///         repo: &str,
///         pr_number: u64,
///         path: &str,
///     ) -> Result<Vec<Hunk>, SourceError> {
///         self.client
///             .pull_request_file(owner, repo, pr_number, path)
///             .await
///             .map(|file| file.hunks)
///             .map_err(|e| SourceError::Network(e.to_string()))
///     }
///
///     // ...
/// }
/// ```
#[async_trait]
pub trait ReviewSource: Send + Sync {
    /// Hunks of `path` in the pull request, in file order.
    async fn get_hunks(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        path: &str,
    ) -> Result<Vec<Hunk>, SourceError>;

    /// Review threads on `path`.
    async fn get_review_threads(
        &self,
        owner: &str,
        repo: &str,
        pr_number: u64,
        path: &str,
    ) -> Result<Vec<CommentThread>, SourceError>;

    /// Blame of `path` at `git_ref`, `None` when the source has no blame.
    async fn get_blame(
        &self,
        _owner: &str,
        _repo: &str,
        _path: &str,
        _git_ref: &str,
    ) -> Result<Option<BlameMap>, SourceError> {
        Ok(None)
    }
}

/// Where a review lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewTarget {
    /// Repository owner.
    pub owner: String,
    /// Repository name.
    pub repo: String,
    /// Pull request number.
    pub pr_number: u64,
    /// Git ref used for blame.
    pub git_ref: String,
}

/// Fetch everything needed to review `path`.
///
/// Hunk and thread failures are returned; a blame failure only drops the
/// blame, since the diff is usable without it.
pub async fn load_file_review<S: ReviewSource + ?Sized>(
    source: &S,
    target: &ReviewTarget,
    path: &str,
) -> Result<FileReview, SourceError> {
    let hunks = source
        .get_hunks(&target.owner, &target.repo, target.pr_number, path)
        .await?;
    let threads = source
        .get_review_threads(&target.owner, &target.repo, target.pr_number, path)
        .await?;
    let blame = match source
        .get_blame(&target.owner, &target.repo, path, &target.git_ref)
        .await
    {
        Ok(blame) => blame,
        Err(e) => {
            log::warn!("Blame for {} unavailable: {}", path, e);
            None
        }
    };

    log::debug!(
        "Loaded {}: {} hunk(s), {} thread(s), blame: {}",
        path,
        hunks.len(),
        threads.len(),
        blame.is_some()
    );

    let mut review = FileReview::new(FileDiff::with_hunks(path, hunks)).with_threads(threads);
    review.blame = blame;
    Ok(review)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{blame_map, BlameInfo, CommentAnchor, DiffLine};

    struct StaticSource {
        blame: Result<Option<BlameMap>, u64>,
    }

    #[async_trait]
    impl ReviewSource for StaticSource {
        async fn get_hunks(
            &self,
            _owner: &str,
            _repo: &str,
            pr_number: u64,
            path: &str,
        ) -> Result<Vec<Hunk>, SourceError> {
            if pr_number == 0 {
                return Err(SourceError::NotFound(path.to_string()));
            }
            Ok(vec![Hunk::new(1, 1, 1, 1).push(DiffLine::addition("x", 1))])
        }

        async fn get_review_threads(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
            _path: &str,
        ) -> Result<Vec<CommentThread>, SourceError> {
            Ok(vec![CommentThread::new("t1", CommentAnchor::right(1))])
        }

        async fn get_blame(
            &self,
            _owner: &str,
            _repo: &str,
            _path: &str,
            _git_ref: &str,
        ) -> Result<Option<BlameMap>, SourceError> {
            self.blame.clone().map_err(SourceError::RateLimited)
        }
    }

    struct NoBlameSource;

    #[async_trait]
    impl ReviewSource for NoBlameSource {
        async fn get_hunks(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
            _path: &str,
        ) -> Result<Vec<Hunk>, SourceError> {
            Ok(Vec::new())
        }

        async fn get_review_threads(
            &self,
            _owner: &str,
            _repo: &str,
            _pr_number: u64,
            _path: &str,
        ) -> Result<Vec<CommentThread>, SourceError> {
            Ok(Vec::new())
        }
    }

    fn target(pr_number: u64) -> ReviewTarget {
        ReviewTarget {
            owner: "octo".to_string(),
            repo: "demo".to_string(),
            pr_number,
            git_ref: "main".to_string(),
        }
    }

    fn blame() -> BlameMap {
        blame_map([BlameInfo {
            line: 1,
            author: "ana".to_string(),
            date: "2024-01-01".to_string(),
            commit_sha: "abc".to_string(),
            commit_message: String::new(),
        }])
    }

    #[tokio::test]
    async fn test_load_file_review() {
        let source = StaticSource {
            blame: Ok(Some(blame())),
        };
        let review = load_file_review(&source, &target(7), "src/lib.rs")
            .await
            .unwrap();
        assert_eq!(review.diff.path, "src/lib.rs");
        assert_eq!(review.diff.hunks.len(), 1);
        assert_eq!(review.diff.additions, 1);
        assert_eq!(review.threads.len(), 1);
        assert!(review.blame.is_some());
    }

    #[tokio::test]
    async fn test_blame_failure_is_not_fatal() {
        let source = StaticSource { blame: Err(30) };
        let review = load_file_review(&source, &target(7), "a.rs").await.unwrap();
        assert!(review.blame.is_none());
    }

    #[tokio::test]
    async fn test_hunk_failure_is_returned() {
        let source = StaticSource { blame: Ok(None) };
        let err = load_file_review(&source, &target(0), "a.rs")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::NotFound(ref p) if p == "a.rs"));
        assert_eq!(err.to_string(), "Not found: a.rs");
    }

    #[tokio::test]
    async fn test_default_blame_is_absent() {
        let blame = NoBlameSource
            .get_blame("o", "r", "a.rs", "main")
            .await
            .unwrap();
        assert!(blame.is_none());
    }
}
