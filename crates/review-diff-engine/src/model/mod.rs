//! Data models for diff representation.

mod blame;
mod comment;
mod diff;
mod review;

pub use blame::{blame_map, BlameInfo, BlameMap};
pub use comment::{CommentAnchor, CommentThread, DiffSide, ReviewComment, ThreadIndex};
pub use diff::{DiffLine, FileDiff, Hunk, LineKind};
pub use review::FileReview;
