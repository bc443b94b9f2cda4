//! Diff data structures representing a single file's changes.

use super::DiffSide;
use serde::{Deserialize, Serialize};

/// A single file's diff, already split into hunks by the data source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileDiff {
    /// Current file path (after rename if applicable).
    pub path: String,
    /// Previous file path (if renamed).
    #[serde(default)]
    pub old_path: Option<String>,
    /// Change hunks.
    pub hunks: Vec<Hunk>,
    /// Number of added lines.
    #[serde(default)]
    pub additions: usize,
    /// Number of deleted lines.
    #[serde(default)]
    pub deletions: usize,
}

impl FileDiff {
    /// Create a new file diff.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a file diff from already received hunks.
    pub fn with_hunks(path: impl Into<String>, hunks: Vec<Hunk>) -> Self {
        let mut file = Self::new(path);
        file.hunks = hunks;
        file.recalculate_stats();
        file
    }

    /// Get the display name for the file (handles renames).
    pub fn display_name(&self) -> String {
        match self.old_path {
            Some(ref old) if old != &self.path => format!("{} → {}", old, self.path),
            _ => self.path.clone(),
        }
    }

    /// Recalculate line statistics from hunks.
    pub fn recalculate_stats(&mut self) {
        let count = |kind: LineKind| {
            self.hunks
                .iter()
                .flat_map(|h| &h.lines)
                .filter(|l| l.kind == kind)
                .count()
        };
        let (additions, deletions) = (count(LineKind::Addition), count(LineKind::Deletion));
        self.additions = additions;
        self.deletions = deletions;
    }

    /// Highest line number on either side, used for gutter width.
    pub fn max_line_no(&self) -> u32 {
        self.hunks
            .iter()
            .flat_map(|h| h.lines.iter())
            .filter_map(|l| l.new_line.max(l.old_line))
            .max()
            .unwrap_or(1)
    }

    /// Line number width for display.
    pub fn line_no_width(&self) -> usize {
        self.max_line_no().to_string().len().max(4)
    }

    /// Resolve a line by hunk and line index.
    pub fn line(&self, hunk_index: usize, line_index: usize) -> Option<&DiffLine> {
        self.hunks.get(hunk_index)?.lines.get(line_index)
    }
}

/// A contiguous region of changes (hunk).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hunk {
    /// Old file starting line.
    #[serde(default)]
    pub old_start: u32,
    /// Number of lines in old version.
    #[serde(default)]
    pub old_count: u32,
    /// New file starting line.
    #[serde(default)]
    pub new_start: u32,
    /// Number of lines in new version.
    #[serde(default)]
    pub new_count: u32,
    /// Lines in this hunk, header line included.
    pub lines: Vec<DiffLine>,
}

impl Hunk {
    /// Create a new hunk whose first line is the `@@` header.
    pub fn new(old_start: u32, old_count: u32, new_start: u32, new_count: u32) -> Self {
        Self {
            old_start,
            old_count,
            new_start,
            new_count,
            lines: vec![DiffLine::header(format!(
                "@@ -{},{} +{},{} @@",
                old_start, old_count, new_start, new_count
            ))],
        }
    }

    /// Create a hunk from raw lines, without coordinates.
    pub fn from_lines(lines: Vec<DiffLine>) -> Self {
        Self {
            old_start: 0,
            old_count: 0,
            new_start: 0,
            new_count: 0,
            lines,
        }
    }

    /// Append a line (builder style).
    pub fn push(mut self, line: DiffLine) -> Self {
        self.lines.push(line);
        self
    }

    /// Whether the hunk contains at least one addition or deletion.
    pub fn has_changes(&self) -> bool {
        self.lines.iter().any(|l| l.kind.is_change())
    }
}

/// A single line in the diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffLine {
    /// Line type.
    pub kind: LineKind,
    /// Line content (without leading +/-/ ).
    pub content: String,
    /// Line number in old file (for Context and Deletion).
    #[serde(default)]
    pub old_line: Option<u32>,
    /// Line number in new file (for Context and Addition).
    #[serde(default)]
    pub new_line: Option<u32>,
}

impl DiffLine {
    /// Create a hunk header line.
    pub fn header(content: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Header,
            content: content.into(),
            old_line: None,
            new_line: None,
        }
    }

    /// Create a new context line.
    pub fn context(content: impl Into<String>, old_line: u32, new_line: u32) -> Self {
        Self {
            kind: LineKind::Context,
            content: content.into(),
            old_line: Some(old_line),
            new_line: Some(new_line),
        }
    }

    /// Create a new addition line.
    pub fn addition(content: impl Into<String>, new_line: u32) -> Self {
        Self {
            kind: LineKind::Addition,
            content: content.into(),
            old_line: None,
            new_line: Some(new_line),
        }
    }

    /// Create a new deletion line.
    pub fn deletion(content: impl Into<String>, old_line: u32) -> Self {
        Self {
            kind: LineKind::Deletion,
            content: content.into(),
            old_line: Some(old_line),
            new_line: None,
        }
    }

    /// Line number shown in the single-column layout.
    ///
    /// Deletions show their old-side number, headers show nothing and
    /// everything else shows the new-side number.
    pub fn display_line_number(&self) -> Option<u32> {
        self.kind.display_line_number(self.old_line, self.new_line)
    }

    /// Side a comment on this line is placed on.
    pub fn comment_side(&self) -> DiffSide {
        self.kind.comment_side()
    }
}

/// Line type in the diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// @@ header line.
    Header,
    /// Unchanged line (for context).
    Context,
    /// Added line (+).
    Addition,
    /// Removed line (-).
    Deletion,
}

impl LineKind {
    /// Get the prefix character for this line type.
    pub fn prefix(&self) -> char {
        match self {
            LineKind::Context => ' ',
            LineKind::Addition => '+',
            LineKind::Deletion => '-',
            LineKind::Header => '@',
        }
    }

    /// Additions and deletions.
    pub fn is_change(&self) -> bool {
        matches!(self, LineKind::Addition | LineKind::Deletion)
    }

    /// Pick the display line number for a line of this kind.
    pub fn display_line_number(&self, old_line: Option<u32>, new_line: Option<u32>) -> Option<u32> {
        match self {
            LineKind::Deletion => old_line,
            LineKind::Header => None,
            LineKind::Context | LineKind::Addition => new_line,
        }
    }

    /// Deletions are commented on the old side, everything else on the new.
    pub fn comment_side(&self) -> DiffSide {
        match self {
            LineKind::Deletion => DiffSide::Left,
            _ => DiffSide::Right,
        }
    }

}
