//! Blame lookup for rows and the blame gutter.

use crate::model::{BlameInfo, BlameMap, LineKind};
use crate::rows::{PairedSide, RowLine, UnifiedRow};
use chrono::{DateTime, NaiveDate, Utc};

/// Display width of the blame gutter.
///
/// 8 columns of author, a space, 3 columns of date, a space and the
/// separator.
pub const BLAME_GUTTER_WIDTH: usize = 14;

const AUTHOR_WIDTH: usize = 8;
const DATE_WIDTH: usize = 3;
const SEPARATOR: char = '│';

fn lookup<'a>(line: &RowLine, blame: Option<&'a BlameMap>) -> Option<&'a BlameInfo> {
    let number = match line.kind {
        LineKind::Header => return None,
        LineKind::Deletion => line.old_line,
        LineKind::Context | LineKind::Addition => line.new_line,
    }?;
    blame?.get(&number)
}

/// Blame for a unified row.
///
/// Deleted lines are looked up by their old number, every other line by its
/// new number. Header, fold and comment rows have no blame.
pub fn get_blame_for_row<'a>(row: &UnifiedRow, blame: Option<&'a BlameMap>) -> Option<&'a BlameInfo> {
    row.row_line().and_then(|line| lookup(line, blame))
}

/// Blame for one side of a side-by-side row, with the same line selection
/// as [`get_blame_for_row`].
pub fn get_blame_for_split_side<'a>(
    side: &PairedSide,
    blame: Option<&'a BlameMap>,
) -> Option<&'a BlameInfo> {
    lookup(&side.line, blame)
}

/// Width left for line content once the gutter is reserved.
pub fn content_width(available: usize, blame_enabled: bool) -> usize {
    if blame_enabled {
        available.saturating_sub(BLAME_GUTTER_WIDTH)
    } else {
        available
    }
}

fn parse_date(date: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(date) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// Age of `date` relative to `now` in at most three columns: `now`, `5m`,
/// `3h`, `2d`, `3w`, `4mo`, `1y`. Unparseable dates give `?`.
///
/// Ten months and more count as years so the label stays narrow.
pub fn compact_relative_date(date: &str, now: DateTime<Utc>) -> String {
    let Some(date) = parse_date(date) else {
        return "?".to_string();
    };
    let elapsed = (now - date).num_seconds();
    if elapsed < 60 {
        return "now".to_string();
    }
    let days = elapsed / 86_400;
    if elapsed < 3_600 {
        format!("{}m", elapsed / 60)
    } else if days < 1 {
        format!("{}h", elapsed / 3_600)
    } else if days < 7 {
        format!("{}d", days)
    } else if days < 30 {
        format!("{}w", days / 7)
    } else if days / 30 < 10 {
        format!("{}mo", days / 30)
    } else {
        format!("{}y", (days / 365).clamp(1, 99))
    }
}

/// The gutter text for one line, exactly [`BLAME_GUTTER_WIDTH`] columns.
pub fn format_blame_gutter(info: &BlameInfo, now: DateTime<Utc>) -> String {
    let author: String = info.author.chars().take(AUTHOR_WIDTH).collect();
    format!(
        "{:<aw$} {:>dw$} {}",
        author,
        compact_relative_date(&info.date, now),
        SEPARATOR,
        aw = AUTHOR_WIDTH,
        dw = DATE_WIDTH
    )
}

/// An empty gutter for rows without blame.
pub fn blank_blame_gutter() -> String {
    format!("{:width$}{}", "", SEPARATOR, width = BLAME_GUTTER_WIDTH - 1)
}
