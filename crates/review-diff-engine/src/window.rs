//! Virtual windowing over the logical row sequence.
//!
//! Only rows inside the window are painted; the paddings stand in for the
//! rows above and below so scroll geometry stays exact.

use std::ops::Range;

/// The slice of rows that should be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VirtualWindow {
    /// First renderable row index.
    pub start_index: usize,
    /// One past the last renderable row index.
    pub end_index: usize,
    /// `start_index..end_index`.
    pub visible_range: Range<usize>,
    /// Rows above the window.
    pub padding_top: usize,
    /// Rows below the window.
    pub padding_bottom: usize,
}

impl VirtualWindow {
    /// Number of rows inside the window.
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    /// Whether the window holds no rows.
    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Whether `index` is renderable.
    pub fn contains(&self, index: usize) -> bool {
        self.visible_range.contains(&index)
    }
}

/// Compute the renderable window.
///
/// `scroll_offset` is clamped to `0..=total_items`. The window spans the
/// viewport plus `overscan` rows on each side, clipped to the row count.
pub fn compute_virtual_window(
    total_items: usize,
    viewport_size: usize,
    scroll_offset: usize,
    overscan: usize,
) -> VirtualWindow {
    let scroll = scroll_offset.min(total_items);
    let start_index = scroll.saturating_sub(overscan);
    let end_index = scroll
        .saturating_add(viewport_size)
        .saturating_add(overscan)
        .min(total_items);

    VirtualWindow {
        start_index,
        end_index,
        visible_range: start_index..end_index,
        padding_top: start_index,
        padding_bottom: total_items - end_index,
    }
}

/// Largest scroll offset that still fills the viewport.
pub fn max_scroll_offset(total_items: usize, viewport_size: usize) -> usize {
    total_items.saturating_sub(viewport_size)
}

/// Adjust `scroll_offset` so that `selected` is inside the viewport.
pub fn scroll_to_reveal(selected: usize, scroll_offset: usize, viewport_size: usize) -> usize {
    if viewport_size == 0 {
        return selected;
    }
    if selected < scroll_offset {
        selected
    } else if selected >= scroll_offset + viewport_size {
        selected + 1 - viewport_size
    } else {
        scroll_offset
    }
}
