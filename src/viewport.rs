use serde::{Deserialize, Serialize};
use std::ops::Range;

pub const DEFAULT_ROW_HEIGHT: u32 = 35;
pub const DEFAULT_VIEWPORT_HEIGHT: u32 = 600;
pub const DEFAULT_OVERSCAN: usize = 10;

/// Fixed-height row windowing
///
/// Only rows inside the visible area, plus `overscan` rows on either side,
/// are materialized; a spacer of `total_height` keeps the scrollbar honest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub row_height: u32,
    pub height: u32,
    pub overscan: usize,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            row_height: DEFAULT_ROW_HEIGHT,
            height: DEFAULT_VIEWPORT_HEIGHT,
            overscan: DEFAULT_OVERSCAN,
        }
    }
}

impl Viewport {
    /// Same row geometry, different visible height.
    pub fn with_height(self, height: u32) -> Self {
        Viewport { height, ..self }
    }

    /// Rows per full screen (at least one)
    pub fn page_rows(&self) -> usize {
        if self.row_height == 0 {
            return 1;
        }
        ((self.height / self.row_height) as usize).max(1)
    }

    pub fn total_height(&self, total: usize) -> u64 {
        total as u64 * self.row_height as u64
    }

    pub fn offset_of(&self, index: usize) -> u64 {
        index as u64 * self.row_height as u64
    }

    /// Half-open range of rows to render for a scroll position.
    pub fn visible_range(&self, scroll_top: u64, total: usize) -> Range<usize> {
        if self.row_height == 0 || total == 0 {
            return 0..0;
        }
        let row_height = self.row_height as u64;
        let first = (scroll_top / row_height).min(total as u64) as usize;
        let last = scroll_top
            .saturating_add(self.height as u64)
            .div_ceil(row_height);
        let last = last.min(total as u64) as usize;

        let start = first.saturating_sub(self.overscan);
        let end = last.saturating_add(self.overscan).min(total);
        start..end.max(start)
    }

    /// Largest useful scroll offset
    pub fn max_scroll(&self, total: usize) -> u64 {
        self.total_height(total).saturating_sub(self.height as u64)
    }
}
