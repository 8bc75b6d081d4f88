//! Scroll-into-view for fixed-height candidate lists

use formkit_core::{Effect, ScrollBlock};

/// Vertical viewport over a list of equally tall rows
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ListViewport {
    /// Height of one row
    pub row_height: f32,
    /// Visible height of the list container
    pub viewport_height: f32,
    /// Number of rows in the list
    pub row_count: usize,
    /// Current scroll offset from the top
    pub offset: f32,
}

impl ListViewport {
    pub fn new(row_height: f32, viewport_height: f32, row_count: usize) -> Self {
        Self {
            row_height,
            viewport_height,
            row_count,
            offset: 0.0,
        }
    }

    /// Largest valid offset
    pub fn max_offset(&self) -> f32 {
        (self.row_height * self.row_count as f32 - self.viewport_height).max(0.0)
    }

    /// Whether row `index` is entirely inside the viewport
    pub fn is_row_visible(&self, index: usize) -> bool {
        let top = self.row_height * index as f32;
        index < self.row_count
            && top >= self.offset
            && top + self.row_height <= self.offset + self.viewport_height
    }

    /// Scroll so row `index` is visible, aligned per `block`
    ///
    /// Returns whether the offset changed. Out-of-range rows are ignored.
    pub fn scroll_to(&mut self, index: usize, block: ScrollBlock) -> bool {
        if index >= self.row_count {
            return false;
        }
        let top = self.row_height * index as f32;
        let bottom = top + self.row_height;

        let target = match block {
            ScrollBlock::Start => top,
            ScrollBlock::End => bottom - self.viewport_height,
            ScrollBlock::Center => top - (self.viewport_height - self.row_height) / 2.0,
            ScrollBlock::Nearest => {
                if top < self.offset {
                    top
                } else if bottom > self.offset + self.viewport_height {
                    bottom - self.viewport_height
                } else {
                    self.offset
                }
            }
        };

        let target = target.clamp(0.0, self.max_offset());
        if target == self.offset {
            return false;
        }
        tracing::trace!(index, from = self.offset, to = target, "list scrolled");
        self.offset = target;
        true
    }

    /// Minimal scroll that brings row `index` into view
    pub fn scroll_to_nearest(&mut self, index: usize) -> bool {
        self.scroll_to(index, ScrollBlock::Nearest)
    }

    /// Apply a scroll request returned by a widget; other effects are ignored
    pub fn apply(&mut self, effect: &Effect) -> bool {
        match effect {
            Effect::ScrollIntoView { index, block } => self.scroll_to(*index, *block),
            _ => false,
        }
    }
}
