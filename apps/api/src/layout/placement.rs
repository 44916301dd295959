//! Vertical placement of content inside a fixed slide region.
//!
//! One layout law for every block on a body slide — bullet lists, centered
//! paragraphs, and images: the block is centered vertically in its region,
//! then shifted up by `uplift_ratio` of the available height, and finally
//! clamped so it never starts above the region's top edge.

use crate::layout::geometry::LINE_HEIGHT_FACTOR;

/// A vertical band on a slide, in inches from the slide's top edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub top_in: f64,
    pub bottom_in: f64,
}

impl Region {
    pub fn height_in(&self) -> f64 {
        self.bottom_in - self.top_in
    }
}

/// Computes the top offset for a block of `content_height_in` inside `region`.
///
/// `base = top + max(0, (available - content) / 2)` — centering, clamped when
/// the content is taller than the region. The centered position is then lifted
/// by `uplift_ratio * available`, clamped again at the region top.
pub fn vertical_start(region: &Region, content_height_in: f64, uplift_ratio: f64) -> f64 {
    let available = region.height_in();
    let base_top = region.top_in + ((available - content_height_in) / 2.0).max(0.0);
    let shift_up = uplift_ratio * available;
    (base_top - shift_up).max(region.top_in)
}

/// Height of one rendered text line at the given font size, in inches.
pub fn line_height_in(font_pt: u32) -> f64 {
    f64::from(font_pt) * LINE_HEIGHT_FACTOR / 72.0
}

/// Total height of a wrapped text block. A block is never shorter than one
/// line, even when the line list is empty.
pub fn block_height_in(line_count: usize, font_pt: u32) -> f64 {
    line_count.max(1) as f64 * line_height_in(font_pt)
}
