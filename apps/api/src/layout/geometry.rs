//! Fixed slide geometry and layout constants.
//!
//! All distances are in inches. The deck uses a single content region on every
//! body slide (below the title ribbon, above the footer strip); the same region
//! drives bullet blocks, centered paragraphs, and images.

use serde::{Deserialize, Serialize};

use crate::layout::placement::Region;

/// Fraction of the available region height by which vertically centered
/// content is shifted toward the top.
pub const UPLIFT_RATIO: f64 = 0.20;

/// Character budget for bullet lines on body slides.
pub const BULLET_WRAP_CHARS: usize = 40;

/// Character budget for the narrative story paragraph.
pub const STORY_WRAP_CHARS: usize = 28;

/// Character budget for the hook paragraph (large type, narrow lines).
pub const HOOK_WRAP_CHARS: usize = 20;

/// Word budget per line for the team blurb (two words per line).
pub const TEAM_WRAP_WORDS: usize = 2;

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.35;

/// Geometry of one slide and its fixed regions.
///
/// 16:9 widescreen. The content region (2.0"–6.5") is shared by every body
/// slide; the footer strip sits below it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideGeometry {
    pub slide_width_in: f64,
    pub slide_height_in: f64,
    pub margin_left_in: f64,
    pub margin_right_in: f64,
    pub content_top_in: f64,
    pub content_bottom_in: f64,
    pub footer_top_in: f64,
    pub uplift_ratio: f64,
}

impl Default for SlideGeometry {
    fn default() -> Self {
        SlideGeometry {
            slide_width_in: 13.333,
            slide_height_in: 7.5,
            margin_left_in: 0.9,
            margin_right_in: 0.9,
            content_top_in: 2.0,
            content_bottom_in: 6.5,
            footer_top_in: 6.85,
            uplift_ratio: UPLIFT_RATIO,
        }
    }
}

impl SlideGeometry {
    /// The shared content region on body slides.
    pub fn content_region(&self) -> Region {
        Region {
            top_in: self.content_top_in,
            bottom_in: self.content_bottom_in,
        }
    }

    /// Usable text width between the side margins, floored at 1".
    pub fn body_width_in(&self) -> f64 {
        (self.slide_width_in - self.margin_left_in - self.margin_right_in).max(1.0)
    }
}
