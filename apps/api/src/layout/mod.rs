// Deterministic text layout: wrapping policies, vertical placement, and the
// fixed slide geometry. Everything here is pure and synchronous.

pub mod geometry;
pub mod placement;
pub mod wrap;

// Re-export the public API consumed by other modules (assembler, handlers).
pub use geometry::SlideGeometry;
pub use placement::{block_height_in, line_height_in, vertical_start, Region};
pub use wrap::{wrap_chars, wrap_words};
