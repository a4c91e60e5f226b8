//! Coordinate and geometry types used by the sprite unit and its host.
//!
//! Sprite space:
//! - Normalized screen coordinates in `[0, 1]²`
//! - Origin bottom-left, +X right, +Y up
//!
//! Quad builders convert to NDC on the CPU; the sprite vertex stage does no projection.

mod rect;
mod viewport;

pub use rect::Rect;
pub use viewport::Viewport;
