use glam::Vec2;

/// Drawable size in physical pixels.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// Maps a cursor position (top-left origin, +Y down, pixels) into the
    /// normalized `[0, 1]²` space sprites are laid out in (bottom-left origin, +Y up).
    ///
    /// Returns `None` for an invalid (zero-sized) viewport.
    #[inline]
    pub fn normalize_cursor(self, x: f32, y: f32) -> Option<Vec2> {
        if !self.is_valid() {
            return None;
        }
        Some(Vec2::new(x / self.width, 1.0 - y / self.height))
    }
}
