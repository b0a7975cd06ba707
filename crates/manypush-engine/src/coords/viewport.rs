/// Device orientation derived from the surface dimensions.
///
/// A square surface counts as portrait.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Viewport size in physical pixels (the coordinate frame touches arrive in).
///
/// Written only by the surface-change path; read by the NDC transform and the
/// projection builder.
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

    #[inline]
    pub fn orientation(self) -> Orientation {
        if self.width <= self.height {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    /// Short side over long side, in `(0, 1]`.
    ///
    /// Returns `1.0` for an invalid viewport so callers never divide by zero.
    #[inline]
    pub fn aspect_ratio(self) -> f32 {
        if !self.is_valid() {
            return 1.0;
        }
        self.width.min(self.height) / self.width.max(self.height)
    }
}
