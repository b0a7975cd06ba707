use glam::Vec2;

use super::viewport::{Orientation, Viewport};

/// Maps a device-pixel position (origin top-left, +Y down) into normalized device
/// coordinates (origin center, +Y up).
///
/// The short side spans `[-1, 1]`; the long side spans `[-long/short, long/short]`,
/// which keeps content at 1:1 aspect in either orientation. This matches the
/// frustum built by `render::camera::projection_matrix`.
///
/// Returns `None` for an invalid (zero or non-finite) viewport.
pub fn screen_to_ndc(screen: Vec2, viewport: Viewport) -> Option<Vec2> {
    if !viewport.is_valid() {
        return None;
    }
    let Viewport { width: w, height: h } = viewport;

    let ndc = match viewport.orientation() {
        Orientation::Portrait => Vec2::new(
            (screen.x - w / 2.0) * (2.0 / w),
            (h / 2.0 - screen.y) * (2.0 / h) * (h / w),
        ),
        Orientation::Landscape => Vec2::new(
            (screen.x - w / 2.0) * (2.0 / w) * (w / h),
            (h / 2.0 - screen.y) * (2.0 / h),
        ),
    };
    Some(ndc)
}

/// Inverse of [`screen_to_ndc`] for the same viewport.
pub fn ndc_to_screen(ndc: Vec2, viewport: Viewport) -> Option<Vec2> {
    if !viewport.is_valid() {
        return None;
    }
    let Viewport { width: w, height: h } = viewport;

    let screen = match viewport.orientation() {
        Orientation::Portrait => Vec2::new(
            ndc.x * (w / 2.0) + w / 2.0,
            h / 2.0 - ndc.y * (w / h) * (h / 2.0),
        ),
        Orientation::Landscape => Vec2::new(
            ndc.x * (h / w) * (w / 2.0) + w / 2.0,
            h / 2.0 - ndc.y * (h / 2.0),
        ),
    };
    Some(screen)
}
