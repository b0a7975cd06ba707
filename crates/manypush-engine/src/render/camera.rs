use glam::{Mat4, Vec3, Vec4};

use super::config::CameraConfig;
use crate::coords::{Orientation, Viewport};

/// World-to-eye transform for the configured camera (right-handed look-at).
pub fn view_matrix(camera: &CameraConfig) -> Mat4 {
    Mat4::look_at_rh(camera.eye, camera.look, camera.up)
}

/// GL-convention perspective frustum (clip z in `[-w, w]`).
pub fn frustum(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Mat4 {
    let rw = 1.0 / (right - left);
    let rh = 1.0 / (top - bottom);
    let rd = 1.0 / (near - far);

    Mat4::from_cols(
        Vec4::new(2.0 * near * rw, 0.0, 0.0, 0.0),
        Vec4::new(0.0, 2.0 * near * rh, 0.0, 0.0),
        Vec4::new((right + left) * rw, (top + bottom) * rh, (far + near) * rd, -1.0),
        Vec4::new(0.0, 0.0, 2.0 * far * near * rd, 0.0),
    )
}

/// Projection whose short side spans `[-1, 1]` at the near plane.
///
/// Uses the same short/long ratio as `coords::screen_to_ndc`. An invalid viewport
/// falls back to a square frustum.
pub fn projection_matrix(viewport: Viewport, camera: &CameraConfig) -> Mat4 {
    let ratio = viewport.aspect_ratio();
    let (x, y) = match viewport.orientation() {
        Orientation::Portrait => (ratio, 1.0),
        Orientation::Landscape => (1.0, ratio),
    };
    frustum(-x, x, -y, y, camera.near, camera.far)
}

/// Sprite placement: translate to `position`, spin about +Z, then scale.
pub fn model_matrix(position: Vec3, angle_degrees: f32, scale: f32) -> Mat4 {
    Mat4::from_translation(position)
        * Mat4::from_rotation_z(angle_degrees.to_radians())
        * Mat4::from_scale(Vec3::splat(scale))
}
