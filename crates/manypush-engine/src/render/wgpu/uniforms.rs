//! Per-draw uniform data and the clip-space fixup applied at upload.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

/// Remaps GL clip depth (`[-w, w]`) to wgpu's `[0, w]`; x, y and w are untouched.
pub const GL_TO_WGPU_CLIP: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.5, 0.0, //
    0.0, 0.0, 0.5, 1.0,
]);

/// Matches `Transform` in `triangle.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(super) struct TransformUniform {
    pub mvp: [[f32; 4]; 4],
}

impl TransformUniform {
    pub(super) const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    /// Takes a GL-convention MVP.
    pub(super) fn from_gl(mvp: Mat4) -> Self {
        Self {
            mvp: (GL_TO_WGPU_CLIP * mvp).to_cols_array_2d(),
        }
    }
}

/// Rounds `value` up to a multiple of `alignment` (a power of two, or zero for none).
pub(super) fn align_up(value: u64, alignment: u64) -> u64 {
    if alignment <= 1 {
        return value;
    }
    value.div_ceil(alignment) * alignment
}

/// Byte stride between consecutive uniform slots for dynamic offsets.
pub(super) fn uniform_stride(min_offset_alignment: u32) -> u64 {
    align_up(TransformUniform::SIZE, u64::from(min_offset_alignment))
}
