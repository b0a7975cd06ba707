use glam::Mat4;

use super::error::RenderError;
use super::mesh::{ProgramLayout, TriangleMesh};
use crate::input::PointerId;

/// Surface limits reported when the surface is created.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ViewportCaps {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for ViewportCaps {
    fn default() -> Self {
        Self {
            max_width: u32::MAX,
            max_height: u32::MAX,
        }
    }
}

/// One sprite draw: the slot it came from and its combined transform.
///
/// `mvp` is `Projection · View · Model` in GL clip conventions, column-major.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct DrawCall {
    pub slot: PointerId,
    pub mvp: Mat4,
}

/// GPU submission seam.
///
/// The pipeline decides what to draw; implementors own the graphics API calls. Each
/// draw call uses the shared mesh with the [`ProgramLayout`] passed at link time and
/// a single 4×4 MVP uniform.
pub trait GpuBackend {
    type Program;

    /// Builds the GPU program. Failure is fatal for the pipeline.
    fn link_program(
        &mut self,
        layout: &ProgramLayout,
        caps: &ViewportCaps,
    ) -> Result<Self::Program, RenderError>;

    /// Surface dimensions changed (physical pixels, never zero).
    fn resize(&mut self, width: u32, height: u32);

    /// Clears to `clear` and issues `draws` in order. An empty slice still clears.
    fn submit_frame(
        &mut self,
        program: &Self::Program,
        mesh: &TriangleMesh,
        draws: &[DrawCall],
        clear: [f32; 4],
    ) -> Result<(), RenderError>;
}
