//! Sprite rendering.
//!
//! [`RenderPipeline`] turns the latest pointer snapshot into one [`DrawCall`] per
//! active pointer and hands them to a [`GpuBackend`]. The wgpu implementation lives
//! in [`wgpu`](self::wgpu).
//!
//! Convention:
//! - Sprite positions are NDC (see `coords`), placed on the z = 0 plane.
//! - Matrices are column-major and GL-convention (clip depth `[-1, 1]`).

mod backend;
pub mod camera;
mod config;
mod error;
mod mesh;
mod pipeline;
pub mod wgpu;

pub use backend::{DrawCall, GpuBackend, ViewportCaps};
pub use config::{CameraConfig, SceneConfig};
pub use error::RenderError;
pub use mesh::{ProgramLayout, TriangleMesh, Vertex, BYTES_PER_FLOAT};
pub use pipeline::{FrameReport, PipelineState, RenderPipeline};
