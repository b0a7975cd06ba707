//! `GpuBackend` implementation on top of wgpu.
//!
//! The core hands over GL-convention matrices; depth is remapped to wgpu's `[0, 1]`
//! clip range when each MVP is written into its uniform slot.

mod backend;
mod uniforms;

pub use backend::{WgpuBackend, WgpuProgram};
pub use uniforms::GL_TO_WGPU_CLIP;
