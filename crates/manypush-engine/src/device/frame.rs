/// One acquired surface texture plus the encoder recording into it.
///
/// Short-lived: hand it back to [`Gpu::submit`](super::Gpu::submit) promptly, since
/// holding the texture blocks acquisition of the next one.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
