use std::num::NonZeroU64;

use winit::dpi::PhysicalSize;

use super::uniforms::{uniform_stride, TransformUniform};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::render::backend::{DrawCall, GpuBackend, ViewportCaps};
use crate::render::error::RenderError;
use crate::render::mesh::{ProgramLayout, TriangleMesh, BYTES_PER_FLOAT};

/// Linked sprite program: pipeline plus the layout it was built against.
pub struct WgpuProgram {
    id: u64,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    vertices_per_draw: u32,
}

struct UniformSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    capacity: usize,
    program_id: u64,
}

/// Draws the shared triangle once per [`DrawCall`] into the window surface.
///
/// Each draw reads its MVP from a slot of one dynamic-offset uniform buffer, so a
/// whole frame is a single buffer write plus one render pass.
pub struct WgpuBackend {
    gpu: Gpu<'static>,

    vertex_buffer: Option<wgpu::Buffer>,
    uploaded_mesh: Option<TriangleMesh>,

    uniforms: Option<UniformSlots>,
    uniform_stride: u64,
    staging: Vec<u8>,

    next_program_id: u64,
}

impl WgpuBackend {
    pub fn new(gpu: Gpu<'static>) -> Self {
        let uniform_stride = uniform_stride(gpu.limits().min_uniform_buffer_offset_alignment);
        Self {
            gpu,
            vertex_buffer: None,
            uploaded_mesh: None,
            uniforms: None,
            uniform_stride,
            staging: Vec::new(),
            next_program_id: 0,
        }
    }

    /// Limits the pipeline clamps surface sizes against.
    pub fn viewport_caps(&self) -> ViewportCaps {
        let max = self.gpu.limits().max_texture_dimension_2d;
        ViewportCaps {
            max_width: max,
            max_height: max,
        }
    }

    // ── private helpers ────────────────────────────────────────────────────

    fn ensure_vertex_buffer(&mut self, mesh: &TriangleMesh) {
        if self.uploaded_mesh.as_ref() == Some(mesh) && self.vertex_buffer.is_some() {
            return;
        }

        let bytes: &[u8] = bytemuck::cast_slice(mesh.as_floats());
        let buffer = match self.vertex_buffer.take() {
            Some(buffer) if buffer.size() == bytes.len() as u64 => buffer,
            _ => self.gpu.device().create_buffer(&wgpu::BufferDescriptor {
                label: Some("manypush sprite vbo"),
                size: bytes.len() as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }),
        };
        self.gpu.queue().write_buffer(&buffer, 0, bytes);

        self.vertex_buffer = Some(buffer);
        self.uploaded_mesh = Some(*mesh);
    }

    fn ensure_uniform_capacity(&mut self, program: &WgpuProgram, required: usize) {
        if let Some(slots) = &self.uniforms {
            if slots.capacity >= required && slots.program_id == program.id {
                return;
            }
        }

        let capacity = required
            .next_power_of_two()
            .max(crate::input::MAX_POINTERS)
            .max(self.uniforms.as_ref().map_or(0, |s| s.capacity));
        let device = self.gpu.device();

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("manypush transform ubo"),
            size: capacity as u64 * self.uniform_stride,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("manypush transform bind group"),
            layout: &program.bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(TransformUniform::SIZE),
                }),
            }],
        });

        log::debug!("transform uniform slots: {capacity} x {} bytes", self.uniform_stride);
        self.uniforms = Some(UniformSlots {
            buffer,
            bind_group,
            capacity,
            program_id: program.id,
        });
    }

    fn write_transforms(&mut self, draws: &[DrawCall]) {
        let Some(slots) = self.uniforms.as_ref() else { return };
        if draws.is_empty() {
            return;
        }

        let stride = self.uniform_stride as usize;
        self.staging.clear();
        self.staging.resize(draws.len() * stride, 0);
        for (chunk, draw) in self.staging.chunks_exact_mut(stride).zip(draws) {
            let uniform = TransformUniform::from_gl(draw.mvp);
            chunk[..TransformUniform::SIZE as usize].copy_from_slice(bytemuck::bytes_of(&uniform));
        }

        self.gpu.queue().write_buffer(&slots.buffer, 0, &self.staging);
    }
}

impl GpuBackend for WgpuBackend {
    type Program = WgpuProgram;

    fn link_program(
        &mut self,
        layout: &ProgramLayout,
        _caps: &ViewportCaps,
    ) -> Result<WgpuProgram, RenderError> {
        if layout.position_size != 3 || layout.color_size != 4 {
            return Err(RenderError::ProgramLink(format!(
                "unsupported attribute sizes: position {} color {}",
                layout.position_size, layout.color_size
            )));
        }
        if layout.stride_bytes != layout.floats_per_vertex * BYTES_PER_FLOAT {
            return Err(RenderError::ProgramLink(format!(
                "stride {} does not match {} floats per vertex",
                layout.stride_bytes, layout.floats_per_vertex
            )));
        }

        let device = self.gpu.device();

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("manypush triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("../shaders/triangle.wgsl").into()),
        });

        let info = pollster::block_on(shader.get_compilation_info());
        let errors: Vec<String> = info
            .messages
            .iter()
            .filter(|m| matches!(m.message_type, wgpu::CompilationMessageType::Error))
            .map(|m| m.message.clone())
            .collect();
        if !errors.is_empty() {
            return Err(RenderError::ShaderCompile(errors.join("; ")));
        }

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("manypush transform bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(TransformUniform::SIZE),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("manypush triangle pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let attributes = [
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: layout.position_offset_bytes() as u64,
                shader_location: 0,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x4,
                offset: layout.color_offset_bytes() as u64,
                shader_location: 1,
            },
        ];
        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: layout.stride_bytes as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &attributes,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("manypush triangle pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[vertex_layout],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.gpu.surface_format(),
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let id = self.next_program_id;
        self.next_program_id += 1;
        log::debug!("linked triangle program #{id} ({:?})", self.gpu.surface_format());

        Ok(WgpuProgram {
            id,
            pipeline,
            bind_group_layout,
            vertices_per_draw: layout.vertices_per_draw,
        })
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.gpu.resize(PhysicalSize::new(width, height));
    }

    fn submit_frame(
        &mut self,
        program: &WgpuProgram,
        mesh: &TriangleMesh,
        draws: &[DrawCall],
        clear: [f32; 4],
    ) -> Result<(), RenderError> {
        let mut frame = match self.gpu.begin_frame() {
            Ok(frame) => frame,
            Err(err) => {
                let message = err.to_string();
                return match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => Err(RenderError::Surface(message)),
                    action => {
                        log::debug!("surface error ({message}): {action:?}");
                        Ok(())
                    }
                };
            }
        };

        self.ensure_vertex_buffer(mesh);
        self.ensure_uniform_capacity(program, draws.len());
        self.write_transforms(draws);

        {
            let mut rpass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("manypush sprite pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &frame.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(clear[0]),
                            g: f64::from(clear[1]),
                            b: f64::from(clear[2]),
                            a: f64::from(clear[3]),
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
                multiview_mask: None,
            });

            if let (Some(vbo), Some(slots)) = (self.vertex_buffer.as_ref(), self.uniforms.as_ref()) {
                rpass.set_pipeline(&program.pipeline);
                rpass.set_vertex_buffer(0, vbo.slice(..));

                for i in 0..draws.len() {
                    let offset = (i as u64 * self.uniform_stride) as u32;
                    rpass.set_bind_group(0, &slots.bind_group, &[offset]);
                    rpass.draw(0..program.vertices_per_draw, 0..1);
                }
            }
        }

        self.gpu.submit(frame);
        Ok(())
    }
}
