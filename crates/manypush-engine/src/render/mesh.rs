use bytemuck::{Pod, Zeroable};

/// Size of one float in the vertex stream, in bytes.
pub const BYTES_PER_FLOAT: usize = 4;

/// Interleaved vertex: position `x, y, z` followed by color `r, g, b, a`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl Vertex {
    #[inline]
    pub const fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

/// Vertex stream layout every backend must honor for visual parity.
///
/// Offsets and sizes are in floats; the stride is in bytes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ProgramLayout {
    pub floats_per_vertex: usize,
    pub stride_bytes: usize,
    pub position_offset: usize,
    pub position_size: usize,
    pub color_offset: usize,
    pub color_size: usize,
    pub vertices_per_draw: u32,
}

impl ProgramLayout {
    pub const TRIANGLE: Self = Self {
        floats_per_vertex: 7,
        stride_bytes: 7 * BYTES_PER_FLOAT,
        position_offset: 0,
        position_size: 3,
        color_offset: 3,
        color_size: 4,
        vertices_per_draw: 3,
    };

    #[inline]
    pub const fn position_offset_bytes(&self) -> usize {
        self.position_offset * BYTES_PER_FLOAT
    }

    #[inline]
    pub const fn color_offset_bytes(&self) -> usize {
        self.color_offset * BYTES_PER_FLOAT
    }
}

/// The shared sprite: one equilateral-ish triangle, red / blue / green corners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct TriangleMesh {
    pub vertices: [Vertex; 3],
}

impl TriangleMesh {
    pub const SPRITE: Self = Self {
        vertices: [
            Vertex::new([-0.5, -0.25, 0.0], [1.0, 0.0, 0.0, 1.0]),
            Vertex::new([0.5, -0.25, 0.0], [0.0, 0.0, 1.0, 1.0]),
            Vertex::new([0.0, 0.559016994, 0.0], [0.0, 1.0, 0.0, 1.0]),
        ],
    };

    /// Flat float stream in the [`ProgramLayout::TRIANGLE`] layout.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }
}
