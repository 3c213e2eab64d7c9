//! # Vertex Data Structures
//!
//! This module defines the vertex format shared by both asset loaders.
//! It is GPU-compatible and uploaded as-is.

/// A 3D vertex with position, normal and texture coordinate data.
///
/// Both loaders produce this layout. Attributes missing from the source file
/// stay at zero, which is also the `Default`.
///
/// # Memory Layout
///
/// `#[repr(C)]` keeps the field order and packing fixed so the struct can be
/// cast to bytes with `bytemuck` and described with [`Vertex::desc`].
///
/// # Examples
///
/// ```
/// use strata::gfx::geometry::Vertex;
///
/// let vertex = Vertex {
///     position: [0.0, 1.0, 0.0],
///     normal: [0.0, 1.0, 0.0],
///     tex_coord: [0.5, 0.5],
/// };
/// assert_eq!(Vertex::default().normal, [0.0; 3]);
/// # let _ = vertex;
/// ```
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// 3D position coordinates [x, y, z]
    pub position: [f32; 3],
    /// 3D normal vector [nx, ny, nz]
    pub normal: [f32; 3],
    /// Texture coordinates [u, v], flat-format convention
    pub tex_coord: [f32; 2],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x3)
    /// - Attribute 1: Normal (Float32x3)
    /// - Attribute 2: Texture coordinate (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}
