// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! The thin GPU seam: typed uniform buffers, per-shape bind groups and a
//! render-pass extension that draws multi-shape geometry.

pub mod binding_types;
pub mod multi_shape;
pub mod uniform_buffer;

// Re-export main types
pub use multi_shape::{
    headless_device, shape_bind_group_layout, world_bind_group_layout, DrawMultiShape,
    GeometryBuffers, ShapeBindings,
};
pub use uniform_buffer::UniformBuffer;
