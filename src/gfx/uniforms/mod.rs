//! # Uniforms
//!
//! CPU-side uniform data and its binding layout.
//!
//! - [`blocks`] - the std140 block types the shaders read
//! - [`pool`] - typed arenas handing out stable [`UniformHandle`]s
//! - [`descriptors`] - the global descriptor-set table
//!
//! The director writes into a [`Uniforms`] every frame; the GPU seam copies
//! the values into buffers afterwards.
//!
//! ## Usage
//!
//! ```
//! use strata::gfx::uniforms::{AnimShadeData, ShadingLayer, Transforms, Uniforms};
//!
//! let mut uniforms = Uniforms::default();
//! let model = uniforms.transforms.create(Transforms::default());
//! let shade = uniforms
//!     .anim_shade
//!     .create(AnimShadeData::textured(ShadingLayer::TexturedFlat, 0));
//! assert_eq!(uniforms.anim_shade.get(shade).texture(), Some(0));
//! # let _ = model;
//! ```

pub mod blocks;
pub mod descriptors;
pub mod pool;

pub use blocks::{AnimShadeData, ShadingLayer, Transforms, WorldInfo};
pub use descriptors::{
    DescriptorTable, ObjectBindings, ObjectEntry, ShapeBinding, ANIM_SHADE_BINDING,
    TRANSFORM_BINDING, WORLD_BINDING,
};
pub use pool::{UniformHandle, UniformPool};

/// All uniform values of a scene.
#[derive(Debug, Clone, Default)]
pub struct Uniforms {
    pub world: WorldInfo,
    pub transforms: UniformPool<Transforms>,
    pub anim_shade: UniformPool<AnimShadeData>,
}

impl Uniforms {
    /// Creates a transforms/anim-shade pair for one draw.
    pub fn create_binding(&mut self, transforms: Transforms, anim_shade: AnimShadeData) -> ShapeBinding {
        ShapeBinding {
            transforms: self.transforms.create(transforms),
            anim_shade: self.anim_shade.create(anim_shade),
        }
    }

    pub fn model(&self, binding: ShapeBinding) -> cgmath::Matrix4<f32> {
        self.transforms.get(binding.transforms).model_matrix()
    }
}
