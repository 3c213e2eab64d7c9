//! Global descriptor-set table
//!
//! Every shape of every object gets one position in a single table. The
//! entry at that position names the uniform values bound at
//! [`TRANSFORM_BINDING`] and [`ANIM_SHADE_BINDING`] when the shape is drawn.
//! Objects are laid out back to back: the first shape of an object takes the
//! position after the last shape of the previous one.

use std::ops::Range;

use super::{AnimShadeData, Transforms, UniformHandle};
use crate::gfx::geometry::MultiShapeGeometry;

/// Binding point of [`WorldInfo`](super::WorldInfo), shared by all draws.
pub const WORLD_BINDING: u32 = 0;
/// Binding point of [`Transforms`].
pub const TRANSFORM_BINDING: u32 = 1;
/// Binding point of [`AnimShadeData`].
pub const ANIM_SHADE_BINDING: u32 = 2;

/// Uniform values bound for one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeBinding {
    pub transforms: UniformHandle<Transforms>,
    pub anim_shade: UniformHandle<AnimShadeData>,
}

/// How an object's shapes map to uniform values.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectBindings {
    /// Every shape uses the same values; the object moves as one piece.
    Shared(ShapeBinding),
    /// One entry per shape, in shape order; used by articulated objects.
    PerShape(Vec<ShapeBinding>),
}

/// Where one object's shapes landed in the table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub name: String,
    pub positions: Range<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct DescriptorTable {
    bindings: Vec<ShapeBinding>,
    objects: Vec<ObjectEntry>,
}

impl DescriptorTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assigns the next free positions to every shape of `geometry` and
    /// records what each position binds.
    ///
    /// # Panics
    ///
    /// Panics when per-shape bindings do not match the shape count, or when
    /// a shape already has a position.
    pub fn add_object(
        &mut self,
        name: impl Into<String>,
        geometry: &mut MultiShapeGeometry,
        bindings: ObjectBindings,
    ) -> Range<u32> {
        let name = name.into();
        let shape_count = geometry.shape_count();
        let first = self.bindings.len() as u32;

        match bindings {
            ObjectBindings::Shared(binding) => {
                self.bindings.extend(std::iter::repeat(binding).take(shape_count));
            }
            ObjectBindings::PerShape(per_shape) => {
                assert_eq!(
                    per_shape.len(),
                    shape_count,
                    "object '{name}' has {shape_count} shapes but {} bindings",
                    per_shape.len()
                );
                self.bindings.extend(per_shape);
            }
        }

        for shape in 0..shape_count {
            geometry.set_descriptor_set_position(shape, first + shape as u32);
        }

        let positions = first..first + shape_count as u32;
        log::debug!("Object '{}' bound at descriptor positions {:?}", name, positions);
        self.objects.push(ObjectEntry {
            name,
            positions: positions.clone(),
        });
        positions
    }

    pub fn binding(&self, position: u32) -> ShapeBinding {
        self.bindings[position as usize]
    }

    pub fn bindings(&self) -> &[ShapeBinding] {
        &self.bindings
    }

    pub fn objects(&self) -> &[ObjectEntry] {
        &self.objects
    }

    pub fn object(&self, name: &str) -> Option<&ObjectEntry> {
        self.objects.iter().find(|entry| entry.name == name)
    }

    /// Total number of descriptor sets.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
