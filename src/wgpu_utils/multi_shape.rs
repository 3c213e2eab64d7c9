//! GPU resources for multi-shape geometry
//!
//! Bind group 0 holds [`WorldInfo`] at [`WORLD_BINDING`]. Bind group 1 is
//! per descriptor position and holds that position's [`Transforms`] and
//! [`AnimShadeData`] at [`TRANSFORM_BINDING`] and [`ANIM_SHADE_BINDING`].

use std::ops::Range;

use wgpu::util::DeviceExt;

use super::{binding_types, UniformBuffer};
use crate::gfx::geometry::MultiShapeGeometry;
use crate::gfx::uniforms::{
    AnimShadeData, DescriptorTable, Transforms, Uniforms, WorldInfo, ANIM_SHADE_BINDING,
    TRANSFORM_BINDING, WORLD_BINDING,
};

/// Vertex and index buffers of one asset.
pub struct GeometryBuffers {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    /// Index range and descriptor position of each shape
    pub shapes: Vec<(Range<u32>, u32)>,
}

impl GeometryBuffers {
    /// Uploads `geometry`, whose shapes must already have descriptor
    /// positions.
    pub fn upload(device: &wgpu::Device, label: &str, geometry: &MultiShapeGeometry) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(geometry.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(geometry.indices()),
            usage: wgpu::BufferUsages::INDEX,
        });
        let shapes = (0..geometry.shape_count())
            .map(|shape| {
                (
                    geometry.shape(shape).indices(),
                    geometry.descriptor_set_position(shape),
                )
            })
            .collect();

        Self {
            vertex_buffer,
            index_buffer,
            shapes,
        }
    }
}

pub fn world_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("World Bind Group Layout"),
        entries: &[binding_types::uniform_entry(WORLD_BINDING)],
    })
}

pub fn shape_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Shape Bind Group Layout"),
        entries: &[
            binding_types::uniform_entry(TRANSFORM_BINDING),
            binding_types::uniform_entry(ANIM_SHADE_BINDING),
        ],
    })
}

struct ShapeSlot {
    transforms: UniformBuffer<Transforms>,
    anim_shade: UniformBuffer<AnimShadeData>,
    bind_group: wgpu::BindGroup,
}

/// Uniform buffers and bind groups for every descriptor position, plus the
/// world block.
pub struct ShapeBindings {
    world: UniformBuffer<WorldInfo>,
    world_bind_group: wgpu::BindGroup,
    slots: Vec<ShapeSlot>,
}

impl ShapeBindings {
    pub fn new(
        device: &wgpu::Device,
        world_layout: &wgpu::BindGroupLayout,
        shape_layout: &wgpu::BindGroupLayout,
        table: &DescriptorTable,
        uniforms: &Uniforms,
    ) -> Self {
        let world = UniformBuffer::new_with_data(device, &uniforms.world);
        let world_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("World Bind Group"),
            layout: world_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: WORLD_BINDING,
                resource: world.binding_resource(),
            }],
        });

        let slots = table
            .bindings()
            .iter()
            .enumerate()
            .map(|(position, binding)| {
                let transforms =
                    UniformBuffer::new_with_data(device, uniforms.transforms.get(binding.transforms));
                let anim_shade =
                    UniformBuffer::new_with_data(device, uniforms.anim_shade.get(binding.anim_shade));
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Shape Bind Group {position}")),
                    layout: shape_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: TRANSFORM_BINDING,
                            resource: transforms.binding_resource(),
                        },
                        wgpu::BindGroupEntry {
                            binding: ANIM_SHADE_BINDING,
                            resource: anim_shade.binding_resource(),
                        },
                    ],
                });
                ShapeSlot {
                    transforms,
                    anim_shade,
                    bind_group,
                }
            })
            .collect();

        Self {
            world,
            world_bind_group,
            slots,
        }
    }

    /// Copies the current uniform values into the buffers. Positions whose
    /// values did not change since the last sync are skipped.
    ///
    /// Returns the number of buffer writes queued.
    pub fn sync(&mut self, queue: &wgpu::Queue, uniforms: &Uniforms, table: &DescriptorTable) -> usize {
        let mut writes = usize::from(self.world.update_content(queue, &uniforms.world));
        for (slot, binding) in self.slots.iter_mut().zip(table.bindings()) {
            writes += usize::from(
                slot.transforms
                    .update_content(queue, uniforms.transforms.get(binding.transforms)),
            );
            writes += usize::from(
                slot.anim_shade
                    .update_content(queue, uniforms.anim_shade.get(binding.anim_shade)),
            );
        }
        writes
    }

    pub fn world_bind_group(&self) -> &wgpu::BindGroup {
        &self.world_bind_group
    }

    pub fn bind_group(&self, position: u32) -> &wgpu::BindGroup {
        &self.slots[position as usize].bind_group
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

pub trait DrawMultiShape<'a> {
    /// Draws every shape of `geometry`, each with the bind group of its
    /// descriptor position at group 1.
    fn draw_multi_shape(&mut self, geometry: &'a GeometryBuffers, bindings: &'a ShapeBindings);
}

impl<'a, 'b> DrawMultiShape<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_multi_shape(&mut self, geometry: &'b GeometryBuffers, bindings: &'b ShapeBindings) {
        self.set_vertex_buffer(0, geometry.vertex_buffer.slice(..));
        self.set_index_buffer(geometry.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, bindings.world_bind_group(), &[]);
        for (indices, position) in &geometry.shapes {
            if indices.is_empty() {
                continue;
            }
            self.set_bind_group(1, bindings.bind_group(*position), &[]);
            self.draw_indexed(indices.clone(), 0, 0..1);
        }
    }
}

/// Adapter and device without a surface, for offline upload.
pub async fn headless_device() -> anyhow::Result<(wgpu::Device, wgpu::Queue)> {
    use anyhow::Context;

    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::default(),
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await
        .context("no suitable GPU adapter")?;
    log::info!("Using adapter {:?}", adapter.get_info().name);

    adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Strata Device"),
            required_features: wgpu::Features::default(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            memory_hints: wgpu::MemoryHints::default(),
            trace: wgpu::Trace::Off,
        })
        .await
        .context("failed to create GPU device")
}
