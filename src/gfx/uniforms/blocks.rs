//! Uniform block layouts shared with the shaders
//!
//! All blocks are `#[repr(C)]` and laid out for std140: matrices and
//! vectors are 16-byte aligned and every block size is a multiple of 16.
//! Field order MUST match the shader declarations.

use cgmath::{Matrix4, SquareMatrix};

/// Shading mode selected per object, or forced for all objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum ShadingLayer {
    #[default]
    BlinnPhong = 0,
    NormalMap = 1,
    TextureMap = 2,
    TexturedFlat = 3,
    TexturedShaded = 4,
}

impl ShadingLayer {
    pub const ALL: [ShadingLayer; 5] = [
        ShadingLayer::BlinnPhong,
        ShadingLayer::NormalMap,
        ShadingLayer::TextureMap,
        ShadingLayer::TexturedFlat,
        ShadingLayer::TexturedShaded,
    ];

    pub fn from_u32(value: u32) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Parses a CLI-style name such as `blinn-phong` or `textured_flat`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().replace('_', "-").as_str() {
            "blinn-phong" | "phong" => Some(ShadingLayer::BlinnPhong),
            "normal-map" | "normals" => Some(ShadingLayer::NormalMap),
            "texture-map" => Some(ShadingLayer::TextureMap),
            "textured-flat" | "flat" => Some(ShadingLayer::TexturedFlat),
            "textured-shaded" | "textured" => Some(ShadingLayer::TexturedShaded),
            _ => None,
        }
    }
}

const IDENTITY: [[f32; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Scene-wide data, bound once at binding 0.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct WorldInfo {
    pub view: [[f32; 4]; 4],
    pub perspective: [[f32; 4]; 4],
    /// Homogeneous positions, w = 1
    pub light_positions: [[f32; 4]; 8],
}

impl Default for WorldInfo {
    /// Identity view and projection, one light at each corner of the unit cube.
    fn default() -> Self {
        Self {
            view: IDENTITY,
            perspective: IDENTITY,
            light_positions: [
                [1.0, 1.0, 1.0, 1.0],
                [-1.0, 1.0, 1.0, 1.0],
                [1.0, 1.0, -1.0, 1.0],
                [-1.0, 1.0, -1.0, 1.0],
                [1.0, -1.0, 1.0, 1.0],
                [-1.0, -1.0, 1.0, 1.0],
                [1.0, -1.0, -1.0, 1.0],
                [-1.0, -1.0, -1.0, 1.0],
            ],
        }
    }
}

impl WorldInfo {
    pub fn set_view(&mut self, view: Matrix4<f32>) {
        self.view = view.into();
    }

    pub fn set_perspective(&mut self, perspective: Matrix4<f32>) {
        self.perspective = perspective.into();
    }
}

/// Per-draw model matrix, binding 1.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Transforms {
    pub model: [[f32; 4]; 4],
}

impl Default for Transforms {
    fn default() -> Self {
        Self { model: IDENTITY }
    }
}

impl Transforms {
    pub fn new(model: Matrix4<f32>) -> Self {
        Self { model: model.into() }
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from(self.model)
    }

    pub fn set_model(&mut self, model: Matrix4<f32>) {
        self.model = model.into();
    }

    pub fn is_identity(&self) -> bool {
        self.model_matrix() == Matrix4::identity()
    }
}

/// Per-draw material and animation parameters, binding 2.
///
/// The lighting values are passed through to the shader untouched.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AnimShadeData {
    pub diffuse: [f32; 4],
    pub ambient: [f32; 4],
    pub specular: [f32; 4],
    pub shininess: f32,
    pub shading_layer: u32,
    /// Texture handle, [`AnimShadeData::NO_TEXTURE`] for none
    pub texture_index: u32,
    _pad: u32,
}
// 3 * 16 + 4 * 4 = 64 bytes

impl Default for AnimShadeData {
    /// Untextured grey steel.
    fn default() -> Self {
        Self {
            diffuse: [1.0; 4],
            ambient: [0.1, 0.1, 0.1, 0.0],
            specular: [1.0; 4],
            shininess: 300.0,
            shading_layer: ShadingLayer::BlinnPhong as u32,
            texture_index: Self::NO_TEXTURE,
            _pad: 0,
        }
    }
}

impl AnimShadeData {
    pub const NO_TEXTURE: u32 = u32::MAX;

    /// Default lighting with a texture.
    pub fn textured(layer: ShadingLayer, texture_index: u32) -> Self {
        Self {
            shading_layer: layer as u32,
            texture_index,
            ..Default::default()
        }
    }

    /// Default lighting with a custom diffuse color and shininess.
    pub fn with_diffuse(diffuse: [f32; 4], shininess: f32, layer: ShadingLayer) -> Self {
        Self {
            diffuse,
            shininess,
            shading_layer: layer as u32,
            ..Default::default()
        }
    }

    pub fn new(
        diffuse: [f32; 4],
        ambient: [f32; 4],
        specular: [f32; 4],
        shininess: f32,
        layer: ShadingLayer,
    ) -> Self {
        Self {
            diffuse,
            ambient,
            specular,
            shininess,
            shading_layer: layer as u32,
            ..Default::default()
        }
    }

    pub fn layer(&self) -> Option<ShadingLayer> {
        ShadingLayer::from_u32(self.shading_layer)
    }

    pub fn set_layer(&mut self, layer: ShadingLayer) {
        self.shading_layer = layer as u32;
    }

    pub fn texture(&self) -> Option<u32> {
        (self.texture_index != Self::NO_TEXTURE).then_some(self.texture_index)
    }
}
