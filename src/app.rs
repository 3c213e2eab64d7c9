//! # Scene director
//!
//! Owns the loaded assets and every uniform value of the demo scene, lays
//! the assets out in the descriptor table once, and animates them each
//! frame. Rendering reads the results through [`SceneDirector::uniforms`]
//! and [`SceneDirector::table`].
//!
//! Objects are recognised by asset name (the file stem). Known names get a
//! hand-picked material and motion; anything else is drawn in place with the
//! default material. An asset named `dummy` is treated as the articulated
//! mannequin and posed with [`humanoid_pose`] every frame.

use std::collections::HashMap;

use anyhow::Context;
use cgmath::{Deg, Matrix4, Rad, Vector3};

use crate::config::SceneConfig;
use crate::gfx::camera::OrbitView;
use crate::gfx::hierarchy::{humanoid_pose, HumanoidPart, Pose, PoseInputs, HELD_ITEM_SLOT};
use crate::gfx::input::FrameInput;
use crate::gfx::loaders::AssetLibrary;
use crate::gfx::textures::TextureRegistry;
use crate::gfx::uniforms::{
    AnimShadeData, DescriptorTable, ObjectBindings, ShadingLayer, ShapeBinding, Transforms,
    Uniforms, WorldInfo,
};

/// Asset name of the articulated mannequin.
pub const RIG_ASSET: &str = "dummy";
/// Asset name of the ball the mannequin holds.
pub const HELD_ASSET: &str = "ballTex";

const DUMMY_SCALE: f32 = 1.0 / 25.0;
/// World-space size of the held ball.
const HELD_BALL_SCALE: f32 = 0.3;
const ORBIT_RADIUS: f32 = 4.5;

/// Textures known to the demo scene, in shader index order.
const DEMO_TEXTURES: [(&str, &str); 6] = [
    ("ball", "textures/ball.png"),
    ("suzanne", "textures/suzanne.png"),
    ("cube", "textures/cube.png"),
    ("moon", "textures/moon.png"),
    ("lantern", "textures/lantern.png"),
    ("milk_truck", "textures/milk_truck.png"),
];

/// Named Blinn-Phong materials.
pub fn blinn_phong_colors() -> HashMap<&'static str, AnimShadeData> {
    let ambient = [0.05, 0.05, 0.05, 1.0];
    let specular = [0.5, 0.5, 0.5, 1.0];
    HashMap::from([
        (
            "cyan",
            AnimShadeData::new([0.0, 1.0, 1.0, 1.0], ambient, specular, 100.0, ShadingLayer::BlinnPhong),
        ),
        (
            "red",
            AnimShadeData::new([1.0, 0.0, 0.0, 1.0], ambient, specular, 100.0, ShadingLayer::BlinnPhong),
        ),
        (
            "purple",
            AnimShadeData::with_diffuse([0.5, 0.1, 0.7, 1.0], 50.0, ShadingLayer::BlinnPhong),
        ),
        ("white", AnimShadeData::default()),
    ])
}

enum ObjectKind {
    Rigid(ShapeBinding),
    Articulated {
        pose: Pose,
        parts: Vec<ShapeBinding>,
    },
}

struct SceneObject {
    name: String,
    kind: ObjectKind,
    /// Layer restored when no override is active
    base_layer: ShadingLayer,
}

impl SceneObject {
    fn anim_shade_bindings(&self) -> Vec<ShapeBinding> {
        match &self.kind {
            ObjectKind::Rigid(binding) => vec![*binding],
            ObjectKind::Articulated { parts, .. } => parts.clone(),
        }
    }
}

pub struct SceneDirector {
    config: SceneConfig,
    library: AssetLibrary,
    uniforms: Uniforms,
    table: DescriptorTable,
    textures: TextureRegistry,
    view: OrbitView,
    objects: Vec<SceneObject>,
    /// Cursor position accumulated from frame deltas
    cursor: (f32, f32),
}

impl SceneDirector {
    /// Assigns materials and descriptor positions to every asset in
    /// `library`.
    ///
    /// Fails if the mannequin asset does not match its rig.
    pub fn new(config: SceneConfig, mut library: AssetLibrary) -> anyhow::Result<Self> {
        let mut textures = TextureRegistry::new();
        for (name, path) in DEMO_TEXTURES {
            textures.register(name, config.asset_dir.join(path))?;
        }
        let colors = blinn_phong_colors();

        let mut uniforms = Uniforms::default();
        let mut table = DescriptorTable::new();
        let mut objects = Vec::new();

        let names: Vec<String> = library.names().map(str::to_owned).collect();
        for name in names {
            let material = demo_material(&name, &colors, &textures)?;
            let base_layer = material.layer().unwrap_or_default();
            let Some(geometry) = library.get_mut(&name) else {
                continue;
            };

            let kind = if name == RIG_ASSET {
                let pose = humanoid_pose(geometry)
                    .with_context(|| format!("asset '{name}' does not fit the mannequin rig"))?;
                let anim_shade = uniforms.anim_shade.create(material);
                let parts: Vec<ShapeBinding> = (0..geometry.shape_count())
                    .map(|_| ShapeBinding {
                        transforms: uniforms.transforms.create(Transforms::default()),
                        anim_shade,
                    })
                    .collect();
                table.add_object(name.as_str(), geometry, ObjectBindings::PerShape(parts.clone()));
                ObjectKind::Articulated { pose, parts }
            } else {
                let binding = uniforms.create_binding(Transforms::default(), material);
                table.add_object(name.as_str(), geometry, ObjectBindings::Shared(binding));
                ObjectKind::Rigid(binding)
            };

            objects.push(SceneObject {
                name,
                kind,
                base_layer,
            });
        }

        let view = OrbitView::new(&config);
        view.update_world(&mut uniforms.world);

        log::info!(
            "Scene ready: {} objects, {} descriptor sets, {} textures",
            objects.len(),
            table.len(),
            textures.len()
        );

        Ok(Self {
            config,
            library,
            uniforms,
            table,
            textures,
            view,
            objects,
            cursor: (0.0, 0.0),
        })
    }

    /// Advances the scene to `input.time` and writes every uniform value.
    pub fn animate(&mut self, input: &FrameInput) {
        self.view.apply_cursor(input.cursor_delta);
        self.view.apply_scroll(input.scroll);
        self.view.update_world(&mut self.uniforms.world);
        self.cursor.0 += input.cursor_delta.0;
        self.cursor.1 += input.cursor_delta.1;

        self.apply_shading_override(input.shading_override);

        let time = input.time;
        let mut hand = None;
        for object in &self.objects {
            match &object.kind {
                ObjectKind::Rigid(binding) => {
                    if let Some(model) = demo_motion(&object.name, time) {
                        self.uniforms.transforms.get_mut(binding.transforms).set_model(model);
                    }
                }
                ObjectKind::Articulated { pose, parts } => {
                    let model = rig_placement();
                    let output = pose.evaluate(&PoseInputs {
                        time,
                        cursor: self.cursor,
                    });
                    for (binding, local) in parts.iter().zip(&output.matrices) {
                        self.uniforms
                            .transforms
                            .get_mut(binding.transforms)
                            .set_model(model * *local);
                    }
                    let pivot = pose.skeleton().pivot(HumanoidPart::RightHand.index());
                    hand = Some(model * output.snapshots[HELD_ITEM_SLOT] * Matrix4::from_translation(pivot));
                }
            }
        }

        if let Some(hand) = hand {
            self.attach_to_hand(hand);
        }

        if log::log_enabled!(log::Level::Debug) {
            for name in self.object_names() {
                if let Some(model) = self.model(name) {
                    log::debug!("t = {:.3}s {}: {:?}", time, name, Into::<[[f32; 4]; 4]>::into(model));
                }
            }
        }
    }

    fn attach_to_hand(&mut self, hand: Matrix4<f32>) {
        let Some(ball) = self.object(HELD_ASSET) else {
            return;
        };
        let ObjectKind::Rigid(binding) = ball.kind else {
            return;
        };
        let model = hand * Matrix4::from_scale(HELD_BALL_SCALE / DUMMY_SCALE);
        self.uniforms.transforms.get_mut(binding.transforms).set_model(model);
    }

    /// Forces every object's layer, or restores each object's own layer.
    fn apply_shading_override(&mut self, shading_override: Option<ShadingLayer>) {
        for object in &self.objects {
            let layer = shading_override.unwrap_or(object.base_layer);
            for binding in object.anim_shade_bindings() {
                self.uniforms.anim_shade.get_mut(binding.anim_shade).set_layer(layer);
            }
        }
    }

    fn object(&self, name: &str) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Model matrix of a rigid object, or of the mannequin's first part.
    pub fn model(&self, name: &str) -> Option<Matrix4<f32>> {
        let binding = match &self.object(name)?.kind {
            ObjectKind::Rigid(binding) => *binding,
            ObjectKind::Articulated { parts, .. } => *parts.first()?,
        };
        Some(self.uniforms.model(binding))
    }

    /// Model matrices of every part of an articulated object.
    pub fn part_models(&self, name: &str) -> Option<Vec<Matrix4<f32>>> {
        match &self.object(name)?.kind {
            ObjectKind::Articulated { parts, .. } => {
                Some(parts.iter().map(|binding| self.uniforms.model(*binding)).collect())
            }
            ObjectKind::Rigid(_) => None,
        }
    }

    pub fn anim_shade(&self, name: &str) -> Option<&AnimShadeData> {
        let binding = self.object(name)?.anim_shade_bindings().into_iter().next()?;
        Some(self.uniforms.anim_shade.get(binding.anim_shade))
    }

    pub fn is_articulated(&self, name: &str) -> bool {
        matches!(
            self.object(name).map(|object| &object.kind),
            Some(ObjectKind::Articulated { .. })
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.config.viewport = (width, height);
        self.view.resize(width, height);
        self.view.update_world(&mut self.uniforms.world);
    }

    pub fn object_names(&self) -> impl Iterator<Item = &str> {
        self.objects.iter().map(|object| object.name.as_str())
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn library(&self) -> &AssetLibrary {
        &self.library
    }

    pub fn uniforms(&self) -> &Uniforms {
        &self.uniforms
    }

    pub fn world(&self) -> &WorldInfo {
        &self.uniforms.world
    }

    pub fn table(&self) -> &DescriptorTable {
        &self.table
    }

    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    pub fn view(&self) -> &OrbitView {
        &self.view
    }
}

fn demo_material(
    name: &str,
    colors: &HashMap<&'static str, AnimShadeData>,
    textures: &TextureRegistry,
) -> anyhow::Result<AnimShadeData> {
    let color = |key: &str| colors.get(key).copied().unwrap_or_default();
    let textured = |layer, texture: &str| -> anyhow::Result<AnimShadeData> {
        Ok(AnimShadeData::textured(layer, textures.handle(texture)?.index()))
    };

    Ok(match name {
        "bunny" => color("cyan"),
        "vulkan" => color("red"),
        "suzanne" => textured(ShadingLayer::TexturedShaded, "suzanne")?,
        "ballTex" => textured(ShadingLayer::TexturedShaded, "ball")?,
        "Cube" => textured(ShadingLayer::TexturedFlat, "cube")?,
        "Lantern" => textured(ShadingLayer::TexturedFlat, "lantern")?,
        "CesiumMilkTruck" => textured(ShadingLayer::TexturedShaded, "milk_truck")?,
        "OrientationTest" | RIG_ASSET => color("purple"),
        _ => color("white"),
    })
}

/// Places the mannequin in the scene.
pub fn rig_placement() -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(0.0, 0.0, 2.0))
        * Matrix4::from_angle_x(Rad(-std::f32::consts::FRAC_PI_2))
        * Matrix4::from_scale(DUMMY_SCALE)
}

/// Orbits around the center at [`ORBIT_RADIUS`], bobbing, while spinning.
fn orbiting(slot: f32, time: f32) -> Matrix4<f32> {
    let angle = Deg(120.0 * slot);
    let angle = Rad::from(angle).0;
    let offset = Vector3::new(angle.cos(), 0.2 * (time * 4.0 + angle).sin(), angle.sin()) * ORBIT_RADIUS;
    Matrix4::from_angle_y(Rad(-time)) * Matrix4::from_translation(offset) * Matrix4::from_angle_y(Rad(2.0 * time))
}

/// Model matrix of a known rigid object at `time`, `None` to leave it in
/// place.
pub fn demo_motion(name: &str, time: f32) -> Option<Matrix4<f32>> {
    let down = Vector3::new(0.0, -1.0, 0.0);
    let model = match name {
        "vulkan" => Matrix4::from_scale(2.5) * Matrix4::from_angle_y(Rad(time)),
        HELD_ASSET => {
            Matrix4::from_translation(Vector3::new(0.0, 3.0, 0.0))
                * Matrix4::from_axis_angle(down, Rad(time))
        }
        "Cube" => {
            Matrix4::from_translation(Vector3::new(0.0, -3.0, 0.0))
                * Matrix4::from_axis_angle(down, Rad(time))
                * Matrix4::from_nonuniform_scale(time.sin(), time.cos(), 1.0)
        }
        "Lantern" => Matrix4::from_translation(Vector3::new(0.0, 0.0, -2.0)) * Matrix4::from_scale(0.2),
        "OrientationTest" => {
            let axis = Vector3::new(0.0, 1.0, 1.0) / 2.0f32.sqrt();
            Matrix4::from_translation(Vector3::new(0.0, 4.0, -4.0))
                * Matrix4::from_axis_angle(axis, Deg(45.0))
                * Matrix4::from_scale(0.1)
        }
        "CesiumMilkTruck" => {
            Matrix4::from_translation(Vector3::new(0.0, -4.0, -4.0)) * Matrix4::from_scale(0.5)
        }
        "Buggy" => Matrix4::from_translation(Vector3::new(16.0, 4.0, 0.0)) * Matrix4::from_scale(0.05),
        "suzanne" => orbiting(0.0, time),
        "bunny" => orbiting(1.0, time),
        "teapot" => orbiting(2.0, time),
        _ => return None,
    };
    Some(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, SquareMatrix, Vector4};

    fn origin_of(m: Matrix4<f32>) -> Vector3<f32> {
        (m * Vector4::new(0.0, 0.0, 0.0, 1.0)).truncate()
    }

    #[test]
    fn test_orbiters_stay_on_radius() {
        for name in ["suzanne", "bunny", "teapot"] {
            for step in 0..10 {
                let model = demo_motion(name, step as f32 * 0.37).unwrap();
                let p = origin_of(model);
                let horizontal = Vector3::new(p.x, 0.0, p.z).magnitude();
                assert!((horizontal - ORBIT_RADIUS).abs() < 1e-3, "{name}: {horizontal}");
                assert!(p.y.abs() <= 0.2 * ORBIT_RADIUS + 1e-4);
            }
        }
    }

    #[test]
    fn test_orbiters_are_spaced_apart() {
        let a = origin_of(demo_motion("suzanne", 0.0).unwrap());
        let b = origin_of(demo_motion("bunny", 0.0).unwrap());
        let c = origin_of(demo_motion("teapot", 0.0).unwrap());
        let chord = 2.0 * ORBIT_RADIUS * (std::f32::consts::PI / 3.0).sin();
        for (p, q) in [(a, b), (b, c), (c, a)] {
            let d = Vector3::new(p.x - q.x, 0.0, p.z - q.z).magnitude();
            assert!((d - chord).abs() < 1e-3);
        }
    }

    #[test]
    fn test_unknown_objects_stay_put() {
        assert!(demo_motion("rock", 1.0).is_none());
        assert_eq!(origin_of(demo_motion("Lantern", 3.0).unwrap()), Vector3::new(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_color_map() {
        let colors = blinn_phong_colors();
        assert_eq!(colors["cyan"].diffuse, [0.0, 1.0, 1.0, 1.0]);
        assert_eq!(colors["red"].shininess, 100.0);
        assert_eq!(colors["purple"].shininess, 50.0);
        assert_eq!(colors["white"], AnimShadeData::default());
    }

    #[test]
    fn test_materials_resolve_textures() {
        let mut textures = TextureRegistry::new();
        for (name, path) in DEMO_TEXTURES {
            textures.register(name, path).unwrap();
        }
        let colors = blinn_phong_colors();
        let cube = demo_material("Cube", &colors, &textures).unwrap();
        assert_eq!(cube.layer(), Some(ShadingLayer::TexturedFlat));
        assert_eq!(cube.texture(), Some(2));
        let rock = demo_material("rock", &colors, &textures).unwrap();
        assert_eq!(rock, AnimShadeData::default());

        let empty = TextureRegistry::new();
        assert!(demo_material("suzanne", &colors, &empty).is_err());
    }

    #[test]
    fn test_rig_placement_is_identity_free() {
        assert_ne!(rig_placement(), Matrix4::identity());
        assert!((origin_of(rig_placement()) - Vector3::new(0.0, 0.0, 2.0)).magnitude() < 1e-6);
    }
}
