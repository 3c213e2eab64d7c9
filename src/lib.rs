// src/lib.rs
//! Strata
//!
//! Multi-shape scene loading and animation for a wgpu renderer: OBJ and glTF
//! assets flattened into welded per-shape geometry, a descriptor layout with
//! one uniform pair per drawn shape, and hierarchical posing of articulated
//! assets.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;

pub use app::SceneDirector;
pub use config::SceneConfig;
pub use gfx::loaders::AssetLibrary;

/// Scans `config.asset_dir` and builds a director over everything found.
pub fn load_scene(config: SceneConfig) -> anyhow::Result<SceneDirector> {
    let library = AssetLibrary::scan(&config.asset_dir)?;
    SceneDirector::new(config, library)
}
