//! # Loaders
//!
//! Mesh import for the two supported interchange formats, plus
//! [`AssetLibrary`], which scans an asset directory and loads every
//! recognised file.
//!
//! - `.obj` files go through [`obj::load_obj`], which welds the per-attribute
//!   index streams with [`welder::VertexWelder`].
//! - `.gltf` and `.glb` files go through [`gltf::load_gltf`], which bakes the
//!   node hierarchy into the vertex data.
//!
//! Both produce a [`MultiShapeGeometry`] with bounding-box centers computed.
//!
//! ## Usage
//!
//! ```no_run
//! use strata::gfx::loaders::{load_shape_file, AssetLibrary};
//!
//! let bunny = load_shape_file("assets/bunny.obj")?;
//! println!("{} shapes", bunny.shape_count());
//!
//! let library = AssetLibrary::scan("assets")?;
//! for (name, geometry) in library.iter() {
//!     println!("{name}: {} triangles", geometry.triangle_count());
//! }
//! # Ok::<(), strata::error::LoadError>(())
//! ```

pub mod gltf;
pub mod obj;
pub mod welder;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{LoadError, LoadResult};
use crate::gfx::geometry::MultiShapeGeometry;

pub use self::gltf::{load_gltf, load_gltf_from_slice};
pub use obj::{load_obj, load_obj_from_reader};
pub use welder::{AttributeArrays, IndexKey, VertexWelder};

/// File formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    Obj,
    Gltf,
    Glb,
}

impl AssetFormat {
    /// Matches the extension exactly, as written (`.OBJ` is not an asset).
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "obj" => Some(AssetFormat::Obj),
            "gltf" => Some(AssetFormat::Gltf),
            "glb" => Some(AssetFormat::Glb),
            _ => None,
        }
    }
}

/// Loads one file, picking the loader from its extension.
pub fn load_shape_file(path: impl AsRef<Path>) -> LoadResult<MultiShapeGeometry> {
    let path = path.as_ref();
    match AssetFormat::from_path(path) {
        Some(AssetFormat::Obj) => obj::load_obj(path),
        Some(AssetFormat::Gltf | AssetFormat::Glb) => self::gltf::load_gltf(path),
        None => Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    }
}

/// A loaded asset and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedAsset {
    pub path: PathBuf,
    pub geometry: MultiShapeGeometry,
}

/// Every asset under a directory, keyed by file stem.
///
/// Iteration is in key order, so descriptor-set layout is deterministic for a
/// given directory.
#[derive(Debug, Default)]
pub struct AssetLibrary {
    assets: BTreeMap<String, LoadedAsset>,
}

impl AssetLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recursively loads every `.obj`, `.gltf` and `.glb` file under `dir`.
    ///
    /// Other files are skipped. When two files share a stem the one visited
    /// later replaces the earlier one, with a warning. Any load failure is
    /// returned immediately.
    pub fn scan(dir: impl AsRef<Path>) -> LoadResult<Self> {
        let dir = dir.as_ref();
        let mut library = AssetLibrary::new();

        let walker = WalkDir::new(dir).sort_by_file_name().into_iter();
        for entry in walker {
            let entry = entry.map_err(|err| {
                let path = err.path().unwrap_or(dir).to_path_buf();
                LoadError::Io {
                    path,
                    source: err.into(),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.path();
            if AssetFormat::from_path(path).is_none() {
                log::debug!("Skipping non-asset file {}", path.display());
                continue;
            }
            let geometry = load_shape_file(path)?;
            library.insert_loaded(path, geometry);
        }

        log::info!(
            "Asset library '{}': {} assets, {} shapes",
            dir.display(),
            library.len(),
            library.total_shapes()
        );
        Ok(library)
    }

    /// Adds an already-loaded geometry under the stem of `path`.
    pub fn insert_loaded(&mut self, path: &Path, geometry: MultiShapeGeometry) {
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.insert(name, path.to_path_buf(), geometry);
    }

    /// Adds a geometry under an explicit name.
    pub fn insert(&mut self, name: impl Into<String>, path: PathBuf, geometry: MultiShapeGeometry) {
        let name = name.into();
        if let Some(previous) = self.assets.insert(name.clone(), LoadedAsset { path, geometry }) {
            log::warn!(
                "Asset '{}' defined twice; '{}' replaced",
                name,
                previous.path.display()
            );
        }
    }

    pub fn get(&self, name: &str) -> Option<&MultiShapeGeometry> {
        self.assets.get(name).map(|asset| &asset.geometry)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MultiShapeGeometry> {
        self.assets.get_mut(name).map(|asset| &mut asset.geometry)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.assets.contains_key(name)
    }

    /// Asset names in iteration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MultiShapeGeometry)> {
        self.assets
            .iter()
            .map(|(name, asset)| (name.as_str(), &asset.geometry))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MultiShapeGeometry)> {
        self.assets
            .iter_mut()
            .map(|(name, asset)| (name.as_str(), &mut asset.geometry))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn total_shapes(&self) -> usize {
        self.assets.values().map(|asset| asset.geometry.shape_count()).sum()
    }
}
