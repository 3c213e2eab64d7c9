//! Wavefront OBJ loading
//!
//! Parsing is done by `tobj` with the per-attribute index streams kept
//! separate, so welding happens here and matches what the file describes.
//! Each `tobj` model becomes one shape.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{FormatError, LoadError, LoadResult};
use crate::gfx::geometry::MultiShapeGeometry;

use super::welder::{AttributeArrays, IndexKey, VertexWelder};

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        single_index: false,
        triangulate: false,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Loads an OBJ file into a multi-shape geometry.
///
/// Material libraries are not read; shading parameters are assigned by the
/// application.
pub fn load_obj(path: impl AsRef<Path>) -> LoadResult<MultiShapeGeometry> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_obj_from_reader(&mut BufReader::new(file), path)
}

/// Loads OBJ text from any buffered reader.
///
/// `name` is only used to label errors.
pub fn load_obj_from_reader<R: BufRead>(
    reader: &mut R,
    name: impl AsRef<Path>,
) -> LoadResult<MultiShapeGeometry> {
    let name = name.as_ref();
    let (models, _materials) =
        tobj::load_obj_buf(reader, &load_options(), |_| Ok(Default::default())).map_err(
            |source| LoadError::Obj {
                path: name.to_path_buf(),
                source,
            },
        )?;

    let geometry = process_obj_models(&models).map_err(|source| LoadError::Format {
        path: name.to_path_buf(),
        source,
    })?;

    log::info!(
        "Loaded OBJ '{}': {} shapes, {} vertices, {} triangles",
        name.display(),
        geometry.shape_count(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    Ok(geometry)
}

/// Attribute values keyed by bit pattern, so a value that tobj copied into
/// several models gets one asset-wide id.
struct AttributeInterner<const N: usize> {
    ids: HashMap<[u32; N], u32>,
    values: Vec<f32>,
}

impl<const N: usize> AttributeInterner<N> {
    fn new() -> Self {
        Self {
            ids: HashMap::new(),
            values: Vec::new(),
        }
    }

    fn intern(&mut self, value: &[f32]) -> u32 {
        let key: [u32; N] = std::array::from_fn(|i| value[i].to_bits());
        match self.ids.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = (self.values.len() / N) as u32;
                self.values.extend_from_slice(value);
                *entry.insert(id)
            }
        }
    }

    /// Asset-wide ids of one model's attribute array, in model order.
    fn intern_all(&mut self, attribute: &'static str, values: &[f32]) -> Result<Vec<u32>, FormatError> {
        if values.len() % N != 0 {
            return Err(FormatError::MalformedAttributes {
                attribute,
                len: values.len(),
                stride: N,
            });
        }
        Ok(values.chunks_exact(N).map(|value| self.intern(value)).collect())
    }
}

/// Maps a model-local attribute index to its asset-wide id.
fn remap(attribute: &'static str, ids: &[u32], index: u32) -> Result<u32, FormatError> {
    ids.get(index as usize)
        .copied()
        .ok_or(FormatError::AttributeIndexOutOfRange {
            attribute,
            index: index as usize,
            len: ids.len(),
        })
}

/// Attribute arrays of the whole file plus each model's corners, keyed by
/// asset-wide attribute ids.
struct ObjContents {
    positions: Vec<f32>,
    normals: Vec<f32>,
    texcoords: Vec<f32>,
    shapes: Vec<ObjShape>,
}

struct ObjShape {
    name: String,
    keys: Vec<IndexKey>,
    face_arities: Vec<u32>,
}

impl ObjContents {
    fn gather(models: &[tobj::Model]) -> Result<Self, FormatError> {
        let mut positions = AttributeInterner::<3>::new();
        let mut normals = AttributeInterner::<3>::new();
        let mut texcoords = AttributeInterner::<2>::new();
        let mut shapes = Vec::with_capacity(models.len());

        for model in models {
            let mesh = &model.mesh;
            let position_ids = positions.intern_all("position", &mesh.positions)?;
            let normal_ids = normals.intern_all("normal", &mesh.normals)?;
            let texcoord_ids = texcoords.intern_all("texcoord", &mesh.texcoords)?;

            let normal_indices = optional_stream("normal", &mesh.normal_indices, mesh.indices.len())?;
            let texcoord_indices =
                optional_stream("texcoord", &mesh.texcoord_indices, mesh.indices.len())?;

            let keys = mesh
                .indices
                .iter()
                .enumerate()
                .map(|(corner, &vertex_index)| {
                    Ok(IndexKey::new(
                        remap("position", &position_ids, vertex_index)?,
                        normal_indices
                            .map(|n| remap("normal", &normal_ids, n[corner]))
                            .transpose()?,
                        texcoord_indices
                            .map(|t| remap("texcoord", &texcoord_ids, t[corner]))
                            .transpose()?,
                    ))
                })
                .collect::<Result<Vec<_>, FormatError>>()?;

            shapes.push(ObjShape {
                name: model.name.clone(),
                keys,
                face_arities: mesh.face_arities.clone(),
            });
        }

        Ok(ObjContents {
            positions: positions.values,
            normals: normals.values,
            texcoords: texcoords.values,
            shapes,
        })
    }

    fn attributes(&self) -> AttributeArrays<'_> {
        AttributeArrays {
            positions: &self.positions,
            normals: &self.normals,
            texcoords: &self.texcoords,
        }
    }
}

/// An attribute index stream is either absent or parallel to the position
/// indices.
fn optional_stream<'a>(
    attribute: &'static str,
    stream: &'a [u32],
    corners: usize,
) -> Result<Option<&'a [u32]>, FormatError> {
    match stream.len() {
        0 => Ok(None),
        len if len == corners => Ok(Some(stream)),
        found => Err(FormatError::AttributeCountMismatch {
            attribute,
            expected: corners,
            found,
        }),
    }
}

/// Welds every model into one geometry, one shape per model.
pub(crate) fn process_obj_models(models: &[tobj::Model]) -> Result<MultiShapeGeometry, FormatError> {
    let contents = ObjContents::gather(models)?;
    let attributes = contents.attributes();
    attributes.validate()?;

    let total_corners = contents.shapes.iter().map(|s| s.keys.len()).sum();
    let mut welder = VertexWelder::with_capacity(total_corners);
    let mut geometry = MultiShapeGeometry::new();

    for shape in &contents.shapes {
        let indices = welder.weld_faces(&shape.keys, &shape.face_arities, &attributes)?;
        log::debug!(
            "OBJ shape '{}': {} triangles, {} distinct vertices so far",
            shape.name,
            indices.len() / 3,
            welder.vertex_count()
        );
        geometry.add_shape(&indices);
    }

    log::trace!(
        "Welded {} face corners into {} vertices",
        total_corners,
        welder.vertex_count()
    );
    geometry.set_vertices(welder.into_vertices());
    geometry.compute_bbox_centers();
    Ok(geometry)
}
