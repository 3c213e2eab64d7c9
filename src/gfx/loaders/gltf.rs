//! glTF 2.0 loading
//!
//! The document is parsed and its buffers resolved by the `gltf` crate.
//! Node transforms are resolved with [`SceneGraph`] and baked into the
//! vertex data, so every primitive lands in model space of the whole asset.
//! Each primitive of each mesh instance becomes one shape.

use std::path::Path;

use cgmath::{InnerSpace, Matrix4, Vector4};

use crate::error::{FormatError, LoadError, LoadResult};
use crate::gfx::geometry::{MultiShapeGeometry, Vertex};
use crate::gfx::scene::{SceneGraph, SourceNode};

/// Loads a `.gltf` or `.glb` file into a multi-shape geometry.
///
/// External buffers are resolved relative to the file's directory.
pub fn load_gltf(path: impl AsRef<Path>) -> LoadResult<MultiShapeGeometry> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_gltf_from_slice(&bytes, path.parent(), path)
}

/// Loads glTF JSON or GLB bytes.
///
/// `base` is the directory used to resolve relative buffer URIs; `name` only
/// labels errors.
pub fn load_gltf_from_slice(
    bytes: &[u8],
    base: Option<&Path>,
    name: impl AsRef<Path>,
) -> LoadResult<MultiShapeGeometry> {
    let name = name.as_ref();
    let gltf_error = |source: gltf::Error| LoadError::Gltf {
        path: name.to_path_buf(),
        source,
    };

    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(bytes).map_err(gltf_error)?;
    let buffers = gltf::import_buffers(&document, base, blob).map_err(gltf_error)?;

    let geometry = process_gltf_document(&document, &buffers).map_err(|source| {
        LoadError::Format {
            path: name.to_path_buf(),
            source,
        }
    })?;

    log::info!(
        "Loaded glTF '{}': {} shapes, {} vertices, {} triangles",
        name.display(),
        geometry.shape_count(),
        geometry.vertex_count(),
        geometry.triangle_count()
    );
    Ok(geometry)
}

/// Root nodes of the default scene, or of every scene when none is marked
/// default.
fn scene_roots(document: &gltf::Document) -> Vec<usize> {
    match document.default_scene() {
        Some(scene) => scene.nodes().map(|node| node.index()).collect(),
        None => document
            .scenes()
            .flat_map(|scene| scene.nodes().map(|node| node.index()).collect::<Vec<_>>())
            .collect(),
    }
}

fn source_nodes(document: &gltf::Document) -> Vec<SourceNode> {
    document
        .nodes()
        .map(|node| SourceNode {
            transform: node.transform().into(),
            mesh: node.mesh().map(|mesh| mesh.index()),
            children: node.children().map(|child| child.index()).collect(),
        })
        .collect()
}

/// Builds the geometry from an already parsed document.
pub(crate) fn process_gltf_document(
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
) -> Result<MultiShapeGeometry, FormatError> {
    let graph = SceneGraph::build(&source_nodes(document), &scene_roots(document));
    let meshes: Vec<gltf::Mesh> = document.meshes().collect();

    let mut vertices: Vec<Vertex> = Vec::new();
    let mut geometry = MultiShapeGeometry::new();

    for (arena_index, mesh_index, ctm) in graph.mesh_instances() {
        let mesh = &meshes[mesh_index];
        log::debug!(
            "glTF node {} instances mesh {} ({} primitives)",
            graph.nodes()[arena_index].source,
            mesh_index,
            mesh.primitives().count()
        );
        for primitive in mesh.primitives() {
            let base = vertices.len() as u32;
            let indices = read_primitive(&primitive, mesh_index, buffers, ctm, &mut vertices)?;
            let shifted: Vec<u32> = indices.iter().map(|&i| i + base).collect();
            geometry.add_shape(&shifted);
        }
    }

    geometry.set_vertices(vertices);
    geometry.compute_bbox_centers();
    Ok(geometry)
}

/// Appends the primitive's transformed vertices and returns its local
/// indices.
fn read_primitive(
    primitive: &gltf::Primitive,
    mesh: usize,
    buffers: &[gltf::buffer::Data],
    ctm: Matrix4<f32>,
    vertices: &mut Vec<Vertex>,
) -> Result<Vec<u32>, FormatError> {
    let primitive_index = primitive.index();
    if primitive.mode() != gltf::mesh::Mode::Triangles {
        return Err(FormatError::UnsupportedPrimitiveMode {
            mesh,
            primitive: primitive_index,
            mode: primitive.mode(),
        });
    }

    let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|data| data.0.as_slice()));

    let positions = reader
        .read_positions()
        .ok_or(FormatError::MissingAttribute {
            mesh,
            primitive: primitive_index,
            attribute: "POSITION",
        })?;
    let start = vertices.len();
    vertices.extend(positions.map(|p| Vertex {
        position: transform_position(ctm, p),
        ..Default::default()
    }));
    let added = &mut vertices[start..];
    let count = added.len();

    if let Some(normals) = reader.read_normals() {
        let normals: Vec<[f32; 3]> = normals.collect();
        check_count("NORMAL", count, normals.len())?;
        for (vertex, normal) in added.iter_mut().zip(normals) {
            vertex.normal = transform_normal(ctm, normal);
        }
    }

    if let Some(tex_coords) = reader.read_tex_coords(0) {
        let tex_coords: Vec<[f32; 2]> = tex_coords.into_f32().collect();
        check_count("TEXCOORD_0", count, tex_coords.len())?;
        for (vertex, tex_coord) in added.iter_mut().zip(tex_coords) {
            vertex.tex_coord = flip_tex_coord(tex_coord);
        }
    }

    let indices: Vec<u32> = reader
        .read_indices()
        .ok_or(FormatError::MissingIndices {
            mesh,
            primitive: primitive_index,
        })?
        .into_u32()
        .collect();
    if indices.len() % 3 != 0 {
        return Err(FormatError::IndexCountNotTriangles(indices.len()));
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
        return Err(FormatError::AttributeIndexOutOfRange {
            attribute: "vertex",
            index: index as usize,
            len: count,
        });
    }
    Ok(indices)
}

fn check_count(attribute: &'static str, expected: usize, found: usize) -> Result<(), FormatError> {
    if expected == found {
        Ok(())
    } else {
        Err(FormatError::AttributeCountMismatch {
            attribute,
            expected,
            found,
        })
    }
}

/// Transforms a point (w = 1).
pub fn transform_position(ctm: Matrix4<f32>, p: [f32; 3]) -> [f32; 3] {
    (ctm * Vector4::new(p[0], p[1], p[2], 1.0)).truncate().into()
}

/// Transforms a direction (w = 0) and renormalizes it. A zero-length result
/// stays zero.
pub fn transform_normal(ctm: Matrix4<f32>, n: [f32; 3]) -> [f32; 3] {
    let direction = (ctm * Vector4::new(n[0], n[1], n[2], 0.0)).truncate();
    if direction.magnitude2() > 0.0 {
        direction.normalize().into()
    } else {
        direction.into()
    }
}

/// glTF puts the texture origin at the top left, the flat format at the
/// bottom left.
pub fn flip_tex_coord([u, v]: [f32; 2]) -> [f32; 2] {
    [u, -v]
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector3;

    #[test]
    fn test_tex_coord_flip() {
        assert_eq!(flip_tex_coord([0.25, 0.75]), [0.25, -0.75]);
    }

    #[test]
    fn test_normal_ignores_translation() {
        let ctm = Matrix4::from_translation(Vector3::new(5.0, 5.0, 5.0))
            * Matrix4::from_nonuniform_scale(3.0, 3.0, 3.0);
        assert_eq!(transform_normal(ctm, [0.0, 1.0, 0.0]), [0.0, 1.0, 0.0]);
        assert_eq!(transform_position(ctm, [0.0, 1.0, 0.0]), [5.0, 8.0, 5.0]);
        assert_eq!(transform_normal(ctm, [0.0, 0.0, 0.0]), [0.0, 0.0, 0.0]);
    }

    /// Parses `json` without validation, with `bin` as its only buffer.
    fn unvalidated(name: &str, json: &str, bin: &[u8]) -> (gltf::Document, Vec<gltf::buffer::Data>) {
        let dir = std::env::temp_dir().join(format!("strata-gltf-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("buffer.bin"), bin).unwrap();
        let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(json.as_bytes()).unwrap();
        let buffers = gltf::import_buffers(&document, Some(dir.as_path()), blob).unwrap();
        (document, buffers)
    }

    /// Three positions, two normals and one triangle.
    fn short_normals_bin() -> Vec<u8> {
        let mut bin = Vec::new();
        for value in [0.0f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0] {
            bin.extend_from_slice(&value.to_le_bytes());
        }
        for index in [0u32, 1, 2] {
            bin.extend_from_slice(&index.to_le_bytes());
        }
        bin
    }

    fn single_primitive(attributes: &str) -> String {
        format!(
            r#"{{
  "asset": {{ "version": "2.0" }},
  "scene": 0,
  "scenes": [ {{ "nodes": [0] }} ],
  "nodes": [ {{ "mesh": 0 }} ],
  "meshes": [ {{ "primitives": [ {{ "attributes": {attributes}, "indices": 2 }} ] }} ],
  "buffers": [ {{ "uri": "buffer.bin", "byteLength": 72 }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 24 }},
    {{ "buffer": 0, "byteOffset": 60, "byteLength": 12 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5126, "count": 2, "type": "VEC3" }},
    {{ "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" }}
  ]
}}"#
        )
    }

    #[test]
    fn test_normal_count_must_match_positions() {
        let json = single_primitive(r#"{ "POSITION": 0, "NORMAL": 1 }"#);
        let (document, buffers) = unvalidated("normal-count", &json, &short_normals_bin());
        let err = process_gltf_document(&document, &buffers).unwrap_err();
        assert_eq!(
            err,
            FormatError::AttributeCountMismatch {
                attribute: "NORMAL",
                expected: 3,
                found: 2,
            }
        );
    }

    #[test]
    fn test_primitive_without_positions() {
        let json = single_primitive(r#"{ "NORMAL": 1 }"#);
        let (document, buffers) = unvalidated("no-position", &json, &short_normals_bin());
        let err = process_gltf_document(&document, &buffers).unwrap_err();
        assert_eq!(
            err,
            FormatError::MissingAttribute {
                mesh: 0,
                primitive: 0,
                attribute: "POSITION",
            }
        );
    }

    #[test]
    fn test_malformed_json_is_a_gltf_error() {
        let err = load_gltf_from_slice(b"{ not json", None, "broken.gltf").unwrap_err();
        assert!(matches!(err, LoadError::Gltf { .. }));
        assert_eq!(err.path(), Path::new("broken.gltf"));
    }
}
