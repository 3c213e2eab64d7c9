use std::fs;
use std::path::{Path, PathBuf};

use cgmath::Vector3;
use strata::error::{FormatError, LoadError};
use strata::gfx::loaders::{load_shape_file, AssetLibrary};

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("strata-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

const QUAD_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 1 1 0
v -1 1 0
vn 0 0 1
vt 0 0
vt 1 0
vt 1 1
vt 0 1
o quad
f 1/1/1 2/2/1 3/3/1
f 3/3/1 4/4/1 1/1/1
";

/// One triangle under a three-node chain, each node translating by one unit
/// along a different axis.
fn write_chain_gltf(dir: &Path) -> PathBuf {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let tex_coords: [f32; 6] = [0.25, 0.75, 1.0, 0.0, 0.0, 1.0];
    let indices: [u32; 3] = [0, 1, 2];

    let mut bin = Vec::new();
    for value in positions.iter().chain(&tex_coords) {
        bin.extend_from_slice(&value.to_le_bytes());
    }
    for index in indices {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    assert_eq!(bin.len(), 72);
    fs::write(dir.join("chain.bin"), &bin).unwrap();

    let json = r#"{
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [ { "nodes": [0] } ],
  "nodes": [
    { "translation": [1.0, 0.0, 0.0], "children": [1] },
    { "translation": [0.0, 1.0, 0.0], "children": [2] },
    { "translation": [0.0, 0.0, 1.0], "mesh": 0 }
  ],
  "meshes": [
    { "primitives": [ { "attributes": { "POSITION": 0, "TEXCOORD_0": 1 }, "indices": 2 } ] }
  ],
  "buffers": [ { "uri": "chain.bin", "byteLength": 72 } ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 24 },
    { "buffer": 0, "byteOffset": 60, "byteLength": 12 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC2" },
    { "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" }
  ]
}"#;
    let path = dir.join("chain.gltf");
    fs::write(&path, json).unwrap();
    path
}

fn le_bytes(floats: &[f32], indices: &[u32]) -> Vec<u8> {
    let mut bin = Vec::new();
    for value in floats {
        bin.extend_from_slice(&value.to_le_bytes());
    }
    for index in indices {
        bin.extend_from_slice(&index.to_le_bytes());
    }
    bin
}

/// Writes `<stem>.bin` and a `<stem>.gltf` whose only buffer is that file.
/// `body` holds the remaining top-level members.
fn write_gltf(dir: &Path, stem: &str, bin: &[u8], body: &str) -> PathBuf {
    fs::write(dir.join(format!("{stem}.bin")), bin).unwrap();
    let json = format!(
        r#"{{
  "asset": {{ "version": "2.0" }},
  "buffers": [ {{ "uri": "{stem}.bin", "byteLength": {} }} ],
  {body}
}}"#,
        bin.len()
    );
    let path = dir.join(format!("{stem}.gltf"));
    fs::write(&path, json).unwrap();
    path
}

/// One triangle; `primitive` is spliced into the mesh's primitive object.
fn write_triangle_gltf(dir: &Path, stem: &str, primitive: &str) -> PathBuf {
    let bin = le_bytes(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0], &[0, 1, 2]);
    let body = format!(
        r#""scene": 0,
  "scenes": [ {{ "nodes": [0] }} ],
  "nodes": [ {{ "mesh": 0 }} ],
  "meshes": [ {{ "primitives": [ {{ {primitive} }} ] }} ],
  "bufferViews": [
    {{ "buffer": 0, "byteOffset": 0, "byteLength": 36 }},
    {{ "buffer": 0, "byteOffset": 36, "byteLength": 12 }}
  ],
  "accessors": [
    {{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }},
    {{ "bufferView": 1, "componentType": 5125, "count": 3, "type": "SCALAR" }}
  ]"#
    );
    write_gltf(dir, stem, &bin, &body)
}

/// Two primitives of one mesh, instanced by an untransformed node and by a
/// node that scales by 2, turns 90 degrees about z and moves to x = 5.
fn write_two_instance_gltf(dir: &Path) -> PathBuf {
    let mut floats = Vec::new();
    floats.extend_from_slice(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]);
    floats.extend_from_slice(&[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0]);
    let mut bin = le_bytes(&floats, &[0, 1, 2]);
    floats.clear();
    floats.extend_from_slice(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    floats.extend_from_slice(&[2.0, 0.0, 0.0, 2.0, 0.0, 0.0, 2.0, 0.0, 0.0]);
    bin.extend(le_bytes(&floats, &[2, 1, 0]));
    assert_eq!(bin.len(), 168);

    let body = r#""scene": 0,
  "scenes": [ { "nodes": [0, 1] } ],
  "nodes": [
    { "mesh": 0 },
    { "translation": [5.0, 0.0, 0.0], "rotation": [0.0, 0.0, 0.70710677, 0.70710677],
      "scale": [2.0, 2.0, 2.0], "mesh": 0 }
  ],
  "meshes": [
    { "primitives": [
      { "attributes": { "POSITION": 0, "NORMAL": 1 }, "indices": 2 },
      { "attributes": { "POSITION": 3, "NORMAL": 4 }, "indices": 5 }
    ] }
  ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 72, "byteLength": 12 },
    { "buffer": 0, "byteOffset": 84, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 120, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 156, "byteLength": 12 }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3" },
    { "bufferView": 2, "componentType": 5125, "count": 3, "type": "SCALAR" },
    { "bufferView": 3, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 1.0] },
    { "bufferView": 4, "componentType": 5126, "count": 3, "type": "VEC3" },
    { "bufferView": 5, "componentType": 5125, "count": 3, "type": "SCALAR" }
  ]"#;
    write_gltf(dir, "instances", &bin, body)
}

fn assert_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-5, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_obj_file_loads_through_extension() {
    let dir = scratch_dir("obj-file");
    let path = dir.join("quad.obj");
    fs::write(&path, QUAD_OBJ).unwrap();

    let geometry = load_shape_file(&path).unwrap();
    assert_eq!(geometry.shape_count(), 1);
    assert_eq!(geometry.triangle_count(), 2);
    assert_eq!(geometry.vertex_count(), 4);
    assert_eq!(geometry.bounding_box_centers(), &[Vector3::new(0.0, 0.0, 0.0)]);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = scratch_dir("missing");
    let path = dir.join("nowhere.obj");
    let err = load_shape_file(&path).unwrap_err();
    assert_eq!(err.path(), path.as_path());
}

#[test]
fn test_gltf_chain_bakes_cumulative_transform() {
    let dir = scratch_dir("gltf-chain");
    let path = write_chain_gltf(&dir);

    let geometry = load_shape_file(&path).unwrap();
    assert_eq!(geometry.shape_count(), 1);
    assert_eq!(geometry.indices(), &[0, 1, 2]);

    let vertices = geometry.vertices();
    assert_eq!(vertices[0].position, [1.0, 1.0, 1.0]);
    assert_eq!(vertices[1].position, [2.0, 1.0, 1.0]);
    assert_eq!(vertices[2].position, [1.0, 2.0, 1.0]);
    // no normals in the file
    assert_eq!(vertices[0].normal, [0.0, 0.0, 0.0]);
}

#[test]
fn test_gltf_tex_coords_are_flipped() {
    let dir = scratch_dir("gltf-uv");
    let path = write_chain_gltf(&dir);

    let geometry = load_shape_file(&path).unwrap();
    assert_eq!(geometry.vertices()[0].tex_coord, [0.25, -0.75]);
    assert_eq!(geometry.vertices()[2].tex_coord, [0.0, -1.0]);
}

#[test]
fn test_loading_twice_gives_identical_geometry() {
    let dir = scratch_dir("idempotent");
    let gltf_path = write_chain_gltf(&dir);
    let obj_path = dir.join("quad.obj");
    fs::write(&obj_path, QUAD_OBJ).unwrap();

    for path in [gltf_path, obj_path] {
        let first = load_shape_file(&path).unwrap();
        let second = load_shape_file(&path).unwrap();
        assert_eq!(first.vertices(), second.vertices());
        assert_eq!(first.indices(), second.indices());
        assert_eq!(first.shape_ranges(), second.shape_ranges());
    }
}

#[test]
fn test_broken_gltf_is_an_error() {
    let dir = scratch_dir("gltf-broken");
    let path = dir.join("broken.gltf");
    fs::write(&path, "{ not json").unwrap();
    let err = load_shape_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::Gltf { .. }));
}

#[test]
fn test_scan_skips_non_assets_and_recurses() {
    let dir = scratch_dir("scan");
    fs::create_dir_all(dir.join("nested")).unwrap();
    fs::write(dir.join("quad.obj"), QUAD_OBJ).unwrap();
    fs::write(dir.join("README.txt"), "not a mesh").unwrap();
    fs::write(dir.join("quad.mtl"), "newmtl none").unwrap();
    write_chain_gltf(&dir.join("nested"));

    let library = AssetLibrary::scan(&dir).unwrap();
    assert_eq!(library.names().collect::<Vec<_>>(), vec!["chain", "quad"]);
    assert_eq!(library.total_shapes(), 2);
    assert_eq!(library.get("chain").unwrap().vertices()[0].position, [1.0, 1.0, 1.0]);
}

#[test]
fn test_scan_of_missing_directory_fails() {
    let dir = scratch_dir("scan-missing").join("absent");
    assert!(AssetLibrary::scan(&dir).is_err());
}

#[test]
fn test_gltf_primitives_are_offset_by_running_vertex_count() {
    let dir = scratch_dir("gltf-instances");
    let geometry = load_shape_file(write_two_instance_gltf(&dir)).unwrap();

    assert_eq!(geometry.shape_count(), 4);
    assert_eq!(geometry.vertex_count(), 12);
    assert_eq!(geometry.shape_indices(0), &[0, 1, 2]);
    assert_eq!(geometry.shape_indices(1), &[5, 4, 3]);
    assert_eq!(geometry.shape_indices(2), &[6, 7, 8]);
    assert_eq!(geometry.shape_indices(3), &[11, 10, 9]);
    assert_eq!(geometry.shape_offset(3), 9);
}

#[test]
fn test_gltf_normals_follow_node_transform() {
    let dir = scratch_dir("gltf-normals");
    let geometry = load_shape_file(write_two_instance_gltf(&dir)).unwrap();
    let vertices = geometry.vertices();

    // untransformed instance: only renormalised
    assert_eq!(vertices[0].normal, [0.0, 0.0, 1.0]);
    assert_eq!(vertices[3].normal, [1.0, 0.0, 0.0]);

    // scaled, turned and moved instance
    assert_close(vertices[6].normal, [0.0, 0.0, 1.0]);
    assert_close(vertices[9].normal, [0.0, 1.0, 0.0]);
    assert_close(vertices[9].position, [5.0, 2.0, 0.0]);
    assert_close(vertices[11].position, [5.0, 0.0, 2.0]);
}

#[test]
fn test_gltf_line_primitive_is_rejected() {
    let dir = scratch_dir("gltf-lines");
    let path = write_triangle_gltf(&dir, "lines", r#""attributes": { "POSITION": 0 }, "indices": 1, "mode": 1"#);
    let err = load_shape_file(&path).unwrap_err();
    assert_eq!(err.path(), path.as_path());
    match err {
        LoadError::Format { source, .. } => assert_eq!(
            source,
            FormatError::UnsupportedPrimitiveMode {
                mesh: 0,
                primitive: 0,
                mode: gltf::mesh::Mode::Lines,
            }
        ),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_gltf_primitive_without_indices_is_rejected() {
    let dir = scratch_dir("gltf-no-indices");
    let path = write_triangle_gltf(&dir, "unindexed", r#""attributes": { "POSITION": 0 }"#);
    match load_shape_file(&path).unwrap_err() {
        LoadError::Format { source, .. } => {
            assert_eq!(source, FormatError::MissingIndices { mesh: 0, primitive: 0 })
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_gltf_primitive_without_positions_is_rejected() {
    let dir = scratch_dir("gltf-no-position");
    let path = write_triangle_gltf(&dir, "positionless", r#""attributes": {}, "indices": 1"#);
    let err = load_shape_file(&path).unwrap_err();
    // the document validator may reject it before the mesh is read
    assert!(
        matches!(
            err,
            LoadError::Gltf { .. }
                | LoadError::Format {
                    source: FormatError::MissingAttribute { attribute: "POSITION", .. },
                    ..
                }
        ),
        "unexpected error: {err}"
    );
    assert_eq!(err.path(), path.as_path());
}
