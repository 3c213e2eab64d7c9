//! Vertex welding for the flat face-list format
//!
//! OBJ faces index positions, normals and texture coordinates independently.
//! The GPU wants one index per vertex, so every distinct combination of the
//! three attribute indices becomes one output vertex and repeated
//! combinations reuse it.

use std::collections::HashMap;

use crate::error::FormatError;
use crate::gfx::geometry::Vertex;

/// The three attribute indices of one face corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexKey {
    pub vertex_index: u32,
    pub normal_index: Option<u32>,
    pub texcoord_index: Option<u32>,
}

impl IndexKey {
    pub fn new(vertex_index: u32, normal_index: Option<u32>, texcoord_index: Option<u32>) -> Self {
        Self {
            vertex_index,
            normal_index,
            texcoord_index,
        }
    }
}

/// Global attribute arrays of one asset, flattened as in the source file.
#[derive(Debug, Clone, Copy)]
pub struct AttributeArrays<'a> {
    /// x, y, z triples
    pub positions: &'a [f32],
    /// x, y, z triples, possibly empty
    pub normals: &'a [f32],
    /// u, v pairs, possibly empty
    pub texcoords: &'a [f32],
}

impl<'a> AttributeArrays<'a> {
    /// Checks the component counts of every array.
    pub fn validate(&self) -> Result<(), FormatError> {
        for (attribute, len, stride) in [
            ("position", self.positions.len(), 3),
            ("normal", self.normals.len(), 3),
            ("texcoord", self.texcoords.len(), 2),
        ] {
            if len % stride != 0 {
                return Err(FormatError::MalformedAttributes {
                    attribute,
                    len,
                    stride,
                });
            }
        }
        if self.positions.is_empty() {
            return Err(FormatError::NoPositions);
        }
        Ok(())
    }

    fn fetch<const N: usize>(
        data: &[f32],
        attribute: &'static str,
        index: u32,
    ) -> Result<[f32; N], FormatError> {
        let start = index as usize * N;
        data.get(start..start + N)
            .and_then(|slice| slice.try_into().ok())
            .ok_or(FormatError::AttributeIndexOutOfRange {
                attribute,
                index: index as usize,
                len: data.len() / N,
            })
    }

    fn assemble(&self, key: IndexKey) -> Result<Vertex, FormatError> {
        let mut vertex = Vertex {
            position: Self::fetch::<3>(self.positions, "position", key.vertex_index)?,
            ..Default::default()
        };
        if let Some(index) = key.normal_index.filter(|_| !self.normals.is_empty()) {
            vertex.normal = Self::fetch::<3>(self.normals, "normal", index)?;
        }
        if let Some(index) = key.texcoord_index.filter(|_| !self.texcoords.is_empty()) {
            vertex.tex_coord = Self::fetch::<2>(self.texcoords, "texcoord", index)?;
        }
        Ok(vertex)
    }
}

/// Deduplicates index keys into a growing vertex array.
///
/// One welder lives for exactly one asset import. All shapes of that asset
/// share its map, so a corner repeated across shapes is stored once.
#[derive(Debug, Default)]
pub struct VertexWelder {
    seen: HashMap<IndexKey, u32>,
    vertices: Vec<Vertex>,
}

impl VertexWelder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for roughly `index_count` face corners.
    pub fn with_capacity(index_count: usize) -> Self {
        Self {
            seen: HashMap::with_capacity(index_count / 3),
            vertices: Vec::with_capacity(index_count / 3),
        }
    }

    /// Output index for `key`, appending a new vertex on first sight.
    pub fn weld(&mut self, key: IndexKey, attributes: &AttributeArrays) -> Result<u32, FormatError> {
        if let Some(&index) = self.seen.get(&key) {
            return Ok(index);
        }
        let vertex = attributes.assemble(key)?;
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        self.seen.insert(key, index);
        Ok(index)
    }

    /// Welds one shape given as faces with explicit arities.
    ///
    /// `face_arities` may be empty, in which case `keys` is a flat triangle
    /// stream and its length must be a multiple of three.
    pub fn weld_faces(
        &mut self,
        keys: &[IndexKey],
        face_arities: &[u32],
        attributes: &AttributeArrays,
    ) -> Result<Vec<u32>, FormatError> {
        if face_arities.is_empty() {
            return self.weld_triangles(keys, attributes);
        }

        let expected: usize = face_arities.iter().map(|&a| a as usize).sum();
        if expected != keys.len() {
            return Err(FormatError::AttributeCountMismatch {
                attribute: "face corner",
                expected,
                found: keys.len(),
            });
        }
        if let Some((face, &arity)) = face_arities.iter().enumerate().find(|(_, &a)| a != 3) {
            return Err(FormatError::NonTriangleFace { face, arity });
        }
        self.weld_triangles(keys, attributes)
    }

    /// Welds a flat stream of triangle corners.
    pub fn weld_triangles(
        &mut self,
        keys: &[IndexKey],
        attributes: &AttributeArrays,
    ) -> Result<Vec<u32>, FormatError> {
        if keys.len() % 3 != 0 {
            return Err(FormatError::IndexCountNotTriangles(keys.len()));
        }
        keys.iter().map(|&key| self.weld(key, attributes)).collect()
    }

    /// Number of distinct keys seen so far.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Consumes the welder, returning the deduplicated vertices.
    pub fn into_vertices(self) -> Vec<Vertex> {
        self.vertices
    }
}
