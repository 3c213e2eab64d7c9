//! # Multi-Shape Geometry
//!
//! One loaded asset: a single vertex buffer, a single concatenated index
//! buffer, and a list of shapes that each own a contiguous slice of the
//! index buffer. Every shape is drawn with its own descriptor set, whose
//! position in the global descriptor table is assigned after all assets are
//! loaded.

use cgmath::Vector3;

use super::{bounds::bbox_center, Vertex};

/// A shape's slice of the concatenated index buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeRange {
    /// First index of the shape
    pub offset: u32,
    /// Number of indices in the shape
    pub count: u32,
}

impl ShapeRange {
    /// Half-open index range `[offset, offset + count)`.
    pub fn indices(&self) -> std::ops::Range<u32> {
        self.offset..self.offset + self.count
    }

    fn as_usize(&self) -> std::ops::Range<usize> {
        self.offset as usize..(self.offset + self.count) as usize
    }
}

/// Geometry of one asset, split into shapes.
///
/// The vertex and index data are fixed once the loader returns. The only
/// mutable state afterwards is the descriptor-set position of each shape,
/// written exactly once by [`MultiShapeGeometry::set_descriptor_set_position`].
#[derive(Debug, Clone, Default)]
pub struct MultiShapeGeometry {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
    shape_ranges: Vec<ShapeRange>,
    bbox_centers: Vec<Vector3<f32>>,
    descriptor_set_positions: Vec<Option<u32>>,
}

impl MultiShapeGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a shape whose indices reference the shared vertex buffer.
    ///
    /// Returns the new shape's index.
    pub fn add_shape(&mut self, indices: &[u32]) -> usize {
        let range = ShapeRange {
            offset: self.indices.len() as u32,
            count: indices.len() as u32,
        };
        self.indices.extend_from_slice(indices);
        self.shape_ranges.push(range);
        self.descriptor_set_positions.push(None);
        self.shape_ranges.len() - 1
    }

    /// Replaces the vertex buffer. Loaders call this once, after all shapes.
    pub fn set_vertices(&mut self, vertices: Vec<Vertex>) {
        self.vertices = vertices;
    }

    /// Computes the bounding-box center of every shape.
    ///
    /// Each shape scans its half-open range `[offset, offset + count)`; a
    /// shape with no indices gets the origin.
    pub fn compute_bbox_centers(&mut self) {
        self.bbox_centers = self
            .shape_ranges
            .iter()
            .map(|range| bbox_center(&self.vertices, &self.indices[range.as_usize()]))
            .collect();
    }

    pub fn shape_count(&self) -> usize {
        self.shape_ranges.len()
    }

    /// First index of shape `shape` in the concatenated index buffer.
    ///
    /// # Panics
    /// Panics if `shape >= shape_count()`.
    pub fn shape_offset(&self, shape: usize) -> u32 {
        self.checked_range(shape).offset
    }

    /// Number of indices in shape `shape`.
    ///
    /// # Panics
    /// Panics if `shape >= shape_count()`.
    pub fn shape_range(&self, shape: usize) -> u32 {
        self.checked_range(shape).count
    }

    /// Offset and count of shape `shape`.
    pub fn shape(&self, shape: usize) -> ShapeRange {
        *self.checked_range(shape)
    }

    /// Index slice of shape `shape`.
    pub fn shape_indices(&self, shape: usize) -> &[u32] {
        &self.indices[self.checked_range(shape).as_usize()]
    }

    pub fn shape_ranges(&self) -> &[ShapeRange] {
        &self.shape_ranges
    }

    /// Assigns shape `shape` its position in the global descriptor-set array.
    ///
    /// # Panics
    /// Panics if the shape is out of range or already has a position.
    pub fn set_descriptor_set_position(&mut self, shape: usize, position: u32) {
        self.checked_range(shape);
        let slot = &mut self.descriptor_set_positions[shape];
        assert!(
            slot.is_none(),
            "descriptor set position of shape {shape} assigned twice ({} then {position})",
            slot.unwrap_or_default()
        );
        *slot = Some(position);
    }

    /// Position of shape `shape` in the global descriptor-set array.
    ///
    /// # Panics
    /// Panics if the shape is out of range or has not been assigned yet.
    pub fn descriptor_set_position(&self, shape: usize) -> u32 {
        self.checked_range(shape);
        self.descriptor_set_positions[shape]
            .unwrap_or_else(|| panic!("shape {shape} has no descriptor set position"))
    }

    /// Whether every shape has a descriptor-set position.
    pub fn descriptors_assigned(&self) -> bool {
        self.descriptor_set_positions.iter().all(Option::is_some)
    }

    pub fn bounding_box_centers(&self) -> &[Vector3<f32>] {
        &self.bbox_centers
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    fn checked_range(&self, shape: usize) -> &ShapeRange {
        assert!(
            shape < self.shape_ranges.len(),
            "shape index {shape} out of range ({} shapes)",
            self.shape_ranges.len()
        );
        &self.shape_ranges[shape]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertex(position: [f32; 3]) -> Vertex {
        Vertex {
            position,
            ..Default::default()
        }
    }

    fn two_shapes() -> MultiShapeGeometry {
        let mut geometry = MultiShapeGeometry::new();
        geometry.add_shape(&[0, 1, 2]);
        geometry.add_shape(&[2, 3, 4, 4, 3, 1]);
        geometry.set_vertices(vec![
            vertex([0.0, 0.0, 0.0]),
            vertex([2.0, 0.0, 0.0]),
            vertex([0.0, 2.0, 0.0]),
            vertex([10.0, 10.0, 10.0]),
            vertex([12.0, 12.0, 12.0]),
        ]);
        geometry.compute_bbox_centers();
        geometry
    }

    #[test]
    fn test_shape_ranges_partition_indices() {
        let geometry = two_shapes();
        assert_eq!(geometry.shape_count(), 2);
        assert_eq!(geometry.shape_offset(0), 0);
        assert_eq!(geometry.shape_range(0), 3);
        assert_eq!(geometry.shape_offset(1), 3);
        assert_eq!(geometry.shape_range(1), 6);
        let total: u32 = geometry.shape_ranges().iter().map(|r| r.count).sum();
        assert_eq!(total as usize, geometry.indices().len());
        assert_eq!(geometry.shape_indices(1), &[2, 3, 4, 4, 3, 1]);
    }

    #[test]
    fn test_bbox_uses_offset_plus_count() {
        // Shape 1 starts at offset 3; scanning [0, count) instead would
        // include shape 0's vertices and shift the center.
        let geometry = two_shapes();
        let centers = geometry.bounding_box_centers();
        assert_eq!(centers.len(), 2);
        assert_eq!(centers[0], Vector3::new(1.0, 1.0, 0.0));
        assert_eq!(centers[1], Vector3::new(6.0, 6.0, 6.0));
    }

    #[test]
    fn test_empty_shape_is_valid() {
        let mut geometry = MultiShapeGeometry::new();
        geometry.add_shape(&[]);
        geometry.set_vertices(vec![vertex([1.0, 1.0, 1.0])]);
        geometry.compute_bbox_centers();
        assert_eq!(geometry.shape_range(0), 0);
        assert_eq!(geometry.bounding_box_centers()[0], Vector3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_descriptor_positions() {
        let mut geometry = two_shapes();
        assert!(!geometry.descriptors_assigned());
        geometry.set_descriptor_set_position(0, 7);
        geometry.set_descriptor_set_position(1, 8);
        assert!(geometry.descriptors_assigned());
        assert_eq!(geometry.descriptor_set_position(1), 8);
    }

    #[test]
    #[should_panic(expected = "assigned twice")]
    fn test_descriptor_position_set_twice_panics() {
        let mut geometry = two_shapes();
        geometry.set_descriptor_set_position(0, 1);
        geometry.set_descriptor_set_position(0, 2);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_shape_index_out_of_range_panics() {
        two_shapes().shape_offset(2);
    }
}
