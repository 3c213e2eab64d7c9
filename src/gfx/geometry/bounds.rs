//! Axis-aligned bounds over shape vertices

use cgmath::{Vector3, Zero};

use super::Vertex;

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// Bounds of the vertices referenced by `indices`.
    ///
    /// Returns `None` when `indices` is empty.
    pub fn from_indexed(vertices: &[Vertex], indices: &[u32]) -> Option<Self> {
        let mut referenced = indices.iter().map(|&i| vertices[i as usize].position);
        let first = Vector3::from(referenced.next()?);
        let (min, max) = referenced.fold((first, first), |(mut min, mut max), p| {
            min.x = min.x.min(p[0]);
            min.y = min.y.min(p[1]);
            min.z = min.z.min(p[2]);
            max.x = max.x.max(p[0]);
            max.y = max.y.max(p[1]);
            max.z = max.z.max(p[2]);
            (min, max)
        });
        Some(Self::new(min, max))
    }

    /// Midpoint of the box on every axis.
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }
}

/// Center of the bounding box of the vertices referenced by `indices`.
///
/// A shape that references no vertices has its center at the origin.
pub fn bbox_center(vertices: &[Vertex], indices: &[u32]) -> Vector3<f32> {
    Aabb::from_indexed(vertices, indices)
        .map(|aabb| aabb.center())
        .unwrap_or_else(Vector3::zero)
}
