//! # Geometry
//!
//! Vertex format, per-asset multi-shape geometry and bounding boxes.
//!
//! ## Usage
//!
//! ```
//! use strata::gfx::geometry::{MultiShapeGeometry, Vertex};
//!
//! let mut geometry = MultiShapeGeometry::new();
//! geometry.add_shape(&[0, 1, 2]);
//! geometry.set_vertices(vec![Vertex::default(); 3]);
//! geometry.compute_bbox_centers();
//! assert_eq!(geometry.shape_count(), 1);
//! ```

pub mod bounds;
pub mod multi_shape;
pub mod vertex;

pub use bounds::{bbox_center, Aabb};
pub use multi_shape::{MultiShapeGeometry, ShapeRange};
pub use vertex::Vertex;
