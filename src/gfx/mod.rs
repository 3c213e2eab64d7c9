//! # Graphics Module
//!
//! Everything between asset files on disk and uniform values ready for upload.
//!
//! ## Architecture Overview
//!
//! - **Loaders** ([`loaders`]) - OBJ and glTF files into [`MultiShapeGeometry`](geometry::MultiShapeGeometry)
//! - **Scene graph** ([`scene`]) - node trees and cumulative transforms of glTF assets
//! - **Geometry** ([`geometry`]) - welded vertices, per-shape index ranges and pivots
//! - **Hierarchy** ([`hierarchy`]) - matrix stack and articulated poses
//! - **Uniforms** ([`uniforms`]) - std140 blocks, pools and the descriptor table
//! - **Camera** ([`camera`]) - orbit view driven by cursor and scroll
//! - **Input** ([`input`]) - per-frame input from window events
//! - **Textures** ([`textures`]) - texture names to shader indices
//!
//! ## Usage
//!
//! ```no_run
//! use strata::gfx::loaders::load_shape_file;
//!
//! let geometry = load_shape_file("assets/teapot.obj")?;
//! println!("{} shapes, {} triangles", geometry.shape_count(), geometry.triangle_count());
//! # Ok::<(), strata::error::LoadError>(())
//! ```

pub mod camera;
pub mod geometry;
pub mod hierarchy;
pub mod input;
pub mod loaders;
pub mod scene;
pub mod textures;
pub mod uniforms;

pub use camera::OrbitView;
pub use geometry::MultiShapeGeometry;
pub use input::{FrameInput, InputState};
