//! # Hierarchy
//!
//! Articulated pose composition for multi-part objects whose parts are the
//! shapes of one [`MultiShapeGeometry`](crate::gfx::geometry::MultiShapeGeometry).
//!
//! - [`MatrixStack`] - push/pop matrix stack with value-semantics clones
//! - [`Skeleton`] - flat parent-index tree, one node per shape
//! - [`PoseProgram`] - fixed joint traversal, validated against a skeleton
//! - [`Pose`] - evaluates a program each frame into per-part matrices
//! - [`humanoid`] - the mannequin rig
//!
//! ## Usage
//!
//! ```
//! use cgmath::Vector3;
//! use strata::gfx::hierarchy::{AngleSource, Pose, PoseInputs, PoseProgram, Skeleton};
//!
//! let skeleton = Skeleton::from_parents(
//!     &[None, Some(0)],
//!     &[Vector3::new(0.0, 0.0, 0.0), Vector3::new(0.0, 0.0, 1.0)],
//! )?;
//! let mut program = PoseProgram::new();
//! program.joint(0, &[], |arm| {
//!     arm.joint(1, &[(AngleSource::Fixed(0.5), Vector3::unit_x())], |_| {});
//! });
//!
//! let pose = Pose::new(skeleton, program)?;
//! let output = pose.evaluate(&PoseInputs::default());
//! assert_eq!(output.matrices.len(), 2);
//! # Ok::<(), strata::error::HierarchyError>(())
//! ```
//!
//! ## Limitations
//!
//! Programs are written per skeleton topology. Nothing walks the skeleton's
//! child lists generically; a new articulated asset needs its own program.

pub mod humanoid;
pub mod matrix_stack;
pub mod pose;
pub mod skeleton;

pub use humanoid::{humanoid_pose, humanoid_rig, humanoid_skeleton, HumanoidPart, HELD_ITEM_SLOT};
pub use matrix_stack::MatrixStack;
pub use pose::{AngleSource, Pose, PoseInputs, PoseInstruction, PoseOutput, PoseProgram};
pub use skeleton::{HierarchyNode, Skeleton};
