//! # Scene graph
//!
//! Arena-backed node tree used by the node-graph loader to resolve
//! cumulative transforms (CTMs).
//!
//! ## Usage
//!
//! ```
//! use strata::gfx::scene::{LocalTransform, SceneGraph, SourceNode};
//!
//! let nodes = vec![
//!     SourceNode {
//!         transform: LocalTransform::Decomposed {
//!             translation: Some([1.0, 0.0, 0.0]),
//!             rotation: None,
//!             scale: None,
//!         },
//!         mesh: None,
//!         children: vec![1],
//!     },
//!     SourceNode {
//!         transform: LocalTransform::IDENTITY,
//!         mesh: Some(0),
//!         children: vec![],
//!     },
//! ];
//! let graph = SceneGraph::build(&nodes, &[0]);
//! let (_, mesh, ctm) = graph.mesh_instances().next().unwrap();
//! assert_eq!(mesh, 0);
//! assert_eq!(ctm.w.x, 1.0);
//! ```

pub mod scene_graph;

pub use scene_graph::{LocalTransform, SceneGraph, SceneGraphNode, SourceNode};
