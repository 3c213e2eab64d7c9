//! Node-graph transform resolution
//!
//! The node-graph format stores a local transform per node and a list of
//! child node indices. [`SceneGraph`] copies the part of that graph that is
//! reachable from the scene roots into a flat arena, with each entry holding
//! its parent's arena index, and computes cumulative transforms by walking
//! towards the root.

use cgmath::{Matrix4, Quaternion, SquareMatrix, Vector3};

/// Local transform of a node as written in the source file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocalTransform {
    /// Column-major 4x4 matrix; overrides any decomposed fields.
    Matrix([[f32; 4]; 4]),
    /// Each component is optional and skipped when absent.
    Decomposed {
        translation: Option<[f32; 3]>,
        /// Quaternion as x, y, z, w
        rotation: Option<[f32; 4]>,
        scale: Option<[f32; 3]>,
    },
}

impl LocalTransform {
    pub const IDENTITY: LocalTransform = LocalTransform::Decomposed {
        translation: None,
        rotation: None,
        scale: None,
    };

    /// Composes translate × rotate × scale, or returns the explicit matrix.
    pub fn to_matrix(&self) -> Matrix4<f32> {
        match *self {
            LocalTransform::Matrix(matrix) => Matrix4::from(matrix),
            LocalTransform::Decomposed {
                translation,
                rotation,
                scale,
            } => {
                let mut local = Matrix4::identity();
                if let Some(t) = translation {
                    local = local * Matrix4::from_translation(Vector3::from(t));
                }
                if let Some([x, y, z, w]) = rotation {
                    local = local * Matrix4::from(Quaternion::new(w, x, y, z));
                }
                if let Some([x, y, z]) = scale {
                    local = local * Matrix4::from_nonuniform_scale(x, y, z);
                }
                local
            }
        }
    }
}

impl From<gltf::scene::Transform> for LocalTransform {
    fn from(transform: gltf::scene::Transform) -> Self {
        match transform {
            gltf::scene::Transform::Matrix { matrix } => LocalTransform::Matrix(matrix),
            gltf::scene::Transform::Decomposed {
                translation,
                rotation,
                scale,
            } => LocalTransform::Decomposed {
                translation: Some(translation),
                rotation: Some(rotation),
                scale: Some(scale),
            },
        }
    }
}

/// Everything the resolver needs from one source node.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    pub transform: LocalTransform,
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
}

/// One arena entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneGraphNode {
    /// Index of the node in the source file
    pub source: usize,
    pub local: Matrix4<f32>,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    pub mesh: Option<usize>,
}

/// Arena of nodes reachable from the scene roots, in depth-first order.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneGraphNode>,
    roots: Vec<usize>,
}

impl SceneGraph {
    /// Builds the arena from `roots`, depth first.
    ///
    /// A source node reachable along several paths is instanced once per
    /// path. A node that is its own ancestor would recurse forever, so the
    /// branch is cut and a warning logged.
    pub fn build(source: &[SourceNode], roots: &[usize]) -> Self {
        let mut graph = SceneGraph::default();
        let mut ancestry = Vec::new();
        for &root in roots {
            if let Some(index) = graph.construct(source, root, None, &mut ancestry) {
                graph.roots.push(index);
            }
        }
        graph
    }

    fn construct(
        &mut self,
        source: &[SourceNode],
        node: usize,
        parent: Option<usize>,
        ancestry: &mut Vec<usize>,
    ) -> Option<usize> {
        let Some(input) = source.get(node) else {
            log::warn!("Scene graph references missing node {node}, skipping");
            return None;
        };
        if ancestry.contains(&node) {
            log::warn!("Scene graph node {node} is its own ancestor, skipping");
            return None;
        }

        let index = self.nodes.len();
        self.nodes.push(SceneGraphNode {
            source: node,
            local: input.transform.to_matrix(),
            parent,
            children: Vec::new(),
            mesh: input.mesh,
        });

        ancestry.push(node);
        for &child in &input.children {
            if let Some(child_index) = self.construct(source, child, Some(index), ancestry) {
                self.nodes[index].children.push(child_index);
            }
        }
        ancestry.pop();

        Some(index)
    }

    /// Cumulative transform of arena node `index`: every ancestor's local
    /// matrix, root first, times the node's own.
    pub fn compute_ctm(&self, index: usize) -> Matrix4<f32> {
        let mut ctm = self.nodes[index].local;
        let mut current = self.nodes[index].parent;
        while let Some(parent) = current {
            ctm = self.nodes[parent].local * ctm;
            current = self.nodes[parent].parent;
        }
        ctm
    }

    /// Arena nodes in depth-first order.
    pub fn nodes(&self) -> &[SceneGraphNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Arena indices of nodes that carry a mesh, with their CTMs.
    pub fn mesh_instances(&self) -> impl Iterator<Item = (usize, usize, Matrix4<f32>)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.mesh.map(|mesh| (index, mesh, self.compute_ctm(index))))
    }
}
