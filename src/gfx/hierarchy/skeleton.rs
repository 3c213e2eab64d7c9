//! Flat parent-index skeleton of an articulated object.
//!
//! Node `i` of a skeleton is shape `i` of the object's geometry. The
//! skeleton is topology only; per-frame matrices come out of
//! [`Pose::evaluate`](super::Pose::evaluate).

use cgmath::{Matrix4, SquareMatrix, Vector3};

use crate::error::HierarchyError;

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    /// Rest transform of the part; identity for loaded geometry, whose
    /// vertices are already in object space.
    pub local_model_matrix: Matrix4<f32>,
    /// Rotation pivot of the joint driving this part
    pub bounding_box_center: Vector3<f32>,
    pub parent_index: Option<usize>,
    pub child_indices: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Skeleton {
    nodes: Vec<HierarchyNode>,
}

impl Skeleton {
    /// Builds nodes from a parent table, deriving child lists in index order.
    ///
    /// `pivots` supplies each node's bounding-box center and must be as long
    /// as `parents`.
    pub fn from_parents(
        parents: &[Option<usize>],
        pivots: &[Vector3<f32>],
    ) -> Result<Self, HierarchyError> {
        if parents.len() != pivots.len() {
            return Err(HierarchyError::ShapeCountMismatch {
                nodes: parents.len(),
                shapes: pivots.len(),
            });
        }

        let mut nodes: Vec<HierarchyNode> = parents
            .iter()
            .zip(pivots)
            .map(|(&parent_index, &pivot)| HierarchyNode {
                local_model_matrix: Matrix4::identity(),
                bounding_box_center: pivot,
                parent_index,
                child_indices: Vec::new(),
            })
            .collect();

        for (node, parent) in parents.iter().enumerate() {
            if let Some(parent) = *parent {
                nodes
                    .get_mut(parent)
                    .ok_or(HierarchyError::ParentOutOfRange { node, parent })?
                    .child_indices
                    .push(node);
            }
        }

        Ok(Self { nodes })
    }

    /// Wraps hand-built nodes; call [`Skeleton::validate`] before use.
    pub fn from_nodes(nodes: Vec<HierarchyNode>) -> Self {
        Self { nodes }
    }

    /// Checks index ranges, parent/child agreement, acyclicity and that the
    /// skeleton has one node per shape.
    pub fn validate(&self, shape_count: usize) -> Result<(), HierarchyError> {
        let len = self.nodes.len();
        if len != shape_count {
            return Err(HierarchyError::ShapeCountMismatch {
                nodes: len,
                shapes: shape_count,
            });
        }

        for (index, node) in self.nodes.iter().enumerate() {
            if let Some(parent) = node.parent_index {
                let parent_node = self
                    .nodes
                    .get(parent)
                    .ok_or(HierarchyError::ParentOutOfRange { node: index, parent })?;
                if !parent_node.child_indices.contains(&index) {
                    return Err(HierarchyError::InconsistentLink {
                        parent,
                        child: index,
                        actual: None,
                    });
                }
            }
            for &child in &node.child_indices {
                let child_node = self
                    .nodes
                    .get(child)
                    .ok_or(HierarchyError::ChildOutOfRange { node: index, child })?;
                if child_node.parent_index != Some(index) {
                    return Err(HierarchyError::InconsistentLink {
                        parent: index,
                        child,
                        actual: child_node.parent_index,
                    });
                }
            }
        }

        for start in 0..len {
            let mut current = self.nodes[start].parent_index;
            let mut steps = 0;
            while let Some(parent) = current {
                steps += 1;
                if parent == start || steps > len {
                    return Err(HierarchyError::Cycle(start));
                }
                current = self.nodes[parent].parent_index;
            }
        }
        Ok(())
    }

    pub fn nodes(&self) -> &[HierarchyNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> &HierarchyNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn pivot(&self, index: usize) -> Vector3<f32> {
        self.nodes[index].bounding_box_center
    }

    pub fn roots(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.parent_index.is_none())
            .map(|(index, _)| index)
    }
}
