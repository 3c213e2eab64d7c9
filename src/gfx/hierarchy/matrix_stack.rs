//! LIFO stack of model matrices for hierarchical composition.

use cgmath::{InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};

/// Matrix stack with an always-present base entry.
///
/// The stack starts at depth 1 holding the identity. Transform calls
/// post-multiply the top entry in place, so the last call applies first to
/// the geometry. Cloning yields an independent snapshot of the whole stack.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixStack {
    top: Matrix4<f32>,
    saved: Vec<Matrix4<f32>>,
}

impl Default for MatrixStack {
    fn default() -> Self {
        Self::new()
    }
}

impl MatrixStack {
    pub fn new() -> Self {
        Self::with_base(Matrix4::identity())
    }

    /// Starts the stack from `base` instead of the identity.
    pub fn with_base(base: Matrix4<f32>) -> Self {
        Self {
            top: base,
            saved: Vec::new(),
        }
    }

    /// Duplicates the top entry.
    pub fn push_matrix(&mut self) {
        self.saved.push(self.top);
    }

    /// Discards the top entry and restores the one below.
    ///
    /// # Panics
    ///
    /// Panics when only the base entry is left.
    pub fn pop_matrix(&mut self) {
        match self.saved.pop() {
            Some(previous) => self.top = previous,
            None => panic!("matrix stack underflow: pop at depth 1"),
        }
    }

    /// Number of entries, including the base.
    pub fn depth(&self) -> usize {
        self.saved.len() + 1
    }

    /// Current composed transform.
    pub fn top_matrix(&self) -> Matrix4<f32> {
        self.top
    }

    /// Replaces the top entry.
    pub fn load_matrix(&mut self, matrix: Matrix4<f32>) {
        self.top = matrix;
    }

    pub fn multiply(&mut self, matrix: Matrix4<f32>) {
        self.top = self.top * matrix;
    }

    pub fn translate(&mut self, offset: Vector3<f32>) {
        self.multiply(Matrix4::from_translation(offset));
    }

    /// Rotates about `axis`, which need not be normalized. A zero axis is a
    /// no-op.
    pub fn rotate(&mut self, angle: impl Into<Rad<f32>>, axis: Vector3<f32>) {
        if axis.magnitude2() == 0.0 {
            return;
        }
        self.multiply(Matrix4::from_axis_angle(axis.normalize(), angle));
    }

    pub fn rotate_x(&mut self, angle: impl Into<Rad<f32>>) {
        self.multiply(Matrix4::from_angle_x(angle));
    }

    pub fn rotate_y(&mut self, angle: impl Into<Rad<f32>>) {
        self.multiply(Matrix4::from_angle_y(angle));
    }

    pub fn rotate_z(&mut self, angle: impl Into<Rad<f32>>) {
        self.multiply(Matrix4::from_angle_z(angle));
    }

    pub fn scale(&mut self, factors: Vector3<f32>) {
        self.multiply(Matrix4::from_nonuniform_scale(factors.x, factors.y, factors.z));
    }

    pub fn scale_uniform(&mut self, factor: f32) {
        self.multiply(Matrix4::from_scale(factor));
    }
}
