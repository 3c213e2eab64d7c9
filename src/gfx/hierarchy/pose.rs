//! Pose programs and their evaluation.
//!
//! A [`PoseProgram`] is a hand-authored, fixed list of matrix-stack
//! instructions for one skeleton topology. Each joint follows the same
//! pattern: push, move to the joint's pivot, rotate, move back, write the
//! top of the stack as the part's matrix, visit the children, pop.
//! The traversal order lives in the program, not in the skeleton's child
//! lists; a different skeleton needs a different program.

use cgmath::{Matrix4, Rad, SquareMatrix, Vector3};

use super::{MatrixStack, Skeleton};
use crate::error::HierarchyError;

/// Per-frame values a pose may depend on.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PoseInputs {
    /// Seconds since start
    pub time: f32,
    /// Accumulated cursor position, in pixels
    pub cursor: (f32, f32),
}

/// Where a joint angle comes from, in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AngleSource {
    Fixed(f32),
    /// `amplitude * sin(frequency * time + phase)`
    Oscillate {
        amplitude: f32,
        frequency: f32,
        phase: f32,
    },
    CursorX { scale: f32 },
    CursorY { scale: f32 },
}

impl AngleSource {
    pub fn evaluate(&self, inputs: &PoseInputs) -> Rad<f32> {
        match *self {
            AngleSource::Fixed(angle) => Rad(angle),
            AngleSource::Oscillate {
                amplitude,
                frequency,
                phase,
            } => Rad(amplitude * (frequency * inputs.time + phase).sin()),
            AngleSource::CursorX { scale } => Rad(scale * inputs.cursor.0),
            AngleSource::CursorY { scale } => Rad(scale * inputs.cursor.1),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoseInstruction {
    Push,
    /// Translate by the joint's pivot
    TranslateToPivot(usize),
    Rotate {
        angle: AngleSource,
        axis: Vector3<f32>,
    },
    /// Translate by the negated pivot
    TranslateFromPivot(usize),
    /// Store the top of the stack as the joint's matrix
    Write(usize),
    /// Copy the top of the stack into a snapshot slot
    Snapshot(usize),
    Pop,
}

/// Fixed instruction list for one skeleton topology.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseProgram {
    instructions: Vec<PoseInstruction>,
    snapshot_slots: usize,
}

impl PoseProgram {
    pub fn new() -> Self {
        Self::default()
    }

    /// Program with `slots` snapshot slots available to [`PoseProgram::snapshot`].
    pub fn with_snapshots(slots: usize) -> Self {
        Self {
            instructions: Vec::new(),
            snapshot_slots: slots,
        }
    }

    pub fn push(&mut self) -> &mut Self {
        self.instructions.push(PoseInstruction::Push);
        self
    }

    pub fn pop(&mut self) -> &mut Self {
        self.instructions.push(PoseInstruction::Pop);
        self
    }

    pub fn pivot(&mut self, joint: usize) -> &mut Self {
        self.instructions.push(PoseInstruction::TranslateToPivot(joint));
        self
    }

    pub fn unpivot(&mut self, joint: usize) -> &mut Self {
        self.instructions.push(PoseInstruction::TranslateFromPivot(joint));
        self
    }

    pub fn rotate(&mut self, angle: AngleSource, axis: Vector3<f32>) -> &mut Self {
        self.instructions.push(PoseInstruction::Rotate { angle, axis });
        self
    }

    pub fn write(&mut self, joint: usize) -> &mut Self {
        self.instructions.push(PoseInstruction::Write(joint));
        self
    }

    pub fn snapshot(&mut self, slot: usize) -> &mut Self {
        self.instructions.push(PoseInstruction::Snapshot(slot));
        self
    }

    /// Emits one complete joint: push, pivot, rotations, unpivot, write,
    /// whatever `children` adds, pop.
    pub fn joint(
        &mut self,
        joint: usize,
        rotations: &[(AngleSource, Vector3<f32>)],
        children: impl FnOnce(&mut Self),
    ) -> &mut Self {
        self.push().pivot(joint);
        for &(angle, axis) in rotations {
            self.rotate(angle, axis);
        }
        self.unpivot(joint).write(joint);
        children(self);
        self.pop()
    }

    pub fn instructions(&self) -> &[PoseInstruction] {
        &self.instructions
    }

    pub fn snapshot_slots(&self) -> usize {
        self.snapshot_slots
    }

    /// Checks the program against `skeleton`.
    ///
    /// Every joint index must be in range, pushes and pops must balance
    /// without popping the base, no joint may be written twice, and each
    /// written joint must be nested directly under its skeleton parent.
    pub fn validate(&self, skeleton: &Skeleton) -> Result<(), HierarchyError> {
        let len = skeleton.len();
        let in_range = |joint: usize| {
            if joint < len {
                Ok(())
            } else {
                Err(HierarchyError::JointOutOfRange { joint, len })
            }
        };

        // One frame per stack level; each remembers the joint written there.
        let mut frames: Vec<Option<usize>> = vec![None];
        let mut written = vec![false; len];

        for (position, instruction) in self.instructions.iter().enumerate() {
            match *instruction {
                PoseInstruction::Push => frames.push(None),
                PoseInstruction::Pop => {
                    if frames.len() == 1 {
                        return Err(HierarchyError::StackUnderflow(position));
                    }
                    frames.pop();
                }
                PoseInstruction::TranslateToPivot(joint)
                | PoseInstruction::TranslateFromPivot(joint) => in_range(joint)?,
                PoseInstruction::Rotate { .. } => {}
                PoseInstruction::Write(joint) => {
                    in_range(joint)?;
                    if std::mem::replace(&mut written[joint], true) {
                        return Err(HierarchyError::DuplicateWrite(joint));
                    }
                    let depth = frames.len();
                    let enclosing = frames[..depth - 1].iter().rev().find_map(|frame| *frame);
                    let expected = skeleton.node(joint).parent_index;
                    if enclosing != expected {
                        return Err(HierarchyError::TraversalMismatch {
                            joint,
                            expected,
                            found: enclosing,
                        });
                    }
                    frames[depth - 1] = Some(joint);
                }
                PoseInstruction::Snapshot(slot) => {
                    if slot >= self.snapshot_slots {
                        return Err(HierarchyError::SnapshotOutOfRange {
                            slot,
                            len: self.snapshot_slots,
                        });
                    }
                }
            }
        }

        if frames.len() != 1 {
            return Err(HierarchyError::UnbalancedProgram(frames.len() - 1));
        }
        Ok(())
    }
}

/// Matrices produced by one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseOutput {
    /// One per skeleton node, in object space; unwritten joints stay identity
    pub matrices: Vec<Matrix4<f32>>,
    pub snapshots: Vec<Matrix4<f32>>,
}

/// A validated skeleton and program pair.
#[derive(Debug, Clone)]
pub struct Pose {
    skeleton: Skeleton,
    program: PoseProgram,
}

impl Pose {
    /// Validates `program` against `skeleton` once, at startup.
    pub fn new(skeleton: Skeleton, program: PoseProgram) -> Result<Self, HierarchyError> {
        program.validate(&skeleton)?;
        Ok(Self { skeleton, program })
    }

    pub fn skeleton(&self) -> &Skeleton {
        &self.skeleton
    }

    pub fn program(&self) -> &PoseProgram {
        &self.program
    }

    /// Runs the program for one frame.
    pub fn evaluate(&self, inputs: &PoseInputs) -> PoseOutput {
        let mut output = PoseOutput {
            matrices: vec![Matrix4::identity(); self.skeleton.len()],
            snapshots: vec![Matrix4::identity(); self.program.snapshot_slots],
        };
        let mut stack = MatrixStack::new();

        for instruction in &self.program.instructions {
            match *instruction {
                PoseInstruction::Push => stack.push_matrix(),
                PoseInstruction::Pop => stack.pop_matrix(),
                PoseInstruction::TranslateToPivot(joint) => stack.translate(self.skeleton.pivot(joint)),
                PoseInstruction::TranslateFromPivot(joint) => {
                    stack.translate(-self.skeleton.pivot(joint))
                }
                PoseInstruction::Rotate { angle, axis } => stack.rotate(angle.evaluate(inputs), axis),
                PoseInstruction::Write(joint) => {
                    output.matrices[joint] =
                        stack.top_matrix() * self.skeleton.node(joint).local_model_matrix
                }
                PoseInstruction::Snapshot(slot) => output.snapshots[slot] = stack.top_matrix(),
            }
        }

        assert_eq!(stack.depth(), 1, "pose program left the matrix stack unbalanced");
        output
    }
}
