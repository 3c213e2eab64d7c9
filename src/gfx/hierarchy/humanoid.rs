//! The articulated mannequin rig.
//!
//! The mannequin asset has one shape per body part, in [`HumanoidPart`]
//! order. Its traversal is written out joint by joint below; the skeleton
//! built from the same parent table is only used to check that the two
//! agree. The rig is authored in the asset's own z-up space.

use cgmath::Vector3;

use super::{AngleSource, Pose, PoseProgram, Skeleton};
use crate::error::HierarchyError;
use crate::gfx::geometry::MultiShapeGeometry;

/// Body parts of the mannequin, numbered as the asset's shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HumanoidPart {
    Hip,
    Belly,
    Torso,
    Head,
    LeftShoulder,
    LeftUpperArm,
    LeftForearm,
    LeftWrist,
    LeftHand,
    RightShoulder,
    RightUpperArm,
    RightForearm,
    RightWrist,
    RightHand,
    LeftPelvis,
    LeftUpperLeg,
    LeftLowerLeg,
    LeftFoot,
    RightPelvis,
    RightUpperLeg,
    RightLowerLeg,
    RightFoot,
}

/// Number of shapes the mannequin asset must have.
pub const HUMANOID_PART_COUNT: usize = 22;

/// Snapshot slot holding the right hand's matrix.
pub const HELD_ITEM_SLOT: usize = 0;

impl HumanoidPart {
    pub const ALL: [HumanoidPart; HUMANOID_PART_COUNT] = [
        HumanoidPart::Hip,
        HumanoidPart::Belly,
        HumanoidPart::Torso,
        HumanoidPart::Head,
        HumanoidPart::LeftShoulder,
        HumanoidPart::LeftUpperArm,
        HumanoidPart::LeftForearm,
        HumanoidPart::LeftWrist,
        HumanoidPart::LeftHand,
        HumanoidPart::RightShoulder,
        HumanoidPart::RightUpperArm,
        HumanoidPart::RightForearm,
        HumanoidPart::RightWrist,
        HumanoidPart::RightHand,
        HumanoidPart::LeftPelvis,
        HumanoidPart::LeftUpperLeg,
        HumanoidPart::LeftLowerLeg,
        HumanoidPart::LeftFoot,
        HumanoidPart::RightPelvis,
        HumanoidPart::RightUpperLeg,
        HumanoidPart::RightLowerLeg,
        HumanoidPart::RightFoot,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn parent(self) -> Option<HumanoidPart> {
        use HumanoidPart::*;
        match self {
            Hip => None,
            Belly | LeftPelvis | RightPelvis => Some(Hip),
            Torso => Some(Belly),
            Head | LeftShoulder | RightShoulder => Some(Torso),
            LeftUpperArm => Some(LeftShoulder),
            LeftForearm => Some(LeftUpperArm),
            LeftWrist => Some(LeftForearm),
            LeftHand => Some(LeftWrist),
            RightUpperArm => Some(RightShoulder),
            RightForearm => Some(RightUpperArm),
            RightWrist => Some(RightForearm),
            RightHand => Some(RightWrist),
            LeftUpperLeg => Some(LeftPelvis),
            LeftLowerLeg => Some(LeftUpperLeg),
            LeftFoot => Some(LeftLowerLeg),
            RightUpperLeg => Some(RightPelvis),
            RightLowerLeg => Some(RightUpperLeg),
            RightFoot => Some(RightLowerLeg),
        }
    }
}

/// Parent table indexed by shape.
pub fn humanoid_parents() -> Vec<Option<usize>> {
    HumanoidPart::ALL
        .iter()
        .map(|part| part.parent().map(HumanoidPart::index))
        .collect()
}

/// Skeleton for a loaded mannequin, pivoting each part about its
/// bounding-box center.
pub fn humanoid_skeleton(geometry: &MultiShapeGeometry) -> Result<Skeleton, HierarchyError> {
    let skeleton = Skeleton::from_parents(&humanoid_parents(), geometry.bounding_box_centers())?;
    skeleton.validate(geometry.shape_count())?;
    Ok(skeleton)
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirrors swing direction and staggers the gait by half a cycle.
    fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    fn phase(self) -> f32 {
        match self {
            Side::Left => 0.0,
            Side::Right => std::f32::consts::PI,
        }
    }
}

fn x_axis() -> Vector3<f32> {
    Vector3::unit_x()
}

fn y_axis() -> Vector3<f32> {
    Vector3::unit_y()
}

fn z_axis() -> Vector3<f32> {
    Vector3::unit_z()
}

fn idle(amplitude: f32, frequency: f32, phase: f32) -> AngleSource {
    AngleSource::Oscillate {
        amplitude,
        frequency,
        phase,
    }
}

fn arm(rig: &mut PoseProgram, side: Side) {
    use HumanoidPart::*;
    let (shoulder, upper, fore, wrist, hand) = match side {
        Side::Left => (LeftShoulder, LeftUpperArm, LeftForearm, LeftWrist, LeftHand),
        Side::Right => (RightShoulder, RightUpperArm, RightForearm, RightWrist, RightHand),
    };
    let s = side.sign();

    rig.joint(shoulder.index(), &[(idle(0.05, 1.0, side.phase()), y_axis())], |rig| {
        rig.joint(
            upper.index(),
            &[
                (AngleSource::Fixed(s * 1.2), y_axis()),
                (idle(0.35, 2.0, side.phase()), x_axis()),
            ],
            |rig| {
                rig.joint(fore.index(), &[(idle(0.25, 2.0, side.phase() + 0.5), x_axis())], |rig| {
                    rig.joint(wrist.index(), &[(idle(0.15, 3.0, 0.0), z_axis())], |rig| {
                        rig.joint(hand.index(), &[], |rig| {
                            if let Side::Right = side {
                                rig.snapshot(HELD_ITEM_SLOT);
                            }
                        });
                    });
                });
            },
        );
    });
}

fn leg(rig: &mut PoseProgram, side: Side) {
    use HumanoidPart::*;
    let (pelvis, upper, lower, foot) = match side {
        Side::Left => (LeftPelvis, LeftUpperLeg, LeftLowerLeg, LeftFoot),
        Side::Right => (RightPelvis, RightUpperLeg, RightLowerLeg, RightFoot),
    };

    rig.joint(pelvis.index(), &[], |rig| {
        rig.joint(upper.index(), &[(idle(0.4, 2.0, side.phase()), x_axis())], |rig| {
            // knees only bend backwards
            rig.joint(
                lower.index(),
                &[(idle(0.2, 2.0, side.phase() + 1.0), x_axis()), (AngleSource::Fixed(-0.2), x_axis())],
                |rig| {
                    rig.joint(foot.index(), &[(idle(0.1, 2.0, side.phase()), x_axis())], |_| {});
                },
            );
        });
    });
}

/// The mannequin's traversal.
///
/// The head follows the cursor, everything else plays an idle cycle driven
/// by time. The right hand's matrix is copied to [`HELD_ITEM_SLOT`].
pub fn humanoid_rig() -> PoseProgram {
    use HumanoidPart::*;
    let mut rig = PoseProgram::with_snapshots(1);
    rig.joint(Hip.index(), &[(idle(0.05, 1.0, 0.0), z_axis())], |rig| {
        rig.joint(Belly.index(), &[(idle(0.05, 1.0, 0.3), x_axis())], |rig| {
            rig.joint(Torso.index(), &[(idle(0.1, 1.0, 0.0), z_axis())], |rig| {
                rig.joint(
                    Head.index(),
                    &[
                        (AngleSource::CursorX { scale: 0.002 }, z_axis()),
                        (AngleSource::CursorY { scale: 0.002 }, x_axis()),
                    ],
                    |_| {},
                );
                arm(rig, Side::Left);
                arm(rig, Side::Right);
            });
        });
        leg(rig, Side::Left);
        leg(rig, Side::Right);
    });
    rig
}

/// Skeleton and rig for a loaded mannequin, validated together.
pub fn humanoid_pose(geometry: &MultiShapeGeometry) -> Result<Pose, HierarchyError> {
    Pose::new(humanoid_skeleton(geometry)?, humanoid_rig())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::Vertex;
    use crate::gfx::hierarchy::{PoseInputs, PoseInstruction};

    /// One single-triangle shape per part, stacked along z.
    fn mannequin(parts: usize) -> MultiShapeGeometry {
        let mut geometry = MultiShapeGeometry::new();
        let mut vertices = Vec::new();
        for part in 0..parts {
            let base = vertices.len() as u32;
            for corner in 0..3 {
                vertices.push(Vertex {
                    position: [corner as f32, 0.0, part as f32],
                    ..Default::default()
                });
            }
            geometry.add_shape(&[base, base + 1, base + 2]);
        }
        geometry.set_vertices(vertices);
        geometry.compute_bbox_centers();
        geometry
    }

    #[test]
    fn test_parent_table_is_consistent() {
        let parents = humanoid_parents();
        assert_eq!(parents.len(), HUMANOID_PART_COUNT);
        assert_eq!(parents.iter().filter(|p| p.is_none()).count(), 1);
        for (index, part) in HumanoidPart::ALL.iter().enumerate() {
            assert_eq!(part.index(), index);
        }
    }

    #[test]
    fn test_rig_writes_every_part_once() {
        let rig = humanoid_rig();
        let mut writes: Vec<usize> = rig
            .instructions()
            .iter()
            .filter_map(|i| match i {
                PoseInstruction::Write(joint) => Some(*joint),
                _ => None,
            })
            .collect();
        writes.sort_unstable();
        assert_eq!(writes, (0..HUMANOID_PART_COUNT).collect::<Vec<_>>());
    }

    #[test]
    fn test_rig_validates_against_mannequin() {
        let pose = humanoid_pose(&mannequin(HUMANOID_PART_COUNT)).unwrap();
        let output = pose.evaluate(&PoseInputs {
            time: 1.7,
            cursor: (120.0, -40.0),
        });
        assert_eq!(output.matrices.len(), HUMANOID_PART_COUNT);
        assert_eq!(
            output.snapshots[HELD_ITEM_SLOT],
            output.matrices[HumanoidPart::RightHand.index()]
        );
    }

    #[test]
    fn test_wrong_part_count_is_rejected() {
        let err = humanoid_pose(&mannequin(5)).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::ShapeCountMismatch {
                nodes: HUMANOID_PART_COUNT,
                shapes: 5
            }
        );
    }
}
