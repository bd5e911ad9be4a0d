//! # Arm Equipment Demands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};

use super::MotionProfile;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Demand for the arm to solve and execute a motion to an end-effector pose.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ArmPoseDems {
    /// Target end-effector pose as a homogeneous transform.
    ///
    /// Frame: space (arm base)
    pub target_pose: Matrix4<f64>,

    /// Joint configuration used to seed the solver.
    ///
    /// Units: radians
    pub seed_joints_rad: Vec<f64>,

    pub profile: MotionProfile,

    /// If true the request only returns once the motion is complete
    pub blocking: bool,
}

/// Demand for a single joint to move to an absolute position.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SingleJointDems {
    /// Name of the joint, as given in the arm's kinematic description
    pub joint_name: String,

    /// Units: radians
    pub pos_rad: f64,

    pub profile: MotionProfile,

    pub blocking: bool,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Fixed arm poses.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmPreset {
    /// All joints at zero, arm extended forwards
    Home,

    /// Folded resting pose
    Sleep,
}
