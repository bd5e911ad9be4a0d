//! # Equipment clients
//!
//! The control core never talks to hardware directly. Instead each piece of equipment on the robot
//! is reached through one of the client traits in this module, which are implemented by the
//! simulated equipment in `sim_client` and by any hardware bridge.
//!
//! Equipment which may be absent from a particular robot (arm, gripper, base) is held as an
//! `Option` in [`Eqpt`]. The pan-tilt camera is always present.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

/// Recording clients for exercising the control core without equipment, not part of the public API
#[doc(hidden)]
pub mod recorder;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Matrix4;
use thiserror::Error;

// Internal
use comms_if::eqpt::{
    arm::{ArmPoseDems, ArmPreset, SingleJointDems},
    base::BaseVelDems,
    pan_tilt::PanTiltDems,
    MotionProfile,
};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Client for a serial manipulator arm.
pub trait ArmClient: Send {
    /// Number of joints in the arm.
    fn num_joints(&self) -> usize;

    /// The `(lower, upper)` position limits of the named joint.
    ///
    /// Units: radians
    fn joint_limits(&self, joint_name: &str) -> Result<(f64, f64), ArmClientError>;

    /// The last commanded end-effector pose in the arm's space frame.
    fn get_current_pose(&self) -> Matrix4<f64>;

    /// The last commanded position of every joint.
    ///
    /// Units: radians
    fn get_joint_commands(&self) -> Vec<f64>;

    /// The last commanded position of the named joint.
    ///
    /// Units: radians
    fn get_single_joint_command(&self, joint_name: &str) -> Result<f64, ArmClientError>;

    /// Solve for and execute a motion to the demanded end-effector pose. Returns an error (and
    /// leaves the arm where it was) if no valid joint solution exists.
    fn set_ee_pose(&mut self, dems: &ArmPoseDems) -> Result<(), ArmClientError>;

    /// Move one joint to an absolute position. Returns an error (and does not move) if the
    /// position is outside the joint's limits.
    fn set_single_joint_position(&mut self, dems: &SingleJointDems) -> Result<(), ArmClientError>;

    /// Move the whole arm to a preset pose.
    fn go_to_preset(&mut self, preset: ArmPreset, profile: MotionProfile)
        -> Result<(), ArmClientError>;

    /// Set the default timing profile used for subsequent motions.
    fn set_trajectory_time(&mut self, profile: MotionProfile);
}

/// Client for a differential drive mobile base.
pub trait BaseClient: Send {
    fn command_velocity(&mut self, dems: &BaseVelDems);

    fn reset_odom(&mut self);
}

/// Client for a pressure controlled gripper.
pub trait GripperClient: Send {
    /// Set the grip pressure, normalised to `[0, 1]`.
    fn set_pressure(&mut self, pressure: f64);

    fn open(&mut self, delay_s: f64);

    fn close(&mut self, delay_s: f64);
}

/// Client for a pan-tilt camera mount.
pub trait PanTiltClient: Send {
    /// Last commanded `(pan, tilt)` positions.
    ///
    /// Units: radians
    fn get_joint_commands(&self) -> (f64, f64);

    fn pan_tilt_move(&mut self, dems: &PanTiltDems);

    fn pan_tilt_go_home(
        &mut self,
        pan_profile: MotionProfile,
        tilt_profile: MotionProfile,
        blocking: bool,
    );
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The set of equipment clients available to the control core.
pub struct Eqpt {
    pub arm: Option<Box<dyn ArmClient>>,
    pub gripper: Option<Box<dyn GripperClient>>,
    pub base: Option<Box<dyn BaseClient>>,
    pub pan_tilt: Box<dyn PanTiltClient>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors reported by an arm client.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArmClientError {
    #[error("No joint solution exists for the demanded pose")]
    NoSolution,

    #[error("Position {1} rad is outside the limits of joint {0}")]
    JointLimit(String, f64),

    #[error("The arm has no joint called {0}")]
    UnknownJoint(String),

    #[error("The arm could not reach the {0:?} preset")]
    PresetFailed(ArmPreset),
}
