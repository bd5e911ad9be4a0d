//! # Recording equipment
//!
//! Equipment clients which execute nothing but record every request made of them, in order, into a
//! shared call log. The recorded arm keeps just enough state (pose, waist position and limits) to
//! answer the queries the control modules make. It can be told to reject end-effector requests
//! and to fail presets.
//!
//! Used to check what the control core dispatches each cycle without any hardware attached.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix4, Vector3};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

// Internal
use super::*;
use crate::arm_ctrl::frame;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Name of the only individually addressable joint of the recorded arm.
pub const WAIST_JOINT: &str = "waist";

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// A single request made of the equipment.
#[derive(Debug, Clone, PartialEq)]
pub enum EqptCall {
    SetEePose(ArmPoseDems),
    SetSingleJoint(SingleJointDems),
    GoToPreset(ArmPreset, MotionProfile),
    SetTrajectoryTime(MotionProfile),
    CommandVelocity(BaseVelDems),
    ResetOdom,
    SetPressure(f64),
    GripperOpen(f64),
    GripperClose(f64),
    PanTiltMove(PanTiltDems),
    PanTiltGoHome(MotionProfile, MotionProfile),
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// State of the recorded arm.
#[derive(Debug, Clone)]
pub struct RecordedArm {
    pub num_joints: usize,

    /// Current end-effector pose in the space frame
    pub pose: Matrix4<f64>,

    /// Current joint positions, the waist is joint 0
    pub joints: Vec<f64>,

    /// Limits of the waist joint
    pub waist_limits_rad: (f64, f64),

    /// Responses to the next end-effector requests, `true` to accept. Requests are accepted once
    /// this is empty.
    pub ee_responses: VecDeque<bool>,

    /// Responses to the next preset requests, `true` to succeed. A failed preset stops the
    /// end-effector half way to the preset position.
    pub preset_responses: VecDeque<bool>,

    pub home_pose: Matrix4<f64>,
    pub sleep_pose: Matrix4<f64>,
}

/// Handles onto the shared state of a set of recording clients.
#[derive(Clone)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<EqptCall>>>,
    arm: Arc<Mutex<RecordedArm>>,
    pan_tilt_rad: Arc<Mutex<(f64, f64)>>,
}

struct RecArm {
    calls: Arc<Mutex<Vec<EqptCall>>>,
    state: Arc<Mutex<RecordedArm>>,
}

struct RecBase {
    calls: Arc<Mutex<Vec<EqptCall>>>,
}

struct RecGripper {
    calls: Arc<Mutex<Vec<EqptCall>>>,
}

struct RecPanTilt {
    calls: Arc<Mutex<Vec<EqptCall>>>,
    pos_rad: Arc<Mutex<(f64, f64)>>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RecordedArm {
    pub fn new(num_joints: usize) -> Self {
        let sleep_pose = translation(0.1, 0.0, 0.1);

        Self {
            num_joints,
            pose: sleep_pose,
            joints: vec![0.0; num_joints],
            waist_limits_rad: (-3.1, 3.1),
            ee_responses: VecDeque::new(),
            preset_responses: VecDeque::new(),
            home_pose: translation(0.4, 0.0, 0.3),
            sleep_pose,
        }
    }

    pub fn waist_rad(&self) -> f64 {
        self.joints.first().copied().unwrap_or(0.0)
    }
}

impl Recorder {
    /// Create a new recorder for an arm with the given number of joints.
    pub fn new(num_joints: usize) -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            arm: Arc::new(Mutex::new(RecordedArm::new(num_joints))),
            pan_tilt_rad: Arc::new(Mutex::new((0.0, 0.0))),
        }
    }

    /// Build an equipment set whose clients all record into this recorder.
    pub fn eqpt(&self, with_arm: bool, with_gripper: bool, with_base: bool) -> Eqpt {
        let arm: Option<Box<dyn ArmClient>> = match with_arm {
            true => Some(Box::new(RecArm {
                calls: self.calls.clone(),
                state: self.arm.clone(),
            })),
            false => None,
        };
        let gripper: Option<Box<dyn GripperClient>> = match with_gripper {
            true => Some(Box::new(RecGripper {
                calls: self.calls.clone(),
            })),
            false => None,
        };
        let base: Option<Box<dyn BaseClient>> = match with_base {
            true => Some(Box::new(RecBase {
                calls: self.calls.clone(),
            })),
            false => None,
        };

        Eqpt {
            arm,
            gripper,
            base,
            pan_tilt: Box::new(RecPanTilt {
                calls: self.calls.clone(),
                pos_rad: self.pan_tilt_rad.clone(),
            }),
        }
    }

    /// Remove and return every call recorded so far.
    pub fn take_calls(&self) -> Vec<EqptCall> {
        std::mem::take(&mut *lock(&self.calls))
    }

    /// Access the recorded arm's state.
    pub fn arm(&self) -> MutexGuard<'_, RecordedArm> {
        lock(&self.arm)
    }

    pub fn pan_tilt_rad(&self) -> (f64, f64) {
        *lock(&self.pan_tilt_rad)
    }

    pub fn set_pan_tilt_rad(&self, pos_rad: (f64, f64)) {
        *lock(&self.pan_tilt_rad) = pos_rad;
    }
}

impl RecArm {
    fn record(&self, call: EqptCall) {
        lock(&self.calls).push(call);
    }
}

impl ArmClient for RecArm {
    fn num_joints(&self) -> usize {
        lock(&self.state).num_joints
    }

    fn joint_limits(&self, joint_name: &str) -> Result<(f64, f64), ArmClientError> {
        match joint_name {
            WAIST_JOINT => Ok(lock(&self.state).waist_limits_rad),
            _ => Err(ArmClientError::UnknownJoint(joint_name.into())),
        }
    }

    fn get_current_pose(&self) -> Matrix4<f64> {
        lock(&self.state).pose
    }

    fn get_joint_commands(&self) -> Vec<f64> {
        lock(&self.state).joints.clone()
    }

    fn get_single_joint_command(&self, joint_name: &str) -> Result<f64, ArmClientError> {
        match joint_name {
            WAIST_JOINT => Ok(lock(&self.state).waist_rad()),
            _ => Err(ArmClientError::UnknownJoint(joint_name.into())),
        }
    }

    fn set_ee_pose(&mut self, dems: &ArmPoseDems) -> Result<(), ArmClientError> {
        self.record(EqptCall::SetEePose(dems.clone()));

        let mut state = lock(&self.state);
        match state.ee_responses.pop_front().unwrap_or(true) {
            true => {
                state.pose = dems.target_pose;
                Ok(())
            }
            false => Err(ArmClientError::NoSolution),
        }
    }

    fn set_single_joint_position(&mut self, dems: &SingleJointDems) -> Result<(), ArmClientError> {
        self.record(EqptCall::SetSingleJoint(dems.clone()));

        if dems.joint_name != WAIST_JOINT {
            return Err(ArmClientError::UnknownJoint(dems.joint_name.clone()));
        }

        let mut state = lock(&self.state);
        let (lower, upper) = state.waist_limits_rad;
        if dems.pos_rad < lower || dems.pos_rad > upper {
            return Err(ArmClientError::JointLimit(
                dems.joint_name.clone(),
                dems.pos_rad,
            ));
        }

        // Turning the waist turns the end-effector about the base
        let delta_rad = dems.pos_rad - state.waist_rad();
        state.pose = frame::yaw_transform(delta_rad) * state.pose;

        if let Some(w) = state.joints.first_mut() {
            *w = dems.pos_rad;
        }

        Ok(())
    }

    fn go_to_preset(
        &mut self,
        preset: ArmPreset,
        profile: MotionProfile,
    ) -> Result<(), ArmClientError> {
        self.record(EqptCall::GoToPreset(preset, profile));

        let mut state = lock(&self.state);
        let target = match preset {
            ArmPreset::Home => state.home_pose,
            ArmPreset::Sleep => state.sleep_pose,
        };

        if !state.preset_responses.pop_front().unwrap_or(true) {
            for i in 0..3 {
                state.pose[(i, 3)] = 0.5 * (state.pose[(i, 3)] + target[(i, 3)]);
            }
            return Err(ArmClientError::PresetFailed(preset));
        }

        state.pose = target;
        state.joints.iter_mut().for_each(|j| *j = 0.0);

        Ok(())
    }

    fn set_trajectory_time(&mut self, profile: MotionProfile) {
        self.record(EqptCall::SetTrajectoryTime(profile));
    }
}

impl BaseClient for RecBase {
    fn command_velocity(&mut self, dems: &BaseVelDems) {
        lock(&self.calls).push(EqptCall::CommandVelocity(*dems));
    }

    fn reset_odom(&mut self) {
        lock(&self.calls).push(EqptCall::ResetOdom);
    }
}

impl GripperClient for RecGripper {
    fn set_pressure(&mut self, pressure: f64) {
        lock(&self.calls).push(EqptCall::SetPressure(pressure));
    }

    fn open(&mut self, delay_s: f64) {
        lock(&self.calls).push(EqptCall::GripperOpen(delay_s));
    }

    fn close(&mut self, delay_s: f64) {
        lock(&self.calls).push(EqptCall::GripperClose(delay_s));
    }
}

impl PanTiltClient for RecPanTilt {
    fn get_joint_commands(&self) -> (f64, f64) {
        *lock(&self.pos_rad)
    }

    fn pan_tilt_move(&mut self, dems: &PanTiltDems) {
        lock(&self.calls).push(EqptCall::PanTiltMove(*dems));
        *lock(&self.pos_rad) = (dems.pan_rad, dems.tilt_rad);
    }

    fn pan_tilt_go_home(
        &mut self,
        pan_profile: MotionProfile,
        tilt_profile: MotionProfile,
        _blocking: bool,
    ) {
        lock(&self.calls).push(EqptCall::PanTiltGoHome(pan_profile, tilt_profile));
        *lock(&self.pos_rad) = (0.0, 0.0);
    }
}

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

fn translation(x: f64, y: f64, z: f64) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(x, y, z))
}

/// Lock a mutex, recovering the data if another thread panicked while holding it.
fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}
