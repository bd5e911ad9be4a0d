//! # Simulation Client
//!
//! The simulation client provides in-process stand-ins for the robot's equipment so that the
//! executable can be run and tested without any hardware. It currently provides:
//!
//! - An arm with a spherical reach envelope, a floor, and per-joint limits. There are no real
//!   kinematics, the end-effector pose is simply taken to be wherever it was last commanded. The
//!   first joint rotates the arm about the vertical, so moving it turns the end-effector pose.
//! - A base which integrates its velocity demands into an odometry estimate.
//! - A gripper which remembers its pressure and whether it is open.
//! - A pan-tilt camera mount which clamps its demands to its limits.
//!
//! All of them log what they are asked to do.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info, trace};
use nalgebra::{Matrix4, Vector3};
use serde::Deserialize;
use std::time::Instant;

use crate::{
    arm_ctrl::frame,
    eqpt::{ArmClient, ArmClientError, BaseClient, Eqpt, GripperClient, PanTiltClient},
};
use comms_if::eqpt::{
    arm::{ArmPoseDems, ArmPreset, SingleJointDems},
    base::BaseVelDems,
    pan_tilt::PanTiltDems,
    MotionProfile,
};
use util::maths;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Parameters of the simulated equipment.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Names of the arm's joints, base first
    pub joint_names: Vec<String>,

    /// Units: radians
    pub joint_lower_rad: Vec<f64>,

    /// Units: radians
    pub joint_upper_rad: Vec<f64>,

    /// Furthest distance of the end-effector from the arm's base.
    ///
    /// Units: meters
    pub reach_m: f64,

    /// Lowest height of the end-effector above the arm's base.
    ///
    /// Units: meters
    pub min_z_m: f64,

    /// End-effector position in the home preset.
    ///
    /// Units: meters
    pub home_ee_pos_m: [f64; 3],

    /// End-effector position in the sleep preset, the arm starts here.
    ///
    /// Units: meters
    pub sleep_ee_pos_m: [f64; 3],

    /// Units: radians
    pub pan_limits_rad: [f64; 2],

    /// Units: radians
    pub tilt_limits_rad: [f64; 2],
}

pub struct SimArm {
    params: SimParams,
    joints_rad: Vec<f64>,
    pose: Matrix4<f64>,
    trajectory_profile: Option<MotionProfile>,
}

pub struct SimBase {
    last_dems: BaseVelDems,
    last_update: Option<Instant>,

    /// `(x, y, heading)` in the odometry frame.
    ///
    /// Units: meters, meters, radians
    odom: (f64, f64, f64),
}

#[derive(Default)]
pub struct SimGripper {
    pressure: f64,
    open: Option<bool>,
}

pub struct SimPanTilt {
    pan_limits_rad: [f64; 2],
    tilt_limits_rad: [f64; 2],
    pos_rad: (f64, f64),
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimClientError {
    #[error("Invalid simulation parameters: {0}")]
    InvalidParams(String),
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a full set of simulated equipment.
pub fn build_eqpt(
    params: &SimParams,
    use_arm: bool,
    use_base: bool,
) -> Result<Eqpt, SimClientError> {
    let arm: Option<Box<dyn ArmClient>> = if use_arm {
        Some(Box::new(SimArm::new(params.clone())?))
    } else {
        None
    };
    let gripper: Option<Box<dyn GripperClient>> = if use_arm {
        Some(Box::new(SimGripper::default()))
    } else {
        None
    };
    let base: Option<Box<dyn BaseClient>> = if use_base {
        Some(Box::new(SimBase::new()))
    } else {
        None
    };

    Ok(Eqpt {
        arm,
        gripper,
        base,
        pan_tilt: Box::new(SimPanTilt::new(params)),
    })
}

fn position_transform(pos_m: &[f64; 3]) -> Matrix4<f64> {
    Matrix4::new_translation(&Vector3::new(pos_m[0], pos_m[1], pos_m[2]))
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimArm {
    pub fn new(params: SimParams) -> Result<Self, SimClientError> {
        let n = params.joint_names.len();

        if n == 0 {
            return Err(SimClientError::InvalidParams("the arm has no joints".into()));
        }
        if params.joint_lower_rad.len() != n || params.joint_upper_rad.len() != n {
            return Err(SimClientError::InvalidParams(format!(
                "expected {} joint limits, found {} lower and {} upper",
                n,
                params.joint_lower_rad.len(),
                params.joint_upper_rad.len()
            )));
        }

        Ok(Self {
            pose: position_transform(&params.sleep_ee_pos_m),
            joints_rad: vec![0.0; n],
            trajectory_profile: None,
            params,
        })
    }

    fn joint_index(&self, joint_name: &str) -> Result<usize, ArmClientError> {
        self.params
            .joint_names
            .iter()
            .position(|n| n == joint_name)
            .ok_or_else(|| ArmClientError::UnknownJoint(joint_name.into()))
    }

    fn within_limits(&self, idx: usize, pos_rad: f64) -> bool {
        pos_rad >= self.params.joint_lower_rad[idx] && pos_rad <= self.params.joint_upper_rad[idx]
    }
}

impl ArmClient for SimArm {
    fn num_joints(&self) -> usize {
        self.params.joint_names.len()
    }

    fn joint_limits(&self, joint_name: &str) -> Result<(f64, f64), ArmClientError> {
        let idx = self.joint_index(joint_name)?;
        Ok((
            self.params.joint_lower_rad[idx],
            self.params.joint_upper_rad[idx],
        ))
    }

    fn get_current_pose(&self) -> Matrix4<f64> {
        self.pose
    }

    fn get_joint_commands(&self) -> Vec<f64> {
        self.joints_rad.clone()
    }

    fn get_single_joint_command(&self, joint_name: &str) -> Result<f64, ArmClientError> {
        Ok(self.joints_rad[self.joint_index(joint_name)?])
    }

    fn set_ee_pose(&mut self, dems: &ArmPoseDems) -> Result<(), ArmClientError> {
        let pos = frame::translation(&dems.target_pose);

        if pos.norm() > self.params.reach_m || pos[2] < self.params.min_z_m {
            trace!("SimArm: no solution for target at {:?}", pos.as_slice());
            return Err(ArmClientError::NoSolution);
        }

        // The base joint has to face the target, keep it where it is when the target is overhead
        let base_rad = if pos[0].hypot(pos[1]) > 1e-6 {
            pos[1].atan2(pos[0])
        } else {
            self.joints_rad[0]
        };
        if !self.within_limits(0, base_rad) {
            trace!("SimArm: base joint cannot face the target ({:.4} rad)", base_rad);
            return Err(ArmClientError::NoSolution);
        }

        self.joints_rad[0] = base_rad;
        self.pose = dems.target_pose;

        trace!(
            "SimArm: end-effector to ({:.3}, {:.3}, {:.3}) m",
            pos[0],
            pos[1],
            pos[2]
        );

        Ok(())
    }

    fn set_single_joint_position(&mut self, dems: &SingleJointDems) -> Result<(), ArmClientError> {
        let idx = self.joint_index(&dems.joint_name)?;

        if !self.within_limits(idx, dems.pos_rad) {
            return Err(ArmClientError::JointLimit(
                dems.joint_name.clone(),
                dems.pos_rad,
            ));
        }

        if idx == 0 {
            let delta = dems.pos_rad - self.joints_rad[0];
            self.pose = frame::yaw_transform(delta) * self.pose;
        }
        self.joints_rad[idx] = dems.pos_rad;

        trace!("SimArm: {} to {:.4} rad", dems.joint_name, dems.pos_rad);

        Ok(())
    }

    fn go_to_preset(
        &mut self,
        preset: ArmPreset,
        profile: MotionProfile,
    ) -> Result<(), ArmClientError> {
        self.pose = match preset {
            ArmPreset::Home => position_transform(&self.params.home_ee_pos_m),
            ArmPreset::Sleep => position_transform(&self.params.sleep_ee_pos_m),
        };
        self.joints_rad.iter_mut().for_each(|j| *j = 0.0);

        info!(
            "SimArm: moved to the {:?} preset over {:.2} s",
            preset, profile.moving_time_s
        );

        Ok(())
    }

    fn set_trajectory_time(&mut self, profile: MotionProfile) {
        if self.trajectory_profile != Some(profile) {
            debug!(
                "SimArm: trajectory time set to {:.2} s ({:.2} s accel)",
                profile.moving_time_s, profile.accel_time_s
            );
        }
        self.trajectory_profile = Some(profile);
    }
}

impl SimBase {
    pub fn new() -> Self {
        Self {
            last_dems: BaseVelDems::default(),
            last_update: None,
            odom: (0.0, 0.0, 0.0),
        }
    }

    /// Current odometry estimate as `(x, y, heading)`.
    pub fn odom(&self) -> (f64, f64, f64) {
        self.odom
    }
}

impl Default for SimBase {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseClient for SimBase {
    fn command_velocity(&mut self, dems: &BaseVelDems) {
        let now = Instant::now();

        // Integrate the previous demand over the time it was held
        if let Some(last) = self.last_update {
            let dt = (now - last).as_secs_f64();
            let (x, y, theta) = self.odom;
            self.odom = (
                x + self.last_dems.linear_ms * theta.cos() * dt,
                y + self.last_dems.linear_ms * theta.sin() * dt,
                maths::wrap_pi(theta + self.last_dems.angular_rads * dt),
            );
        }

        if *dems != self.last_dems {
            debug!(
                "SimBase: velocity {:.3} m/s, {:.3} rad/s",
                dems.linear_ms, dems.angular_rads
            );
        }

        self.last_dems = *dems;
        self.last_update = Some(now);
    }

    fn reset_odom(&mut self) {
        info!(
            "SimBase: odometry reset from ({:.3}, {:.3}, {:.3})",
            self.odom.0, self.odom.1, self.odom.2
        );
        self.odom = (0.0, 0.0, 0.0);
    }
}

impl GripperClient for SimGripper {
    fn set_pressure(&mut self, pressure: f64) {
        self.pressure = maths::clamp(pressure, 0.0, 1.0);
        debug!("SimGripper: pressure {:.3}", self.pressure);
    }

    fn open(&mut self, delay_s: f64) {
        if self.open != Some(true) {
            info!("SimGripper: opening (delay {:.2} s)", delay_s);
        }
        self.open = Some(true);
    }

    fn close(&mut self, delay_s: f64) {
        if self.open != Some(false) {
            info!(
                "SimGripper: closing at {:.1}% pressure (delay {:.2} s)",
                self.pressure * 100.0,
                delay_s
            );
        }
        self.open = Some(false);
    }
}

impl SimPanTilt {
    pub fn new(params: &SimParams) -> Self {
        Self {
            pan_limits_rad: params.pan_limits_rad,
            tilt_limits_rad: params.tilt_limits_rad,
            pos_rad: (0.0, 0.0),
        }
    }
}

impl PanTiltClient for SimPanTilt {
    fn get_joint_commands(&self) -> (f64, f64) {
        self.pos_rad
    }

    fn pan_tilt_move(&mut self, dems: &PanTiltDems) {
        let [pan_min, pan_max] = self.pan_limits_rad;
        let [tilt_min, tilt_max] = self.tilt_limits_rad;

        self.pos_rad = (
            maths::clamp(dems.pan_rad, pan_min, pan_max),
            maths::clamp(dems.tilt_rad, tilt_min, tilt_max),
        );

        trace!(
            "SimPanTilt: pan {:.4} rad, tilt {:.4} rad",
            self.pos_rad.0,
            self.pos_rad.1
        );
    }

    fn pan_tilt_go_home(
        &mut self,
        pan_profile: MotionProfile,
        _tilt_profile: MotionProfile,
        _blocking: bool,
    ) {
        info!(
            "SimPanTilt: going home over {:.2} s",
            pan_profile.moving_time_s
        );
        self.pos_rad = (0.0, 0.0);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    const PROFILE: MotionProfile = MotionProfile::new(0.2, 0.1);

    fn sim_params() -> SimParams {
        util::params::from_str(
            r#"
            joint_names = ["waist", "shoulder", "elbow", "forearm_roll", "wrist_angle", "wrist_rotate"]
            joint_lower_rad = [-3.1, -1.9, -1.9, -3.1, -1.7, -3.1]
            joint_upper_rad = [3.1, 1.9, 1.6, 3.1, 2.1, 3.1]
            reach_m = 0.55
            min_z_m = 0.0
            home_ee_pos_m = [0.4, 0.0, 0.3]
            sleep_ee_pos_m = [0.13, 0.0, 0.09]
            pan_limits_rad = [-3.1, 3.1]
            tilt_limits_rad = [-1.5, 1.3]
            "#,
        )
        .unwrap()
    }

    fn pose_dems(x: f64, y: f64, z: f64) -> ArmPoseDems {
        ArmPoseDems {
            target_pose: Matrix4::new_translation(&Vector3::new(x, y, z)),
            seed_joints_rad: vec![0.0; 6],
            profile: PROFILE,
            blocking: false,
        }
    }

    #[test]
    fn test_arm_reach() {
        let mut arm = SimArm::new(sim_params()).unwrap();

        assert!(arm.set_ee_pose(&pose_dems(0.3, 0.1, 0.2)).is_ok());
        assert_relative_eq!(arm.get_joint_commands()[0], 0.1f64.atan2(0.3));

        assert_eq!(
            arm.set_ee_pose(&pose_dems(0.6, 0.0, 0.2)),
            Err(ArmClientError::NoSolution)
        );
        assert_eq!(
            arm.set_ee_pose(&pose_dems(0.3, 0.0, -0.05)),
            Err(ArmClientError::NoSolution)
        );

        // Rejected requests leave the arm where it was
        assert_relative_eq!(arm.get_current_pose()[(0, 3)], 0.3);
    }

    #[test]
    fn test_arm_waist_turns_pose() {
        let mut arm = SimArm::new(sim_params()).unwrap();
        arm.go_to_preset(ArmPreset::Home, PROFILE).unwrap();

        let dems = SingleJointDems {
            joint_name: "waist".into(),
            pos_rad: std::f64::consts::FRAC_PI_2,
            profile: PROFILE,
            blocking: false,
        };
        arm.set_single_joint_position(&dems).unwrap();

        let pose = arm.get_current_pose();
        assert_relative_eq!(pose[(0, 3)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(pose[(1, 3)], 0.4, epsilon = 1e-12);
        assert_relative_eq!(frame::yaw_of(&pose), std::f64::consts::FRAC_PI_2, epsilon = 1e-12);

        let dems = SingleJointDems {
            pos_rad: 3.2,
            ..dems
        };
        assert_eq!(
            arm.set_single_joint_position(&dems),
            Err(ArmClientError::JointLimit("waist".into(), 3.2))
        );
        assert_eq!(
            arm.get_single_joint_command("wrist"),
            Err(ArmClientError::UnknownJoint("wrist".into()))
        );
    }

    #[test]
    fn test_invalid_limits() {
        let mut p = sim_params();
        p.joint_upper_rad.pop();
        assert!(SimArm::new(p).is_err());
    }

    #[test]
    fn test_pan_tilt_clamps() {
        let mut pt = SimPanTilt::new(&sim_params());

        pt.pan_tilt_move(&PanTiltDems {
            pan_rad: 0.5,
            tilt_rad: 2.0,
            pan_profile: PROFILE,
            tilt_profile: PROFILE,
            blocking: false,
        });
        assert_eq!(pt.get_joint_commands(), (0.5, 1.3));

        pt.pan_tilt_go_home(PROFILE, PROFILE, false);
        assert_eq!(pt.get_joint_commands(), (0.0, 0.0));
    }

    #[test]
    fn test_base_odom_reset() {
        let mut base = SimBase::new();

        base.command_velocity(&BaseVelDems {
            linear_ms: 0.5,
            angular_rads: 0.0,
        });
        std::thread::sleep(std::time::Duration::from_millis(20));
        base.command_velocity(&BaseVelDems::default());
        assert!(base.odom().0 > 0.0);

        base.reset_odom();
        assert_eq!(base.odom(), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_build_eqpt() {
        let eqpt = build_eqpt(&sim_params(), false, true).unwrap();
        assert!(eqpt.arm.is_none());
        assert!(eqpt.gripper.is_none());
        assert!(eqpt.base.is_some());

        let eqpt = build_eqpt(&sim_params(), true, false).unwrap();
        assert_eq!(eqpt.arm.as_ref().unwrap().num_joints(), 6);
        assert!(eqpt.gripper.is_some());
    }
}
