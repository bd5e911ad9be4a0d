//! # Teleoperation Executable Parameters
//!
//! This module provides parameters for the teleoperation executable.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct TeleopExecParams {
    /// Pass base velocity and odometry commands through to the base
    pub use_base: bool,

    /// The robot has an arm (and gripper)
    pub use_arm: bool,

    /// Archive the tracked end-effector frame every cycle
    pub archive_tracked_frame: bool,

    /// Time the last snapshot of a TC script is held for before the executable stops.
    ///
    /// Units: seconds
    pub script_end_linger_s: f64,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_file() {
        let p: TeleopExecParams =
            util::params::from_str(include_str!("../../params/teleop_exec.toml")).unwrap();

        assert!(p.use_arm);
        assert!(p.script_end_linger_s >= 0.0);
    }

    #[test]
    fn test_module_params_files() {
        let mode: crate::mode_ctrl::Params =
            util::params::from_str(include_str!("../../params/mode_ctrl.toml")).unwrap();
        assert_eq!((mode.min_rate_hz, mode.max_rate_hz), (10, 40));

        let arm: crate::arm_ctrl::Params =
            util::params::from_str(include_str!("../../params/arm_ctrl.toml")).unwrap();
        assert!(arm.validate().is_ok());

        let _: crate::gripper_ctrl::Params =
            util::params::from_str(include_str!("../../params/gripper_ctrl.toml")).unwrap();
        let _: crate::pan_tilt_ctrl::Params =
            util::params::from_str(include_str!("../../params/pan_tilt_ctrl.toml")).unwrap();
    }

    #[cfg(feature = "sim")]
    #[test]
    fn test_sim_params_file() {
        let p: crate::sim_client::SimParams =
            util::params::from_str(include_str!("../../params/sim_eqpt.toml")).unwrap();
        assert!(crate::sim_client::build_eqpt(&p, true, true).is_ok());
    }
}
