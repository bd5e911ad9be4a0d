//! # Telecommand processor module
//!
//! The telecommand processor applies one operator snapshot to the control modules and the
//! equipment, in a fixed order:
//!
//! 1. Mode control (loop rate)
//! 2. Pan-tilt camera
//! 3. Base velocity and odometry reset
//! 4. Arm preset, if there is an arm
//! 5. Waist
//! 6. Gripper
//! 7. End-effector
//!
//! Speed, speed toggle, gripper pressure and odometry reset commands are one-shot and only act the
//! first time a given snapshot is processed. Everything else is re-applied every cycle for as long
//! as the snapshot is held.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{trace, warn};

// Internal
use crate::{
    arm_ctrl::TrackerOutcome,
    cmd_store::StampedCmd,
    data_store::DataStore,
    eqpt::Eqpt,
    gripper_ctrl::{self, GripperAction},
    mode_ctrl,
    pan_tilt_ctrl::{self, OutputData as PanTiltOutput},
};
use comms_if::{
    eqpt::base::BaseVelDems,
    tc::{BaseResetOdomCmd, GripperPwmCmd, SpeedCmd, SpeedToggleCmd},
};
use util::module::State;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Execute a telecommand snapshot.
///
/// Mutates the datastore and sends demands to the equipment. Errors from individual modules are
/// logged and do not stop the rest of the snapshot being processed.
pub fn exec(ds: &mut DataStore, eqpt: &mut Eqpt, stamped: &StampedCmd) {
    let fresh = ds.mark_tc_seen(stamped.seq);
    let tc = &stamped.tc;

    if fresh {
        trace!("Processing new TC {}: {:?}", stamped.seq, tc);
    }

    // ---- MODE ----

    let mode_input = if fresh {
        mode_ctrl::InputData {
            speed: tc.speed,
            speed_toggle: tc.speed_toggle,
        }
    } else {
        mode_ctrl::InputData {
            speed: SpeedCmd::None,
            speed_toggle: SpeedToggleCmd::None,
        }
    };
    match ds.mode_ctrl.proc(&mode_input) {
        Ok((_, rpt)) => ds.mode_ctrl_status_rpt = rpt,
        Err(e) => warn!("Error during ModeCtrl processing: {}", e),
    }

    // ---- PAN-TILT ----

    let current_pos_rad = if pan_tilt_ctrl::needs_current_pos(tc.pan, tc.tilt) {
        eqpt.pan_tilt.get_joint_commands()
    } else {
        (0.0, 0.0)
    };
    match ds.pan_tilt_ctrl.proc(&pan_tilt_ctrl::InputData {
        pan: tc.pan,
        tilt: tc.tilt,
        current_pos_rad,
    }) {
        Ok((output, _)) => {
            match output {
                PanTiltOutput::Home {
                    pan_profile,
                    tilt_profile,
                } => eqpt
                    .pan_tilt
                    .pan_tilt_go_home(pan_profile, tilt_profile, false),
                PanTiltOutput::Move(ref dems) => eqpt.pan_tilt.pan_tilt_move(dems),
                PanTiltOutput::None => (),
            }
            ds.pan_tilt_ctrl_output = Some(output);
        }
        Err(e) => warn!("Error during PanTiltCtrl processing: {}", e),
    }

    // ---- BASE ----

    if ds.use_base {
        if let Some(ref mut base) = eqpt.base {
            base.command_velocity(&BaseVelDems {
                linear_ms: tc.base_x_ms,
                angular_rads: tc.base_theta_rads,
            });

            if fresh && tc.base_reset_odom == BaseResetOdomCmd::Reset {
                base.reset_odom();
            }
        }
    }

    // ---- ARM ----

    // Everything from here on needs an arm
    let (arm_ctrl, arm) = match (ds.arm_ctrl.as_mut(), eqpt.arm.as_mut()) {
        (Some(c), Some(a)) => (c, a.as_mut()),
        _ => return,
    };

    arm_ctrl.proc_preset(tc.pose, arm);

    if let Err(e) = arm_ctrl.proc_waist(tc.waist, arm) {
        warn!("Error during waist processing: {}", e);
    }

    // ---- GRIPPER ----

    if let Some(ref mut gripper) = eqpt.gripper {
        let input = gripper_ctrl::InputData {
            gripper: tc.gripper,
            pwm: if fresh {
                tc.gripper_pwm
            } else {
                GripperPwmCmd::None
            },
        };

        match ds.gripper_ctrl.proc(&input) {
            Ok((output, rpt)) => {
                if let Some(p) = output.pressure {
                    gripper.set_pressure(p);
                }
                match output.action {
                    GripperAction::Open { delay_s } => gripper.open(delay_s),
                    GripperAction::Close { delay_s } => gripper.close(delay_s),
                    GripperAction::None => (),
                }

                ds.gripper_ctrl_output = Some(output);
                ds.gripper_ctrl_status_rpt = rpt;
            }
            Err(e) => warn!("Error during GripperCtrl processing: {}", e),
        }
    }

    // ---- END EFFECTOR ----

    if let TrackerOutcome::Rejected(_) = arm_ctrl.proc_ee(&tc.ee_cmd(), arm) {
        ds.num_ee_rejections += 1;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
