//! End-effector pose tracker
//!
//! The tracker holds the commanded end-effector pose split into two transforms:
//!
//! - `T_sy`, from the arm's space frame to a yaw-aligned frame. This is a pure rotation about the
//!   vertical with no translation, taken from the heading of the last authoritative pose.
//! - `T_yb`, from the yaw-aligned frame to the end-effector.
//!
//! Operator increments are applied to `T_yb`, so "forward" always means forward along the arm's
//! current heading no matter how the waist is turned. The target sent to the arm is
//! `T_sd = T_sy * T_yb'`.
//!
//! `T_yb` only ever changes on [`PoseTracker::resync`] or when a motion request built from it was
//! accepted, the tracked pose never drifts from what the arm was actually commanded to.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};

// Internal
use super::{
    frame::{self, Transform},
    Params,
};
use crate::eqpt::{ArmClient, ArmClientError};
use comms_if::{eqpt::arm::ArmPoseDems, tc::EeCmd};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks the commanded end-effector pose across cycles.
#[derive(Debug, Clone)]
pub struct PoseTracker {
    params: Params,

    num_joints: usize,

    /// Space to yaw-aligned frame
    t_sy: Transform,

    /// Yaw-aligned frame to end-effector
    t_yb: Transform,
}

/// A candidate pose built from the tracked frame, to be committed only if the arm accepts it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The new yaw-aligned to end-effector transform
    t_yb: Transform,

    /// The corresponding target pose in the space frame
    t_sd: Transform,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of one tracker step.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerOutcome {
    /// No end-effector command, nothing was requested
    Idle,

    /// The arm accepted the target and the tracked frame was updated
    Moved,

    /// The arm rejected the target, the tracked frame is unchanged
    Rejected(ArmClientError),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseTracker {
    /// Create a new tracker with identity frames. Call [`PoseTracker::resync`] with the arm's
    /// current pose before use.
    pub fn new(params: &Params, num_joints: usize) -> Self {
        Self {
            params: params.clone(),
            num_joints,
            t_sy: Transform::identity(),
            t_yb: Transform::identity(),
        }
    }

    /// Re-anchor the tracked frames on an authoritative end-effector pose `t_sb`.
    pub fn resync(&mut self, t_sb: &Transform) {
        let yaw = frame::yaw_of(t_sb);

        self.t_sy = frame::yaw_transform(yaw);
        self.t_yb = frame::inverse(&self.t_sy) * t_sb;

        trace!("Tracker resynced at yaw {:.4} rad", yaw);
    }

    /// True if the arm has enough joints for lateral end-effector motion.
    pub fn lateral_joints_ok(&self) -> bool {
        self.num_joints >= self.params.lateral_min_joints
    }

    /// Build the candidate pose for the given command, or `None` if the command asks for no
    /// motion.
    pub fn calc_target(&self, cmd: &EeCmd) -> Option<Candidate> {
        let lateral_joints_ok = self.lateral_joints_ok();

        let position_changed = cmd.x.sign() != 0.0
            || cmd.z.sign() != 0.0
            || (lateral_joints_ok && cmd.y.sign() != 0.0);
        let orientation_changed = cmd.roll.sign() != 0.0 || cmd.pitch.sign() != 0.0;

        if !position_changed && !orientation_changed {
            return None;
        }

        let mut w = self.t_yb;

        if position_changed {
            let step = self.params.translate_step_m;

            w[(0, 3)] += cmd.x.sign() * step;

            // Lateral motion only once the end-effector is clear of the base
            if lateral_joints_ok && w[(0, 3)] > self.params.lateral_min_x_m {
                w[(1, 3)] += cmd.y.sign() * step;
            }

            w[(2, 3)] += cmd.z.sign() * step;
        }

        if orientation_changed {
            let step = self.params.rotate_step_rad;
            let (roll, pitch, yaw) = frame::rotation_to_rpy(&frame::rotation(&w));

            let rot = frame::rpy_to_rotation(
                roll + cmd.roll.sign() * step,
                pitch + cmd.pitch.sign() * step,
                yaw,
            );
            frame::set_rotation(&mut w, &rot);
        }

        Some(Candidate {
            t_yb: w,
            t_sd: self.t_sy * w,
        })
    }

    /// Accept a candidate as the new tracked frame.
    pub fn commit(&mut self, candidate: Candidate) {
        self.t_yb = candidate.t_yb;
    }

    /// Perform one tracking step, requesting the arm move to the target built from `cmd`.
    pub fn step(&mut self, cmd: &EeCmd, arm: &mut dyn ArmClient) -> TrackerOutcome {
        let candidate = match self.calc_target(cmd) {
            Some(c) => c,
            None => return TrackerOutcome::Idle,
        };

        let dems = ArmPoseDems {
            target_pose: candidate.t_sd,
            seed_joints_rad: arm.get_joint_commands(),
            profile: self.params.ee_profile,
            blocking: false,
        };

        match arm.set_ee_pose(&dems) {
            Ok(()) => {
                self.commit(candidate);
                TrackerOutcome::Moved
            }
            Err(e) => {
                debug!("End-effector target rejected: {}", e);
                TrackerOutcome::Rejected(e)
            }
        }
    }

    /// Space to yaw-aligned frame.
    pub fn t_sy(&self) -> &Transform {
        &self.t_sy
    }

    /// Yaw-aligned frame to end-effector.
    pub fn t_yb(&self) -> &Transform {
        &self.t_yb
    }
}

impl Candidate {
    pub fn t_yb(&self) -> &Transform {
        &self.t_yb
    }

    pub fn t_sd(&self) -> &Transform {
        &self.t_sd
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::recorder::{EqptCall, Recorder};
    use approx::assert_relative_eq;
    use comms_if::tc::{EeAxisCmd, EePitchCmd, EeRollCmd};
    use nalgebra::Vector3;

    fn ee_x_inc() -> EeCmd {
        EeCmd {
            x: EeAxisCmd::Inc,
            ..Default::default()
        }
    }

    #[test]
    fn test_resync_splits_yaw() {
        let mut tracker = PoseTracker::new(&Params::default(), 6);
        let t_sb = frame::from_parts(
            &frame::rpy_to_rotation(0.0, 0.3, 0.5),
            &Vector3::new(0.2, 0.2, 0.3),
        );

        tracker.resync(&t_sb);

        // T_sy is a pure yaw with no translation
        assert_relative_eq!(frame::yaw_of(tracker.t_sy()), 0.5, epsilon = 1e-12);
        assert_eq!(frame::translation(tracker.t_sy()), Vector3::zeros());

        // T_yb carries the pitch and no yaw, and the two compose back to the pose
        assert_relative_eq!(frame::yaw_of(tracker.t_yb()), 0.0, epsilon = 1e-12);
        assert_relative_eq!(tracker.t_sy() * tracker.t_yb(), t_sb, epsilon = 1e-12);
    }

    #[test]
    fn test_three_steps_forward() {
        let rec = Recorder::new(5);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();

        let mut tracker = PoseTracker::new(&Params::default(), 5);

        for _ in 0..3 {
            assert_eq!(tracker.step(&ee_x_inc(), arm), TrackerOutcome::Moved);
        }

        assert_relative_eq!(tracker.t_yb()[(0, 3)], 0.03, epsilon = 1e-12);
        assert_eq!(tracker.t_yb()[(1, 3)], 0.0);

        let calls = rec.take_calls();
        assert_eq!(calls.len(), 3);
        match &calls[2] {
            EqptCall::SetEePose(d) => {
                assert_relative_eq!(d.target_pose[(0, 3)], 0.03, epsilon = 1e-12);
                assert_eq!(d.seed_joints_rad.len(), 5);
                assert_eq!(d.profile, Params::default().ee_profile);
                assert!(!d.blocking);
            }
            c => panic!("Expected an end-effector request, got {:?}", c),
        }
    }

    #[test]
    fn test_rejected_leaves_frame_untouched() {
        let rec = Recorder::new(6);
        rec.arm().ee_responses.extend(vec![true, false]);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();

        let mut tracker = PoseTracker::new(&Params::default(), 6);
        tracker.resync(&arm.get_current_pose());

        let cmd = EeCmd {
            z: EeAxisCmd::Dec,
            pitch: EePitchCmd::Down,
            ..Default::default()
        };

        assert_eq!(tracker.step(&cmd, arm), TrackerOutcome::Moved);
        let before = *tracker.t_yb();

        assert_eq!(
            tracker.step(&cmd, arm),
            TrackerOutcome::Rejected(ArmClientError::NoSolution)
        );
        assert_eq!(*tracker.t_yb(), before);
    }

    #[test]
    fn test_idle_makes_no_request() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let mut tracker = PoseTracker::new(&Params::default(), 6);

        assert_eq!(tracker.step(&EeCmd::default(), arm), TrackerOutcome::Idle);
        assert!(rec.take_calls().is_empty());
    }

    #[test]
    fn test_lateral_constraint() {
        let y_inc = EeCmd {
            y: EeAxisCmd::Inc,
            ..Default::default()
        };

        // Not enough joints, a lone lateral command is no motion at all
        let tracker = PoseTracker::new(&Params::default(), 5);
        assert_eq!(tracker.calc_target(&y_inc), None);

        // Enough joints but still folded in, the target keeps the tracked lateral offset
        let mut tracker = PoseTracker::new(&Params::default(), 6);
        tracker.resync(&Transform::new_translation(&Vector3::new(0.3, 0.0, 0.2)));
        let c = tracker.calc_target(&y_inc).unwrap();
        assert_eq!(c.t_yb()[(1, 3)], 0.0);

        // Reaching forward past the threshold in the same step unlocks lateral motion
        let c = tracker
            .calc_target(&EeCmd {
                x: EeAxisCmd::Inc,
                y: EeAxisCmd::Inc,
                ..Default::default()
            })
            .unwrap();
        assert_relative_eq!(c.t_yb()[(0, 3)], 0.31, epsilon = 1e-12);
        assert_relative_eq!(c.t_yb()[(1, 3)], 0.01, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_steps() {
        let mut tracker = PoseTracker::new(&Params::default(), 6);
        tracker.resync(&frame::yaw_transform(1.0));

        let c = tracker
            .calc_target(&EeCmd {
                roll: EeRollCmd::Cw,
                pitch: EePitchCmd::Up,
                ..Default::default()
            })
            .unwrap();

        let (roll, pitch, yaw) = frame::rotation_to_rpy(&frame::rotation(c.t_yb()));
        assert_relative_eq!(roll, -0.04, epsilon = 1e-12);
        assert_relative_eq!(pitch, -0.04, epsilon = 1e-12);
        assert_relative_eq!(yaw, 0.0, epsilon = 1e-12);

        // The space frame target carries the heading
        assert_relative_eq!(frame::yaw_of(c.t_sd()), 1.0, epsilon = 1e-12);
    }
}
