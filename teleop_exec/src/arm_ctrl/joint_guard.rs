//! Joint limit guard
//!
//! Steps a single named joint by a relative amount. If the arm rejects the step the joint is sent
//! to the limit it was heading towards instead, so that holding a command near a limit ends with
//! the joint sitting exactly on the limit rather than one step short of it.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use serde::Serialize;

// Internal
use crate::eqpt::{ArmClient, ArmClientError};
use comms_if::eqpt::{arm::SingleJointDems, MotionProfile};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Guard for one joint with fixed limits.
#[derive(Debug, Clone)]
pub struct JointLimitGuard {
    joint_name: String,

    /// Units: radians
    lower_rad: f64,

    /// Units: radians
    upper_rad: f64,

    profile: MotionProfile,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Result of a single guarded step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum GuardOutcome {
    /// The full step was accepted.
    Stepped { pos_rad: f64 },

    /// The step was rejected and one request to the limit was made instead, `executed` records
    /// whether the arm accepted it.
    FallbackToLimit { pos_rad: f64, executed: bool },

    /// The step was rejected and the joint was already at the limit, nothing more was requested.
    AtLimit { pos_rad: f64 },
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl JointLimitGuard {
    pub fn new(joint_name: &str, limits_rad: (f64, f64), profile: MotionProfile) -> Self {
        Self {
            joint_name: joint_name.to_string(),
            lower_rad: limits_rad.0,
            upper_rad: limits_rad.1,
            profile,
        }
    }

    pub fn joint_name(&self) -> &str {
        &self.joint_name
    }

    /// The `(lower, upper)` limits of the joint.
    pub fn limits(&self) -> (f64, f64) {
        (self.lower_rad, self.upper_rad)
    }

    /// The limit in the direction of travel, upper for positive steps.
    pub fn limit_towards(&self, delta_rad: f64) -> f64 {
        if delta_rad >= 0.0 {
            self.upper_rad
        } else {
            self.lower_rad
        }
    }

    /// Step the joint by `delta_rad` from its last commanded position.
    ///
    /// Only fails if the current position of the joint cannot be read. Rejected motions are
    /// reported through the outcome.
    pub fn step(
        &self,
        arm: &mut dyn ArmClient,
        delta_rad: f64,
    ) -> Result<GuardOutcome, ArmClientError> {
        let current = arm.get_single_joint_command(&self.joint_name)?;
        let target = current + delta_rad;

        match arm.set_single_joint_position(&self.dems(target)) {
            Ok(()) => return Ok(GuardOutcome::Stepped { pos_rad: target }),
            Err(e) => debug!("{} step to {:.4} rad rejected: {}", self.joint_name, target, e),
        }

        let limit = self.limit_towards(delta_rad);

        // Exact comparison, the limit is only ever reached by commanding the stored value
        if current == limit {
            return Ok(GuardOutcome::AtLimit { pos_rad: limit });
        }

        let executed = match arm.set_single_joint_position(&self.dems(limit)) {
            Ok(()) => true,
            Err(e) => {
                debug!("{} fallback to {:.4} rad rejected: {}", self.joint_name, limit, e);
                false
            }
        };

        Ok(GuardOutcome::FallbackToLimit {
            pos_rad: limit,
            executed,
        })
    }

    fn dems(&self, pos_rad: f64) -> SingleJointDems {
        SingleJointDems {
            joint_name: self.joint_name.clone(),
            pos_rad,
            profile: self.profile,
            blocking: false,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::eqpt::recorder::{EqptCall, Recorder, WAIST_JOINT};

    const PROFILE: MotionProfile = MotionProfile::new(0.2, 0.1);

    fn joint_requests(calls: &[EqptCall]) -> Vec<f64> {
        calls
            .iter()
            .filter_map(|c| match c {
                EqptCall::SetSingleJoint(d) => Some(d.pos_rad),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_step_within_limits() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let guard = JointLimitGuard::new(WAIST_JOINT, (-1.0, 1.0), PROFILE);

        let outcome = guard.step(arm, 0.06).unwrap();

        assert_eq!(outcome, GuardOutcome::Stepped { pos_rad: 0.06 });
        assert_eq!(joint_requests(&rec.take_calls()), vec![0.06]);
    }

    #[test]
    fn test_fallback_to_limit() {
        let rec = Recorder::new(6);
        rec.arm().waist_limits_rad = (-1.0, 1.0);
        rec.arm().joints[0] = 0.97;

        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let guard = JointLimitGuard::new(WAIST_JOINT, (-1.0, 1.0), PROFILE);

        // 0.97 + 0.06 is past the upper limit, so exactly one fallback to 1.0 follows
        let outcome = guard.step(arm, 0.06).unwrap();
        assert_eq!(
            outcome,
            GuardOutcome::FallbackToLimit {
                pos_rad: 1.0,
                executed: true
            }
        );
        assert_eq!(joint_requests(&rec.take_calls()), vec![0.97 + 0.06, 1.0]);

        // Now sitting on the limit the step is rejected and nothing else is sent
        let outcome = guard.step(arm, 0.06).unwrap();
        assert_eq!(outcome, GuardOutcome::AtLimit { pos_rad: 1.0 });
        assert_eq!(joint_requests(&rec.take_calls()), vec![1.06]);

        // Stepping back the other way is fine
        let outcome = guard.step(arm, -0.06).unwrap();
        assert!(matches!(outcome, GuardOutcome::Stepped { .. }));
    }

    #[test]
    fn test_fallback_towards_lower_limit() {
        let rec = Recorder::new(6);
        rec.arm().waist_limits_rad = (-1.0, 1.0);
        rec.arm().joints[0] = -0.98;

        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let guard = JointLimitGuard::new(WAIST_JOINT, (-1.0, 1.0), PROFILE);

        let outcome = guard.step(arm, -0.06).unwrap();
        assert_eq!(
            outcome,
            GuardOutcome::FallbackToLimit {
                pos_rad: -1.0,
                executed: true
            }
        );
        assert_eq!(rec.arm().waist_rad(), -1.0);
    }

    #[test]
    fn test_unknown_joint() {
        let rec = Recorder::new(6);
        let mut eqpt = rec.eqpt(true, false, false);
        let arm = eqpt.arm.as_mut().unwrap().as_mut();
        let guard = JointLimitGuard::new("shoulder", (-1.0, 1.0), PROFILE);

        assert_eq!(
            guard.step(arm, 0.06),
            Err(ArmClientError::UnknownJoint("shoulder".into()))
        );
        assert!(rec.take_calls().is_empty());
    }
}
