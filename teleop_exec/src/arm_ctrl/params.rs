//! Parameters structure for ArmCtrl

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

use comms_if::eqpt::MotionProfile;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the arm control module.
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// End-effector translation per cycle while an axis command is held.
    ///
    /// Units: meters
    pub translate_step_m: f64,

    /// End-effector roll or pitch per cycle while a rotation command is held.
    ///
    /// Units: radians
    pub rotate_step_rad: f64,

    /// Waist rotation per cycle while a waist command is held.
    ///
    /// Units: radians
    pub waist_step_rad: f64,

    /// Name of the waist joint in the arm's kinematic description
    pub waist_joint_name: String,

    /// Lateral motion is only allowed when the tracked end-effector is further forward than this.
    ///
    /// Units: meters
    pub lateral_min_x_m: f64,

    /// Lateral motion is only allowed for arms with at least this many joints
    pub lateral_min_joints: usize,

    /// Profile used for end-effector motions, restored as the arm's default after each preset
    pub ee_profile: MotionProfile,

    /// Profile used for waist steps
    pub waist_profile: MotionProfile,

    /// Profile used for the home and sleep presets
    pub preset_profile: MotionProfile,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            translate_step_m: 0.01,
            rotate_step_rad: 0.04,
            waist_step_rad: 0.06,
            waist_joint_name: String::from("waist"),
            lateral_min_x_m: 0.3,
            lateral_min_joints: 6,
            ee_profile: MotionProfile::new(0.2, 0.1),
            waist_profile: MotionProfile::new(0.2, 0.1),
            preset_profile: MotionProfile::new(1.5, 0.75),
        }
    }
}

impl Params {
    /// Check the parameters are usable, returning a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        let steps = [
            ("translate_step_m", self.translate_step_m),
            ("rotate_step_rad", self.rotate_step_rad),
            ("waist_step_rad", self.waist_step_rad),
        ];
        for (name, step) in steps.iter() {
            if !step.is_finite() || *step <= 0.0 {
                return Err(format!("{} must be positive, found {}", name, step));
            }
        }

        let profiles = [
            ("ee_profile", self.ee_profile),
            ("waist_profile", self.waist_profile),
            ("preset_profile", self.preset_profile),
        ];
        for (name, p) in profiles.iter() {
            if p.moving_time_s <= 0.0 || p.accel_time_s < 0.0 || p.accel_time_s > p.moving_time_s
            {
                return Err(format!("{} is not a valid motion profile: {:?}", name, p));
            }
        }

        if self.waist_joint_name.is_empty() {
            return Err("waist_joint_name is empty".into());
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_params_from_toml() {
        let p: Params = util::params::from_str(
            r#"
            translate_step_m = 0.02
            rotate_step_rad = 0.04
            waist_step_rad = 0.06
            waist_joint_name = "waist"
            lateral_min_x_m = 0.3
            lateral_min_joints = 6
            ee_profile = { moving_time_s = 0.2, accel_time_s = 0.1 }
            waist_profile = { moving_time_s = 0.2, accel_time_s = 0.1 }
            preset_profile = { moving_time_s = 1.5, accel_time_s = 0.75 }
            "#,
        )
        .unwrap();

        assert_eq!(p.translate_step_m, 0.02);
        assert_eq!(p.preset_profile, MotionProfile::new(1.5, 0.75));
        assert!(p.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(Params::default().validate().is_ok());

        let p = Params {
            rotate_step_rad: 0.0,
            ..Default::default()
        };
        assert!(p.validate().unwrap_err().contains("rotate_step_rad"));

        let p = Params {
            ee_profile: MotionProfile::new(0.1, 0.2),
            ..Default::default()
        };
        assert!(p.validate().unwrap_err().contains("ee_profile"));
    }
}
