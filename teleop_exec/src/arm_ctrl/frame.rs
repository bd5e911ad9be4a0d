//! Homogeneous transform helpers
//!
//! Transforms are plain `Matrix4<f64>` values laid out as
//!
//! ```text
//! | R p |
//! | 0 1 |
//! ```
//!
//! where `R` is a 3x3 rotation and `p` a translation. They are `Copy`, so every edit produces a
//! new value and tracked state is only replaced by assignment.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, Matrix4, Rotation3, Vector3};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Below this value of `cos(pitch)` the roll/yaw decomposition is singular (gimbal lock).
const GIMBAL_LOCK_THRESHOLD: f64 = 1e-6;

// ---------------------------------------------------------------------------
// TYPES
// ---------------------------------------------------------------------------

/// A 4x4 homogeneous transform.
pub type Transform = Matrix4<f64>;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Build a transform from a rotation and a translation.
pub fn from_parts(rot: &Matrix3<f64>, pos: &Vector3<f64>) -> Transform {
    let mut t = Transform::identity();
    t.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
    t.fixed_view_mut::<3, 1>(0, 3).copy_from(pos);
    t
}

/// The rotation part of the transform.
pub fn rotation(t: &Transform) -> Matrix3<f64> {
    t.fixed_view::<3, 3>(0, 0).into_owned()
}

/// The translation part of the transform.
pub fn translation(t: &Transform) -> Vector3<f64> {
    t.fixed_view::<3, 1>(0, 3).into_owned()
}

/// Replace the rotation part of the transform.
pub fn set_rotation(t: &mut Transform, rot: &Matrix3<f64>) {
    t.fixed_view_mut::<3, 3>(0, 0).copy_from(rot);
}

/// Inverse of a rigid transform, `[R^T, -R^T p]`.
pub fn inverse(t: &Transform) -> Transform {
    let rot_t = rotation(t).transpose();
    let pos = -(rot_t * translation(t));

    from_parts(&rot_t, &pos)
}

/// Pure rotation about the z axis, with no translation.
pub fn yaw_transform(yaw_rad: f64) -> Transform {
    let (s, c) = yaw_rad.sin_cos();

    let mut t = Transform::identity();
    t[(0, 0)] = c;
    t[(0, 1)] = -s;
    t[(1, 0)] = s;
    t[(1, 1)] = c;
    t
}

/// Decompose a rotation matrix into `(roll, pitch, yaw)` such that
/// `R = Rz(yaw) * Ry(pitch) * Rx(roll)`.
///
/// Near `pitch = ±pi/2` roll and yaw are not separable, in which case yaw is reported as zero and
/// the whole rotation about the vertical is attributed to roll. The matrix is not
/// re-orthonormalised first, so small errors carried in `rot` feed straight into the angles.
pub fn rotation_to_rpy(rot: &Matrix3<f64>) -> (f64, f64, f64) {
    let sy = (rot[(0, 0)].powi(2) + rot[(1, 0)].powi(2)).sqrt();

    if sy >= GIMBAL_LOCK_THRESHOLD {
        (
            rot[(2, 1)].atan2(rot[(2, 2)]),
            (-rot[(2, 0)]).atan2(sy),
            rot[(1, 0)].atan2(rot[(0, 0)]),
        )
    } else {
        (
            (-rot[(1, 2)]).atan2(rot[(1, 1)]),
            (-rot[(2, 0)]).atan2(sy),
            0.0,
        )
    }
}

/// Compose `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rpy_to_rotation(roll_rad: f64, pitch_rad: f64, yaw_rad: f64) -> Matrix3<f64> {
    Rotation3::from_euler_angles(roll_rad, pitch_rad, yaw_rad).into_inner()
}

/// Heading of a transform, i.e. the yaw of its rotation.
pub fn yaw_of(t: &Transform) -> f64 {
    rotation_to_rpy(&rotation(t)).2
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rpy_round_trip() {
        let (roll, pitch, yaw) = (0.3, -0.4, 1.2);
        let rot = rpy_to_rotation(roll, pitch, yaw);
        let (r, p, y) = rotation_to_rpy(&rot);

        assert_relative_eq!(r, roll, epsilon = 1e-12);
        assert_relative_eq!(p, pitch, epsilon = 1e-12);
        assert_relative_eq!(y, yaw, epsilon = 1e-12);
    }

    #[test]
    fn test_gimbal_lock_reports_zero_yaw() {
        let rot = rpy_to_rotation(0.2, std::f64::consts::FRAC_PI_2, 0.5);
        let (_, p, y) = rotation_to_rpy(&rot);

        assert_relative_eq!(p, std::f64::consts::FRAC_PI_2, epsilon = 1e-6);
        assert_eq!(y, 0.0);
    }

    #[test]
    fn test_inverse() {
        let t = from_parts(&rpy_to_rotation(0.1, 0.2, -0.7), &Vector3::new(0.3, -0.1, 0.25));

        assert_relative_eq!(inverse(&t) * t, Transform::identity(), epsilon = 1e-12);
        assert_relative_eq!(t * inverse(&t), Transform::identity(), epsilon = 1e-12);
    }

    #[test]
    fn test_yaw_transform() {
        let t = yaw_transform(0.8);

        assert_relative_eq!(yaw_of(&t), 0.8, epsilon = 1e-12);
        assert_eq!(translation(&t), Vector3::zeros());
        assert_eq!(t[(2, 2)], 1.0);
        assert_eq!(t[(0, 2)], 0.0);
        assert_eq!(t[(2, 0)], 0.0);
    }
}
