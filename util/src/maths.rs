//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use num_traits::Float;

/// Clamp a value into the range `[min, max]`.
pub fn clamp<T>(value: T, min: T, max: T) -> T
where
    T: Float,
{
    let mut ret = value;

    if ret > max {
        ret = max
    }
    if ret < min {
        ret = min
    }

    ret
}

/// Step a value by `delta` and clamp the result into `[min, max]`.
pub fn step_clamped<T>(value: T, delta: T, min: T, max: T) -> T
where
    T: Float,
{
    clamp(value + delta, min, max)
}

/// Wrap an angle into the range `(-pi, pi]`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = pi_t + pi_t;

    let mut a = angle % tau_t;
    if a > pi_t {
        a = a - tau_t;
    }
    if a <= -pi_t {
        a = a + tau_t;
    }

    a
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_step_clamped() {
        assert_eq!(step_clamped(0.5f64, 0.125, 0.0, 1.0), 0.625);
        assert_eq!(step_clamped(1.0f64, 0.125, 0.0, 1.0), 1.0);
        assert_eq!(step_clamped(0.0f64, -0.125, 0.0, 1.0), 0.0);
        assert_eq!(step_clamped(0.9f64, 0.125, 0.0, 1.0), 1.0);
    }

    #[test]
    fn test_wrap_pi() {
        const PI: f64 = std::f64::consts::PI;

        assert_eq!(wrap_pi(0f64), 0f64);
        assert_eq!(wrap_pi(PI), PI);
        assert!((wrap_pi(-PI) - PI).abs() < 1e-12);
        assert!((wrap_pi(1.5 * PI) + 0.5 * PI).abs() < 1e-12);
        assert!((wrap_pi(-1.5 * PI) - 0.5 * PI).abs() < 1e-12);
    }
}
